//! UI components.

pub mod identity_canvas;
