//! Ambient particle identity background.
//!
//! Renders a field of flowing, connected particles on a full-window canvas:
//! - Particles drift along per-particle flow angles and avoid the pointer
//! - Nearby particles are joined by gradient lines that fade with distance
//! - A click gathers a random share of the particles into a grid coloured from a
//!   randomly chosen artwork, then swaps the grid for the artwork itself
//! - A second click scatters them again
//!
//! # Example
//!
//! ```ignore
//! use identity_canvas::{IdentityCanvas, IdentityConfig};
//!
//! view! { <IdentityCanvas config=IdentityConfig::default() /> }
//! ```

mod component;
pub mod config;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod particles;
pub mod render;
pub mod sampler;
pub mod state;
pub mod theme;

pub use component::IdentityCanvas;
pub use config::{ClumpConfig, IdentityConfig, ParticleConfig};
pub use error::IdentityError;
pub use state::{ClumpPhase, IdentityState, ImageRequest, LoadedImage, TriggerKind};
