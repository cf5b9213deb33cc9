//! identity-canvas: Ambient particle identity background for the portfolio site.
//!
//! This crate provides a WASM canvas component that renders a flowing particle
//! field and, on click, gathers the particles into a grid coloured from an
//! artwork before revealing the artwork itself.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

// Only here to switch on the `js` entropy source for `rand` on wasm.
use getrandom as _;

pub use components::identity_canvas::{
	ClumpPhase, IdentityCanvas, IdentityConfig, IdentityError, IdentityState, TriggerKind,
};

/// Info line shown before the first click.
const INFO_INITIAL: &str = "Click anywhere.";

/// Info line shown once the visitor has clicked.
const INFO_EXPLAINED: &str = "Each dot represents an idea. Clicking on the canvas will join them together to create an artwork. Click again to make them separate.";

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("identity-canvas: logging initialized");
}

/// Load configuration from a script element with id="identity-config".
/// Expected format: partial JSON, e.g. { "clump": { "fraction": 0.5 } }.
/// Falls back to defaults when the element is missing or invalid.
fn load_config() -> IdentityConfig {
	let Some(json_text) = config_script_text() else {
		return IdentityConfig::default();
	};

	match IdentityConfig::from_json(&json_text) {
		Ok(config) => {
			info!("identity-canvas: loaded configuration");
			config
		}
		Err(e) => {
			warn!("identity-canvas: {}, using defaults", e);
			IdentityConfig::default()
		}
	}
}

fn config_script_text() -> Option<String> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("identity-config")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	script.text().ok()
}

/// Main application component.
/// Loads configuration from the DOM and renders the particle background.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let config = load_config();
	let (info_text, set_info_text) = signal(INFO_INITIAL.to_string());
	let on_trigger = Callback::new(move |_: TriggerKind| {
		set_info_text.set(INFO_EXPLAINED.to_string());
	});

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Identity" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="identity-background">
			<IdentityCanvas config=config on_trigger=Some(on_trigger) />
			<div class="identity-overlay">
				<p id="info-text" class="info-text">{move || info_text.get()}</p>
			</div>
		</div>
	}
}
