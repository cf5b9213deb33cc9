//! Leptos component wrapping the identity particle canvas.
//!
//! The component creates a full-window canvas and wires window listeners for
//! pointer movement, clicks and resizes. An animation loop runs via
//! `requestAnimationFrame`, handing each frame's timestamp to the state so the
//! clump cycle can advance. Artwork is loaded through `HtmlImageElement` and its
//! pixels are read back through an offscreen canvas.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, HtmlImageElement, MouseEvent, Window};

use super::config::IdentityConfig;
use super::error::IdentityError;
use super::geometry::Point;
use super::render::{CanvasSurface, read_pixels};
use super::state::{IdentityState, ImageRequest, LoadedImage, TriggerKind};

/// Simulation state plus the surface it paints on.
struct CanvasContext {
	state: IdentityState<HtmlImageElement>,
	surface: CanvasSurface,
	/// Timestamp of the latest animation frame, used to stamp async events.
	now: f64,
}

type SharedContext = Rc<RefCell<Option<CanvasContext>>>;

fn window_size(window: &Window) -> (f64, f64) {
	let dim = |v: std::result::Result<JsValue, JsValue>, fallback: f64| {
		v.ok().and_then(|v| v.as_f64()).unwrap_or(fallback)
	};
	(
		dim(window.inner_width(), 800.0),
		dim(window.inner_height(), 600.0),
	)
}

/// Renders the ambient particle field behind the page.
///
/// A click anywhere on the page starts a clump cycle at the click position; a
/// further click once the artwork shows scatters the particles again.
/// `on_trigger` is told which trigger each click was routed to.
#[component]
pub fn IdentityCanvas(
	config: IdentityConfig,
	#[prop(default = None)] on_trigger: Option<Callback<TriggerKind>>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: SharedContext = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let pointer_cbs: Rc<RefCell<Vec<Closure<dyn FnMut(MouseEvent)>>>> =
		Rc::new(RefCell::new(Vec::new()));

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = window_size(&window);
		let surface = match CanvasSurface::new(canvas) {
			Ok(s) => s,
			Err(e) => {
				warn!("identity: canvas unavailable: {}", e);
				return;
			}
		};
		surface.resize(w, h);

		let state = match IdentityState::new(config.clone(), w, h) {
			Ok(s) => s,
			Err(e) => {
				warn!("identity: invalid configuration: {}", e);
				return;
			}
		};
		*context.borrow_mut() = Some(CanvasContext {
			state,
			surface,
			now: 0.0,
		});

		let context_resize = context.clone();
		*resize_cb.borrow_mut() = Some(Closure::new(move || {
			let Some(win) = web_sys::window() else {
				return;
			};
			let (nw, nh) = window_size(&win);
			if let Some(ref mut c) = *context_resize.borrow_mut() {
				c.surface.resize(nw, nh);
				c.state.resize(nw, nh);
			}
		}));
		if let Some(ref cb) = *resize_cb.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let context_move = context.clone();
		let on_mousemove: Closure<dyn FnMut(MouseEvent)> = Closure::new(move |ev: MouseEvent| {
			if let Some(ref mut c) = *context_move.borrow_mut() {
				c.state
					.set_mouse(Point::new(ev.client_x() as f64, ev.client_y() as f64));
			}
		});

		let (context_click, on_trigger) = (context.clone(), on_trigger.clone());
		let on_click: Closure<dyn FnMut(MouseEvent)> = Closure::new(move |ev: MouseEvent| {
			let position = Point::new(ev.client_x() as f64, ev.client_y() as f64);
			let routed = context_click
				.borrow_mut()
				.as_mut()
				.map(|c| c.state.on_click(position, c.now));
			let Some((kind, request)) = routed else {
				return;
			};
			if let Some(request) = request {
				load_artwork(request, context_click.clone());
			}
			if let Some(cb) = &on_trigger {
				cb.run(kind);
			}
		});

		for (event, cb) in [("mousemove", &on_mousemove), ("click", &on_click)] {
			let _ = window.add_event_listener_with_callback(event, cb.as_ref().unchecked_ref());
		}
		pointer_cbs.borrow_mut().extend([on_mousemove, on_click]);

		let (context_anim, animate_inner) = (context.clone(), animate.clone());
		*animate.borrow_mut() = Some(Closure::new(move |timestamp: f64| {
			if let Some(ref mut c) = *context_anim.borrow_mut() {
				c.now = timestamp;
				c.state.frame(timestamp, &mut c.surface);
			}
			if let (Some(win), Some(cb)) = (web_sys::window(), &*animate_inner.borrow()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	view! {
		<canvas
			node_ref=canvas_ref
			class="identity-canvas"
			style="position: fixed; inset: 0; display: block; z-index: -1;"
		/>
	}
}

/// Starts loading the requested artwork and reports the outcome to the state.
fn load_artwork(request: ImageRequest, context: SharedContext) {
	let ImageRequest { cycle, url, .. } = request;
	let report = move |context: &SharedContext, result: std::result::Result<LoadedImage<HtmlImageElement>, IdentityError>| {
		if let Some(ref mut c) = *context.borrow_mut() {
			let now = c.now;
			c.state.on_image_loaded(cycle, result, now);
		}
	};

	let image = match HtmlImageElement::new() {
		Ok(image) => image,
		Err(_) => {
			report(&context, Err(IdentityError::Load(format!("cannot create image for {}", url))));
			return;
		}
	};

	// Only one of the two handlers fires.
	let on_load = {
		let (context, image) = (context.clone(), image.clone());
		Closure::once_into_js(move || {
			let result = read_pixels(&image).map(|pixels| LoadedImage {
				handle: image.clone(),
				pixels,
			});
			report(&context, result);
		})
	};
	let on_error = {
		let (context, url) = (context.clone(), url.clone());
		Closure::once_into_js(move || {
			report(&context, Err(IdentityError::Load(url)));
		})
	};

	image.set_onload(Some(on_load.unchecked_ref()));
	image.set_onerror(Some(on_error.unchecked_ref()));
	image.set_src(&url);
}
