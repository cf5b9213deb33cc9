//! Drawing surface abstraction and its HTML canvas implementation.
//!
//! The simulation only ever paints through [`Surface`], so it can be driven
//! against an in-memory recorder in tests and against a
//! `CanvasRenderingContext2d` in the browser.

use std::f64::consts::PI;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use super::error::{IdentityError, Result};
use super::geometry::Point;
use super::sampler::ImagePixels;
use super::theme::{Color, Gradient};

/// CSS blur filter applied to the whole surface, with the transition used to reach it.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Blur {
	/// Blur radius in pixels. Zero means sharp.
	pub radius: f64,
	pub transition_ms: f64,
}

impl Blur {
	pub fn to(radius: f64, transition_ms: f64) -> Self {
		Self {
			radius,
			transition_ms,
		}
	}
}

/// An opaque 2D painting surface.
pub trait Surface {
	/// Image handle understood by [`Surface::draw_image`].
	type Image;

	fn clear(&mut self);

	fn draw_circle(&mut self, center: Point, radius: f64, color: Color) -> Result<()>;

	fn draw_line(&mut self, from: Point, to: Point, width: f64, gradient: &Gradient) -> Result<()>;

	fn draw_image(&mut self, image: &Self::Image, x: f64, y: f64, w: f64, h: f64) -> Result<()>;

	fn set_blur(&mut self, blur: Blur);
}

/// [`Surface`] over a full-window `<canvas>` and its 2D context.
pub struct CanvasSurface {
	canvas: HtmlCanvasElement,
	ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
	/// Wraps `canvas` and its 2d context.
	pub fn new(canvas: HtmlCanvasElement) -> Result<Self> {
		let ctx = canvas
			.get_context("2d")
			.map_err(js_error)?
			.ok_or_else(|| IdentityError::Render("2d context unavailable".into()))?
			.dyn_into::<CanvasRenderingContext2d>()
			.map_err(|_| IdentityError::Render("context is not a 2d context".into()))?;
		Ok(Self { canvas, ctx })
	}

	/// Sets the backing store size, which also clears the canvas.
	pub fn resize(&self, width: f64, height: f64) {
		self.canvas.set_width(width as u32);
		self.canvas.set_height(height as u32);
	}
}

impl Surface for CanvasSurface {
	type Image = HtmlImageElement;

	fn clear(&mut self) {
		self.ctx.clear_rect(
			0.0,
			0.0,
			self.canvas.width() as f64,
			self.canvas.height() as f64,
		);
	}

	fn draw_circle(&mut self, center: Point, radius: f64, color: Color) -> Result<()> {
		self.ctx.begin_path();
		self.ctx
			.arc(center.x, center.y, radius, 0.0, PI * 2.0)
			.map_err(js_error)?;
		self.ctx.set_fill_style_str(&color.to_css());
		self.ctx.fill();
		Ok(())
	}

	fn draw_line(&mut self, from: Point, to: Point, width: f64, gradient: &Gradient) -> Result<()> {
		let linear = self.ctx.create_linear_gradient(from.x, from.y, to.x, to.y);
		for (offset, css) in gradient.stops() {
			linear.add_color_stop(offset, &css).map_err(js_error)?;
		}

		self.ctx.begin_path();
		#[allow(deprecated)]
		self.ctx.set_stroke_style(&linear);
		self.ctx.set_line_width(width);
		self.ctx.move_to(from.x, from.y);
		self.ctx.line_to(to.x, to.y);
		self.ctx.stroke();
		Ok(())
	}

	fn draw_image(&mut self, image: &HtmlImageElement, x: f64, y: f64, w: f64, h: f64) -> Result<()> {
		self.ctx
			.draw_image_with_html_image_element_and_dw_and_dh(image, x, y, w, h)
			.map_err(js_error)
	}

	fn set_blur(&mut self, blur: Blur) {
		let style = self.canvas.style();
		let _ = style.set_property("transition", &format!("{}ms", blur.transition_ms));
		let _ = style.set_property("filter", &format!("blur({}px)", blur.radius));
	}
}

/// Decodes a loaded `<img>` into RGBA pixels by drawing it onto an offscreen canvas.
pub fn read_pixels(image: &HtmlImageElement) -> Result<ImagePixels> {
	let load_error = |e: JsValue| IdentityError::Load(js_message(&e));
	let document = web_sys::window()
		.and_then(|w| w.document())
		.ok_or_else(|| IdentityError::Load("no document".into()))?;
	let canvas: HtmlCanvasElement = document
		.create_element("canvas")
		.map_err(load_error)?
		.dyn_into()
		.map_err(|_| IdentityError::Load("created element is not a canvas".into()))?;

	let (width, height) = (image.natural_width(), image.natural_height());
	canvas.set_width(width);
	canvas.set_height(height);

	let offscreen = CanvasSurface::new(canvas).map_err(|e| IdentityError::Load(e.to_string()))?;
	offscreen
		.ctx
		.draw_image_with_html_image_element(image, 0.0, 0.0)
		.map_err(load_error)?;
	let data = offscreen
		.ctx
		.get_image_data(0.0, 0.0, width as f64, height as f64)
		.map_err(load_error)?;

	ImagePixels::new(width, height, data.data().0)
}

/// Message of a thrown JS value, using `Error.message` when there is one.
pub fn js_message(value: &JsValue) -> String {
	value
		.dyn_ref::<js_sys::Error>()
		.map(|e| String::from(e.message()))
		.unwrap_or_else(|| format!("{:?}", value))
}

fn js_error(value: JsValue) -> IdentityError {
	IdentityError::Render(js_message(&value))
}
