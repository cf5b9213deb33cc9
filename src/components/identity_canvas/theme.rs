//! Colours, the identity palette, and connection-line gradients.

use std::str::FromStr;

use rand::Rng;

use super::error::{IdentityError, Result};
use super::geometry::lerp;

/// RGB colour with floating-point channels in `0.0..=255.0`.
///
/// Channels stay fractional so repeated small interpolation steps keep
/// converging instead of stalling on integer truncation.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Color {
	pub r: f64,
	pub g: f64,
	pub b: f64,
}

impl Color {
	pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
		Self { r, g, b }
	}

	pub fn from_u8(r: u8, g: u8, b: u8) -> Self {
		Self::rgb(r as f64, g as f64, b as f64)
	}

	/// Linear interpolation between two colours, channel by channel.
	pub fn lerp(self, other: Color, t: f64) -> Self {
		Self {
			r: lerp(self.r, other.r, t),
			g: lerp(self.g, other.g, t),
			b: lerp(self.b, other.b, t),
		}
	}

	pub fn is_valid(&self) -> bool {
		[self.r, self.g, self.b]
			.iter()
			.all(|c| (0.0..=255.0).contains(c))
	}

	pub fn to_css(self) -> String {
		format!(
			"rgb({}, {}, {})",
			self.r.round(),
			self.g.round(),
			self.b.round()
		)
	}

	pub fn to_css_alpha(self, a: f64) -> String {
		format!(
			"rgba({}, {}, {}, {})",
			self.r.round(),
			self.g.round(),
			self.b.round(),
			a.clamp(0.0, 1.0)
		)
	}
}

impl FromStr for Color {
	type Err = IdentityError;

	/// Accepts `rgb(r, g, b)`, `rgba(r, g, b, a)` (alpha dropped), `#rrggbb` and `#rgb`.
	fn from_str(s: &str) -> Result<Self> {
		let s = s.trim();
		if let Some(hex) = s.strip_prefix('#') {
			return parse_hex(hex).ok_or_else(|| IdentityError::Parse(s.to_string()));
		}

		let body = s
			.strip_prefix("rgba(")
			.or_else(|| s.strip_prefix("rgb("))
			.and_then(|rest| rest.strip_suffix(')'))
			.ok_or_else(|| IdentityError::Parse(s.to_string()))?;

		let channels: Vec<f64> = body
			.split(',')
			.take(3)
			.map(|c| c.trim().parse::<f64>())
			.collect::<std::result::Result<_, _>>()
			.map_err(|_| IdentityError::Parse(s.to_string()))?;

		match channels[..] {
			[r, g, b] => {
				let color = Color::rgb(r, g, b);
				if color.is_valid() {
					Ok(color)
				} else {
					Err(IdentityError::Parse(s.to_string()))
				}
			}
			_ => Err(IdentityError::Parse(s.to_string())),
		}
	}
}

fn parse_hex(hex: &str) -> Option<Color> {
	if !hex.is_ascii() {
		return None;
	}
	match hex.len() {
		6 => {
			let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
			let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
			let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
			Some(Color::from_u8(r, g, b))
		}
		3 => {
			let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|d| d * 17);
			Some(Color::from_u8(digit(0)?, digit(1)?, digit(2)?))
		}
		_ => None,
	}
}

/// Interpolates two CSS colour strings and returns the result as `rgb(...)`.
pub fn lerp_colors(from: &str, to: &str, t: f64) -> Result<String> {
	let (a, b) = (from.parse::<Color>()?, to.parse::<Color>()?);
	let c = a.lerp(b, t);
	Ok(format!("rgb({}, {}, {})", c.r, c.g, c.b))
}

/// Colours new particles are drawn from.
#[derive(Clone, Debug)]
pub struct Palette {
	pub colors: Vec<Color>,
}

impl Palette {
	/// Coral through deep purple.
	pub fn identity() -> Self {
		Self {
			colors: vec![
				Color::rgb(255.0, 94.0, 91.0),  // Coral
				Color::rgb(215.0, 137.0, 215.0), // Lavender
				Color::rgb(157.0, 101.0, 201.0), // Purple
				Color::rgb(93.0, 84.0, 164.0),   // Deep purple
			],
		}
	}

	/// Parses a list of CSS colour strings. An empty list is rejected.
	pub fn from_css<S: AsRef<str>>(colors: &[S]) -> Result<Self> {
		if colors.is_empty() {
			return Err(IdentityError::Config("palette is empty".into()));
		}
		let colors = colors
			.iter()
			.map(|c| c.as_ref().parse())
			.collect::<Result<Vec<Color>>>()?;
		Ok(Self { colors })
	}

	pub fn random<R: Rng + ?Sized>(&self, rng: &mut R) -> Color {
		self.colors[rng.gen_range(0..self.colors.len())]
	}
}

impl Default for Palette {
	fn default() -> Self {
		Self::identity()
	}
}

/// Two-stop linear gradient for a connection line. Both stops share one opacity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Gradient {
	pub start: Color,
	pub end: Color,
	pub alpha: f64,
}

impl Gradient {
	pub fn new(start: Color, end: Color, alpha: f64) -> Self {
		Self { start, end, alpha }
	}

	/// `(offset, css)` colour stops ready for `CanvasGradient::add_color_stop`.
	pub fn stops(&self) -> [(f32, String); 2] {
		[
			(0.0, self.start.to_css_alpha(self.alpha)),
			(1.0, self.end.to_css_alpha(self.alpha)),
		]
	}
}
