//! Picks one representative colour per particle from an artwork's pixels.

use super::error::{IdentityError, Result};
use super::layout::GridLayout;
use super::theme::Color;

/// Decoded RGBA pixels of an image, row-major, four bytes per pixel.
#[derive(Clone, Debug, PartialEq)]
pub struct ImagePixels {
	width: u32,
	height: u32,
	data: Vec<u8>,
}

impl ImagePixels {
	/// Wraps a pixel buffer, rejecting empty images and buffers of the wrong length.
	pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
		if width == 0 || height == 0 {
			return Err(IdentityError::InvalidArgument(format!(
				"image has no pixels ({}x{})",
				width, height
			)));
		}
		let expected = width as usize * height as usize * 4;
		if data.len() != expected {
			return Err(IdentityError::InvalidArgument(format!(
				"expected {} bytes of RGBA for {}x{}, got {}",
				expected,
				width,
				height,
				data.len()
			)));
		}
		Ok(Self {
			width,
			height,
			data,
		})
	}

	pub fn width(&self) -> u32 {
		self.width
	}

	pub fn height(&self) -> u32 {
		self.height
	}

	/// RGB at `(x, y)`, alpha discarded.
	pub fn rgb(&self, x: u32, y: u32) -> Option<Color> {
		if x >= self.width || y >= self.height {
			return None;
		}
		let i = (y as usize * self.width as usize + x as usize) * 4;
		Some(Color::from_u8(self.data[i], self.data[i + 1], self.data[i + 2]))
	}
}

/// Samples `count` colours from `image` on an evenly spaced interior grid.
///
/// The grid has the same shape as the clump formation, and sample `i` is read
/// at `(step_x * (col + 1), step_y * (row + 1))`: evenly spaced interior points,
/// never the right or bottom edge. Colours come back in row-major order.
pub fn sample_colors(image: Option<&ImagePixels>, count: usize) -> Result<Vec<Color>> {
	let Some(image) = image else {
		return Err(IdentityError::InvalidArgument("no image to sample".into()));
	};
	if count == 0 {
		return Err(IdentityError::InvalidArgument(
			"sample count must be positive".into(),
		));
	}

	let (columns, rows) = GridLayout::dimensions(count);
	let step_x = image.width as f64 / (columns + 1) as f64;
	let step_y = image.height as f64 / (rows + 1) as f64;

	(0..count)
		.map(|i| {
			let (col, row) = (i % columns, i / columns);
			let x = ((step_x * (col + 1) as f64).floor() as u32).min(image.width - 1);
			let y = ((step_y * (row + 1) as f64).floor() as u32).min(image.height - 1);
			image.rgb(x, y).ok_or_else(|| {
				IdentityError::InvalidArgument(format!("sample ({}, {}) outside image", x, y))
			})
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	/// Pixel colour encodes its own coordinates: r = x, g = y, b = 7.
	fn coordinate_image(width: u32, height: u32) -> ImagePixels {
		let mut data = Vec::with_capacity((width * height * 4) as usize);
		for y in 0..height {
			for x in 0..width {
				data.extend_from_slice(&[x as u8, y as u8, 7, 255]);
			}
		}
		ImagePixels::new(width, height, data).unwrap()
	}

	#[test]
	fn returns_exactly_count_valid_colors() {
		let image = coordinate_image(64, 48);
		for count in [1, 2, 9, 10, 57, 400] {
			let colors = sample_colors(Some(&image), count).unwrap();
			assert_eq!(colors.len(), count);
			assert!(colors.iter().all(Color::is_valid));
		}
	}

	#[test]
	fn samples_interior_grid_points_in_row_major_order() {
		let image = coordinate_image(40, 40);
		let colors = sample_colors(Some(&image), 9).unwrap();
		// 3x3 grid, step = 40 / 4 = 10.
		let expected: Vec<Color> = (0..3)
			.flat_map(|row| (0..3).map(move |col| (col, row)))
			.map(|(col, row)| Color::rgb(10.0 * (col + 1) as f64, 10.0 * (row + 1) as f64, 7.0))
			.collect();
		assert_eq!(colors, expected);
	}

	#[test]
	fn samples_stay_inside_small_images() {
		let image = coordinate_image(5, 5);
		for c in sample_colors(Some(&image), 100).unwrap() {
			assert!(c.r < 5.0 && c.g < 5.0);
		}
	}

	#[test]
	fn rejects_missing_image_and_zero_count() {
		let image = coordinate_image(4, 4);
		assert!(matches!(
			sample_colors(None, 4),
			Err(IdentityError::InvalidArgument(_))
		));
		assert!(matches!(
			sample_colors(Some(&image), 0),
			Err(IdentityError::InvalidArgument(_))
		));
	}

	#[test]
	fn pixel_buffer_must_match_dimensions() {
		assert!(ImagePixels::new(2, 2, vec![0; 15]).is_err());
		assert!(ImagePixels::new(0, 2, Vec::new()).is_err());
		assert!(ImagePixels::new(2, 2, vec![0; 16]).is_ok());
	}
}
