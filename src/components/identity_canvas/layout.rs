//! Near-square grid shared by the clump formation and the image sampler.

use super::geometry::Point;

/// Row-major grid of `columns × rows` cells holding `count` items.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridLayout {
	pub columns: usize,
	pub rows: usize,
	pub spacing_x: f64,
	pub spacing_y: f64,
}

impl GridLayout {
	/// `ceil(sqrt(count))` columns and just enough rows to hold `count` items.
	pub fn dimensions(count: usize) -> (usize, usize) {
		if count == 0 {
			return (0, 0);
		}
		let columns = (count as f64).sqrt().ceil() as usize;
		(columns, count.div_ceil(columns))
	}

	/// Spreads `count` items over a `box_width × box_height` area, with `padding`
	/// added to the spacing on each axis.
	pub fn new(count: usize, box_width: f64, box_height: f64, padding: f64) -> Self {
		let (columns, rows) = Self::dimensions(count);
		Self {
			columns,
			rows,
			spacing_x: box_width / (columns + 1) as f64 + padding,
			spacing_y: box_height / (rows + 1) as f64 + padding,
		}
	}

	/// `(column, row)` of item `index`.
	pub fn cell(&self, index: usize) -> (usize, usize) {
		let columns = self.columns.max(1);
		(index % columns, index / columns)
	}

	/// Position of item `index`, offset from `origin`. The first cell sits one
	/// spacing step in from the origin on both axes.
	pub fn position(&self, index: usize, origin: Point) -> Point {
		let (col, row) = self.cell(index);
		Point::new(
			self.spacing_x * (col + 1) as f64 + origin.x,
			self.spacing_y * (row + 1) as f64 + origin.y,
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn dimensions_are_near_square() {
		assert_eq!(GridLayout::dimensions(0), (0, 0));
		assert_eq!(GridLayout::dimensions(1), (1, 1));
		assert_eq!(GridLayout::dimensions(9), (3, 3));
		assert_eq!(GridLayout::dimensions(10), (4, 3));
		assert_eq!(GridLayout::dimensions(17), (5, 4));
		for count in 1..500 {
			let (c, r) = GridLayout::dimensions(count);
			assert!(c * r >= count);
			assert!(c * (r - 1) < count);
		}
	}

	#[test]
	fn nine_items_form_three_by_three() {
		let grid = GridLayout::new(9, 150.0, 100.0, 7.0);
		assert_eq!(grid.spacing_x, 150.0 / 4.0 + 7.0);
		assert_eq!(grid.spacing_y, 100.0 / 4.0 + 7.0);
		assert_eq!(grid.cell(5), (2, 1));
		assert_eq!(
			grid.position(5, Point::new(100.0, 100.0)),
			Point::new(grid.spacing_x * 3.0 + 100.0, grid.spacing_y * 2.0 + 100.0)
		);
	}
}
