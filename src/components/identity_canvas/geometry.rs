//! Points, canvas bounds, and the scalar helpers shared by the simulation.

use rand::Rng;

/// A position in canvas (CSS pixel) coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	/// Point at `(x, y)`.
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	pub fn distance_to(self, other: Point) -> f64 {
		distance(self.x, self.y, other.x, other.y)
	}
}

/// Drawable extent of the canvas. The origin is always the top-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Bounds {
	pub width: f64,
	pub height: f64,
}

impl Bounds {
	/// Bounds of a `width` x `height` canvas.
	pub const fn new(width: f64, height: f64) -> Self {
		Self { width, height }
	}

	/// True when `p` lies inside the bounds, edges included.
	pub fn contains(&self, p: Point) -> bool {
		self.contains_x(p.x) && self.contains_y(p.y)
	}

	/// NaN is never contained, so a corrupted coordinate is treated as off-canvas.
	pub fn contains_x(&self, x: f64) -> bool {
		(0.0..=self.width).contains(&x)
	}

	pub fn contains_y(&self, y: f64) -> bool {
		(0.0..=self.height).contains(&y)
	}

	/// Uniformly random point inside the bounds.
	pub fn random_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Point {
		Point::new(
			rng.r#gen::<f64>() * self.width,
			rng.r#gen::<f64>() * self.height,
		)
	}
}

/// Euclidean distance between `(x1, y1)` and `(x2, y2)`.
pub fn distance(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
	let (dx, dy) = (x2 - x1, y2 - y1);
	(dx * dx + dy * dy).sqrt()
}

/// Linear interpolation, `t = 0` yields `a` and `t = 1` yields `b`.
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
	t * b + (1.0 - t) * a
}

/// Component-wise [`lerp`] between two points.
pub fn lerp_point(from: Point, to: Point, t: f64) -> Point {
	Point::new(lerp(from.x, to.x, t), lerp(from.y, to.y, t))
}

/// Uniform value in `[min, max)`. Unlike `gen_range` this tolerates `min == max`.
pub fn random_between<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
	rng.r#gen::<f64>() * (max - min) + min
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	#[test]
	fn distance_is_euclidean() {
		assert_eq!(distance(0.0, 0.0, 3.0, 4.0), 5.0);
		assert_eq!(Point::new(1.0, 1.0).distance_to(Point::new(1.0, 1.0)), 0.0);
	}

	#[test]
	fn lerp_hits_endpoints_and_midpoint() {
		assert_eq!(lerp(10.0, 20.0, 0.0), 10.0);
		assert_eq!(lerp(10.0, 20.0, 1.0), 20.0);
		assert_eq!(lerp(10.0, 20.0, 0.5), 15.0);

		let p = lerp_point(Point::new(0.0, 100.0), Point::new(100.0, 0.0), 0.25);
		assert_eq!(p, Point::new(25.0, 75.0));
	}

	#[test]
	fn bounds_reject_nan_and_outside() {
		let b = Bounds::new(100.0, 50.0);
		assert!(b.contains(Point::new(0.0, 50.0)));
		assert!(!b.contains(Point::new(-0.1, 10.0)));
		assert!(!b.contains(Point::new(10.0, 50.1)));
		assert!(!b.contains_x(f64::NAN));
	}

	#[test]
	fn random_values_stay_in_range() {
		let mut rng = StdRng::seed_from_u64(3);
		let b = Bounds::new(640.0, 480.0);
		for _ in 0..1000 {
			assert!(b.contains(b.random_point(&mut rng)));
			let v = random_between(&mut rng, 1.0, 5.0);
			assert!((1.0..5.0).contains(&v));
		}
		assert_eq!(random_between(&mut rng, 2.0, 2.0), 2.0);
	}
}
