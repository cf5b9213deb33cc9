//! Free-flowing particles that can be sent to a destination and recoloured.

use std::ptr;

use rand::Rng;

use super::config::ParticleConfig;
use super::error::Result;
use super::geometry::{Bounds, Point, lerp_point, random_between};
use super::render::Surface;
use super::theme::{Color, Gradient, Palette};

/// Where a particle is headed, if anywhere.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Destination {
	/// Normal flowing motion.
	#[default]
	None,
	/// Interpolating towards a fixed position and colour.
	MovingTo { position: Point, color: Color },
}

/// Per-frame inputs shared by every particle.
pub struct FrameContext<'a, R: ?Sized> {
	pub bounds: Bounds,
	pub config: &'a ParticleConfig,
	pub rng: &'a mut R,
}

/// A single particle of the identity field.
#[derive(Clone, Debug)]
pub struct Particle {
	pub position: Point,
	/// Render radius.
	pub size: f64,
	pub color: Color,
	/// Carried for future motion tuning; the flow does not read it yet.
	pub weight: f64,
	flow_angle: f64,
	flow_speed: f64,
	destination: Destination,
}

impl Particle {
	/// A free particle with a flow angle of zero.
	pub fn new(position: Point, size: f64, color: Color, weight: f64, flow_speed: f64) -> Self {
		Self {
			position,
			size,
			color,
			weight,
			flow_angle: 0.0,
			flow_speed,
			destination: Destination::None,
		}
	}

	/// A particle at a random spot with random size, palette colour, weight and flow speed.
	pub fn random<R: Rng + ?Sized>(
		rng: &mut R,
		bounds: Bounds,
		config: &ParticleConfig,
		palette: &Palette,
	) -> Self {
		let size = random_between(rng, config.min_size, config.max_size);
		let position = bounds.random_point(rng);
		let color = palette.random(rng);
		let weight = random_between(rng, config.weight_min, config.weight_max);
		let flow_speed = random_between(rng, config.flow_speed_min, config.flow_speed_max);
		Self::new(position, size, color, weight, flow_speed)
	}

	pub fn flow_angle(&self) -> f64 {
		self.flow_angle
	}

	pub fn flow_speed(&self) -> f64 {
		self.flow_speed
	}

	pub fn destination(&self) -> Destination {
		self.destination
	}

	/// True while the particle has a destination.
	pub fn is_in_transit(&self) -> bool {
		matches!(self.destination, Destination::MovingTo { .. })
	}

	/// Sends the particle towards `position`, fading to `color` on the way.
	pub fn set_destination(&mut self, position: Point, color: Color) {
		self.destination = Destination::MovingTo { position, color };
	}

	/// Replaces the target colour while keeping the target position.
	/// Does nothing for a particle with no destination.
	pub fn set_destined_color(&mut self, color: Color) {
		if let Destination::MovingTo { position, .. } = self.destination {
			self.destination = Destination::MovingTo { position, color };
		}
	}

	/// Returns the particle to free flow.
	pub fn clear_destination(&mut self) {
		self.destination = Destination::None;
	}

	/// Advances the particle by one frame.
	///
	/// A particle with a destination covers `clump_speed` of the remaining
	/// distance and colour difference and does nothing else. Otherwise it
	/// follows its flow angle, is pushed away from the pointer, and any axis
	/// that leaves the canvas is re-randomised.
	pub fn update<R: Rng + ?Sized>(&mut self, mouse: Option<Point>, frame: &mut FrameContext<'_, R>) {
		let config = frame.config;

		if let Destination::MovingTo { position, color } = self.destination {
			self.position = lerp_point(self.position, position, config.clump_speed);
			self.color = self.color.lerp(color, config.clump_speed);
			return;
		}

		self.flow_angle += config.flow_angle_increment;
		self.position.x += self.flow_angle.sin() * self.flow_speed;
		self.position.y += self.flow_angle.cos() * self.flow_speed;

		if let Some(mouse) = mouse {
			let distance = self.position.distance_to(mouse);
			if distance < config.mouse_repel_distance {
				let angle = (mouse.y - self.position.y).atan2(mouse.x - self.position.x);
				let force = (config.mouse_repel_distance - distance) / config.repel_force_divisor;
				self.position.x -= angle.cos() * force;
				self.position.y -= angle.sin() * force;
			}
		}

		let bounds = frame.bounds;
		if !bounds.contains_x(self.position.x) {
			self.position.x = frame.rng.r#gen::<f64>() * bounds.width;
		}
		if !bounds.contains_y(self.position.y) {
			self.position.y = frame.rng.r#gen::<f64>() * bounds.height;
		}
	}

	/// Paints the particle as a filled circle.
	pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) -> Result<()> {
		surface.draw_circle(self.position, self.size, self.color)
	}

	/// Draws a gradient line to every other particle within the connection
	/// distance, more opaque the closer they are. Particles in transit draw none.
	///
	/// A line that fails to draw does not stop the rest; the first failure is
	/// returned once every edge has been tried.
	pub fn connect<S: Surface + ?Sized>(
		&self,
		surface: &mut S,
		particles: &[Particle],
		config: &ParticleConfig,
	) -> Result<()> {
		if self.is_in_transit() {
			return Ok(());
		}

		let mut first_error = None;
		for other in particles {
			if ptr::eq(self, other) {
				continue;
			}
			let distance = self.position.distance_to(other.position);
			if distance < config.connection_distance {
				let alpha = 1.0 - distance / config.connection_distance;
				let drawn = surface.draw_line(
					self.position,
					other.position,
					self.size / config.line_width_divisor,
					&Gradient::new(self.color, other.color, alpha),
				);
				if let Err(e) = drawn {
					first_error.get_or_insert(e);
				}
			}
		}
		first_error.map_or(Ok(()), Err)
	}
}
