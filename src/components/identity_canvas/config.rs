//! Tunable parameters for the particle field and the clump animation.
//!
//! Every field has a default, so a page can override just the values it cares
//! about with a partial JSON document:
//!
//! ```json
//! { "particles": { "connectionDistance": 80 }, "clump": { "fraction": 0.5 } }
//! ```

use serde::Deserialize;

use super::error::{IdentityError, Result};
use super::theme::Palette;

/// Motion and appearance of individual particles.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParticleConfig {
	/// Smallest render radius of a free particle.
	pub min_size: f64,
	/// Largest render radius of a free particle.
	pub max_size: f64,
	/// Particles closer than this are joined by a line.
	pub connection_distance: f64,
	/// Radius around the pointer inside which particles are pushed away.
	pub mouse_repel_distance: f64,
	/// Larger values give a gentler push.
	pub repel_force_divisor: f64,
	pub flow_speed_min: f64,
	pub flow_speed_max: f64,
	/// Radians added to each particle's flow angle per frame.
	pub flow_angle_increment: f64,
	/// Fraction of the remaining distance (and colour difference) covered per frame
	/// while a particle travels to its destination.
	pub clump_speed: f64,
	/// Canvas area per particle, in square pixels. Higher means fewer particles.
	pub density_divisor: f64,
	/// Connection line width is the particle size divided by this.
	pub line_width_divisor: f64,
	pub weight_min: f64,
	pub weight_max: f64,
}

impl Default for ParticleConfig {
	fn default() -> Self {
		Self {
			min_size: 1.0,
			max_size: 5.0,
			connection_distance: 60.0,
			mouse_repel_distance: 150.0,
			repel_force_divisor: 15.0,
			flow_speed_min: 0.2,
			flow_speed_max: 0.5,
			flow_angle_increment: 0.01,
			clump_speed: 0.05,
			density_divisor: 5000.0,
			line_width_divisor: 8.0,
			weight_min: 1.0,
			weight_max: 3.0,
		}
	}
}

/// Layout and timing of the clump cycle.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClumpConfig {
	/// Share of all particles that take part in a clump (0.0 to 1.0).
	pub fraction: f64,
	/// Width of the box the clump grid is spread over.
	pub box_width: f64,
	pub box_height: f64,
	/// Added to the computed grid spacing on both axes.
	pub spacing_padding: f64,
	/// Render radius of particles while they form the grid.
	pub clump_size: f64,
	/// Number of artworks in the pool. Indices run from 1 to this value.
	pub image_count: u32,
	/// URL template; `{index}` is replaced by the chosen artwork number.
	pub image_path: String,
	/// Time from colour assignment until the canvas blurs.
	pub blur_delay_ms: f64,
	/// Time from the blur until the artwork replaces the particles.
	pub reveal_delay_ms: f64,
	/// Time the scattered particles travel before they resume flowing.
	pub settle_delay_ms: f64,
	pub blur_radius: f64,
	pub blur_in_ms: f64,
	pub blur_out_ms: f64,
	pub return_unblur_ms: f64,
	/// Offset of the artwork from the click position, on both axes.
	pub image_offset: f64,
	pub image_width: f64,
	pub image_height: f64,
}

impl Default for ClumpConfig {
	fn default() -> Self {
		Self {
			fraction: 1.0,
			box_width: 150.0,
			box_height: 100.0,
			spacing_padding: 7.0,
			clump_size: 5.0,
			image_count: 5,
			image_path: "images/artwork{index}.jpg".to_string(),
			blur_delay_ms: 1500.0,
			reveal_delay_ms: 500.0,
			settle_delay_ms: 1000.0,
			blur_radius: 20.0,
			blur_in_ms: 1000.0,
			blur_out_ms: 500.0,
			return_unblur_ms: 100.0,
			image_offset: 10.0,
			image_width: 260.0,
			image_height: 200.0,
		}
	}
}

impl ClumpConfig {
	/// URL of artwork `index` (1-based).
	pub fn image_url(&self, index: u32) -> String {
		self.image_path.replace("{index}", &index.to_string())
	}
}

/// Complete configuration for the identity canvas.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IdentityConfig {
	/// Motion, size and connection tuning of free particles.
	pub particles: ParticleConfig,
	/// Clump grid, artwork pool and cycle timings.
	pub clump: ClumpConfig,
	/// CSS colours new particles are drawn from.
	pub palette: Vec<String>,
}

impl Default for IdentityConfig {
	fn default() -> Self {
		Self {
			particles: ParticleConfig::default(),
			clump: ClumpConfig::default(),
			palette: Palette::identity()
				.colors
				.iter()
				.map(|c| c.to_css())
				.collect(),
		}
	}
}

impl IdentityConfig {
	/// Parses and validates a (possibly partial) JSON document.
	pub fn from_json(json: &str) -> Result<Self> {
		let config: IdentityConfig = serde_json::from_str(json)?;
		config.validate()?;
		Ok(config)
	}

	/// Checks ranges that would otherwise make the simulation misbehave.
	pub fn validate(&self) -> Result<()> {
		let p = &self.particles;
		let c = &self.clump;

		let checks: [(bool, &str); 10] = [
			(p.min_size > 0.0 && p.min_size <= p.max_size, "particle size range"),
			(
				p.flow_speed_min >= 0.0 && p.flow_speed_min <= p.flow_speed_max,
				"flow speed range",
			),
			(p.weight_min <= p.weight_max, "weight range"),
			(p.clump_speed > 0.0 && p.clump_speed <= 1.0, "clumpSpeed must be in (0, 1]"),
			(p.density_divisor > 0.0, "densityDivisor must be positive"),
			(p.repel_force_divisor > 0.0, "repelForceDivisor must be positive"),
			(p.line_width_divisor > 0.0, "lineWidthDivisor must be positive"),
			((0.0..=1.0).contains(&c.fraction), "clump fraction must be in [0, 1]"),
			(c.image_count >= 1, "imageCount must be at least 1"),
			(
				c.blur_delay_ms >= 0.0 && c.reveal_delay_ms >= 0.0 && c.settle_delay_ms >= 0.0,
				"delays must not be negative",
			),
		];

		if let Some((_, what)) = checks.iter().find(|(ok, _)| !ok) {
			return Err(IdentityError::Config((*what).to_string()));
		}

		self.palette().map(|_| ())
	}

	/// Parses the configured palette.
	pub fn palette(&self) -> Result<Palette> {
		Palette::from_css(&self.palette)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_are_valid() {
		let config = IdentityConfig::default();
		config.validate().unwrap();
		assert_eq!(config.palette().unwrap().colors, Palette::identity().colors);
	}

	#[test]
	fn partial_json_keeps_defaults() {
		let config = IdentityConfig::from_json(
			r#"{ "particles": { "connectionDistance": 80 }, "clump": { "fraction": 0.5 } }"#,
		)
		.unwrap();
		assert_eq!(config.particles.connection_distance, 80.0);
		assert_eq!(config.particles.clump_speed, 0.05);
		assert_eq!(config.clump.fraction, 0.5);
		assert_eq!(config.clump.box_width, 150.0);
	}

	#[test]
	fn rejects_out_of_range_values() {
		for json in [
			r#"{ "clump": { "fraction": 1.5 } }"#,
			r#"{ "particles": { "clumpSpeed": 0 } }"#,
			r#"{ "particles": { "minSize": 6 } }"#,
			r#"{ "clump": { "imageCount": 0 } }"#,
			r#"{ "palette": [] }"#,
		] {
			assert!(
				matches!(IdentityConfig::from_json(json), Err(IdentityError::Config(_))),
				"{json} should be rejected"
			);
		}
	}

	#[test]
	fn rejects_bad_palette_and_bad_json() {
		assert!(matches!(
			IdentityConfig::from_json(r#"{ "palette": ["chartreuse"] }"#),
			Err(IdentityError::Parse(_))
		));
		assert!(matches!(
			IdentityConfig::from_json("{ not json"),
			Err(IdentityError::Config(_))
		));
	}

	#[test]
	fn image_url_substitutes_index() {
		let clump = ClumpConfig::default();
		assert_eq!(clump.image_url(3), "images/artwork3.jpg");
	}
}
