//! Particle field state and the clump cycle.
//!
//! The cycle runs `Idle → Clumping → ShowingImage → Returning → Idle`. It never
//! sleeps: every frame passes the current timestamp in, and pending steps fire
//! once their deadline has passed. Image loading is handed to the caller via
//! [`ImageRequest`] and reported back through [`IdentityState::on_image_loaded`].

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::config::IdentityConfig;
use super::error::Result;
use super::geometry::{Bounds, Point, random_between};
use super::layout::GridLayout;
use super::particles::{Destination, FrameContext, Particle};
use super::render::{Blur, Surface};
use super::sampler::{ImagePixels, sample_colors};
use super::theme::Palette;

/// Where the clump cycle currently is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClumpPhase {
	/// Particles flow freely and avoid the pointer.
	Idle,
	/// The selected particles travel to the grid and take on the artwork's colours.
	Clumping,
	/// The artwork is drawn in place of the particles.
	ShowingImage,
	/// The selected particles scatter back across the canvas.
	Returning,
}

/// Which trigger a click was routed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TriggerKind {
	/// Started a clump cycle.
	Primary,
	/// Scattered a running cycle.
	Secondary,
}

/// An artwork the caller should load for clump cycle `cycle`.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageRequest {
	/// Cycle the artwork belongs to; hand it back to [`IdentityState::on_image_loaded`].
	pub cycle: u64,
	/// 1-based index into the artwork pool.
	pub index: u32,
	/// Where to fetch the artwork from.
	pub url: String,
}

/// A loaded artwork: the handle the surface draws, plus its decoded pixels.
pub struct LoadedImage<I> {
	/// Drawn while the artwork is showing.
	pub handle: I,
	/// Sampled for the particles' colours.
	pub pixels: ImagePixels,
}

/// Pending step of the active cycle.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Step {
	AwaitingImage,
	Blur { at: f64 },
	Reveal { at: f64 },
	Shown,
	Settle { at: f64 },
}

struct ClumpCycle<I> {
	id: u64,
	origin: Point,
	/// Indices into the particle set, in grid order.
	selection: Vec<usize>,
	layout: GridLayout,
	image: Option<I>,
	step: Step,
}

/// Owns the particle set, pointer position, and clump cycle for one canvas.
///
/// `I` is the surface's image handle; tests use `()`.
pub struct IdentityState<I> {
	config: IdentityConfig,
	palette: Palette,
	particles: Vec<Particle>,
	bounds: Bounds,
	mouse: Option<Point>,
	phase: ClumpPhase,
	cycle: Option<ClumpCycle<I>>,
	ready_for_finish: bool,
	blur: Blur,
	applied_blur: Option<Blur>,
	cycles_started: u64,
	rng: StdRng,
}

impl<I> IdentityState<I> {
	/// Builds the particle field for a `width` x `height` canvas, seeded from entropy.
	pub fn new(config: IdentityConfig, width: f64, height: f64) -> Result<Self> {
		Self::with_rng(config, width, height, StdRng::from_entropy())
	}

	/// Like [`IdentityState::new`] with a caller-provided generator.
	pub fn with_rng(config: IdentityConfig, width: f64, height: f64, rng: StdRng) -> Result<Self> {
		config.validate()?;
		let palette = config.palette()?;
		let mut state = Self {
			config,
			palette,
			particles: Vec::new(),
			bounds: Bounds::default(),
			mouse: None,
			phase: ClumpPhase::Idle,
			cycle: None,
			ready_for_finish: false,
			blur: Blur::default(),
			applied_blur: None,
			cycles_started: 0,
			rng,
		};
		state.resize(width, height);
		Ok(state)
	}

	/// Adopts new canvas bounds and rebuilds the particle set, abandoning any clump cycle.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.bounds = Bounds::new(width.max(0.0), height.max(0.0));
		let count = (self.bounds.width * self.bounds.height / self.config.particles.density_divisor)
			.floor() as usize;

		if let Some(cycle) = self.cycle.take() {
			debug!("identity: resize abandoned clump cycle {}", cycle.id);
		}
		self.phase = ClumpPhase::Idle;
		self.ready_for_finish = false;
		self.blur = Blur::default();

		let (bounds, config, palette, rng) =
			(self.bounds, &self.config.particles, &self.palette, &mut self.rng);
		self.particles = (0..count)
			.map(|_| Particle::random(rng, bounds, config, palette))
			.collect();

		info!(
			"identity: {} particles for {}x{}",
			count, self.bounds.width, self.bounds.height
		);
	}

	/// Records the latest pointer position.
	pub fn set_mouse(&mut self, position: Point) {
		self.mouse = Some(position);
	}

	/// The current particle set.
	pub fn particles(&self) -> &[Particle] {
		&self.particles
	}

	/// Current canvas bounds.
	pub fn bounds(&self) -> Bounds {
		self.bounds
	}

	/// Where the clump cycle currently is.
	pub fn phase(&self) -> ClumpPhase {
		self.phase
	}

	/// True while the artwork is showing and a secondary trigger would scatter it.
	pub fn is_ready_for_finish(&self) -> bool {
		self.ready_for_finish
	}

	/// Blur the surface should be showing.
	pub fn blur(&self) -> Blur {
		self.blur
	}

	/// Particle indices taking part in the current cycle, in grid order.
	pub fn selection(&self) -> &[usize] {
		self.cycle
			.as_ref()
			.map(|c| c.selection.as_slice())
			.unwrap_or(&[])
	}

	/// Grid of the current cycle, if one is running.
	pub fn layout(&self) -> Option<GridLayout> {
		self.cycle.as_ref().map(|c| c.layout)
	}

	/// Artwork of the current cycle, once it has loaded.
	pub fn current_image(&self) -> Option<&I> {
		self.cycle.as_ref().and_then(|c| c.image.as_ref())
	}

	/// Routes a click: secondary while a cycle is running, primary otherwise.
	pub fn on_click(&mut self, position: Point, now: f64) -> (TriggerKind, Option<ImageRequest>) {
		if self.phase != ClumpPhase::Idle {
			self.on_trigger_secondary(now);
			(TriggerKind::Secondary, None)
		} else {
			(TriggerKind::Primary, self.on_trigger_primary(position))
		}
	}

	/// Starts a clump cycle around `position`.
	///
	/// A random subset of particles is sent to a grid whose first cell sits just
	/// below and right of `position`, shrunk to the clump size. Returns the
	/// artwork to load; `None` when a cycle is already running or the subset
	/// would be empty.
	pub fn on_trigger_primary(&mut self, position: Point) -> Option<ImageRequest> {
		if self.phase != ClumpPhase::Idle {
			debug!("identity: clump already running, primary trigger ignored");
			return None;
		}

		let clump = &self.config.clump;
		let count = (self.particles.len() as f64 * clump.fraction).floor() as usize;
		if count == 0 {
			debug!("identity: no particles to clump");
			return None;
		}

		let selection = rand::seq::index::sample(&mut self.rng, self.particles.len(), count).into_vec();
		let layout = GridLayout::new(count, clump.box_width, clump.box_height, clump.spacing_padding);

		for (i, &idx) in selection.iter().enumerate() {
			let particle = &mut self.particles[idx];
			// Colour stays put until the artwork has been sampled.
			let color = particle.color;
			particle.set_destination(layout.position(i, position), color);
			particle.size = clump.clump_size;
		}

		self.cycles_started += 1;
		let id = self.cycles_started;
		let index = self.rng.gen_range(1..=clump.image_count);
		let url = clump.image_url(index);

		info!(
			"identity: clump cycle {} at ({}, {}), {} particles in {}x{} grid, artwork {}",
			id, position.x, position.y, count, layout.columns, layout.rows, url
		);

		self.cycle = Some(ClumpCycle {
			id,
			origin: position,
			selection,
			layout,
			image: None,
			step: Step::AwaitingImage,
		});
		self.phase = ClumpPhase::Clumping;

		Some(ImageRequest {
			cycle: id,
			index,
			url,
		})
	}

	/// Receives the artwork for cycle `cycle`.
	///
	/// On success each selected particle is given its sampled colour and the
	/// blur/reveal timers start from `now`. A failed load aborts the cycle.
	/// Results for a cycle that is no longer current are dropped.
	pub fn on_image_loaded(&mut self, cycle: u64, result: Result<LoadedImage<I>>, now: f64) {
		let Some(active) = self
			.cycle
			.as_mut()
			.filter(|c| c.id == cycle && c.step == Step::AwaitingImage)
		else {
			debug!("identity: dropping image for stale clump cycle {}", cycle);
			return;
		};

		let sampled = result.and_then(|image| {
			sample_colors(Some(&image.pixels), active.selection.len()).map(|colors| (image.handle, colors))
		});

		match sampled {
			Ok((handle, colors)) => {
				for (&idx, color) in active.selection.iter().zip(colors) {
					self.particles[idx].set_destined_color(color);
				}
				active.image = Some(handle);
				active.step = Step::Blur {
					at: now + self.config.clump.blur_delay_ms,
				};
				debug!("identity: artwork ready for clump cycle {}", cycle);
			}
			Err(e) => {
				warn!("identity: clump cycle {} aborted: {}", cycle, e);
				self.abort_cycle();
			}
		}
	}

	/// Scatters the clumped particles again. Only acts once the artwork is showing.
	pub fn on_trigger_secondary(&mut self, now: f64) -> bool {
		if !self.ready_for_finish {
			return false;
		}
		let Some(cycle) = self.cycle.as_mut() else {
			return false;
		};

		let config = &self.config;
		cycle.image = None;
		for &idx in &cycle.selection {
			let particle = &mut self.particles[idx];
			let color = match particle.destination() {
				Destination::MovingTo { color, .. } => color,
				Destination::None => particle.color,
			};
			particle.set_destination(self.bounds.random_point(&mut self.rng), color);
			particle.size = random_between(
				&mut self.rng,
				config.particles.min_size,
				config.particles.max_size,
			);
		}
		cycle.step = Step::Settle {
			at: now + config.clump.settle_delay_ms,
		};

		self.blur = Blur::to(0.0, config.clump.return_unblur_ms);
		self.ready_for_finish = false;
		self.phase = ClumpPhase::Returning;
		debug!("identity: clump cycle {} returning", cycle.id);
		true
	}

	/// Fires every cycle step whose deadline is at or before `now`.
	pub fn advance(&mut self, now: f64) {
		loop {
			let Some(cycle) = self.cycle.as_mut() else {
				return;
			};
			let clump = &self.config.clump;

			match cycle.step {
				Step::Blur { at } if now >= at => {
					self.blur = Blur::to(clump.blur_radius, clump.blur_in_ms);
					cycle.step = Step::Reveal {
						at: at + clump.reveal_delay_ms,
					};
				}
				Step::Reveal { at } if now >= at => {
					self.blur = Blur::to(0.0, clump.blur_out_ms);
					self.phase = ClumpPhase::ShowingImage;
					self.ready_for_finish = true;
					cycle.step = Step::Shown;
					debug!("identity: clump cycle {} showing artwork", cycle.id);
				}
				Step::Settle { at } if now >= at => {
					for &idx in &cycle.selection {
						self.particles[idx].clear_destination();
					}
					debug!("identity: clump cycle {} finished", cycle.id);
					self.cycle = None;
					self.phase = ClumpPhase::Idle;
				}
				_ => return,
			}
		}
	}

	/// Ends the active cycle where it stands: particles keep their current
	/// position, drop their destination and get a normal size back.
	fn abort_cycle(&mut self) {
		if let Some(cycle) = self.cycle.take() {
			let config = &self.config.particles;
			for idx in cycle.selection {
				let particle = &mut self.particles[idx];
				particle.clear_destination();
				particle.size = random_between(&mut self.rng, config.min_size, config.max_size);
			}
		}
		self.phase = ClumpPhase::Idle;
		self.ready_for_finish = false;
		self.blur = Blur::default();
	}

	/// Advances pending steps and paints one frame.
	///
	/// While the artwork is showing only the artwork is drawn. Otherwise every
	/// particle is updated and drawn, then every particle draws its connections
	/// against the full set. A particle that fails to paint is skipped.
	pub fn frame<S>(&mut self, now: f64, surface: &mut S)
	where
		S: Surface<Image = I> + ?Sized,
	{
		self.advance(now);

		if self.applied_blur != Some(self.blur) {
			surface.set_blur(self.blur);
			self.applied_blur = Some(self.blur);
		}

		surface.clear();

		if self.phase == ClumpPhase::ShowingImage {
			let clump = &self.config.clump;
			if let Some(cycle) = &self.cycle {
				if let Some(image) = &cycle.image {
					let (x, y) = (cycle.origin.x + clump.image_offset, cycle.origin.y + clump.image_offset);
					if let Err(e) = surface.draw_image(image, x, y, clump.image_width, clump.image_height) {
						debug!("identity: artwork draw failed: {}", e);
					}
				}
			}
			return;
		}

		let mut frame = FrameContext {
			bounds: self.bounds,
			config: &self.config.particles,
			rng: &mut self.rng,
		};
		for particle in &mut self.particles {
			particle.update(self.mouse, &mut frame);
			if let Err(e) = particle.draw(surface) {
				debug!("identity: particle draw failed: {}", e);
			}
		}

		for particle in &self.particles {
			if let Err(e) = particle.connect(surface, &self.particles, &self.config.particles) {
				debug!("identity: particle connect failed: {}", e);
			}
		}
	}
}
