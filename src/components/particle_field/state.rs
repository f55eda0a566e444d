//! Particle field simulation state.
//!
//! Owns the particle list, the pointer slot and the random source. The host
//! component feeds it pointer and resize events as method calls and calls
//! [`ParticleField::update`] once per animation frame.

use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::config::FieldConfig;
use super::particles::Particle;

/// A pair of particles close enough to be drawn connected.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Link {
	pub a: usize,
	pub b: usize,
	pub distance: f64,
}

/// Linear opacity falloff: `strength` at distance 0, zero at `max_distance`.
pub fn link_opacity(distance: f64, max_distance: f64, strength: f64) -> f64 {
	if max_distance <= 0.0 || distance >= max_distance {
		return 0.0;
	}
	(1.0 - distance / max_distance) * strength
}

/// Find every pair closer than `max_distance`.
///
/// With `max_neighbors` set, each particle only keeps its closest few and a
/// pair is linked when either side keeps it. Pairs are reported once with
/// `a < b`, sorted by `(a, b)`.
pub fn find_links(particles: &[Particle], max_distance: f64, max_neighbors: Option<usize>) -> Vec<Link> {
	let n = particles.len();
	let mut links = Vec::new();

	match max_neighbors {
		None => {
			for i in 0..n {
				for j in (i + 1)..n {
					let d = distance(&particles[i], &particles[j]);
					if d < max_distance {
						links.push(Link { a: i, b: j, distance: d });
					}
				}
			}
		}
		Some(k) => {
			let mut candidates: Vec<(usize, f64)> = Vec::new();
			for i in 0..n {
				candidates.clear();
				for j in 0..n {
					if i == j {
						continue;
					}
					let d = distance(&particles[i], &particles[j]);
					if d < max_distance {
						candidates.push((j, d));
					}
				}
				candidates.sort_by(|x, y| x.1.total_cmp(&y.1));
				for &(j, d) in candidates.iter().take(k) {
					let (a, b) = if i < j { (i, j) } else { (j, i) };
					links.push(Link { a, b, distance: d });
				}
			}
			links.sort_by(|x, y| (x.a, x.b).cmp(&(y.a, y.b)));
			links.dedup_by(|x, y| x.a == y.a && x.b == y.b);
		}
	}

	links
}

fn distance(p: &Particle, q: &Particle) -> f64 {
	(p.x - q.x).hypot(p.y - q.y)
}

/// The simulator: a bounded set of particles advanced once per frame.
pub struct ParticleField {
	pub config: FieldConfig,
	pub particles: Vec<Particle>,
	pub pointer: Option<(f64, f64)>,
	pub width: f64,
	pub height: f64,
	/// Wave clock, advanced by `wave.time_step` each frame
	pub time: f64,
	torn_down: bool,
	rng: StdRng,
}

impl ParticleField {
	pub fn new(config: FieldConfig, width: f64, height: f64) -> Self {
		Self::with_rng(config, width, height, StdRng::from_entropy())
	}

	/// Reproducible field, used by tests.
	pub fn with_seed(config: FieldConfig, width: f64, height: f64, seed: u64) -> Self {
		Self::with_rng(config, width, height, StdRng::seed_from_u64(seed))
	}

	fn with_rng(config: FieldConfig, width: f64, height: f64, rng: StdRng) -> Self {
		let mut field = Self {
			config,
			particles: Vec::new(),
			pointer: None,
			width,
			height,
			time: 0.0,
			torn_down: false,
			rng,
		};
		field.populate();
		info!(
			"particle-field: {} particles on {}x{}",
			field.particles.len(),
			width,
			height
		);
		field
	}

	/// Replace every particle with a fresh random set. Zero area means no particles.
	fn populate(&mut self) {
		self.particles.clear();
		if self.width <= 0.0 || self.height <= 0.0 {
			return;
		}
		self.particles.reserve(self.config.count);
		for _ in 0..self.config.count {
			let p = Particle::random(&mut self.rng, &self.config, self.width, self.height);
			self.particles.push(p);
		}
	}

	pub fn is_torn_down(&self) -> bool {
		self.torn_down
	}

	pub fn pointer_move(&mut self, x: f64, y: f64) {
		self.pointer = Some((x, y));
	}

	pub fn pointer_leave(&mut self) {
		self.pointer = None;
	}

	/// Resize the surface and regenerate all particles.
	pub fn resize(&mut self, width: f64, height: f64) {
		if self.torn_down {
			return;
		}
		self.width = width;
		self.height = height;
		self.populate();
		debug!("particle-field: resized to {}x{}", width, height);
	}

	/// Spawn a burst at `(x, y)`, evicting the oldest burst particles over the ceiling.
	pub fn burst(&mut self, x: f64, y: f64) {
		if self.torn_down {
			return;
		}
		let Some(burst) = self.config.burst.clone() else {
			return;
		};

		for _ in 0..burst.count {
			let p = Particle::burst(&mut self.rng, &self.config, &burst, x, y);
			self.particles.push(p);
		}

		let mut excess = self
			.particles
			.len()
			.saturating_sub(self.config.particle_ceiling());
		if excess > 0 {
			self.particles.retain(|p| {
				if excess > 0 && p.is_burst() {
					excess -= 1;
					false
				} else {
					true
				}
			});
		}
		debug!(
			"particle-field: burst at ({:.0}, {:.0}), {} alive",
			x,
			y,
			self.particles.len()
		);
	}

	/// Links between particles at their current positions.
	pub fn connections(&self) -> Vec<Link> {
		find_links(
			&self.particles,
			self.config.connection_distance,
			self.config.max_connections,
		)
	}

	/// Opacity of a link of length `distance`.
	pub fn connection_opacity(&self, distance: f64) -> f64 {
		link_opacity(
			distance,
			self.config.connection_distance,
			self.config.style.link.strength,
		)
	}

	/// Advance the simulation by one frame.
	pub fn update(&mut self) {
		if self.torn_down {
			return;
		}
		let config = &self.config;

		// Neighbour bias uses the links at the start of the frame
		if config.neighbor_attraction > 0.0 {
			let links = find_links(
				&self.particles,
				config.connection_distance,
				config.max_connections,
			);
			let pull = config.neighbor_attraction;
			let mut dv = vec![(0.0, 0.0); self.particles.len()];
			for link in &links {
				let (p, q) = (&self.particles[link.a], &self.particles[link.b]);
				let (dx, dy) = (q.x - p.x, q.y - p.y);
				dv[link.a].0 += dx * pull;
				dv[link.a].1 += dy * pull;
				dv[link.b].0 -= dx * pull;
				dv[link.b].1 -= dy * pull;
			}
			if let Some(pointer) = self.pointer {
				for p in &mut self.particles {
					p.apply_pointer(pointer, &config.pointer, config.size_ease);
				}
			}
			for (p, (dvx, dvy)) in self.particles.iter_mut().zip(dv) {
				p.vx += dvx;
				p.vy += dvy;
			}
		} else if let Some(pointer) = self.pointer {
			for p in &mut self.particles {
				p.apply_pointer(pointer, &config.pointer, config.size_ease);
			}
		}

		if self.pointer.is_none() {
			for p in &mut self.particles {
				p.relax(&config.pointer, config.size_ease);
			}
		}

		if let Some(wave) = &config.wave {
			self.time += wave.time_step;
		}

		for p in &mut self.particles {
			p.x += p.vx;
			p.y += p.vy;
			if let Some(wave) = &config.wave {
				p.y += (p.x * 0.01 + self.time + p.phase).sin() * wave.amplitude_y;
				p.x += (p.y * 0.008 + self.time * 0.7 + p.phase).cos() * wave.amplitude_x;
			}

			p.constrain(config.boundary, self.width, self.height);

			p.damp(&mut self.rng, config.damping, config.jitter, config.max_speed);
		}

		self.particles.retain_mut(Particle::age);
	}

	/// Stop the field for good: no particles, no pointer, no further updates.
	pub fn teardown(&mut self) {
		if self.torn_down {
			return;
		}
		self.torn_down = true;
		self.particles.clear();
		self.pointer = None;
		info!("particle-field: torn down");
	}
}
