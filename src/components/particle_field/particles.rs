//! Individual particles and the per-particle physics steps.

use rand::Rng;

use super::config::{BoundaryPolicy, BurstConfig, FieldConfig, PointerConfig, PointerMode};
use super::theme::Color;

/// A single glowing point.
#[derive(Clone, Debug)]
pub struct Particle {
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	/// Displayed radius, grown by pointer proximity
	pub radius: f64,
	pub base_radius: f64,
	pub color: Color,
	pub alpha: f64,
	pub phase: f64, // For wave drift
	/// Remaining life of a burst particle; `None` for base particles
	pub life: Option<f64>,
	pub decay: f64,
}

/// Uniform sample in `lo..hi`, or `lo` when the range is empty.
pub(crate) fn sample<R: Rng>(rng: &mut R, lo: f64, hi: f64) -> f64 {
	if hi > lo { rng.gen_range(lo..hi) } else { lo }
}

/// Strength of the pointer force at `distance`.
///
/// 1.0 when the pointer sits on the particle, falling linearly to 0.0 at
/// `radius` and staying 0.0 beyond it.
pub fn pointer_force_factor(distance: f64, radius: f64) -> f64 {
	if radius <= 0.0 || distance >= radius {
		return 0.0;
	}
	((radius - distance) / radius).clamp(0.0, 1.0)
}

impl Particle {
	/// Place a base particle uniformly over a `width` x `height` surface.
	pub fn random<R: Rng>(rng: &mut R, config: &FieldConfig, width: f64, height: f64) -> Self {
		let half = config.speed / 2.0;
		let base_radius = sample(rng, config.radius_min, config.radius_max);
		let palette = &config.style.palette;
		let color = palette.get(rng.gen_range(0..palette.len().max(1)));

		Self {
			x: sample(rng, 0.0, width),
			y: sample(rng, 0.0, height),
			vx: sample(rng, -half, half),
			vy: sample(rng, -half, half),
			radius: base_radius,
			base_radius,
			color,
			alpha: sample(rng, config.alpha_min, config.alpha_max),
			phase: sample(rng, 0.0, std::f64::consts::TAU),
			life: None,
			decay: 0.0,
		}
	}

	/// A short-lived particle flung out of `(x, y)`.
	pub fn burst<R: Rng>(
		rng: &mut R,
		config: &FieldConfig,
		burst: &BurstConfig,
		x: f64,
		y: f64,
	) -> Self {
		let half = burst.speed / 2.0;
		let mut particle = Self::random(rng, config, 0.0, 0.0);
		particle.x = x;
		particle.y = y;
		particle.vx = sample(rng, -half, half);
		particle.vy = sample(rng, -half, half);
		particle.life = Some(1.0);
		particle.decay = burst.decay;
		particle
	}

	pub fn speed(&self) -> f64 {
		self.vx.hypot(self.vy)
	}

	/// Push or pull toward `pointer` and grow with proximity.
	///
	/// Inside the influence radius the particle also brightens by
	/// `brighten * force`, up to `alpha_cap`. Outside it relaxes, see
	/// [`Particle::relax`].
	pub fn apply_pointer(&mut self, pointer: (f64, f64), config: &PointerConfig, size_ease: f64) {
		let (dx, dy) = (pointer.0 - self.x, pointer.1 - self.y);
		let distance = dx.hypot(dy);
		let force = pointer_force_factor(distance, config.radius);

		if force <= 0.0 {
			self.relax(config, size_ease);
			return;
		}

		// Coincident pointer: full growth, no defined direction
		if distance > f64::EPSILON {
			let sign = match config.mode {
				PointerMode::Attract => 1.0,
				PointerMode::Repel => -1.0,
			};
			let push = sign * force * config.strength / distance;
			self.vx += dx * push;
			self.vy += dy * push;
		}
		self.radius = self.base_radius * (1.0 + force * config.grow);
		if config.brighten > 0.0 {
			self.alpha = (self.alpha + force * config.brighten).min(config.alpha_cap);
		}
	}

	/// Ease the displayed radius back toward the base radius, and the alpha
	/// toward `rest_alpha` when one is set.
	pub fn relax(&mut self, config: &PointerConfig, size_ease: f64) {
		self.radius += (self.base_radius - self.radius) * size_ease;
		if let Some(rest) = config.rest_alpha {
			self.alpha += (rest - self.alpha) * config.alpha_ease;
		}
	}

	/// Keep the particle on a `width` x `height` surface.
	pub fn constrain(&mut self, policy: BoundaryPolicy, width: f64, height: f64) {
		match policy {
			BoundaryPolicy::Wrap { margin } => {
				self.x = wrap(self.x, width, margin);
				self.y = wrap(self.y, height, margin);
			}
			BoundaryPolicy::Bounce { restitution } => {
				(self.x, self.vx) = bounce(self.x, self.vx, width, restitution);
				(self.y, self.vy) = bounce(self.y, self.vy, height, restitution);
			}
		}
	}

	/// Multiply velocity by `damping`, nudge it by up to `jitter / 2` per
	/// axis, then clamp to `max_speed`.
	pub fn damp<R: Rng>(&mut self, rng: &mut R, damping: f64, jitter: f64, max_speed: Option<f64>) {
		self.vx *= damping;
		self.vy *= damping;

		if jitter > 0.0 {
			let half = jitter / 2.0;
			self.vx += sample(rng, -half, half);
			self.vy += sample(rng, -half, half);
		}

		if let Some(max) = max_speed {
			let speed = self.speed();
			if speed > max {
				self.vx = self.vx / speed * max;
				self.vy = self.vy / speed * max;
			}
		}
	}

	/// Age a burst particle. Returns `false` once it has expired.
	pub fn age(&mut self) -> bool {
		match self.life.as_mut() {
			Some(life) => {
				*life -= self.decay;
				*life > 0.0
			}
			None => true,
		}
	}

	pub fn is_burst(&self) -> bool {
		self.life.is_some()
	}
}

fn wrap(pos: f64, size: f64, margin: f64) -> f64 {
	let span = size + 2.0 * margin;
	if span <= 0.0 {
		return 0.0;
	}
	if pos < -margin || pos > size + margin {
		(pos + margin).rem_euclid(span) - margin
	} else {
		pos
	}
}

fn bounce(pos: f64, vel: f64, size: f64, restitution: f64) -> (f64, f64) {
	if pos < 0.0 {
		(0.0, vel.abs() * restitution)
	} else if pos > size {
		(size.max(0.0), -vel.abs() * restitution)
	} else {
		(pos, vel)
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	use super::*;

	fn still(x: f64, y: f64) -> Particle {
		let mut rng = StdRng::seed_from_u64(1);
		let mut p = Particle::random(&mut rng, &FieldConfig::globe(), 10.0, 10.0);
		(p.x, p.y, p.vx, p.vy) = (x, y, 0.0, 0.0);
		p.base_radius = 2.0;
		p.radius = 2.0;
		p
	}

	#[test]
	fn force_factor_is_one_at_the_pointer() {
		assert_eq!(pointer_force_factor(0.0, 100.0), 1.0);
	}

	#[test]
	fn force_factor_falls_to_zero_at_radius() {
		let mut last = pointer_force_factor(0.0, 100.0);
		for step in 1..=100 {
			let f = pointer_force_factor(step as f64, 100.0);
			assert!(f < last, "not decreasing at {step}");
			last = f;
		}
		assert_eq!(pointer_force_factor(100.0, 100.0), 0.0);
		assert_eq!(pointer_force_factor(250.0, 100.0), 0.0);
		assert!((pointer_force_factor(25.0, 100.0) - 0.75).abs() < 1e-12);
	}

	#[test]
	fn attract_pulls_toward_pointer() {
		let mut p = still(0.0, 0.0);
		let pointer = PointerConfig {
			radius: 100.0,
			strength: 1.0,
			mode: PointerMode::Attract,
			grow: 1.0,
			..PointerConfig::default()
		};
		p.apply_pointer((50.0, 0.0), &pointer, 1.0);
		assert!((p.vx - 0.5).abs() < 1e-12);
		assert_eq!(p.vy, 0.0);
		assert!((p.radius - 3.0).abs() < 1e-12);
	}

	#[test]
	fn repel_pushes_away() {
		let mut p = still(0.0, 0.0);
		let pointer = PointerConfig {
			mode: PointerMode::Repel,
			..PointerConfig::default()
		};
		p.apply_pointer((0.0, 20.0), &pointer, 1.0);
		assert!(p.vy < 0.0);
	}

	#[test]
	fn coincident_pointer_grows_to_maximum() {
		let mut p = still(5.0, 5.0);
		p.apply_pointer((5.0, 5.0), &PointerConfig::default(), 1.0);
		assert_eq!((p.vx, p.vy), (0.0, 0.0));
		assert!((p.radius - 4.0).abs() < 1e-12);
	}

	#[test]
	fn radius_eases_back_outside_influence() {
		let mut p = still(0.0, 0.0);
		p.radius = 4.0;
		p.apply_pointer((500.0, 0.0), &PointerConfig::default(), 0.5);
		assert!((p.radius - 3.0).abs() < 1e-12);
	}

	#[test]
	fn bounce_reflects_and_clamps() {
		let mut p = still(-3.0, 12.0);
		(p.vx, p.vy) = (-2.0, 1.0);
		p.constrain(BoundaryPolicy::Bounce { restitution: 0.8 }, 10.0, 10.0);
		assert_eq!((p.x, p.y), (0.0, 10.0));
		assert!((p.vx - 1.6).abs() < 1e-12);
		assert!((p.vy + 0.8).abs() < 1e-12);
	}

	#[test]
	fn wrap_moves_to_opposite_edge() {
		let mut p = still(-51.0, 1065.0);
		p.constrain(BoundaryPolicy::Wrap { margin: 50.0 }, 800.0, 1000.0);
		assert!((p.x - 849.0).abs() < 1e-9);
		assert!((p.y + 35.0).abs() < 1e-9);

		let mut p = still(-0.5, 10.5);
		p.constrain(BoundaryPolicy::Wrap { margin: 0.0 }, 10.0, 10.0);
		assert!((p.x - 9.5).abs() < 1e-9);
		assert!((p.y - 0.5).abs() < 1e-9);
	}

	#[test]
	fn damping_clamps_speed() {
		let mut p = still(0.0, 0.0);
		(p.vx, p.vy) = (3.0, 4.0);
		p.damp(&mut StdRng::seed_from_u64(2), 0.5, 0.0, Some(2.0));
		assert!((p.speed() - 2.0).abs() < 1e-12);
	}

	#[test]
	fn jitter_is_added_after_damping() {
		let mut rng = StdRng::seed_from_u64(4);
		let mut p = still(0.0, 0.0);
		(p.vx, p.vy) = (5.0, -5.0);
		p.damp(&mut rng, 0.0, 0.02, None);
		assert!(p.speed() > 0.0);
		assert!(p.vx.abs() <= 0.01 && p.vy.abs() <= 0.01);

		// The clamp still has the last word
		(p.vx, p.vy) = (0.0, 0.0);
		p.damp(&mut rng, 1.0, 10.0, Some(0.5));
		assert!(p.speed() <= 0.5 + 1e-12);
	}

	#[test]
	fn pointer_brightens_up_to_cap_then_fades_to_rest() {
		let pointer = FieldConfig::ambient().pointer;
		let mut p = still(100.0, 100.0);
		p.alpha = 0.4;

		p.apply_pointer((101.0, 100.0), &pointer, 0.1);
		assert!(p.alpha > 0.4);
		for _ in 0..10 {
			p.apply_pointer((101.0, 100.0), &pointer, 0.1);
		}
		assert!((p.alpha - 0.8).abs() < 1e-12);

		p.apply_pointer((900.0, 900.0), &pointer, 0.1);
		assert!((p.alpha - (0.8 + (0.3 - 0.8) * 0.02)).abs() < 1e-12);
		for _ in 0..1000 {
			p.relax(&pointer, 0.1);
		}
		assert!((p.alpha - 0.3).abs() < 1e-6);
	}

	#[test]
	fn alpha_is_fixed_without_brighten() {
		let pointer = PointerConfig::default();
		let mut p = still(0.0, 0.0);
		p.alpha = 0.6;
		p.apply_pointer((1.0, 0.0), &pointer, 1.0);
		p.apply_pointer((500.0, 0.0), &pointer, 1.0);
		assert_eq!(p.alpha, 0.6);
	}

	#[test]
	fn burst_particles_expire() {
		let mut rng = StdRng::seed_from_u64(3);
		let config = FieldConfig::globe();
		let burst = BurstConfig {
			decay: 0.25,
			..BurstConfig::default()
		};
		let mut p = Particle::burst(&mut rng, &config, &burst, 4.0, 4.0);
		assert!(p.is_burst());
		assert_eq!((p.x, p.y), (4.0, 4.0));
		assert!(p.age());
		assert!(p.age());
		assert!(p.age());
		assert!(!p.age());
	}
}
