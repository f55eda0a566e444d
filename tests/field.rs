// Test target reuses lib deps, silence noisy lint.
#![allow(unused_crate_dependencies)]

use std::cell::{Cell, RefCell};

use particle_field::components::particle_field::{
	BoundaryPolicy, Color, FieldConfig, FrameLoop, FrameScheduler, ParticleField, Surface, render,
};

/// Counts draw calls without drawing anything.
#[derive(Default)]
struct CountingSurface {
	draws: usize,
}

impl Surface for CountingSurface {
	fn clear(&mut self, _: f64, _: f64) {
		self.draws += 1;
	}

	fn stroke_gradient_line(&mut self, _: (f64, f64), _: (f64, f64), _: Color, _: Color, _: f64) {
		self.draws += 1;
	}

	fn fill_radial(&mut self, _: (f64, f64), _: f64, _: &[(f64, Color)]) {
		self.draws += 1;
	}

	fn fill_circle(&mut self, _: (f64, f64), _: f64, _: Color) {
		self.draws += 1;
	}
}

/// Queues frame callbacks the way `requestAnimationFrame` would.
#[derive(Default)]
struct QueueScheduler {
	next: Cell<i32>,
	queued: RefCell<Vec<i32>>,
}

impl FrameScheduler for QueueScheduler {
	fn request_frame(&self) -> Option<i32> {
		let handle = self.next.get() + 1;
		self.next.set(handle);
		self.queued.borrow_mut().push(handle);
		Some(handle)
	}

	fn cancel_frame(&self, handle: i32) {
		self.queued.borrow_mut().retain(|&h| h != handle);
	}
}

/// Run every queued frame once, the way the component's callback does.
fn run_queued(
	scheduler: &QueueScheduler,
	frames: &mut FrameLoop,
	field: &mut ParticleField,
	surface: &mut CountingSurface,
) -> usize {
	let due: Vec<i32> = scheduler.queued.borrow_mut().drain(..).collect();
	for _ in &due {
		if !frames.begin_frame() {
			continue;
		}
		field.update();
		render::render(field, surface);
		frames.schedule(scheduler);
	}
	due.len()
}

fn bounce_config() -> FieldConfig {
	FieldConfig {
		count: 50,
		speed: 0.3,
		connection_distance: 100.0,
		max_speed: Some(1.0),
		boundary: BoundaryPolicy::Bounce { restitution: 0.8 },
		..FieldConfig::globe()
	}
}

#[test]
fn hundred_frames_stay_in_bounds_and_under_max_speed() {
	let config = bounce_config();
	let max_speed = config.max_speed.unwrap();
	let mut field = ParticleField::with_seed(config, 800.0, 600.0, 42);
	let mut surface = CountingSurface::default();

	for frame in 0..100 {
		field.update();
		render::render(&field, &mut surface);
		assert_eq!(field.particles.len(), 50, "count changed at frame {frame}");
		for p in &field.particles {
			assert!((0.0..=800.0).contains(&p.x), "x = {} at frame {frame}", p.x);
			assert!((0.0..=600.0).contains(&p.y), "y = {} at frame {frame}", p.y);
			assert!(p.speed() <= max_speed + 1e-9, "speed {} at frame {frame}", p.speed());
		}
	}
	assert!(surface.draws > 100);
}

#[test]
fn pointer_chase_stays_in_bounds() {
	let mut field = ParticleField::with_seed(bounce_config(), 800.0, 600.0, 43);
	for frame in 0..300 {
		let t = frame as f64 * 0.05;
		field.pointer_move(400.0 + 390.0 * t.cos(), 300.0 + 290.0 * t.sin());
		field.update();
		for p in &field.particles {
			assert!((0.0..=800.0).contains(&p.x));
			assert!((0.0..=600.0).contains(&p.y));
		}
	}
}

#[test]
fn resize_twice_regenerates_inside_bounds() {
	let mut field = ParticleField::with_seed(bounce_config(), 800.0, 600.0, 44);
	for _ in 0..2 {
		field.resize(320.0, 240.0);
		assert_eq!(field.particles.len(), 50);
		assert_eq!((field.width, field.height), (320.0, 240.0));
		for p in &field.particles {
			assert!((0.0..=320.0).contains(&p.x));
			assert!((0.0..=240.0).contains(&p.y));
			assert!(!p.is_burst());
		}
	}
}

#[test]
fn bursts_stay_between_count_and_ceiling() {
	let config = bounce_config();
	let ceiling = config.particle_ceiling();
	let mut field = ParticleField::with_seed(config, 800.0, 600.0, 45);

	for frame in 0..200 {
		if frame % 3 == 0 {
			field.burst(400.0, 300.0);
		}
		field.update();
		let n = field.particles.len();
		assert!((50..=ceiling).contains(&n), "{n} particles at frame {frame}");
	}
}

#[test]
fn no_frames_or_draws_after_teardown() {
	let scheduler = QueueScheduler::default();
	let mut frames = FrameLoop::new();
	let mut field = ParticleField::with_seed(bounce_config(), 800.0, 600.0, 46);
	let mut surface = CountingSurface::default();

	frames.schedule(&scheduler);
	for _ in 0..5 {
		assert_eq!(run_queued(&scheduler, &mut frames, &mut field, &mut surface), 1);
	}
	assert!(surface.draws > 0);

	// Teardown, as the component's cleanup does it
	frames.stop(&scheduler);
	field.teardown();
	assert!(scheduler.queued.borrow().is_empty());

	let draws = surface.draws;
	assert_eq!(run_queued(&scheduler, &mut frames, &mut field, &mut surface), 0);
	render::render(&field, &mut surface);
	assert_eq!(surface.draws, draws);
}

#[test]
fn every_preset_runs() {
	for name in ["globe", "ambient", "constellation"] {
		let config = FieldConfig::preset(name).unwrap();
		let count = config.count;
		let mut field = ParticleField::with_seed(config, 1024.0, 768.0, 47);
		field.pointer_move(512.0, 384.0);
		field.burst(512.0, 384.0);
		let mut surface = CountingSurface::default();
		for _ in 0..120 {
			field.update();
			render::render(&field, &mut surface);
		}
		assert!(field.particles.len() >= count, "{name} lost particles");
	}
}
