//! Simulation parameters and the named presets.
//!
//! Every field has a default taken from [`FieldConfig::globe`], so a JSON
//! document only needs to name the values it changes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::theme::{Color, FieldStyle, GlowStyle, LinkStyle, Palette};
use crate::error::{ConfigError, Result};

/// Direction of the pointer force.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerMode {
	/// Pull particles toward the pointer.
	#[default]
	Attract,
	/// Push particles away from the pointer.
	Repel,
}

/// How the pointer influences nearby particles.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PointerConfig {
	/// Influence radius in pixels. Particles further away are unaffected.
	pub radius: f64,
	/// Velocity added per frame to a particle directly under the pointer
	pub strength: f64,
	pub mode: PointerMode,
	/// Extra radius, as a fraction of the base radius, at full force
	pub grow: f64,
	/// Alpha added per frame at full force, 0 to leave alpha alone
	pub brighten: f64,
	/// Brightening never lifts alpha above this
	pub alpha_cap: f64,
	/// Alpha a particle settles back to outside the influence radius
	pub rest_alpha: Option<f64>,
	/// Fraction of the gap to `rest_alpha` closed per frame
	pub alpha_ease: f64,
}

impl Default for PointerConfig {
	fn default() -> Self {
		Self {
			radius: 100.0,
			strength: 1.0,
			mode: PointerMode::Attract,
			grow: 1.0,
			brighten: 0.0,
			alpha_cap: 1.0,
			rest_alpha: None,
			alpha_ease: 0.0,
		}
	}
}

/// What happens to a particle leaving the surface.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum BoundaryPolicy {
	/// Reappear on the opposite edge once `margin` pixels outside.
	Wrap { margin: f64 },
	/// Clamp to the edge and reflect the velocity component inward.
	Bounce { restitution: f64 },
}

impl Default for BoundaryPolicy {
	fn default() -> Self {
		Self::Bounce { restitution: 0.8 }
	}
}

/// Slow sinusoidal drift layered on top of the velocity.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct WaveConfig {
	pub amplitude_x: f64,
	pub amplitude_y: f64,
	/// Wave clock advance per frame
	pub time_step: f64,
}

impl Default for WaveConfig {
	fn default() -> Self {
		Self {
			amplitude_x: 0.2,
			amplitude_y: 0.3,
			time_step: 0.005,
		}
	}
}

/// Short-lived particles spawned by a click.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct BurstConfig {
	/// Particles per click
	pub count: usize,
	/// Velocity spread per axis
	pub speed: f64,
	/// Life lost per frame; particles start with a life of 1
	pub decay: f64,
	/// Most burst particles alive at once. Oldest are evicted first.
	pub cap: usize,
}

impl Default for BurstConfig {
	fn default() -> Self {
		Self {
			count: 10,
			speed: 10.0,
			decay: 0.02,
			cap: 100,
		}
	}
}

/// Complete description of a particle field.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FieldConfig {
	/// Number of base particles
	pub count: usize,
	/// Initial velocity spread per axis
	pub speed: f64,
	/// Particles closer than this are linked
	pub connection_distance: f64,
	/// Keep only the closest K links per particle
	pub max_connections: Option<usize>,
	pub pointer: PointerConfig,
	/// Fraction of the gap back to the base radius closed per frame
	pub size_ease: f64,
	/// Velocity bias toward linked neighbours, 0 to disable
	pub neighbor_attraction: f64,
	pub boundary: BoundaryPolicy,
	/// Per-frame velocity multiplier
	pub damping: f64,
	pub max_speed: Option<f64>,
	/// Random velocity nudge per frame
	pub jitter: f64,
	pub radius_min: f64,
	pub radius_max: f64,
	pub alpha_min: f64,
	pub alpha_max: f64,
	pub wave: Option<WaveConfig>,
	pub burst: Option<BurstConfig>,
	/// Hide the field above the fold and fade it in while scrolling
	pub fade_on_scroll: bool,
	pub style: FieldStyle,
}

impl FieldConfig {
	/// Dense neon field with gradient links and click bursts (default)
	pub fn globe() -> Self {
		Self {
			count: 120,
			speed: 0.5,
			connection_distance: 150.0,
			max_connections: None,
			pointer: PointerConfig::default(),
			size_ease: 1.0,
			neighbor_attraction: 0.0,
			boundary: BoundaryPolicy::Bounce { restitution: 0.8 },
			damping: 0.99,
			max_speed: None,
			jitter: 0.0,
			radius_min: 1.0,
			radius_max: 3.0,
			alpha_min: 1.0,
			alpha_max: 1.0,
			wave: None,
			burst: Some(BurstConfig::default()),
			fade_on_scroll: false,
			style: FieldStyle::default(),
		}
	}

	/// Calm background that drifts in waves and shies away from the pointer
	pub fn ambient() -> Self {
		Self {
			count: 80,
			speed: 0.5,
			connection_distance: 150.0,
			max_connections: None,
			pointer: PointerConfig {
				radius: 200.0,
				strength: 0.3,
				mode: PointerMode::Repel,
				grow: 0.5,
				brighten: 0.3,
				alpha_cap: 0.8,
				rest_alpha: Some(0.3),
				alpha_ease: 0.02,
			},
			size_ease: 0.1,
			neighbor_attraction: 0.0,
			boundary: BoundaryPolicy::Wrap { margin: 50.0 },
			damping: 0.999,
			max_speed: Some(2.0),
			jitter: 0.02,
			radius_min: 1.0,
			radius_max: 4.0,
			alpha_min: 0.2,
			alpha_max: 0.7,
			wave: Some(WaveConfig::default()),
			burst: None,
			fade_on_scroll: true,
			style: FieldStyle {
				palette: Palette::cool(),
				link: LinkStyle {
					strength: 0.3,
					width: 1.0,
					taper: false,
					gradient: false,
					color: Some(Color::rgb(0, 212, 255)),
				},
				glow: GlowStyle {
					multiplier: 3.0,
					mid_stop: true,
				},
			},
		}
	}

	/// Sparse star map where each particle links to its nearest few
	pub fn constellation() -> Self {
		Self {
			count: 100,
			speed: 0.3,
			connection_distance: 120.0,
			max_connections: Some(3),
			pointer: PointerConfig {
				radius: 150.0,
				strength: 0.05,
				mode: PointerMode::Attract,
				grow: 0.6,
				..PointerConfig::default()
			},
			size_ease: 0.1,
			neighbor_attraction: 0.0005,
			boundary: BoundaryPolicy::Bounce { restitution: 1.0 },
			damping: 0.99,
			max_speed: Some(1.5),
			jitter: 0.0,
			radius_min: 0.8,
			radius_max: 2.2,
			alpha_min: 0.6,
			alpha_max: 1.0,
			wave: None,
			burst: None,
			fade_on_scroll: false,
			style: FieldStyle {
				palette: Palette::starlight(),
				link: LinkStyle {
					strength: 0.4,
					width: 1.0,
					taper: true,
					gradient: true,
					color: None,
				},
				glow: GlowStyle::default(),
			},
		}
	}

	/// Look up a preset by name.
	pub fn preset(name: &str) -> Option<Self> {
		match name {
			"globe" => Some(Self::globe()),
			"ambient" => Some(Self::ambient()),
			"constellation" => Some(Self::constellation()),
			_ => None,
		}
	}

	/// Overlay a partial JSON document on this configuration.
	///
	/// Nested objects merge field by field, so `{"pointer": {"radius": 80}}`
	/// keeps the rest of the pointer settings. A boundary object carrying a
	/// `policy` key replaces the boundary outright.
	pub fn with_overrides(self, overrides: Value) -> Result<Self> {
		let mut merged = serde_json::to_value(&self)?;
		merge(&mut merged, overrides);
		Ok(serde_json::from_value(merged)?)
	}

	/// Most particles alive at once, bursts included.
	pub fn particle_ceiling(&self) -> usize {
		self.count + self.burst.as_ref().map_or(0, |b| b.cap)
	}

	/// Reject configurations that would make the simulation misbehave.
	pub fn validate(&self) -> Result<()> {
		non_negative("speed", self.speed)?;
		positive("connection_distance", self.connection_distance)?;
		positive("pointer.radius", self.pointer.radius)?;
		non_negative("pointer.strength", self.pointer.strength)?;
		non_negative("pointer.grow", self.pointer.grow)?;
		non_negative("pointer.brighten", self.pointer.brighten)?;
		unit("pointer.alpha_cap", self.pointer.alpha_cap)?;
		if let Some(rest) = self.pointer.rest_alpha {
			unit("pointer.rest_alpha", rest)?;
		}
		unit("pointer.alpha_ease", self.pointer.alpha_ease)?;
		unit("size_ease", self.size_ease)?;
		non_negative("neighbor_attraction", self.neighbor_attraction)?;
		unit("damping", self.damping)?;
		non_negative("jitter", self.jitter)?;
		if let Some(max) = self.max_speed {
			positive("max_speed", max)?;
		}
		match self.boundary {
			BoundaryPolicy::Wrap { margin } => non_negative("boundary.margin", margin)?,
			BoundaryPolicy::Bounce { restitution } => {
				unit("boundary.restitution", restitution)?
			}
		}
		non_negative("radius_min", self.radius_min)?;
		range("radius", self.radius_min, self.radius_max)?;
		unit("alpha_min", self.alpha_min)?;
		unit("alpha_max", self.alpha_max)?;
		range("alpha", self.alpha_min, self.alpha_max)?;
		if let Some(burst) = &self.burst {
			non_negative("burst.speed", burst.speed)?;
			positive("burst.decay", burst.decay)?;
		}
		positive("style.link.width", self.style.link.width)?;
		non_negative("style.glow.multiplier", self.style.glow.multiplier)?;
		if self.style.palette.is_empty() {
			return Err(ConfigError::EmptyPalette);
		}
		Ok(())
	}
}

impl Default for FieldConfig {
	fn default() -> Self {
		Self::globe()
	}
}

fn merge(base: &mut Value, overrides: Value) {
	match (base, overrides) {
		(Value::Object(base), Value::Object(overrides)) if !overrides.contains_key("policy") => {
			for (key, value) in overrides {
				match base.get_mut(&key) {
					Some(slot) => merge(slot, value),
					None => {
						base.insert(key, value);
					}
				}
			}
		}
		(base, overrides) => *base = overrides,
	}
}

fn non_negative(field: &'static str, value: f64) -> Result<()> {
	if !value.is_finite() || value < 0.0 {
		return Err(ConfigError::OutOfRange {
			field,
			value,
			expected: "a finite value >= 0",
		});
	}
	Ok(())
}

fn positive(field: &'static str, value: f64) -> Result<()> {
	if !value.is_finite() || value <= 0.0 {
		return Err(ConfigError::OutOfRange {
			field,
			value,
			expected: "a finite value > 0",
		});
	}
	Ok(())
}

fn unit(field: &'static str, value: f64) -> Result<()> {
	if !(0.0..=1.0).contains(&value) {
		return Err(ConfigError::OutOfRange {
			field,
			value,
			expected: "a value in 0..=1",
		});
	}
	Ok(())
}

fn range(field: &'static str, min: f64, max: f64) -> Result<()> {
	if min > max {
		return Err(ConfigError::InvertedRange { field, min, max });
	}
	Ok(())
}
