//! Visual styling for the particle field.
//!
//! Provides the color type, the fixed particle palettes, and the link/glow
//! style used by the renderer.

use serde::{Deserialize, Serialize};

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	#[serde(default = "opaque")]
	pub a: f64,
}

fn opaque() -> f64 {
	1.0
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Fully transparent black, the outer stop of every glow.
	pub const fn transparent() -> Self {
		Self::rgba(0, 0, 0, 0.0)
	}

	/// Build an opaque color from hue, saturation and lightness, all in `0.0..=1.0`.
	pub fn from_hsl(h: f64, s: f64, l: f64) -> Self {
		if s == 0.0 {
			let v = (l * 255.0).round() as u8;
			return Self::rgb(v, v, v);
		}

		let hue_to_rgb = |p: f64, q: f64, mut t: f64| {
			if t < 0.0 {
				t += 1.0;
			}
			if t > 1.0 {
				t -= 1.0;
			}
			if t < 1.0 / 6.0 {
				p + (q - p) * 6.0 * t
			} else if t < 0.5 {
				q
			} else if t < 2.0 / 3.0 {
				p + (q - p) * (2.0 / 3.0 - t) * 6.0
			} else {
				p
			}
		};

		let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
		let p = 2.0 * l - q;
		Self::rgb(
			(hue_to_rgb(p, q, h + 1.0 / 3.0) * 255.0).round() as u8,
			(hue_to_rgb(p, q, h) * 255.0).round() as u8,
			(hue_to_rgb(p, q, h - 1.0 / 3.0) * 255.0).round() as u8,
		)
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Multiply the existing alpha by `factor`.
	pub fn fade(self, factor: f64) -> Self {
		Self {
			a: (self.a * factor).clamp(0.0, 1.0),
			..self
		}
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// The fixed set of colors particles are drawn from.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Palette {
	pub colors: Vec<Color>,
}

impl Palette {
	/// Mint, violet and cyan at 80% opacity (default)
	pub fn neon() -> Self {
		Self {
			colors: vec![
				Color::rgba(0, 255, 170, 0.8),  // Mint
				Color::rgba(138, 43, 226, 0.8), // Blue violet
				Color::rgba(0, 212, 255, 0.8),  // Cyan
			],
		}
	}

	/// Blue to cyan hues sampled every 15 degrees between 200 and 260
	pub fn cool() -> Self {
		Self {
			colors: (0..5)
				.map(|i| Color::from_hsl((200.0 + 15.0 * i as f64) / 360.0, 0.7, 0.6))
				.collect(),
		}
	}

	/// Pale starlight whites with a warm accent
	pub fn starlight() -> Self {
		Self {
			colors: vec![
				Color::rgb(230, 236, 255), // Blue white
				Color::rgb(200, 215, 255), // Pale periwinkle
				Color::rgb(255, 244, 220), // Warm white
				Color::rgb(255, 214, 170), // Amber
			],
		}
	}

	pub fn len(&self) -> usize {
		self.colors.len()
	}

	pub fn is_empty(&self) -> bool {
		self.colors.is_empty()
	}

	/// Color at `index`, cycling through the palette. White when empty.
	pub fn get(&self, index: usize) -> Color {
		if self.colors.is_empty() {
			return Color::rgb(255, 255, 255);
		}
		self.colors[index % self.colors.len()]
	}
}

/// How connecting lines between nearby particles are drawn.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LinkStyle {
	/// Opacity of a link between two coincident particles
	pub strength: f64,
	/// Line width in pixels
	pub width: f64,
	/// Scale the width by the link opacity, so faint links are also thin
	pub taper: bool,
	/// Blend from one endpoint's color to the other's
	pub gradient: bool,
	/// Single link color used when `gradient` is off.
	/// Falls back to the first endpoint's color.
	pub color: Option<Color>,
}

impl Default for LinkStyle {
	fn default() -> Self {
		Self {
			strength: 0.5,
			width: 2.0,
			taper: true,
			gradient: true,
			color: None,
		}
	}
}

/// Soft halo drawn behind every particle.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GlowStyle {
	/// Glow radius as a multiple of the particle radius
	pub multiplier: f64,
	/// Optional midway stop at half the particle alpha
	pub mid_stop: bool,
}

impl Default for GlowStyle {
	fn default() -> Self {
		Self {
			multiplier: 3.0,
			mid_stop: false,
		}
	}
}

/// Complete visual style of a field.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FieldStyle {
	pub palette: Palette,
	pub link: LinkStyle,
	pub glow: GlowStyle,
}

impl Default for FieldStyle {
	fn default() -> Self {
		Self {
			palette: Palette::neon(),
			link: LinkStyle::default(),
			glow: GlowStyle::default(),
		}
	}
}
