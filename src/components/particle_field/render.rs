//! Per-frame drawing of the particle field.
//!
//! Two passes for correct z-ordering:
//! 1. Links between nearby particles
//! 2. Particle glows, each immediately followed by its solid core

use super::state::{Link, ParticleField};
use super::surface::Surface;
use super::theme::Color;

/// Renders the complete field to `surface`. A torn-down field draws nothing.
pub fn render<S: Surface>(field: &ParticleField, surface: &mut S) {
	if field.is_torn_down() {
		return;
	}

	surface.clear(field.width, field.height);
	draw_links(field, surface, &field.connections());
	draw_particles(field, surface);
}

fn draw_links<S: Surface>(field: &ParticleField, surface: &mut S, links: &[Link]) {
	let style = &field.config.style.link;

	for link in links {
		let opacity = field.connection_opacity(link.distance);
		if opacity <= 0.0 {
			continue;
		}

		let (p, q) = (&field.particles[link.a], &field.particles[link.b]);
		let (from_color, to_color) = if style.gradient {
			(p.color.with_alpha(opacity), q.color.with_alpha(opacity))
		} else {
			let c = style.color.unwrap_or(p.color).with_alpha(opacity);
			(c, c)
		};
		let width = if style.taper {
			style.width * opacity
		} else {
			style.width
		};

		surface.stroke_gradient_line((p.x, p.y), (q.x, q.y), from_color, to_color, width);
	}
}

fn draw_particles<S: Surface>(field: &ParticleField, surface: &mut S) {
	let glow = &field.config.style.glow;

	for p in &field.particles {
		let color = p.color.fade(p.alpha * p.life.unwrap_or(1.0));
		let center = (p.x, p.y);

		if glow.multiplier > 0.0 {
			let glow_radius = p.radius * glow.multiplier;
			if glow.mid_stop {
				surface.fill_radial(
					center,
					glow_radius,
					&[
						(0.0, color),
						(0.5, color.fade(0.5)),
						(1.0, Color::transparent()),
					],
				);
			} else {
				surface.fill_radial(
					center,
					glow_radius,
					&[(0.0, color), (1.0, Color::transparent())],
				);
			}
		}

		surface.fill_circle(center, p.radius, color);
	}
}
