//! Minimal drawing interface the renderer needs.
//!
//! The canvas implementation lives here too; tests substitute a recorder.

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::theme::Color;

/// Drawing capabilities used by [`render`](super::render::render).
pub trait Surface {
	/// Erase the whole `width` x `height` area.
	fn clear(&mut self, width: f64, height: f64);

	/// Straight line blending from `from_color` to `to_color`.
	fn stroke_gradient_line(
		&mut self,
		from: (f64, f64),
		to: (f64, f64),
		from_color: Color,
		to_color: Color,
		width: f64,
	);

	/// Disc filled with a radial gradient. `stops` are `(offset, color)`
	/// pairs with offsets in `0.0..=1.0`.
	fn fill_radial(&mut self, center: (f64, f64), radius: f64, stops: &[(f64, Color)]);

	/// Disc filled with a solid color.
	fn fill_circle(&mut self, center: (f64, f64), radius: f64, color: Color);
}

impl Surface for CanvasRenderingContext2d {
	fn clear(&mut self, width: f64, height: f64) {
		self.clear_rect(0.0, 0.0, width, height);
	}

	fn stroke_gradient_line(
		&mut self,
		from: (f64, f64),
		to: (f64, f64),
		from_color: Color,
		to_color: Color,
		width: f64,
	) {
		if from_color == to_color {
			self.set_stroke_style_str(&from_color.to_css());
		} else {
			let gradient = self.create_linear_gradient(from.0, from.1, to.0, to.1);
			let _ = gradient.add_color_stop(0.0, &from_color.to_css());
			let _ = gradient.add_color_stop(1.0, &to_color.to_css());
			#[allow(deprecated)]
			self.set_stroke_style(&gradient);
		}

		self.set_line_width(width);
		self.begin_path();
		self.move_to(from.0, from.1);
		self.line_to(to.0, to.1);
		self.stroke();
	}

	fn fill_radial(&mut self, center: (f64, f64), radius: f64, stops: &[(f64, Color)]) {
		let Ok(gradient) =
			self.create_radial_gradient(center.0, center.1, 0.0, center.0, center.1, radius)
		else {
			return;
		};
		for &(offset, color) in stops {
			let _ = gradient.add_color_stop(offset as f32, &color.to_css());
		}

		self.begin_path();
		let _ = self.arc(center.0, center.1, radius, 0.0, 2.0 * PI);
		#[allow(deprecated)]
		self.set_fill_style(&gradient);
		self.fill();
	}

	fn fill_circle(&mut self, center: (f64, f64), radius: f64, color: Color) {
		self.begin_path();
		let _ = self.arc(center.0, center.1, radius, 0.0, 2.0 * PI);
		self.set_fill_style_str(&color.to_css());
		self.fill();
	}
}
