use std::f64::consts::PI;

use web_sys::{CanvasGradient, CanvasRenderingContext2d};

use super::types::Rgba;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Line {
	pub from: (f64, f64),
	pub to: (f64, f64),
}

impl Line {
	pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
		Self {
			from: (x1, y1),
			to: (x2, y2),
		}
	}
}

/// The immediate-mode 2D calls the renderer needs.
pub trait Painter {
	fn clear(&self, width: f64, height: f64);
	/// Fills the rect `(0, 0, width, height)` with a gradient running from
	/// `start` to `end`.
	fn fill_linear_gradient(&self, start: (f64, f64), end: (f64, f64), stops: &[(f64, Rgba)], width: f64, height: f64);
	/// Fills a disc whose colour fades radially from the centre outwards.
	fn fill_radial_glow(&self, x: f64, y: f64, radius: f64, stops: &[(f64, Rgba)]);
	fn fill_circle(&self, x: f64, y: f64, radius: f64, color: Rgba);
	/// Strokes all `lines` as one path.
	fn stroke_lines(&self, lines: &[Line], width: f64, color: Rgba);
	/// Draws `text` centred on `(x, y)`.
	fn fill_text(&self, text: &str, x: f64, y: f64, font: &str, color: Rgba);
}

fn add_stops(gradient: &CanvasGradient, stops: &[(f64, Rgba)]) {
	for (offset, color) in stops {
		let _ = gradient.add_color_stop(*offset as f32, &color.to_string());
	}
}

impl Painter for CanvasRenderingContext2d {
	fn clear(&self, width: f64, height: f64) {
		self.clear_rect(0.0, 0.0, width, height);
	}

	fn fill_linear_gradient(&self, start: (f64, f64), end: (f64, f64), stops: &[(f64, Rgba)], width: f64, height: f64) {
		let gradient = self.create_linear_gradient(start.0, start.1, end.0, end.1);
		add_stops(&gradient, stops);
		#[allow(deprecated)]
		self.set_fill_style(&gradient);
		self.fill_rect(0.0, 0.0, width, height);
	}

	fn fill_radial_glow(&self, x: f64, y: f64, radius: f64, stops: &[(f64, Rgba)]) {
		let Ok(gradient) = self.create_radial_gradient(x, y, 0.0, x, y, radius) else {
			return;
		};
		add_stops(&gradient, stops);
		#[allow(deprecated)]
		self.set_fill_style(&gradient);
		self.begin_path();
		let _ = self.arc(x, y, radius, 0.0, 2.0 * PI);
		self.fill();
	}

	fn fill_circle(&self, x: f64, y: f64, radius: f64, color: Rgba) {
		self.begin_path();
		self.set_fill_style_str(&color.to_string());
		let _ = self.arc(x, y, radius.max(0.0), 0.0, 2.0 * PI);
		self.fill();
	}

	fn stroke_lines(&self, lines: &[Line], width: f64, color: Rgba) {
		self.begin_path();
		for line in lines {
			self.move_to(line.from.0, line.from.1);
			self.line_to(line.to.0, line.to.1);
		}
		self.set_line_width(width);
		self.set_stroke_style_str(&color.to_string());
		self.stroke();
	}

	fn fill_text(&self, text: &str, x: f64, y: f64, font: &str, color: Rgba) {
		self.set_text_align("center");
		self.set_text_baseline("middle");
		self.set_font(font);
		self.set_fill_style_str(&color.to_string());
		let _ = CanvasRenderingContext2d::fill_text(self, text, x, y);
	}
}
