use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
	pub const fn alpha(self, a: f64) -> Rgba {
		Rgba(self, a)
	}
}

/// CSS `rgba(...)` colour, formatted straight into canvas style strings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba(pub Rgb, pub f64);

impl fmt::Display for Rgba {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let Rgba(Rgb(r, g, b), a) = *self;
		write!(f, "rgba({r}, {g}, {b}, {a})")
	}
}

pub const CYAN: Rgb = Rgb(27, 219, 239);
pub const MAGENTA: Rgb = Rgb(222, 45, 231);
pub const GLYPH_INK: Rgb = Rgb(200, 222, 255);

pub const STAR_TINTS: &[Rgb] = &[Rgb(240, 239, 241), CYAN, Rgb(190, 165, 255)];
pub const NEBULA_TINTS: &[Rgb] = &[CYAN, MAGENTA, Rgb(28, 100, 148), Rgb(39, 25, 58)];
pub const PROGRAM_GLYPHS: &[&str] = &["<>", "{}", "01", "AI", "//", "fn()", "[]", "->"];

pub const STAR_ALPHA_RANGE: (f64, f64) = (0.06, 0.98);
pub const GLYPH_ALPHA_RANGE: (f64, f64) = (0.08, 0.38);

#[derive(Clone, Debug)]
pub struct Star {
	pub x: f64,
	pub y: f64,
	pub radius: f64,
	pub alpha: f64,
	pub twinkle_speed: f64,
	pub phase: f64,
	pub drift_x: f64,
	pub drift_y: f64,
	pub parallax: f64,
	pub tint: Rgb,
}

impl Star {
	pub fn alpha_at(&self, timestamp: f64) -> f64 {
		let pulse = (timestamp * self.twinkle_speed + self.phase).sin() * 0.25;
		clamp_alpha(self.alpha + pulse, STAR_ALPHA_RANGE)
	}
}

#[derive(Clone, Debug)]
pub struct Nebula {
	pub base_x: f64,
	pub base_y: f64,
	pub radius: f64,
	pub pulse: f64,
	pub sway: f64,
	pub speed: f64,
	pub alpha: f64,
	pub tint: Rgb,
}

impl Nebula {
	/// Centre and radius at `timestamp`. Nebulae carry no velocity; their
	/// motion is periodic in time only.
	pub fn placement_at(&self, timestamp: f64) -> (f64, f64, f64) {
		let sway_x = (timestamp * self.speed + self.pulse).sin() * self.sway;
		let sway_y = (timestamp * self.speed * 1.2 + self.pulse).cos() * self.sway;
		let radius = self.radius + (timestamp * 0.0002 + self.pulse).sin() * 24.0;
		(self.base_x + sway_x, self.base_y + sway_y, radius.max(0.0))
	}
}

#[derive(Clone, Debug)]
pub struct GraphNode {
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	pub radius: f64,
	pub phase: f64,
}

impl GraphNode {
	pub fn pulse_at(&self, timestamp: f64, reduced_motion: bool) -> f64 {
		if reduced_motion {
			1.0
		} else {
			1.0 + (timestamp * 0.003 + self.phase).sin() * 0.24
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodePair {
	pub from: usize,
	pub to: usize,
}

#[derive(Clone, Debug)]
pub struct Packet {
	pub pair: NodePair,
	pub progress: f64,
	pub speed: f64,
	pub tint: Rgb,
}

impl Packet {
	pub fn tint_for(index: usize) -> Rgb {
		if index % 2 == 0 { CYAN } else { MAGENTA }
	}

	/// Endpoints of the packet's edge, or `None` when either index no longer
	/// refers to a node.
	pub fn endpoints<'a>(&self, nodes: &'a [GraphNode]) -> Option<(&'a GraphNode, &'a GraphNode)> {
		Some((nodes.get(self.pair.from)?, nodes.get(self.pair.to)?))
	}
}

#[derive(Clone, Debug)]
pub struct Glyph {
	pub x: f64,
	pub y: f64,
	pub size: f64,
	pub alpha: f64,
	pub drift_x: f64,
	pub drift_y: f64,
	pub phase: f64,
	pub symbol: &'static str,
}

impl Glyph {
	pub fn alpha_at(&self, timestamp: f64) -> f64 {
		let pulse = (timestamp * 0.001 + self.phase).sin() * 0.12;
		clamp_alpha(self.alpha + pulse, GLYPH_ALPHA_RANGE)
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
	Horizontal,
	Vertical,
}

#[derive(Clone, Debug)]
pub struct Trace {
	pub orientation: Orientation,
	pub x: f64,
	pub y: f64,
	pub length: f64,
}

impl Trace {
	pub fn end(&self) -> (f64, f64) {
		match self.orientation {
			Orientation::Horizontal => (self.x + self.length, self.y),
			Orientation::Vertical => (self.x, self.y + self.length),
		}
	}
}

/// Pointer position normalised to the viewport, each axis in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pointer {
	pub x: f64,
	pub y: f64,
}

impl Default for Pointer {
	fn default() -> Self {
		Self { x: 0.5, y: 0.5 }
	}
}

impl Pointer {
	/// Pixel offset used for parallax, scaled per layer by the renderer.
	pub fn offset(&self, amplitude: (f64, f64)) -> (f64, f64) {
		((self.x - 0.5) * amplitude.0, (self.y - 0.5) * amplitude.1)
	}
}

fn clamp_alpha(value: f64, (min, max): (f64, f64)) -> f64 {
	if value.is_nan() { min } else { value.clamp(min, max) }
}
