use rand::SeedableRng;
use rand::rngs::SmallRng;

use super::config::BackgroundConfig;
use super::render;
use super::scene::{Scene, between, pick};
use super::surface::Painter;
use super::types::{NodePair, PROGRAM_GLYPHS, Pointer};

/// Stars wrap this far outside the viewport.
const STAR_WRAP_INSET: f64 = 4.0;
/// Nodes bounce off walls this far inside the viewport.
const NODE_MARGIN: f64 = 22.0;
const GLYPH_RESPAWN_ABOVE: f64 = -24.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopMode {
	/// A frame callback chain repaints every display refresh.
	Looping,
	/// Frames are painted only in response to events.
	Static,
}

impl LoopMode {
	pub fn for_preference(reduced_motion: bool) -> Self {
		if reduced_motion { Self::Static } else { Self::Looping }
	}
}

/// What the host should do after feeding an event to the state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameRequest {
	/// Paint synchronously, no loop will pick the change up.
	PaintNow,
	/// The running loop paints on its next callback.
	NextFrame,
}

/// Everything one background instance owns between frames.
pub struct BackgroundState {
	pub config: BackgroundConfig,
	pub scene: Scene,
	pub pointer: Pointer,
	pub width: f64,
	pub height: f64,
	pub device_pixel_ratio: f64,
	pub reduced_motion: bool,
	pub timestamp: f64,
	pub frames: u64,
	rng: SmallRng,
}

impl BackgroundState {
	pub fn new(config: BackgroundConfig, seed: u64, width: f64, height: f64, reduced_motion: bool) -> Self {
		let mut rng = SmallRng::seed_from_u64(seed);
		let scene = Scene::build(&config, width, height, &mut rng);
		Self {
			config,
			scene,
			pointer: Pointer::default(),
			width,
			height,
			device_pixel_ratio: 1.0,
			reduced_motion,
			timestamp: 0.0,
			frames: 0,
			rng,
		}
	}

	pub fn mode(&self) -> LoopMode {
		LoopMode::for_preference(self.reduced_motion)
	}

	fn request(&self) -> FrameRequest {
		match self.mode() {
			LoopMode::Static => FrameRequest::PaintNow,
			LoopMode::Looping => FrameRequest::NextFrame,
		}
	}

	/// Replaces every entity population for the new viewport.
	pub fn resize(&mut self, width: f64, height: f64, device_pixel_ratio: f64) {
		self.width = width;
		self.height = height;
		self.device_pixel_ratio = self.config.device_pixel_ratio(device_pixel_ratio);
		self.scene = Scene::build(&self.config, width, height, &mut self.rng);
	}

	pub fn pointer_move(&mut self, client_x: f64, client_y: f64) -> FrameRequest {
		self.pointer = Pointer {
			x: normalise(client_x, self.width),
			y: normalise(client_y, self.height),
		};
		self.request()
	}

	pub fn pointer_leave(&mut self) -> FrameRequest {
		self.pointer = Pointer::default();
		self.request()
	}

	/// Returns `true` when the loop mode actually changed.
	pub fn set_reduced_motion(&mut self, reduced_motion: bool) -> bool {
		let changed = self.reduced_motion != reduced_motion;
		self.reduced_motion = reduced_motion;
		changed
	}

	/// Advances the simulation by one frame. Under reduced motion nothing
	/// integrates; only the timestamp is recorded.
	pub fn step(&mut self, timestamp: f64) {
		self.timestamp = timestamp;
		if self.reduced_motion {
			return;
		}
		self.step_stars();
		self.step_nodes();
		self.step_packets();
		self.step_glyphs();
	}

	/// One step and one paint.
	pub fn frame(&mut self, timestamp: f64, painter: &impl Painter) {
		self.step(timestamp);
		render::render(self, painter);
		self.frames += 1;
	}

	fn step_stars(&mut self) {
		let (w, h) = (self.width, self.height);
		for star in &mut self.scene.stars {
			star.x += star.drift_x;
			star.y += star.drift_y;

			if star.x < -STAR_WRAP_INSET {
				star.x = w + STAR_WRAP_INSET;
			}
			if star.x > w + STAR_WRAP_INSET {
				star.x = -STAR_WRAP_INSET;
			}
			if star.y < -STAR_WRAP_INSET {
				star.y = h + STAR_WRAP_INSET;
			}
			if star.y > h + STAR_WRAP_INSET {
				star.y = -STAR_WRAP_INSET;
			}
		}
	}

	fn step_nodes(&mut self) {
		let (w, h) = (self.width, self.height);
		for node in &mut self.scene.nodes {
			node.x += node.vx;
			node.y += node.vy;

			if node.x < NODE_MARGIN || node.x > w - NODE_MARGIN {
				node.vx = -node.vx;
			}
			if node.y < NODE_MARGIN || node.y > h - NODE_MARGIN {
				node.vy = -node.vy;
			}
		}
	}

	fn step_packets(&mut self) {
		let node_count = self.scene.nodes.len();
		for packet in &mut self.scene.packets {
			if packet.endpoints(&self.scene.nodes).is_none() {
				// Indices from a previous node population.
				if let Some(pair) = NodePair::pick(&mut self.rng, node_count, None) {
					packet.pair = pair;
					packet.progress = 0.0;
				}
				continue;
			}

			packet.progress += packet.speed;
			if packet.progress >= 1.0 {
				if let Some(pair) = NodePair::pick(&mut self.rng, node_count, Some(packet.pair)) {
					packet.pair = pair;
				}
				packet.progress = 0.0;
			}
		}
	}

	fn step_glyphs(&mut self) {
		let (w, h) = (self.width, self.height);
		for glyph in &mut self.scene.glyphs {
			glyph.y -= glyph.drift_y;
			glyph.x += glyph.drift_x;

			if glyph.y < GLYPH_RESPAWN_ABOVE {
				glyph.y = h + between(&mut self.rng, 12.0, 42.0);
				glyph.x = between(&mut self.rng, 24.0, w - 24.0);
				glyph.symbol = *pick(&mut self.rng, PROGRAM_GLYPHS);
			}

			if glyph.x < 8.0 {
				glyph.x = w - 12.0;
			}
			if glyph.x > w - 8.0 {
				glyph.x = 12.0;
			}
		}
	}
}

fn normalise(position: f64, extent: f64) -> f64 {
	if extent > 0.0 && position.is_finite() {
		(position / extent).clamp(0.0, 1.0)
	} else {
		0.5
	}
}
