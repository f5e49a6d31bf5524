use std::f64::consts::TAU;

use rand::Rng;

use super::config::BackgroundConfig;
use super::types::*;

/// Uniform draw in `[min, max)`. Tolerates `min >= max` on tiny viewports
/// instead of panicking like `gen_range`.
pub fn between<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
	min + rng.r#gen::<f64>() * (max - min)
}

pub fn pick<'a, T, R: Rng + ?Sized>(rng: &mut R, values: &'a [T]) -> &'a T {
	&values[rng.gen_range(0..values.len())]
}

impl NodePair {
	/// Picks a random `from != to` pair out of `count` nodes, avoiding an
	/// immediate repeat of `previous`. Fewer than two nodes admit no pair.
	pub fn pick<R: Rng + ?Sized>(rng: &mut R, count: usize, previous: Option<NodePair>) -> Option<Self> {
		if count < 2 {
			return None;
		}
		let mut from = rng.gen_range(0..count);
		let mut to = rng.gen_range(0..count);
		while to == from {
			to = rng.gen_range(0..count);
		}

		if previous == Some(NodePair { from, to }) {
			from = (from + 1) % count;
			to = (to + 2) % count;
			if to == from {
				to = (to + 1) % count;
			}
		}
		Some(Self { from, to })
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SceneCounts {
	pub stars: usize,
	pub nodes: usize,
	pub nebulae: usize,
	pub glyphs: usize,
	pub traces: usize,
	pub packets: usize,
}

impl SceneCounts {
	pub fn for_viewport(config: &BackgroundConfig, width: f64, height: f64) -> Self {
		let area = width.max(0.0) * height.max(0.0);
		let nodes = config.nodes.count(area);
		Self {
			stars: config.stars.count(area),
			nodes,
			nebulae: config.nebulae.count(area),
			glyphs: config.glyphs.count(area),
			traces: config.traces.count(area),
			packets: config.packets.count(nodes as f64),
		}
	}
}

/// Every entity population for one viewport size.
#[derive(Clone, Debug, Default)]
pub struct Scene {
	pub stars: Vec<Star>,
	pub nebulae: Vec<Nebula>,
	pub nodes: Vec<GraphNode>,
	pub packets: Vec<Packet>,
	pub glyphs: Vec<Glyph>,
	pub traces: Vec<Trace>,
}

impl Scene {
	pub fn build<R: Rng + ?Sized>(config: &BackgroundConfig, width: f64, height: f64, rng: &mut R) -> Self {
		let (w, h) = (width.max(0.0), height.max(0.0));
		let counts = SceneCounts::for_viewport(config, w, h);

		let stars = (0..counts.stars)
			.map(|_| Star {
				x: between(rng, 0.0, w),
				y: between(rng, 0.0, h),
				radius: between(rng, 0.5, 1.9),
				alpha: between(rng, 0.22, 0.92),
				twinkle_speed: between(rng, 0.0004, 0.0012),
				phase: between(rng, 0.0, TAU),
				drift_x: between(rng, -0.018, 0.018),
				drift_y: between(rng, -0.012, 0.012),
				parallax: between(rng, 10.0, 36.0),
				tint: *pick(rng, STAR_TINTS),
			})
			.collect();

		let nebulae = (0..counts.nebulae)
			.map(|_| Nebula {
				base_x: between(rng, 0.08 * w, 0.92 * w),
				base_y: between(rng, 0.08 * h, 0.92 * h),
				radius: between(rng, w * 0.2, w * 0.38),
				pulse: between(rng, 0.0, TAU),
				sway: between(rng, 16.0, 52.0),
				speed: between(rng, 0.00008, 0.00024),
				alpha: between(rng, 0.12, 0.22),
				tint: *pick(rng, NEBULA_TINTS),
			})
			.collect();

		let nodes: Vec<GraphNode> = (0..counts.nodes)
			.map(|_| GraphNode {
				x: between(rng, 0.08 * w, 0.92 * w),
				y: between(rng, 0.12 * h, 0.9 * h),
				vx: between(rng, -0.12, 0.12),
				vy: between(rng, -0.1, 0.1),
				radius: between(rng, 1.4, 2.9),
				phase: between(rng, 0.0, TAU),
			})
			.collect();

		let packets = (0..counts.packets)
			.filter_map(|index| {
				let pair = NodePair::pick(rng, nodes.len(), None)?;
				Some(Packet {
					pair,
					progress: between(rng, 0.0, 1.0),
					speed: between(rng, 0.0025, 0.008),
					tint: Packet::tint_for(index),
				})
			})
			.collect();

		let glyphs = (0..counts.glyphs)
			.map(|_| Glyph {
				x: between(rng, 20.0, w - 20.0),
				y: between(rng, 20.0, h - 20.0),
				size: between(rng, 10.0, 16.0),
				alpha: between(rng, 0.15, 0.32),
				drift_x: between(rng, -0.05, 0.05),
				drift_y: between(rng, 0.08, 0.22),
				phase: between(rng, 0.0, TAU),
				symbol: *pick(rng, PROGRAM_GLYPHS),
			})
			.collect();

		let traces = (0..counts.traces)
			.map(|_| Trace {
				orientation: if rng.gen_bool(0.5) {
					Orientation::Horizontal
				} else {
					Orientation::Vertical
				},
				x: between(rng, 0.06 * w, 0.94 * w),
				y: between(rng, 0.08 * h, 0.92 * h),
				length: between(rng, 60.0, 180.0),
			})
			.collect();

		Self {
			stars,
			nebulae,
			nodes,
			packets,
			glyphs,
			traces,
		}
	}

	pub fn counts(&self) -> SceneCounts {
		SceneCounts {
			stars: self.stars.len(),
			nodes: self.nodes.len(),
			nebulae: self.nebulae.len(),
			glyphs: self.glyphs.len(),
			traces: self.traces.len(),
			packets: self.packets.len(),
		}
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::SmallRng;

	use super::*;

	fn counts(w: f64, h: f64) -> SceneCounts {
		SceneCounts::for_viewport(&BackgroundConfig::default(), w, h)
	}

	#[test]
	fn full_hd_counts_clamp_to_maximum() {
		let c = counts(1920.0, 1080.0);
		assert_eq!(c.stars, 260);
		assert_eq!(c.nodes, 36);
		assert_eq!(c.nebulae, 7);
		assert_eq!(c.glyphs, 16);
		assert_eq!(c.traces, 12);
		assert_eq!(c.packets, 16);
	}

	#[test]
	fn small_mobile_counts_fall_to_minimum() {
		let c = counts(320.0, 480.0);
		assert_eq!(c.stars, 90);
		assert_eq!(c.nodes, 16);
		assert_eq!(c.nebulae, 3);
		assert_eq!(c.glyphs, 6);
		assert_eq!(c.traces, 7);
		assert_eq!(c.packets, 8);
	}

	#[test]
	fn zero_viewport_still_populates_minimums() {
		let mut rng = SmallRng::seed_from_u64(1);
		let scene = Scene::build(&BackgroundConfig::default(), 0.0, 0.0, &mut rng);
		assert_eq!(scene.counts(), counts(0.0, 0.0));
		assert_eq!(scene.stars.len(), 90);
		assert_eq!(scene.packets.len(), 8);
	}

	#[test]
	fn counts_grow_with_area_within_bounds() {
		let mut previous = counts(0.0, 0.0);
		for side in (0..3000).step_by(50) {
			let c = counts(side as f64, side as f64 * 0.6);
			assert!(c.stars >= previous.stars && c.stars <= 260);
			assert!(c.nodes >= previous.nodes && c.nodes <= 36);
			assert!(c.nebulae >= previous.nebulae && c.nebulae <= 7);
			assert!(c.glyphs >= previous.glyphs && c.glyphs <= 16);
			assert!(c.traces >= previous.traces && c.traces <= 18);
			assert!(c.packets >= previous.packets && c.packets <= 16);
			previous = c;
		}
	}

	#[test]
	fn entities_start_inside_documented_ranges() {
		let mut rng = SmallRng::seed_from_u64(7);
		let (w, h) = (1280.0, 720.0);
		let scene = Scene::build(&BackgroundConfig::default(), w, h, &mut rng);

		for star in &scene.stars {
			assert!((0.5..=1.9).contains(&star.radius));
			assert!((0.0..=w).contains(&star.x) && (0.0..=h).contains(&star.y));
		}
		for nebula in &scene.nebulae {
			assert!((0.12..=0.22).contains(&nebula.alpha));
			assert!((w * 0.2..=w * 0.38).contains(&nebula.radius));
		}
		for node in &scene.nodes {
			assert!((0.08 * w..=0.92 * w).contains(&node.x));
			assert!((0.12 * h..=0.9 * h).contains(&node.y));
		}
		for packet in &scene.packets {
			assert_ne!(packet.pair.from, packet.pair.to);
			assert!(packet.pair.from < scene.nodes.len() && packet.pair.to < scene.nodes.len());
			assert!((0.0..1.0).contains(&packet.progress));
		}
		for glyph in &scene.glyphs {
			assert!(PROGRAM_GLYPHS.contains(&glyph.symbol));
		}
		for trace in &scene.traces {
			assert!((60.0..=180.0).contains(&trace.length));
		}
	}

	#[test]
	fn packet_tints_alternate() {
		let mut rng = SmallRng::seed_from_u64(3);
		let scene = Scene::build(&BackgroundConfig::default(), 800.0, 600.0, &mut rng);
		for (index, packet) in scene.packets.iter().enumerate() {
			assert_eq!(packet.tint, Packet::tint_for(index));
		}
		assert_eq!(scene.packets[0].tint, CYAN);
		assert_eq!(scene.packets[1].tint, MAGENTA);
	}

	#[test]
	fn node_pair_is_distinct_and_never_repeats() {
		let mut rng = SmallRng::seed_from_u64(11);
		for count in 2..12 {
			let mut previous = NodePair::pick(&mut rng, count, None);
			for _ in 0..200 {
				let next = NodePair::pick(&mut rng, count, previous).unwrap();
				assert_ne!(next.from, next.to);
				assert!(next.from < count && next.to < count);
				assert_ne!(Some(next), previous);
				previous = Some(next);
			}
		}
	}

	#[test]
	fn node_pair_needs_two_nodes() {
		let mut rng = SmallRng::seed_from_u64(0);
		assert_eq!(NodePair::pick(&mut rng, 0, None), None);
		assert_eq!(NodePair::pick(&mut rng, 1, None), None);
	}

	#[test]
	fn between_tolerates_inverted_range() {
		let mut rng = SmallRng::seed_from_u64(5);
		let v = between(&mut rng, 20.0, -20.0);
		assert!((-20.0..=20.0).contains(&v));
	}
}
