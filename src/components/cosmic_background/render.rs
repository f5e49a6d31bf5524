use super::state::BackgroundState;
use super::surface::{Line, Painter};
use super::types::{CYAN, GLYPH_INK, MAGENTA, Rgb};

// Pointer parallax per layer, nearer layers move more.
const NEBULA_PARALLAX: f64 = 0.35;
const GRID_PARALLAX: f64 = 0.6;
const TRACE_PARALLAX: f64 = 0.22;
const STAR_PARALLAX_SCALE: f64 = 34.0;
const EDGE_PARALLAX: f64 = 0.3;
const CROSS_EDGE_PARALLAX: f64 = 0.25;
const PACKET_PARALLAX: f64 = 0.24;
const NODE_PARALLAX: f64 = 0.28;
const GLYPH_PARALLAX: f64 = 0.18;

const PACKET_TRAIL: f64 = 0.08;

const BACKDROP: [(f64, Rgb, f64); 3] = [
	(0.0, Rgb(18, 14, 39), 0.88),
	(0.45, Rgb(24, 35, 62), 0.82),
	(1.0, Rgb(10, 28, 44), 0.84),
];

/// Distance under which two nodes are joined by an edge.
pub fn edge_threshold(width: f64) -> f64 {
	if width > 1100.0 { 220.0 } else { 180.0 }
}

fn grid_spacing(width: f64) -> f64 {
	if width > 960.0 { 140.0 } else { 100.0 }
}

/// Paints one frame back to front.
pub fn render(state: &BackgroundState, painter: &impl Painter) {
	let offset = state.pointer.offset(state.config.pointer_amplitude);
	painter.clear(state.width, state.height);
	draw_backdrop(state, painter);
	draw_nebulae(state, painter, offset);
	draw_circuit_grid(state, painter, offset);
	draw_stars(state, painter, offset);
	draw_edges(state, painter, offset);
	draw_packets(state, painter, offset);
	draw_nodes(state, painter, offset);
	draw_glyphs(state, painter, offset);
}

fn draw_backdrop(state: &BackgroundState, painter: &impl Painter) {
	let stops = BACKDROP.map(|(at, rgb, a)| (at, rgb.alpha(a)));
	painter.fill_linear_gradient(
		(0.0, 0.0),
		(state.width, state.height),
		&stops,
		state.width,
		state.height,
	);
}

fn draw_nebulae(state: &BackgroundState, painter: &impl Painter, (ox, oy): (f64, f64)) {
	for nebula in &state.scene.nebulae {
		let (x, y, radius) = nebula.placement_at(state.timestamp);
		let (x, y) = (x + ox * NEBULA_PARALLAX, y + oy * NEBULA_PARALLAX);
		let stops = [
			(0.0, nebula.tint.alpha(nebula.alpha)),
			(0.56, nebula.tint.alpha(nebula.alpha * 0.34)),
			(1.0, nebula.tint.alpha(0.0)),
		];
		painter.fill_radial_glow(x, y, radius, &stops);
	}
}

fn draw_circuit_grid(state: &BackgroundState, painter: &impl Painter, (ox, oy): (f64, f64)) {
	let (w, h) = (state.width, state.height);
	let spacing = grid_spacing(w);
	let (shift_x, shift_y) = ((ox * GRID_PARALLAX) % spacing, (oy * GRID_PARALLAX) % spacing);

	let mut grid = Vec::new();
	let mut x = -spacing;
	while x < w + spacing {
		grid.push(Line::new(x + shift_x, 0.0, x + shift_x, h));
		x += spacing;
	}
	let mut y = -spacing;
	while y < h + spacing {
		grid.push(Line::new(0.0, y + shift_y, w, y + shift_y));
		y += spacing;
	}
	painter.stroke_lines(&grid, 1.0, CYAN.alpha(0.055));

	let (tx, ty) = (ox * TRACE_PARALLAX, oy * TRACE_PARALLAX);
	let traces: Vec<Line> = state
		.scene
		.traces
		.iter()
		.map(|trace| {
			let (end_x, end_y) = trace.end();
			Line::new(trace.x + tx, trace.y + ty, end_x + tx, end_y + ty)
		})
		.collect();
	painter.stroke_lines(&traces, 1.1, MAGENTA.alpha(0.09));
}

fn draw_stars(state: &BackgroundState, painter: &impl Painter, (ox, oy): (f64, f64)) {
	for star in &state.scene.stars {
		let depth = star.parallax / STAR_PARALLAX_SCALE;
		painter.fill_circle(
			star.x + ox * depth,
			star.y + oy * depth,
			star.radius,
			star.tint.alpha(star.alpha_at(state.timestamp)),
		);
	}
}

fn draw_edges(state: &BackgroundState, painter: &impl Painter, (ox, oy): (f64, f64)) {
	let nodes = &state.scene.nodes;
	let max_distance = edge_threshold(state.width);

	for (i, first) in nodes.iter().enumerate() {
		for second in &nodes[i + 1..] {
			let distance = (first.x - second.x).hypot(first.y - second.y);
			if distance > max_distance {
				continue;
			}

			let strength = 1.0 - distance / max_distance;
			let alpha = (strength * 0.32).clamp(0.03, 0.24);
			let (ex, ey) = (ox * EDGE_PARALLAX, oy * EDGE_PARALLAX);
			painter.stroke_lines(
				&[Line::new(first.x + ex, first.y + ey, second.x + ex, second.y + ey)],
				1.0,
				CYAN.alpha(alpha),
			);

			if distance < max_distance * 0.55 {
				let (cx, cy) = (ox * CROSS_EDGE_PARALLAX, oy * CROSS_EDGE_PARALLAX);
				painter.stroke_lines(
					&[Line::new(first.x + cx, first.y + cy, second.x + cx, second.y + cy)],
					0.75,
					MAGENTA.alpha(alpha * 0.55),
				);
			}
		}
	}
}

fn draw_packets(state: &BackgroundState, painter: &impl Painter, (ox, oy): (f64, f64)) {
	let (px, py) = (ox * PACKET_PARALLAX, oy * PACKET_PARALLAX);
	for packet in &state.scene.packets {
		// Stale indices around a rebuild: skip this frame.
		let Some((from, to)) = packet.endpoints(&state.scene.nodes) else {
			continue;
		};
		let at = |progress: f64| {
			(
				from.x + (to.x - from.x) * progress + px,
				from.y + (to.y - from.y) * progress + py,
			)
		};
		let (x, y) = at(packet.progress);
		let (trail_x, trail_y) = at((packet.progress - PACKET_TRAIL).max(0.0));

		painter.stroke_lines(&[Line::new(trail_x, trail_y, x, y)], 1.7, packet.tint.alpha(0.32));
		painter.fill_circle(x, y, 2.5, packet.tint.alpha(0.96));
		painter.fill_circle(x, y, 6.0, packet.tint.alpha(0.2));
	}
}

fn draw_nodes(state: &BackgroundState, painter: &impl Painter, (ox, oy): (f64, f64)) {
	for node in &state.scene.nodes {
		let pulse = node.pulse_at(state.timestamp, state.reduced_motion);
		let (x, y) = (node.x + ox * NODE_PARALLAX, node.y + oy * NODE_PARALLAX);
		painter.fill_circle(x, y, node.radius * 3.0 * pulse, CYAN.alpha(0.22));
		painter.fill_circle(x, y, node.radius * pulse, CYAN.alpha(0.95));
	}
}

fn draw_glyphs(state: &BackgroundState, painter: &impl Painter, (ox, oy): (f64, f64)) {
	for glyph in &state.scene.glyphs {
		painter.fill_text(
			glyph.symbol,
			glyph.x + ox * GLYPH_PARALLAX,
			glyph.y + oy * GLYPH_PARALLAX,
			&format!("{}px \"JetBrains Mono\", monospace", glyph.size),
			GLYPH_INK.alpha(glyph.alpha_at(state.timestamp)),
		);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::cosmic_background::config::BackgroundConfig;
	use crate::components::cosmic_background::scene::Scene;
	use crate::components::cosmic_background::surface::tests::{Op, RecordingPainter};
	use crate::components::cosmic_background::types::*;

	fn node(x: f64, y: f64) -> GraphNode {
		GraphNode {
			x,
			y,
			vx: 0.0,
			vy: 0.0,
			radius: 2.0,
			phase: 0.0,
		}
	}

	fn tiny_state(reduced_motion: bool) -> BackgroundState {
		let mut state = BackgroundState::new(BackgroundConfig::default(), 1, 800.0, 600.0, reduced_motion);
		state.scene = Scene {
			stars: vec![Star {
				x: 10.0,
				y: 10.0,
				radius: 1.0,
				alpha: 0.5,
				twinkle_speed: 0.001,
				phase: 0.0,
				drift_x: 0.0,
				drift_y: 0.0,
				parallax: 17.0,
				tint: STAR_TINTS[0],
			}],
			nebulae: vec![Nebula {
				base_x: 400.0,
				base_y: 300.0,
				radius: 200.0,
				pulse: 0.0,
				sway: 20.0,
				speed: 0.0001,
				alpha: 0.15,
				tint: MAGENTA,
			}],
			nodes: vec![node(100.0, 100.0), node(150.0, 100.0)],
			packets: vec![Packet {
				pair: NodePair { from: 0, to: 1 },
				progress: 0.5,
				speed: 0.01,
				tint: CYAN,
			}],
			glyphs: vec![Glyph {
				x: 300.0,
				y: 300.0,
				size: 12.0,
				alpha: 0.2,
				drift_x: 0.0,
				drift_y: 0.1,
				phase: 0.0,
				symbol: "fn()",
			}],
			traces: vec![Trace {
				orientation: Orientation::Vertical,
				x: 50.0,
				y: 60.0,
				length: 100.0,
			}],
		};
		state
	}

	fn label(op: &Op) -> &'static str {
		match op {
			Op::Clear => "clear",
			Op::LinearGradient => "backdrop",
			Op::RadialGlow { .. } => "glow",
			Op::Circle { .. } => "circle",
			Op::Lines { .. } => "lines",
			Op::Text { .. } => "text",
		}
	}

	#[test]
	fn layers_paint_back_to_front() {
		let state = tiny_state(false);
		let painter = RecordingPainter::default();
		render(&state, &painter);

		let labels: Vec<_> = painter.ops.borrow().iter().map(label).collect();
		assert_eq!(
			labels,
			[
				"clear", "backdrop", "glow", // nebula
				"lines", "lines", // grid, traces
				"circle", // star
				"lines", "lines", // edge, cross edge
				"lines", "circle", "circle", // packet
				"circle", "circle", "circle", "circle", // nodes
				"text",
			]
		);
	}

	#[test]
	fn stale_packet_is_skipped() {
		let mut state = tiny_state(false);
		state.scene.packets[0].pair = NodePair { from: 0, to: 9 };
		let painter = RecordingPainter::default();
		render(&state, &painter);

		let widths: Vec<f64> = painter
			.ops
			.borrow()
			.iter()
			.filter_map(|op| match op {
				Op::Lines { width, .. } => Some(*width),
				_ => None,
			})
			.collect();
		assert!(!widths.contains(&1.7));
		let packet_halo = CYAN.alpha(0.2);
		assert!(!painter.ops.borrow().iter().any(
			|op| matches!(op, Op::Circle { radius, color, .. } if *radius == 6.0 && *color == packet_halo)
		));
		// Node halos share the 6 px radius and must still be drawn.
		let node_halos = painter
			.ops
			.borrow()
			.iter()
			.filter(|op| matches!(op, Op::Circle { radius, color, .. } if *radius == 6.0 && *color == CYAN.alpha(0.22)))
			.count();
		assert_eq!(node_halos, 2);
	}

	#[test]
	fn distant_nodes_are_not_joined() {
		let mut state = tiny_state(false);
		state.scene.nodes[1].x = 100.0 + 181.0;
		state.scene.packets.clear();
		let painter = RecordingPainter::default();
		render(&state, &painter);

		let lines = painter.ops.borrow().iter().filter(|op| matches!(op, Op::Lines { .. })).count();
		assert_eq!(lines, 2);
	}

	#[test]
	fn cross_edge_only_for_close_nodes() {
		let mut state = tiny_state(false);
		state.scene.nodes[1].x = 100.0 + 120.0;
		state.scene.packets.clear();
		let painter = RecordingPainter::default();
		render(&state, &painter);

		let edges: Vec<Rgba> = painter
			.ops
			.borrow()
			.iter()
			.filter_map(|op| match op {
				Op::Lines { width, color, .. } if *width == 1.0 && color.0 == CYAN && color.1 > 0.055 => Some(*color),
				Op::Lines { width, color, .. } if *width == 0.75 => Some(*color),
				_ => None,
			})
			.collect();
		assert_eq!(edges.len(), 1);
		assert!((edges[0].1 - 0.03_f64.max((1.0 - 120.0 / 180.0) * 0.32)).abs() < 1e-12);
	}

	#[test]
	fn reduced_motion_nodes_do_not_pulse() {
		let mut state = tiny_state(true);
		state.timestamp = 523.0;
		let painter = RecordingPainter::default();
		render(&state, &painter);

		let radii: Vec<f64> = painter
			.ops
			.borrow()
			.iter()
			.filter_map(|op| match op {
				Op::Circle { radius, color, .. } if color.0 == CYAN && (color.1 == 0.22 || color.1 == 0.95) => {
					Some(*radius)
				}
				_ => None,
			})
			.collect();
		assert_eq!(radii, [6.0, 2.0, 6.0, 2.0]);
	}

	#[test]
	fn pointer_shifts_near_layers_more_than_far_ones() {
		let mut state = tiny_state(true);
		state.pointer = Pointer { x: 1.0, y: 0.5 };
		let painter = RecordingPainter::default();
		render(&state, &painter);

		let ops = painter.ops.borrow();
		let Some(Op::RadialGlow { x: glow_x, .. }) = ops.iter().find(|op| matches!(op, Op::RadialGlow { .. })) else {
			panic!("no nebula painted");
		};
		let Some(Op::Text { x: text_x, .. }) = ops.iter().find(|op| matches!(op, Op::Text { .. })) else {
			panic!("no glyph painted");
		};
		let (sway_x, _, _) = state.scene.nebulae[0].placement_at(0.0);
		assert!((glow_x - (sway_x + 12.0 * 0.35)).abs() < 1e-9);
		assert!((text_x - (300.0 + 12.0 * 0.18)).abs() < 1e-9);
	}

	#[test]
	fn edge_threshold_scales_with_width() {
		assert_eq!(edge_threshold(1920.0), 220.0);
		assert_eq!(edge_threshold(800.0), 180.0);
	}
}
