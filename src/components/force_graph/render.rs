use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::model::Node;
use super::state::ForceGraphState;
use super::types::NodeKind;

const EDGE_COLOR: &str = "#e2e8f0";
const EDGE_HIGHLIGHT: &str = "#3b82f6";

/// Visual treatment of a graph canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GraphStyle {
	/// Dashboard graph view: hover highlights, wrapped labels.
	#[default]
	Knowledge,
	/// Landing page demo: pulsing nodes and glowing edges.
	Hero,
}

/// Measures rendered text width in canvas pixels.
pub trait TextMeasure {
	/// Width of `text` in the current font.
	fn text_width(&self, text: &str) -> f64;
}

impl TextMeasure for CanvasRenderingContext2d {
	fn text_width(&self, text: &str) -> f64 {
		self.measure_text(text).map(|m| m.width()).unwrap_or(0.0)
	}
}

/// Greedy word wrap: words join the current line while it stays narrower than
/// `max_width`, otherwise they start a new one. Words are never split.
pub fn wrap_text(text: &str, max_width: f64, measure: &impl TextMeasure) -> Vec<String> {
	let mut words = text.split(' ');
	let mut lines = Vec::new();
	let mut current = words.next().unwrap_or_default().to_string();

	for word in words {
		let candidate = format!("{current} {word}");
		if measure.text_width(&candidate) < max_width {
			current = candidate;
		} else {
			lines.push(std::mem::replace(&mut current, word.to_string()));
		}
	}
	lines.push(current);
	lines
}

/// Per-style node appearance.
#[derive(Clone, Copy, Debug, PartialEq)]
struct NodeLook {
	shadow: &'static str,
	shadow_blur: f64,
	shadow_offset: f64,
	/// Offset of the inner highlight toward the top-left.
	highlight_offset: f64,
	highlight: &'static str,
	font: &'static str,
	wrap: bool,
}

fn node_look(style: GraphStyle, hovered: bool) -> NodeLook {
	match style {
		GraphStyle::Knowledge => NodeLook {
			shadow: "rgba(0, 0, 0, 0.1)",
			shadow_blur: if hovered { 20.0 } else { 10.0 },
			shadow_offset: 4.0,
			highlight_offset: 8.0,
			highlight: "rgba(255, 255, 255, 0.3)",
			font: if hovered {
				"14px Inter, sans-serif"
			} else {
				"12px Inter, sans-serif"
			},
			wrap: true,
		},
		GraphStyle::Hero => NodeLook {
			shadow: "rgba(0, 0, 0, 0.2)",
			shadow_blur: 15.0,
			shadow_offset: 5.0,
			highlight_offset: 6.0,
			highlight: "rgba(255, 255, 255, 0.4)",
			font: "600 12px Inter, sans-serif",
			wrap: false,
		},
	}
}

/// Endpoints of every drawable edge and whether it touches the hovered node.
/// Edges with a missing endpoint are left out.
fn edge_segments(
	state: &ForceGraphState,
) -> impl Iterator<Item = ((f64, f64), (f64, f64), bool)> + '_ {
	let hovered = state.hovered_id();
	state.graph.edges().iter().filter_map(move |edge| {
		let a = state.graph.node(&edge.a)?;
		let b = state.graph.node(&edge.b)?;
		let highlighted = hovered.is_some_and(|id| edge.touches(id));
		Some(((a.x, a.y), (b.x, b.y), highlighted))
	})
}

fn glow(elapsed: f64) -> f64 {
	(elapsed * 3.0).sin() * 0.5 + 0.5
}

/// Draw one frame: clear, apply pan and zoom, edges, then nodes.
pub fn render(state: &ForceGraphState, ctx: &CanvasRenderingContext2d, style: GraphStyle) {
	ctx.clear_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_edges(state, ctx, style);
	draw_nodes(state, ctx, style);
	ctx.restore();
}

fn draw_edges(state: &ForceGraphState, ctx: &CanvasRenderingContext2d, style: GraphStyle) {
	let intensity = glow(state.elapsed);

	for ((ax, ay), (bx, by), highlighted) in edge_segments(state) {
		ctx.begin_path();
		ctx.move_to(ax, ay);
		ctx.line_to(bx, by);

		match style {
			GraphStyle::Hero => {
				ctx.set_stroke_style_str(&format!("rgba(59, 130, 246, {})", 0.3 + intensity * 0.4));
				ctx.set_line_width(2.0 + intensity * 2.0);
				ctx.set_shadow_color(EDGE_HIGHLIGHT);
				ctx.set_shadow_blur(10.0 + intensity * 10.0);
			}
			GraphStyle::Knowledge if highlighted => {
				ctx.set_stroke_style_str(EDGE_HIGHLIGHT);
				ctx.set_line_width(3.0);
				ctx.set_shadow_color(EDGE_HIGHLIGHT);
				ctx.set_shadow_blur(10.0);
			}
			GraphStyle::Knowledge => {
				ctx.set_stroke_style_str(EDGE_COLOR);
				ctx.set_line_width(2.0);
				ctx.set_shadow_blur(0.0);
			}
		}
		ctx.stroke();
	}
	ctx.set_shadow_blur(0.0);
}

fn node_fill(node: &Node, hovered: bool) -> &str {
	if let Some(color) = &node.color {
		return color;
	}
	match (node.kind, hovered) {
		(NodeKind::Folder, true) => "#f59e0b",
		(NodeKind::Folder, false) => "#fbbf24",
		(NodeKind::File, true) => "#3b82f6",
		(NodeKind::File, false) => "#60a5fa",
	}
}

fn draw_nodes(state: &ForceGraphState, ctx: &CanvasRenderingContext2d, style: GraphStyle) {
	let view = &state.view;

	for (i, node) in state.graph.nodes().iter().enumerate() {
		let is_hovered = state.hovered == Some(i);
		let radius = match style {
			GraphStyle::Hero => {
				let pulse = (state.elapsed * 2.0 + i as f64 * 0.5).sin() * 0.1 + 1.0;
				state.radius_of(node) * pulse
			}
			GraphStyle::Knowledge => state.radius_of(node),
		};

		let look = node_look(style, is_hovered);

		ctx.set_shadow_color(look.shadow);
		ctx.set_shadow_blur(look.shadow_blur);
		ctx.set_shadow_offset_x(look.shadow_offset);
		ctx.set_shadow_offset_y(look.shadow_offset);
		ctx.begin_path();
		let _ = ctx.arc(node.x, node.y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(node_fill(node, is_hovered));
		ctx.fill();

		// badge
		ctx.set_shadow_blur(0.0);
		ctx.set_shadow_offset_x(0.0);
		ctx.set_shadow_offset_y(0.0);
		ctx.begin_path();
		let (hx, hy) = (node.x - look.highlight_offset, node.y - look.highlight_offset);
		let _ = ctx.arc(hx, hy, radius * 0.3, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(look.highlight);
		ctx.fill();

		ctx.set_fill_style_str("white");
		ctx.set_font(look.font);
		ctx.set_text_align("center");
		ctx.set_text_baseline("middle");

		if !look.wrap {
			let _ = ctx.fill_text(&node.label, node.x, node.y);
			continue;
		}
		let lines = wrap_text(&node.label, radius * view.label_width_factor, ctx);
		let start_y = node.y - (lines.len() - 1) as f64 * view.line_height / 2.0;
		for (row, line) in lines.iter().enumerate() {
			let _ = ctx.fill_text(line, node.x, start_y + row as f64 * view.line_height);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::simulation::SimulationConfig;
	use crate::components::force_graph::state::ViewConfig;
	use crate::components::force_graph::types::{GraphData, GraphNode};

	/// Every character is `px` wide.
	struct Monospace(f64);

	impl TextMeasure for Monospace {
		fn text_width(&self, text: &str) -> f64 {
			text.chars().count() as f64 * self.0
		}
	}

	#[test]
	fn splits_at_word_boundary() {
		// "Machine Learning" is 16 chars = 112px, "Machine" alone fits in 60
		assert_eq!(
			wrap_text("Machine Learning", 60.0, &Monospace(7.0)),
			vec!["Machine", "Learning"]
		);
	}

	#[test]
	fn keeps_short_labels_on_one_line() {
		assert_eq!(
			wrap_text("Machine Learning", 120.0, &Monospace(7.0)),
			vec!["Machine Learning"]
		);
	}

	#[test]
	fn width_equal_to_max_breaks() {
		// "ab cd" is exactly 50px: the fit test is strict
		assert_eq!(wrap_text("ab cd", 50.0, &Monospace(10.0)), vec!["ab", "cd"]);
	}

	#[test]
	fn greedy_fill_and_overlong_words() {
		assert_eq!(
			wrap_text("a b c Supercalifragilistic d", 50.0, &Monospace(10.0)),
			vec!["a b", "c", "Supercalifragilistic", "d"]
		);
	}

	#[test]
	fn empty_label_is_one_empty_line() {
		assert_eq!(wrap_text("", 60.0, &Monospace(7.0)), vec![String::new()]);
	}

	fn state_with(nodes: Vec<GraphNode>) -> ForceGraphState {
		ForceGraphState::new(
			&GraphData {
				nodes,
				links: Vec::new(),
			},
			800.0,
			600.0,
			SimulationConfig::default(),
			ViewConfig::default(),
		)
	}

	#[test]
	fn edges_to_missing_nodes_are_not_drawn() {
		let s = state_with(vec![
			GraphNode::new("a", "A", NodeKind::File, &["b", "ghost"]).at(0.0, 0.0),
			GraphNode::new("b", "B", NodeKind::File, &[]).at(100.0, 0.0),
		]);
		assert_eq!(s.graph.edges().len(), 2);
		let segments: Vec<_> = edge_segments(&s).collect();
		assert_eq!(segments, vec![((0.0, 0.0), (100.0, 0.0), false)]);
	}

	#[test]
	fn edges_highlight_iff_touching_hovered_node() {
		let mut s = state_with(vec![
			GraphNode::new("a", "A", NodeKind::File, &["b"]).at(0.0, 0.0),
			GraphNode::new("b", "B", NodeKind::File, &["c"]).at(200.0, 0.0),
			GraphNode::new("c", "C", NodeKind::File, &[]).at(400.0, 0.0),
		]);
		s.pointer_move(0.0, 0.0);
		let flags: Vec<bool> = edge_segments(&s).map(|(_, _, h)| h).collect();
		assert_eq!(flags, vec![true, false]);

		s.pointer_move(200.0, 0.0);
		let flags: Vec<bool> = edge_segments(&s).map(|(_, _, h)| h).collect();
		assert_eq!(flags, vec![true, true]);

		s.pointer_move(300.0, 300.0);
		assert!(edge_segments(&s).all(|(_, _, h)| !h));
	}

	#[test]
	fn hero_nodes_have_their_own_look() {
		let hero = node_look(GraphStyle::Hero, false);
		assert_eq!(hero.shadow, "rgba(0, 0, 0, 0.2)");
		assert_eq!((hero.shadow_blur, hero.shadow_offset), (15.0, 5.0));
		assert_eq!(hero.highlight, "rgba(255, 255, 255, 0.4)");
		assert_eq!(hero.font, "600 12px Inter, sans-serif");
		assert!(!hero.wrap);
		assert_eq!(node_look(GraphStyle::Hero, true), hero);

		let knowledge = node_look(GraphStyle::Knowledge, false);
		assert_eq!((knowledge.shadow_blur, knowledge.shadow_offset), (10.0, 4.0));
		assert!(knowledge.wrap);
		assert_eq!(node_look(GraphStyle::Knowledge, true).shadow_blur, 20.0);
		assert_eq!(node_look(GraphStyle::Knowledge, true).font, "14px Inter, sans-serif");
	}

	#[test]
	fn folder_and_file_fills_differ() {
		let mut node = Node {
			id: "n".into(),
			label: "n".into(),
			kind: NodeKind::Folder,
			x: 0.0,
			y: 0.0,
			vx: 0.0,
			vy: 0.0,
			connections: Vec::new(),
			color: None,
			radius: None,
		};
		assert_eq!(node_fill(&node, false), "#fbbf24");
		assert_eq!(node_fill(&node, true), "#f59e0b");
		node.kind = NodeKind::File;
		assert_eq!(node_fill(&node, false), "#60a5fa");
		node.color = Some("#10b981".into());
		assert_eq!(node_fill(&node, true), "#10b981");
	}
}
