use serde::Deserialize;

use super::model::{Graph, Node};
use super::simulation::{self, SimulationConfig};
use super::types::GraphData;

/// Geometry and zoom behavior of a graph view.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
	/// Radius of nodes without their own.
	pub node_radius: f64,
	/// Pointer distance under which a node counts as hovered.
	pub hit_radius: f64,
	/// Factor of the zoom buttons. Zooming out divides by it.
	pub zoom_step: f64,
	/// Lower zoom clamp.
	pub min_zoom: f64,
	/// Upper zoom clamp.
	pub max_zoom: f64,
	/// Factor of one mouse wheel notch.
	pub wheel_step: f64,
	/// Label wrap width as a multiple of the node radius.
	pub label_width_factor: f64,
	/// Distance between wrapped label lines.
	pub line_height: f64,
}

impl Default for ViewConfig {
	fn default() -> Self {
		Self {
			node_radius: 40.0,
			hit_radius: 40.0,
			zoom_step: 1.2,
			min_zoom: 0.3,
			max_zoom: 3.0,
			wheel_step: 1.1,
			label_width_factor: 1.5,
			line_height: 16.0,
		}
	}
}

/// Pan offset in screen pixels and zoom factor. Screen = world * k + (x, y).
#[derive(Clone, Debug)]
pub struct ViewTransform {
	/// Pan x.
	pub x: f64,
	/// Pan y.
	pub y: f64,
	/// Zoom.
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

/// Pointer state machine.
#[derive(Clone, Debug, Default, PartialEq)]
#[allow(missing_docs)]
pub enum PointerMode {
	#[default]
	Idle,
	/// Index of the node under direct control.
	DraggingNode(usize),
	/// Background drag, anchored where it started.
	Panning {
		start_x: f64,
		start_y: f64,
		transform_start_x: f64,
		transform_start_y: f64,
	},
}

/// What the info panel shows for the hovered node.
#[derive(Clone, Debug, PartialEq)]
pub struct HoverInfo {
	/// Node label.
	pub label: String,
	/// Number of declared connections.
	pub connections: usize,
}

/// Everything one graph view owns: layout, view transform and pointer state.
#[allow(missing_docs)]
pub struct ForceGraphState {
	pub graph: Graph,
	pub transform: ViewTransform,
	pub pointer: PointerMode,
	/// Index of the node under the pointer.
	pub hovered: Option<usize>,
	/// Canvas width; its center is the centering target.
	pub width: f64,
	pub height: f64,
	pub simulation: SimulationConfig,
	pub view: ViewConfig,
	/// Ticks are skipped while false; rendering continues.
	pub animation_running: bool,
	/// Seconds of simulated time, drives the hero pulse.
	pub elapsed: f64,
}

#[allow(missing_docs)]
impl ForceGraphState {
	pub fn new(
		data: &GraphData,
		width: f64,
		height: f64,
		simulation: SimulationConfig,
		view: ViewConfig,
	) -> Self {
		Self {
			graph: Graph::new(data),
			transform: ViewTransform::default(),
			pointer: PointerMode::Idle,
			hovered: None,
			width,
			height,
			simulation,
			view,
			animation_running: true,
			elapsed: 0.0,
		}
	}

	pub fn center(&self) -> (f64, f64) {
		(self.width / 2.0, self.height / 2.0)
	}

	pub fn radius_of(&self, node: &Node) -> f64 {
		node.radius.unwrap_or(self.view.node_radius)
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// First node, in input order, strictly within reach of the pointer.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		self.graph.nodes().iter().position(|node| {
			let reach = node.radius.unwrap_or(self.view.hit_radius);
			let (dx, dy) = (node.x - gx, node.y - gy);
			(dx * dx + dy * dy).sqrt() < reach
		})
	}

	pub fn hovered_id(&self) -> Option<&str> {
		self.hovered
			.and_then(|i| self.graph.nodes().get(i))
			.map(|n| n.id.as_str())
	}

	pub fn dragged(&self) -> Option<usize> {
		match self.pointer {
			PointerMode::DraggingNode(idx) => Some(idx),
			_ => None,
		}
	}

	pub fn hover_info(&self) -> Option<HoverInfo> {
		let node = self.graph.nodes().get(self.hovered?)?;
		Some(HoverInfo {
			label: node.label.clone(),
			connections: self.graph.degree(&node.id),
		})
	}

	/// Update hover; move the dragged node (zeroing its velocity) or the pan.
	pub fn pointer_move(&mut self, sx: f64, sy: f64) {
		self.hovered = self.node_at_position(sx, sy);

		match self.pointer {
			PointerMode::DraggingNode(idx) => {
				let (gx, gy) = self.screen_to_graph(sx, sy);
				if let Some(node) = self.graph.nodes_mut().get_mut(idx) {
					node.x = gx;
					node.y = gy;
					node.vx = 0.0;
					node.vy = 0.0;
				}
			}
			PointerMode::Panning {
				start_x,
				start_y,
				transform_start_x,
				transform_start_y,
			} => {
				self.transform.x = transform_start_x + (sx - start_x);
				self.transform.y = transform_start_y + (sy - start_y);
			}
			PointerMode::Idle => {}
		}
	}

	/// Grab the node under the pointer, or start panning.
	pub fn pointer_down(&mut self, sx: f64, sy: f64) {
		self.hovered = self.node_at_position(sx, sy);
		self.pointer = match self.hovered {
			Some(idx) => PointerMode::DraggingNode(idx),
			None => PointerMode::Panning {
				start_x: sx,
				start_y: sy,
				transform_start_x: self.transform.x,
				transform_start_y: self.transform.y,
			},
		};
	}

	/// Release. A dragged node keeps its position with zero velocity.
	pub fn pointer_up(&mut self) {
		if let PointerMode::DraggingNode(idx) = self.pointer {
			if let Some(node) = self.graph.nodes_mut().get_mut(idx) {
				node.vx = 0.0;
				node.vy = 0.0;
			}
		}
		self.pointer = PointerMode::Idle;
	}

	pub fn pointer_leave(&mut self) {
		self.pointer_up();
		self.hovered = None;
	}

	/// Zoom around the pointer, as the mouse wheel does.
	pub fn wheel(&mut self, sx: f64, sy: f64, delta_y: f64) {
		let factor = if delta_y > 0.0 {
			1.0 / self.view.wheel_step
		} else {
			self.view.wheel_step
		};
		let new_k = (self.transform.k * factor).clamp(self.view.min_zoom, self.view.max_zoom);
		let ratio = new_k / self.transform.k;
		self.transform.x = sx - (sx - self.transform.x) * ratio;
		self.transform.y = sy - (sy - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	pub fn zoom_in(&mut self) {
		self.transform.k = (self.transform.k * self.view.zoom_step).min(self.view.max_zoom);
	}

	pub fn zoom_out(&mut self) {
		self.transform.k = (self.transform.k / self.view.zoom_step).max(self.view.min_zoom);
	}

	pub fn reset_view(&mut self) {
		self.transform = ViewTransform::default();
	}

	/// One simulation step, with the dragged node frozen.
	pub fn tick(&mut self, dt: f64) {
		self.elapsed += dt;
		let (center, frozen) = (self.center(), self.dragged());
		simulation::step(&mut self.graph, center, frozen, &self.simulation);
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::types::{GraphNode, NodeKind, sample_knowledge_graph};

	fn knowledge_state() -> ForceGraphState {
		ForceGraphState::new(
			&sample_knowledge_graph(),
			800.0,
			600.0,
			SimulationConfig::default(),
			ViewConfig::default(),
		)
	}

	#[test]
	fn hover_boundary_is_exclusive() {
		let s = ForceGraphState::new(
			&GraphData {
				nodes: vec![GraphNode::new("a", "a", NodeKind::File, &[]).at(100.0, 100.0)],
				links: Vec::new(),
			},
			800.0,
			600.0,
			SimulationConfig::default(),
			ViewConfig::default(),
		);
		assert_eq!(s.node_at_position(100.0, 100.0), Some(0));
		assert_eq!(s.node_at_position(100.0 + 39.999, 100.0), Some(0));
		assert_eq!(s.node_at_position(100.0 + 40.0, 100.0), None);
		assert_eq!(s.node_at_position(100.0, 100.0 + 40.001), None);
	}

	#[test]
	fn hit_testing_inverts_pan_and_zoom() {
		let mut s = knowledge_state();
		s.transform = ViewTransform {
			x: 50.0,
			y: -20.0,
			k: 2.0,
		};
		// "Ideas" sits at (150, 150) in world space
		assert_eq!(s.node_at_position(350.0, 280.0), Some(5));
		assert_eq!(s.screen_to_graph(350.0, 280.0), (150.0, 150.0));
	}

	#[test]
	fn first_node_in_order_wins_overlap() {
		let s = ForceGraphState::new(
			&GraphData {
				nodes: vec![
					GraphNode::new("a", "a", NodeKind::File, &[]).at(0.0, 0.0),
					GraphNode::new("b", "b", NodeKind::File, &[]).at(10.0, 0.0),
				],
				links: Vec::new(),
			},
			800.0,
			600.0,
			SimulationConfig::default(),
			ViewConfig::default(),
		);
		assert_eq!(s.node_at_position(9.0, 0.0), Some(0));
	}

	#[test]
	fn drag_then_release_pins_node_with_zero_velocity() {
		let mut s = knowledge_state();
		s.tick(0.016);
		let start = s.graph.nodes()[0].clone();
		s.pointer_move(start.x, start.y);
		s.pointer_down(start.x, start.y);
		assert_eq!(s.pointer, PointerMode::DraggingNode(0));

		s.pointer_move(520.0, 410.0);
		s.tick(0.016);
		s.pointer_move(640.0, 90.0);
		s.pointer_up();

		let node = &s.graph.nodes()[0];
		assert_eq!((node.x, node.y), (640.0, 90.0));
		assert_eq!((node.vx, node.vy), (0.0, 0.0));
		assert_eq!(s.pointer, PointerMode::Idle);
	}

	#[test]
	fn dragged_node_ignores_ticks() {
		let mut s = knowledge_state();
		let start = s.graph.nodes()[2].clone();
		s.pointer_down(start.x, start.y);
		for _ in 0..20 {
			s.tick(0.016);
		}
		assert_eq!((s.graph.nodes()[2].x, s.graph.nodes()[2].y), (start.x, start.y));
	}

	#[test]
	fn empty_press_pans_the_view() {
		let mut s = knowledge_state();
		s.pointer_down(790.0, 590.0);
		s.pointer_move(800.0, 570.0);
		assert_eq!((s.transform.x, s.transform.y), (10.0, -20.0));
		s.pointer_leave();
		assert_eq!(s.pointer, PointerMode::Idle);
		assert_eq!(s.hovered, None);
	}

	#[test]
	fn zoom_buttons_clamp_and_reset() {
		let mut s = knowledge_state();
		for _ in 0..20 {
			s.zoom_in();
		}
		assert_eq!(s.transform.k, 3.0);
		for _ in 0..20 {
			s.zoom_out();
		}
		assert_eq!(s.transform.k, 0.3);
		s.transform.x = 12.0;
		s.reset_view();
		assert_eq!((s.transform.x, s.transform.y, s.transform.k), (0.0, 0.0, 1.0));
	}

	#[test]
	fn wheel_zoom_keeps_pointer_anchored() {
		let mut s = knowledge_state();
		let before = s.screen_to_graph(300.0, 200.0);
		s.wheel(300.0, 200.0, -1.0);
		let after = s.screen_to_graph(300.0, 200.0);
		assert!((s.transform.k - 1.1).abs() < 1e-12);
		assert!((before.0 - after.0).abs() < 1e-9 && (before.1 - after.1).abs() < 1e-9);
	}

	#[test]
	fn hover_info_reports_label_and_connections() {
		let mut s = knowledge_state();
		s.pointer_move(500.0, 150.0);
		assert_eq!(
			s.hover_info(),
			Some(HoverInfo {
				label: "Machine Learning".into(),
				connections: 3,
			})
		);
		assert_eq!(s.hovered_id(), Some("2"));
		s.pointer_move(-500.0, -500.0);
		assert_eq!(s.hover_info(), None);
	}
}
