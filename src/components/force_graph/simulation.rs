//! Force layout: inverse-square repulsion between every pair, linear springs
//! along declared connections, and a weak pull toward the canvas center.

use serde::Deserialize;

use super::model::Graph;

/// Pairs closer than this exert no force on each other.
pub const MIN_DISTANCE: f64 = 1e-6;

/// Force constants. Defaults give a calm layout for a few dozen nodes.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
	/// Inverse-square repulsion numerator.
	pub repulsion: f64,
	/// Spring constant along connections.
	pub attraction: f64,
	/// Pull toward the canvas center per unit of distance.
	pub centering: f64,
	/// Velocity multiplier applied every tick.
	pub damping: f64,
}

impl Default for SimulationConfig {
	fn default() -> Self {
		Self {
			repulsion: 1000.0,
			attraction: 0.001,
			centering: 0.0001,
			damping: 0.85,
		}
	}
}

/// Net force on every node, in node order, for the current positions.
pub fn compute_forces(
	graph: &Graph,
	center: (f64, f64),
	config: &SimulationConfig,
) -> Vec<(f64, f64)> {
	let nodes = graph.nodes();
	nodes
		.iter()
		.enumerate()
		.map(|(i, node)| {
			let (mut fx, mut fy) = (0.0, 0.0);

			for (j, other) in nodes.iter().enumerate() {
				if i == j {
					continue;
				}
				let (dx, dy) = (node.x - other.x, node.y - other.y);
				let dist = (dx * dx + dy * dy).sqrt();
				if dist < MIN_DISTANCE {
					continue;
				}
				let force = config.repulsion / (dist * dist);
				fx += dx / dist * force;
				fy += dy / dist * force;
			}

			for target in &node.connections {
				let Some(j) = graph.index_of(target) else {
					continue;
				};
				if i == j {
					continue;
				}
				let (dx, dy) = (nodes[j].x - node.x, nodes[j].y - node.y);
				let dist = (dx * dx + dy * dy).sqrt();
				if dist < MIN_DISTANCE {
					continue;
				}
				let force = dist * config.attraction;
				fx += dx / dist * force;
				fy += dy / dist * force;
			}

			fx += (center.0 - node.x) * config.centering;
			fy += (center.1 - node.y) * config.centering;
			(fx, fy)
		})
		.collect()
}

/// Advance the layout by one tick. `frozen` (the dragged node) is not touched.
pub fn step(
	graph: &mut Graph,
	center: (f64, f64),
	frozen: Option<usize>,
	config: &SimulationConfig,
) {
	let forces = compute_forces(graph, center, config);
	for (i, (node, (fx, fy))) in graph.nodes_mut().iter_mut().zip(forces).enumerate() {
		if frozen == Some(i) {
			continue;
		}
		let vx = (node.vx + fx) * config.damping;
		let vy = (node.vy + fy) * config.damping;
		let (x, y) = (node.x + vx, node.y + vy);
		if [vx, vy, x, y].iter().all(|v| v.is_finite()) {
			node.vx = vx;
			node.vy = vy;
			node.x = x;
			node.y = y;
		} else {
			node.vx = 0.0;
			node.vy = 0.0;
		}
	}
}
