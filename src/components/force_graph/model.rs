use std::collections::HashMap;
use std::f64::consts::PI;

use super::types::{GraphData, NodeKind};

const SEED_RING: f64 = 100.0;

/// A node in the live layout. See [`GraphNode`](super::GraphNode) for the fields it is built from.
#[derive(Clone, Debug)]
pub struct Node {
	/// Stable id.
	pub id: String,
	/// Display text.
	pub label: String,
	/// Color class.
	pub kind: NodeKind,
	/// World-space x.
	pub x: f64,
	/// World-space y.
	pub y: f64,
	/// Velocity along x, in world units per tick.
	pub vx: f64,
	/// Velocity along y.
	pub vy: f64,
	/// Neighbor ids; the source of truth for edges.
	pub connections: Vec<String>,
	/// Fill override.
	pub color: Option<String>,
	/// Radius override.
	pub radius: Option<f64>,
}

/// Unordered pair of node ids. `a` is the node that declared the connection first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Edge {
	/// Declaring endpoint.
	pub a: String,
	/// Other endpoint; may not exist in the graph.
	pub b: String,
}

impl Edge {
	/// Whether `id` is one of the endpoints.
	pub fn touches(&self, id: &str) -> bool {
		self.a == id || self.b == id
	}

	fn same_pair(&self, a: &str, b: &str) -> bool {
		(self.a == a && self.b == b) || (self.a == b && self.b == a)
	}
}

/// Nodes, an id index and the deduplicated edge list derived from adjacency.
#[derive(Clone, Debug, Default)]
pub struct Graph {
	nodes: Vec<Node>,
	index: HashMap<String, usize>,
	edges: Vec<Edge>,
}

impl Graph {
	/// Build the graph. Later nodes with an already seen id are dropped.
	pub fn new(data: &GraphData) -> Self {
		let mut nodes: Vec<Node> = Vec::with_capacity(data.nodes.len());
		let mut index = HashMap::new();
		let count = data.nodes.len().max(1) as f64;

		for (i, node) in data.nodes.iter().enumerate() {
			if index.contains_key(&node.id) {
				log::warn!("duplicate node id {:?}, keeping the first", node.id);
				continue;
			}
			let (x, y) = node.position.unwrap_or_else(|| {
				let angle = i as f64 * 2.0 * PI / count;
				(SEED_RING * angle.cos(), SEED_RING * angle.sin())
			});
			index.insert(node.id.clone(), nodes.len());
			nodes.push(Node {
				id: node.id.clone(),
				label: node.label.clone(),
				kind: node.kind,
				x,
				y,
				vx: 0.0,
				vy: 0.0,
				connections: node.connections.clone(),
				color: node.color.clone(),
				radius: node.radius,
			});
		}

		for link in &data.links {
			match index.get(&link.source) {
				Some(&src) => {
					let connections = &mut nodes[src].connections;
					if !connections.contains(&link.target) {
						connections.push(link.target.clone());
					}
				}
				None => log::warn!("link from unknown node {:?}", link.source),
			}
		}

		let mut graph = Self {
			nodes,
			index,
			edges: Vec::new(),
		};
		graph.rebuild_edges();
		graph
	}

	fn rebuild_edges(&mut self) {
		let mut edges: Vec<Edge> = Vec::new();
		for node in &self.nodes {
			for target in &node.connections {
				if *target == node.id {
					continue;
				}
				if !self.index.contains_key(target) {
					log::debug!("{:?} links to missing node {:?}", node.id, target);
				}
				if !edges.iter().any(|e| e.same_pair(&node.id, target)) {
					edges.push(Edge {
						a: node.id.clone(),
						b: target.clone(),
					});
				}
			}
		}
		self.edges = edges;
	}

	/// Replace a node's adjacency. Returns false if the id is unknown.
	pub fn set_connections(&mut self, id: &str, connections: Vec<String>) -> bool {
		let Some(&idx) = self.index.get(id) else {
			return false;
		};
		self.nodes[idx].connections = connections;
		self.rebuild_edges();
		true
	}

	/// Nodes in input order.
	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	/// Take over labels and connections from new input with the same node ids,
	/// keeping positions and velocities. Returns false, changing nothing, when
	/// the id list differs and the graph has to be rebuilt.
	pub fn refresh(&mut self, data: &GraphData) -> bool {
		let fresh = Graph::new(data);
		if fresh.nodes.len() != self.nodes.len()
			|| fresh.nodes.iter().zip(&self.nodes).any(|(a, b)| a.id != b.id)
		{
			return false;
		}
		for (i, node) in fresh.nodes.into_iter().enumerate() {
			if node.connections != self.nodes[i].connections {
				self.set_connections(&node.id, node.connections);
			}
			let current = &mut self.nodes[i];
			current.label = node.label;
			current.kind = node.kind;
			current.color = node.color;
			current.radius = node.radius;
		}
		true
	}

	/// Mutable nodes. Connections edited here do not refresh [`Graph::edges`].
	pub fn nodes_mut(&mut self) -> &mut [Node] {
		&mut self.nodes
	}

	/// Cached edges, each unordered pair once.
	pub fn edges(&self) -> &[Edge] {
		&self.edges
	}

	/// Position of `id` in [`Graph::nodes`].
	pub fn index_of(&self, id: &str) -> Option<usize> {
		self.index.get(id).copied()
	}

	/// Node by id.
	pub fn node(&self, id: &str) -> Option<&Node> {
		self.index_of(id).map(|i| &self.nodes[i])
	}

	/// Number of declared connections, 0 for unknown ids.
	pub fn degree(&self, id: &str) -> usize {
		self.node(id).map_or(0, |n| n.connections.len())
	}
}
