use serde::Deserialize;

use super::error::GraphError;

/// What a node stands for in the knowledge graph. Only affects its color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
	/// A note.
	#[default]
	File,
	/// A folder of notes.
	Folder,
}

/// A node as supplied by the host.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct GraphNode {
	/// Stable unique id.
	pub id: String,
	/// Display text, wrapped at word boundaries when drawn.
	pub label: String,
	/// Selects the fill color.
	pub kind: NodeKind,
	/// Neighbor ids, in declaration order.
	pub connections: Vec<String>,
	/// Seed position; nodes without one are laid out on a circle.
	pub position: Option<(f64, f64)>,
	/// CSS color overriding the kind's fill.
	pub color: Option<String>,
	/// Overrides the view's node radius.
	pub radius: Option<f64>,
}

/// An explicit connection; appended to `source`'s connections on load.
#[derive(Clone, Debug, Deserialize)]
pub struct GraphLink {
	/// Declaring node.
	pub source: String,
	/// Neighbor id.
	pub target: String,
}

/// Graph input: nodes with their adjacency plus optional extra links.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct GraphData {
	/// Nodes in draw and hit-test order.
	pub nodes: Vec<GraphNode>,
	/// Extra connections.
	pub links: Vec<GraphLink>,
}

impl GraphData {
	/// Parse graph input as produced by the document/link store.
	pub fn from_json(json: &str) -> Result<Self, GraphError> {
		Ok(serde_json::from_str(json)?)
	}
}

impl GraphNode {
	/// Node without seed position or overrides.
	pub fn new(id: &str, label: &str, kind: NodeKind, connections: &[&str]) -> Self {
		Self {
			id: id.into(),
			label: label.into(),
			kind,
			connections: connections.iter().map(|c| c.to_string()).collect(),
			..Default::default()
		}
	}

	/// Seed the position.
	pub fn at(mut self, x: f64, y: f64) -> Self {
		self.position = Some((x, y));
		self
	}

	/// Fixed fill color.
	pub fn with_color(mut self, color: &str) -> Self {
		self.color = Some(color.into());
		self
	}

	/// Fixed radius.
	pub fn with_radius(mut self, radius: f64) -> Self {
		self.radius = Some(radius);
		self
	}
}

/// The six notes shown in the dashboard graph view.
pub fn sample_knowledge_graph() -> GraphData {
	GraphData {
		nodes: vec![
			GraphNode::new("1", "Getting Started", NodeKind::File, &["2", "3"]).at(300.0, 200.0),
			GraphNode::new("2", "Machine Learning", NodeKind::File, &["1", "4", "5"])
				.at(500.0, 150.0),
			GraphNode::new("3", "Data Analysis", NodeKind::File, &["1", "4"]).at(200.0, 300.0),
			GraphNode::new("4", "Research Notes", NodeKind::Folder, &["2", "3", "5"])
				.at(400.0, 350.0),
			GraphNode::new("5", "Daily Notes", NodeKind::File, &["2", "4"]).at(600.0, 250.0),
			GraphNode::new("6", "Ideas", NodeKind::File, &["1"]).at(150.0, 150.0),
		],
		links: Vec::new(),
	}
}

/// The landing page demo set.
pub fn sample_hero_graph() -> GraphData {
	GraphData {
		nodes: vec![
			GraphNode::new("1", "Ideas", NodeKind::File, &["2", "4"])
				.at(200.0, 150.0)
				.with_radius(25.0)
				.with_color("#3b82f6"),
			GraphNode::new("2", "Research", NodeKind::File, &["1", "3", "5"])
				.at(350.0, 100.0)
				.with_radius(30.0)
				.with_color("#8b5cf6"),
			GraphNode::new("3", "Analysis", NodeKind::File, &["2", "5"])
				.at(500.0, 200.0)
				.with_radius(28.0)
				.with_color("#06b6d4"),
			GraphNode::new("4", "Notes", NodeKind::File, &["1", "5"])
				.at(150.0, 300.0)
				.with_radius(22.0)
				.with_color("#10b981"),
			GraphNode::new("5", "Insights", NodeKind::File, &["2", "3", "4"])
				.at(400.0, 280.0)
				.with_radius(35.0)
				.with_color("#f59e0b"),
		],
		links: Vec::new(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_store_json() {
		let data = GraphData::from_json(
			r#"{
				"nodes": [
					{ "id": "a", "label": "Alpha", "kind": "folder", "connections": ["b"] },
					{ "id": "b", "label": "Beta", "position": [10.0, 20.0] }
				],
				"links": [{ "source": "b", "target": "a" }]
			}"#,
		)
		.unwrap();
		assert_eq!(data.nodes.len(), 2);
		assert_eq!(data.nodes[0].kind, NodeKind::Folder);
		assert_eq!(data.nodes[1].kind, NodeKind::File);
		assert_eq!(data.nodes[1].position, Some((10.0, 20.0)));
		assert_eq!(data.links[0].source, "b");
	}

	#[test]
	fn rejects_malformed_json() {
		assert!(matches!(
			GraphData::from_json("{ nodes: "),
			Err(GraphError::Json(_))
		));
	}

	#[test]
	fn sample_sets_reference_known_ids() {
		for data in [sample_knowledge_graph(), sample_hero_graph()] {
			for node in &data.nodes {
				for c in &node.connections {
					assert!(data.nodes.iter().any(|n| &n.id == c));
				}
			}
		}
	}
}
