use leptos::prelude::*;

use crate::components::force_graph::{ForceGraphCanvas, GraphData, sample_knowledge_graph};

/// Graph JSON embedded in the page as `<script id="graph-data" type="application/json">`.
fn embedded_graph() -> Option<GraphData> {
	let json = web_sys::window()?
		.document()?
		.get_element_by_id("graph-data")?
		.text_content()?;
	GraphData::from_json(&json)
		.map_err(|e| log::warn!("ignoring embedded graph data: {e}"))
		.ok()
}

/// Full-screen graph of the workspace notes.
#[component]
pub fn GraphPage() -> impl IntoView {
	let graph_data = Signal::derive(|| embedded_graph().unwrap_or_else(sample_knowledge_graph));

	view! {
		<div class="fullscreen-graph">
			<ForceGraphCanvas data=graph_data fullscreen=true />
			<div class="graph-overlay">
				<h1>"Knowledge Graph"</h1>
				<p class="subtitle">
					"Hover a note to see its links. Drag notes to reposition, drag the background to pan."
				</p>
			</div>
		</div>
	}
}
