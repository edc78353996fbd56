use leptos::prelude::*;

use super::force_graph::{ForceGraphCanvas, GraphStyle, sample_hero_graph};

/// Non-interactive live graph shown on the landing page.
#[component]
pub fn HeroGraphDemo() -> impl IntoView {
	let data = Signal::derive(sample_hero_graph);

	view! {
		<div class="hero-demo">
			<ForceGraphCanvas
				data=data
				width=Some(600.0)
				height=Some(400.0)
				interactive=false
				style=GraphStyle::Hero
			/>
			<div class="hero-demo-badge">"Live Demo"</div>
		</div>
	}
}
