use leptos::prelude::*;

use crate::components::hero_demo::HeroGraphDemo;

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<section class="hero">
				<div class="hero-copy">
					<h1>"Your notes, connected."</h1>
					<p class="subtitle">
						"Write in markdown, link ideas as you go, and watch your knowledge graph grow."
					</p>
					<a class="button" href="/graph">"Open the graph"</a>
				</div>
				<HeroGraphDemo />
			</section>
		</ErrorBoundary>
	}
}
