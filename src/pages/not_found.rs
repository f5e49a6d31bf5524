use leptos::prelude::*;

use crate::components::cosmic_background::CosmicBackground;

/// 404 page, drawn over the same backdrop as the home page.
#[component]
pub fn NotFound() -> impl IntoView {
	view! {
		<CosmicBackground />
		<main class="hero-overlay">
			<h1>"Page not found"</h1>
			<a href="/">"Back home"</a>
		</main>
	}
}
