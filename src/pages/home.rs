use leptos::prelude::*;

use crate::components::cosmic_background::CosmicBackground;

/// Landing page: the backdrop plus a headline laid over it.
#[component]
pub fn Home() -> impl IntoView {
	view! {
		<CosmicBackground />
		<main class="hero-overlay">
			<h1>"Cosmic Neural Network"</h1>
			<p class="subtitle">"Move the pointer to shift the layers."</p>
		</main>
	}
}
