use leptos::prelude::*;
use web_sys::HtmlCanvasElement;

use super::config::BackgroundConfig;
use super::controller::{BackgroundController, random_seed};
use crate::hooks::use_reduced_motion;

/// Full-viewport decorative canvas. Follows the system reduced-motion
/// preference unless `reduced_motion` is given.
#[component]
pub fn CosmicBackground(
	#[prop(default = None)] config: Option<BackgroundConfig>,
	#[prop(default = None)] seed: Option<u64>,
	#[prop(optional, into)] reduced_motion: Option<Signal<bool>>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let reduced_motion = reduced_motion.unwrap_or_else(|| use_reduced_motion().into());
	let config = config.unwrap_or_default();
	let controller = StoredValue::new_local(None::<BackgroundController>);

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let attached = BackgroundController::attach(
			canvas,
			config.clone(),
			seed.unwrap_or_else(random_seed),
			reduced_motion.get_untracked(),
		);
		// Replacing a previous controller drops and detaches it.
		controller.update_value(|current| *current = attached);
	});

	Effect::new(move |_| {
		let reduced = reduced_motion.get();
		controller.update_value(|current| {
			if let Some(c) = current.as_mut() {
				c.set_reduced_motion(reduced);
			}
		});
	});

	on_cleanup(move || {
		controller.try_update_value(|current| {
			if let Some(mut c) = current.take() {
				c.detach();
			}
		});
	});

	view! {
		<div class="cosmic-background" aria-hidden="true">
			<canvas
				node_ref=canvas_ref
				class="cosmic-canvas"
				style="position: fixed; inset: 0; display: block; pointer-events: none; z-index: -1;"
			/>
		</div>
	}
}
