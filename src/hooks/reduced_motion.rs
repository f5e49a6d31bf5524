use leptos::prelude::*;
use wasm_bindgen::prelude::*;

const QUERY: &str = "(prefers-reduced-motion: reduce)";

/// Tracks the `prefers-reduced-motion` media query. Stays `false` when the
/// host has no `matchMedia`.
pub fn use_reduced_motion() -> ReadSignal<bool> {
	let (reduced, set_reduced) = signal(false);
	let Some(query) = web_sys::window().and_then(|w| w.match_media(QUERY).ok().flatten()) else {
		return reduced;
	};
	set_reduced.set(query.matches());

	let watched = query.clone();
	let on_change = Closure::<dyn FnMut()>::new(move || set_reduced.set(watched.matches()));
	if query
		.add_event_listener_with_callback("change", on_change.as_ref().unchecked_ref())
		.is_err()
	{
		log::warn!("cannot watch {QUERY}, keeping initial value");
		return reduced;
	}

	let subscription = StoredValue::new_local(Some((query, on_change)));
	on_cleanup(move || {
		subscription.try_update_value(|sub| {
			if let Some((query, cb)) = sub.take() {
				let _ = query.remove_event_listener_with_callback("change", cb.as_ref().unchecked_ref());
			}
		});
	});
	reduced
}
