use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::{debug, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Event, EventTarget, HtmlCanvasElement, MouseEvent, Window};

use super::config::BackgroundConfig;
use super::state::{BackgroundState, FrameRequest, LoopMode};

#[derive(Debug, thiserror::Error)]
pub enum AttachError {
	#[error("no window available")]
	NoWindow,
	#[error("canvas has no 2d context")]
	NoContext,
	#[error("could not subscribe to `{0}`")]
	Listener(&'static str),
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

struct Listener {
	target: EventTarget,
	event: &'static str,
	callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
	fn subscribe(
		target: EventTarget,
		event: &'static str,
		callback: impl FnMut(Event) + 'static,
	) -> Result<Self, AttachError> {
		let callback = Closure::<dyn FnMut(Event)>::new(callback);
		target
			.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
			.map_err(|_| AttachError::Listener(event))?;
		Ok(Self {
			target,
			event,
			callback,
		})
	}

	fn unsubscribe(self) {
		let _ = self
			.target
			.remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
	}
}

/// Owns one mounted background: its state, the pending animation frame and
/// every listener it registered. Dropping it detaches.
pub struct BackgroundController {
	window: Window,
	ctx: CanvasRenderingContext2d,
	state: Rc<RefCell<BackgroundState>>,
	frame_id: Rc<Cell<Option<i32>>>,
	animate: FrameCallback,
	listeners: Vec<Listener>,
}

fn viewport(window: &Window) -> (f64, f64, f64) {
	let dimension = |value: Result<JsValue, JsValue>| value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
	(
		dimension(window.inner_width()),
		dimension(window.inner_height()),
		window.device_pixel_ratio(),
	)
}

fn now(window: &Window) -> f64 {
	window.performance().map(|p| p.now()).unwrap_or(0.0)
}

/// Backing store at device resolution, CSS size at viewport resolution.
fn size_surface(canvas: &HtmlCanvasElement, ctx: &CanvasRenderingContext2d, state: &BackgroundState) {
	let (w, h, dpr) = (state.width, state.height, state.device_pixel_ratio);
	canvas.set_width((w * dpr).round() as u32);
	canvas.set_height((h * dpr).round() as u32);
	let style = canvas.style();
	let _ = style.set_property("width", &format!("{w}px"));
	let _ = style.set_property("height", &format!("{h}px"));
	let _ = ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0);
}

fn paint(window: &Window, ctx: &CanvasRenderingContext2d, state: &RefCell<BackgroundState>) {
	state.borrow_mut().frame(now(window), ctx);
}

pub fn random_seed() -> u64 {
	(js_sys::Math::random() * u64::MAX as f64) as u64
}

impl BackgroundController {
	/// Mounts onto `canvas`. Returns `None` and leaves nothing behind when the
	/// host cannot provide a window or a 2d context.
	pub fn attach(canvas: HtmlCanvasElement, config: BackgroundConfig, seed: u64, reduced_motion: bool) -> Option<Self> {
		match Self::try_attach(canvas, config, seed, reduced_motion) {
			Ok(controller) => Some(controller),
			Err(err) => {
				warn!("background not started: {err}");
				None
			}
		}
	}

	fn try_attach(
		canvas: HtmlCanvasElement,
		config: BackgroundConfig,
		seed: u64,
		reduced_motion: bool,
	) -> Result<Self, AttachError> {
		let window = web_sys::window().ok_or(AttachError::NoWindow)?;
		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|ctx| ctx.dyn_into().ok())
			.ok_or(AttachError::NoContext)?;

		let (w, h, dpr) = viewport(&window);
		let mut state = BackgroundState::new(config, seed, w, h, reduced_motion);
		state.device_pixel_ratio = state.config.device_pixel_ratio(dpr);
		size_surface(&canvas, &ctx, &state);
		let state = Rc::new(RefCell::new(state));
		paint(&window, &ctx, &state);

		let mut controller = Self {
			window: window.clone(),
			ctx: ctx.clone(),
			state: state.clone(),
			frame_id: Rc::new(Cell::new(None)),
			animate: Rc::new(RefCell::new(None)),
			listeners: Vec::new(),
		};

		let (win, surface, cx, st) = (window.clone(), canvas.clone(), ctx.clone(), state.clone());
		let on_resize = move |_: Event| {
			let (w, h, dpr) = viewport(&win);
			{
				let mut s = st.borrow_mut();
				s.resize(w, h, dpr);
				size_surface(&surface, &cx, &s);
				debug!("scene rebuilt for {w}x{h}: {:?}", s.scene.counts());
			}
			paint(&win, &cx, &st);
		};

		let (win, cx, st) = (window.clone(), ctx.clone(), state.clone());
		let on_pointer_move = move |ev: Event| {
			let Some(ev) = ev.dyn_ref::<MouseEvent>() else {
				return;
			};
			let request = st.borrow_mut().pointer_move(ev.client_x() as f64, ev.client_y() as f64);
			if request == FrameRequest::PaintNow {
				paint(&win, &cx, &st);
			}
		};

		let (win, cx, st) = (window.clone(), ctx.clone(), state.clone());
		let on_pointer_leave = move |_: Event| {
			if st.borrow_mut().pointer_leave() == FrameRequest::PaintNow {
				paint(&win, &cx, &st);
			}
		};

		let leave_target: EventTarget = window
			.document()
			.and_then(|doc| doc.document_element())
			.map(Into::into)
			.unwrap_or_else(|| window.clone().into());

		// On failure `controller` drops here and unsubscribes what it has.
		controller.listeners.push(Listener::subscribe(window.clone().into(), "resize", on_resize)?);
		controller
			.listeners
			.push(Listener::subscribe(window.clone().into(), "pointermove", on_pointer_move)?);
		controller
			.listeners
			.push(Listener::subscribe(leave_target, "pointerleave", on_pointer_leave)?);

		if state.borrow().mode() == LoopMode::Looping {
			controller.start_loop();
		}
		let counts = state.borrow().scene.counts();
		debug!("background attached ({:?}, {w}x{h} @{dpr}): {counts:?}", state.borrow().mode());
		Ok(controller)
	}

	fn start_loop(&mut self) {
		if self.frame_id.get().is_some() {
			return;
		}
		let (win, cx, st) = (self.window.clone(), self.ctx.clone(), self.state.clone());
		let (frame_id, animate_inner) = (self.frame_id.clone(), self.animate.clone());
		*self.animate.borrow_mut() = Some(Closure::new(move |timestamp: f64| {
			frame_id.set(None);
			st.borrow_mut().frame(timestamp, &cx);
			if st.borrow().mode() != LoopMode::Looping {
				return;
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				frame_id.set(win.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
			}
		}));
		if let Some(ref cb) = *self.animate.borrow() {
			self.frame_id
				.set(self.window.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
		}
	}

	fn stop_loop(&mut self) {
		if let Some(id) = self.frame_id.take() {
			let _ = self.window.cancel_animation_frame(id);
		}
		self.animate.borrow_mut().take();
	}

	/// Live switch between the looping and static modes.
	pub fn set_reduced_motion(&mut self, reduced_motion: bool) {
		if !self.state.borrow_mut().set_reduced_motion(reduced_motion) {
			return;
		}
		let mode = self.state.borrow().mode();
		info!("background motion preference changed: {mode:?}");
		match mode {
			LoopMode::Static => {
				self.stop_loop();
				paint(&self.window, &self.ctx, &self.state);
			}
			LoopMode::Looping => self.start_loop(),
		}
	}

	pub fn mode(&self) -> LoopMode {
		self.state.borrow().mode()
	}

	/// Frames painted since attach.
	pub fn frames(&self) -> u64 {
		self.state.borrow().frames
	}

	pub fn is_looping(&self) -> bool {
		self.frame_id.get().is_some()
	}

	/// Cancels the pending frame and removes every listener. Idempotent.
	pub fn detach(&mut self) {
		self.stop_loop();
		let listeners = self.listeners.len();
		for listener in self.listeners.drain(..) {
			listener.unsubscribe();
		}
		if listeners > 0 {
			debug!("background detached after {} frames", self.frames());
		}
	}
}

impl Drop for BackgroundController {
	fn drop(&mut self) {
		self.detach();
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn attach_errors_read_as_log_lines() {
		assert_eq!(AttachError::NoWindow.to_string(), "no window available");
		assert_eq!(AttachError::NoContext.to_string(), "canvas has no 2d context");
		assert_eq!(
			AttachError::Listener("pointermove").to_string(),
			"could not subscribe to `pointermove`"
		);
	}
}
