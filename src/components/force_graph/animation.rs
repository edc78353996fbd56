use std::cell::{Cell, RefCell};
use std::rc::Rc;

use js_sys::Function;
use wasm_bindgen::prelude::*;

use super::error::GraphError;

/// A self-rescheduling `requestAnimationFrame` loop.
///
/// The frame callback holds a handle to its own closure so it can request the
/// next frame. [`AnimationLoop::stop`] cancels the pending frame and drops the
/// closure, which breaks that cycle.
#[derive(Clone, Default)]
pub struct AnimationLoop {
	callback: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
	handle: Rc<Cell<Option<i32>>>,
}

impl AnimationLoop {
	/// Request the first frame; `frame` then runs once per frame until [`stop`](Self::stop).
	pub fn start(&self, mut frame: impl FnMut() + 'static) -> Result<(), GraphError> {
		let (callback, handle) = (self.callback.clone(), self.handle.clone());
		*self.callback.borrow_mut() = Some(Closure::new(move || {
			handle.set(None);
			frame();
			if let Some(ref cb) = *callback.borrow() {
				match request_frame(cb) {
					Ok(id) => handle.set(Some(id)),
					Err(e) => log::error!("animation stopped: {e}"),
				}
			}
		}));

		if let Some(ref cb) = *self.callback.borrow() {
			self.handle.set(Some(request_frame(cb)?));
		}
		Ok(())
	}

	/// Cancel the pending frame and release the callback.
	pub fn stop(&self) {
		if let Some(id) = self.handle.take() {
			if let Some(window) = web_sys::window() {
				let _ = window.cancel_animation_frame(id);
			}
		}
		self.callback.borrow_mut().take();
	}
}

fn request_frame(cb: &Closure<dyn FnMut()>) -> Result<i32, GraphError> {
	let window = web_sys::window().ok_or(GraphError::NoWindow)?;
	let function: &Function = cb.as_ref().unchecked_ref();
	Ok(window.request_animation_frame(function)?)
}
