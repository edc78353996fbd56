use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use send_wrapper::SendWrapper;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::animation::AnimationLoop;
use super::error::GraphError;
use super::render::{self, GraphStyle};
use super::simulation::SimulationConfig;
use super::state::{ForceGraphState, HoverInfo, ViewConfig};
use super::types::GraphData;

const FRAME_DT: f64 = 0.016;

type SharedState = Rc<RefCell<Option<ForceGraphState>>>;
type ResizeListener = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

fn window() -> Result<Window, GraphError> {
	web_sys::window().ok_or(GraphError::NoWindow)
}

fn window_size(window: &Window) -> Result<(f64, f64), GraphError> {
	let w = window.inner_width()?.as_f64().ok_or(GraphError::NoWindow)?;
	let h = window.inner_height()?.as_f64().ok_or(GraphError::NoWindow)?;
	Ok((w, h))
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, GraphError> {
	canvas
		.get_context("2d")?
		.ok_or(GraphError::NoContext)?
		.dyn_into()
		.map_err(|_| GraphError::NoContext)
}

/// Pointer position relative to the canvas' top-left corner.
fn pointer_position(
	canvas_ref: NodeRef<leptos::html::Canvas>,
	ev: &MouseEvent,
) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get_untracked()?;
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

struct Mount {
	canvas: HtmlCanvasElement,
	data: GraphData,
	fullscreen: bool,
	width: Option<f64>,
	height: Option<f64>,
	style: GraphStyle,
	simulation: SimulationConfig,
	view: ViewConfig,
}

fn mount(
	m: Mount,
	state: &SharedState,
	animation: &AnimationLoop,
	resize: &ResizeListener,
) -> Result<(), GraphError> {
	let win = window()?;
	let (w, h) = if m.fullscreen {
		window_size(&win)?
	} else {
		let parent = m.canvas.parent_element();
		(
			m.width.unwrap_or_else(|| {
				parent
					.as_ref()
					.map(|p| p.client_width() as f64)
					.filter(|w| *w > 0.0)
					.unwrap_or(800.0)
			}),
			m.height.unwrap_or_else(|| {
				parent
					.as_ref()
					.map(|p| p.client_height() as f64)
					.filter(|h| *h > 0.0)
					.unwrap_or(600.0)
			}),
		)
	};
	m.canvas.set_width(w as u32);
	m.canvas.set_height(h as u32);

	let ctx = context_2d(&m.canvas)?;
	*state.borrow_mut() = Some(ForceGraphState::new(&m.data, w, h, m.simulation, m.view));
	log::debug!(
		"graph mounted: {} nodes, {} edges, {}x{}",
		m.data.nodes.len(),
		state.borrow().as_ref().map_or(0, |s| s.graph.edges().len()),
		w,
		h
	);

	if m.fullscreen {
		let (state_resize, canvas_resize) = (state.clone(), m.canvas.clone());
		let listener = Closure::<dyn FnMut()>::new(move || {
			let size = window().and_then(|win| window_size(&win));
			match size {
				Ok((nw, nh)) => {
					canvas_resize.set_width(nw as u32);
					canvas_resize.set_height(nh as u32);
					if let Some(ref mut s) = *state_resize.borrow_mut() {
						s.resize(nw, nh);
					}
				}
				Err(e) => log::warn!("resize ignored: {e}"),
			}
		});
		win.add_event_listener_with_callback("resize", listener.as_ref().unchecked_ref())?;
		*resize.borrow_mut() = Some(listener);
	}

	let (state_anim, style) = (state.clone(), m.style);
	animation.start(move || {
		if let Some(ref mut s) = *state_anim.borrow_mut() {
			if s.animation_running {
				s.tick(FRAME_DT);
			}
			render::render(s, &ctx, style);
		}
	})
}

fn unmount(animation: &AnimationLoop, resize: &ResizeListener) {
	animation.stop();
	if let Some(listener) = resize.borrow_mut().take() {
		if let Some(window) = web_sys::window() {
			let _ = window
				.remove_event_listener_with_callback("resize", listener.as_ref().unchecked_ref());
		}
	}
}

/// Event handler applying `f` to the graph state. The handler owns its own
/// handle to the state.
fn on_state<E>(
	state: &SharedState,
	f: fn(&mut ForceGraphState),
) -> impl FnMut(E) + 'static + use<E> {
	let state = state.clone();
	move |_| {
		if let Some(ref mut s) = *state.borrow_mut() {
			f(s);
		}
	}
}

/// Canvas running a live force layout of `data`, with pan, zoom, drag and hover.
#[component]
pub fn ForceGraphCanvas(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
	#[prop(default = true)] interactive: bool,
	#[prop(default = true)] show_controls: bool,
	#[prop(optional)] style: GraphStyle,
	#[prop(optional)] simulation: SimulationConfig,
	#[prop(optional)] view: ViewConfig,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: SharedState = Rc::new(RefCell::new(None));
	let animation = AnimationLoop::default();
	let resize: ResizeListener = Rc::new(RefCell::new(None));
	let hover = RwSignal::new(None::<HoverInfo>);

	let (state_init, animation_init, resize_init) =
		(state.clone(), animation.clone(), resize.clone());
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let data = data.get();
		let refreshed = state_init
			.borrow_mut()
			.as_mut()
			.is_some_and(|s| s.graph.refresh(&data));
		if refreshed {
			log::debug!("graph data refreshed in place");
			return;
		}
		unmount(&animation_init, &resize_init);
		let m = Mount {
			canvas,
			data,
			fullscreen,
			width,
			height,
			style,
			simulation,
			view,
		};
		if let Err(e) = mount(m, &state_init, &animation_init, &resize_init) {
			log::error!("graph canvas unavailable: {e}");
		}
	});

	let teardown = SendWrapper::new((animation, resize));
	on_cleanup(move || {
		let (animation, resize) = teardown.take();
		unmount(&animation, &resize);
	});

	let publish_hover = move |info: Option<HoverInfo>| {
		if hover.get_untracked() != info {
			hover.set(info);
		}
	};

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = pointer_position(canvas_ref, &ev).filter(|_| interactive) else {
			return;
		};
		if let Some(ref mut s) = *state_md.borrow_mut() {
			s.pointer_down(x, y);
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = pointer_position(canvas_ref, &ev).filter(|_| interactive) else {
			return;
		};
		let info = state_mm.borrow_mut().as_mut().and_then(|s| {
			s.pointer_move(x, y);
			s.hover_info()
		});
		publish_hover(info);
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_mu.borrow_mut() {
			s.pointer_up();
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.pointer_leave();
		}
		publish_hover(None);
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		if !interactive {
			return;
		}
		ev.prevent_default();
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			s.wheel(x, y, ev.delta_y());
		}
	};

	let controls = (interactive && show_controls).then(|| {
		view! {
			<div class="graph-controls">
				<button title="Zoom in" on:click={on_state::<MouseEvent>(&state, ForceGraphState::zoom_in)}>
					"+"
				</button>
				<button title="Zoom out" on:click={on_state::<MouseEvent>(&state, ForceGraphState::zoom_out)}>
					"−"
				</button>
				<button title="Reset view" on:click={on_state::<MouseEvent>(&state, ForceGraphState::reset_view)}>
					"⊙"
				</button>
			</div>
		}
	});

	view! {
		<div class="force-graph">
			<canvas
				node_ref=canvas_ref
				class="force-graph-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				style="display: block; cursor: grab;"
			/>
			{controls}
			{move || {
				hover
					.get()
					.map(|info| {
						view! {
							<div class="graph-info">
								<div class="graph-info-label">{info.label}</div>
								<div class="graph-info-connections">
									{format!("{} connections", info.connections)}
								</div>
							</div>
						}
					})
			}}
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::types::sample_knowledge_graph;

	fn shared_state() -> SharedState {
		Rc::new(RefCell::new(Some(ForceGraphState::new(
			&sample_knowledge_graph(),
			800.0,
			600.0,
			SimulationConfig::default(),
			ViewConfig::default(),
		))))
	}

	fn zoom(state: &SharedState) -> f64 {
		state.borrow().as_ref().map_or(0.0, |s| s.transform.k)
	}

	#[test]
	fn control_handlers_outlive_the_borrowed_state() {
		let observer;
		let (mut zoom_in, mut zoom_out, mut reset) = {
			let state = shared_state();
			observer = state.clone();
			(
				on_state::<()>(&state, ForceGraphState::zoom_in),
				on_state::<()>(&state, ForceGraphState::zoom_out),
				on_state::<()>(&state, ForceGraphState::reset_view),
			)
		};

		zoom_in(());
		assert!((zoom(&observer) - 1.2).abs() < 1e-12);
		zoom_out(());
		zoom_out(());
		assert!((zoom(&observer) - 1.0 / 1.2).abs() < 1e-12);
		reset(());
		assert_eq!(zoom(&observer), 1.0);
	}

	#[test]
	fn handlers_ignore_an_unmounted_canvas() {
		let state: SharedState = Rc::new(RefCell::new(None));
		let mut zoom_in = on_state::<()>(&state, ForceGraphState::zoom_in);
		zoom_in(());
		assert!(state.borrow().is_none());
	}
}
