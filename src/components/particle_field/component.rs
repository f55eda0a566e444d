//! Leptos component wrapping the particle field canvas.
//!
//! The component creates an HTML canvas element and forwards pointer, click,
//! resize and scroll events to the simulator as method calls. An animation
//! loop runs via `requestAnimationFrame`, updating and rendering the field
//! each frame until the component is unmounted.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::info;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, Window};

use super::config::FieldConfig;
use super::frame::{FrameLoop, FrameScheduler};
use super::render;
use super::state::ParticleField;

type Callback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Simulator plus the frame bookkeeping that drives it.
struct FieldContext {
	field: ParticleField,
	frames: FrameLoop,
}

/// Schedules frames on the browser window.
struct WindowScheduler<'a> {
	window: &'a Window,
	callback: Option<&'a Closure<dyn FnMut()>>,
}

impl FrameScheduler for WindowScheduler<'_> {
	fn request_frame(&self) -> Option<i32> {
		let callback = self.callback?;
		self.window
			.request_animation_frame(callback.as_ref().unchecked_ref())
			.ok()
	}

	fn cancel_frame(&self, handle: i32) {
		let _ = self.window.cancel_animation_frame(handle);
	}
}

/// Everything the cleanup handler must reach.
#[derive(Clone)]
struct FieldHandles {
	context: Rc<RefCell<Option<FieldContext>>>,
	animate: Callback,
	resize_cb: Callback,
	scroll_cb: Callback,
}

impl FieldHandles {
	fn schedule_next(&self, window: &Window) {
		let animate = self.animate.borrow();
		if let Some(ref mut c) = *self.context.borrow_mut() {
			c.frames.schedule(&WindowScheduler {
				window,
				callback: animate.as_ref(),
			});
		}
	}

	/// Cancel the pending frame, detach window listeners and drop the particles.
	fn teardown(&self) {
		let Some(window) = web_sys::window() else {
			return;
		};

		if let Some(ref mut c) = *self.context.borrow_mut() {
			let animate = self.animate.borrow();
			c.frames.stop(&WindowScheduler {
				window: &window,
				callback: animate.as_ref(),
			});
			c.field.teardown();
		}

		detach(&window, "resize", &self.resize_cb);
		detach(&window, "scroll", &self.scroll_cb);

		// The frame closure holds a handle to itself
		self.animate.borrow_mut().take();
	}

	/// Attach or detach the scroll listener so it matches `fade_on_scroll`,
	/// then set the canvas opacity for the current scroll position.
	fn sync_scroll_fade(&self, window: &Window, canvas: &HtmlCanvasElement, fade_on_scroll: bool) {
		apply_opacity(window, canvas, fade_on_scroll);
		let attached = self.scroll_cb.borrow().is_some();
		if fade_on_scroll && !attached {
			let canvas = canvas.clone();
			let cb: Closure<dyn FnMut()> = Closure::new(move || {
				if let Some(win) = web_sys::window() {
					apply_opacity(&win, &canvas, true);
				}
			});
			let _ = window.add_event_listener_with_callback("scroll", cb.as_ref().unchecked_ref());
			*self.scroll_cb.borrow_mut() = Some(cb);
		} else if !fade_on_scroll && attached {
			detach(window, "scroll", &self.scroll_cb);
		}
	}
}

fn detach(window: &Window, event: &str, slot: &Callback) {
	if let Some(cb) = slot.borrow_mut().take() {
		let function: &js_sys::Function = cb.as_ref().unchecked_ref();
		let _ = window.remove_event_listener_with_callback(event, function);
	}
}

/// Opacity of a field that fades in as the page scrolls.
///
/// Hidden for the first half viewport of scrolling, then ramps linearly to
/// fully visible over the next 0.3 viewport.
pub fn scroll_fade(scroll_y: f64, viewport_height: f64) -> f64 {
	let start = viewport_height * 0.5;
	let span = viewport_height * 0.3;
	if scroll_y <= start || span <= 0.0 {
		return 0.0;
	}
	((scroll_y - start) / span).min(1.0)
}

fn measure(window: &Window, canvas: &HtmlCanvasElement, fullscreen: bool) -> (f64, f64) {
	if fullscreen {
		let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
		(dim(window.inner_width()), dim(window.inner_height()))
	} else {
		canvas
			.parent_element()
			.map(|p| (p.client_width() as f64, p.client_height() as f64))
			.unwrap_or((800.0, 600.0))
	}
}

/// Canvas opacity for the current scroll position. Fully visible unless the
/// field fades in on scroll.
fn field_opacity(fade_on_scroll: bool, scroll_y: f64, viewport_height: f64) -> f64 {
	if fade_on_scroll {
		scroll_fade(scroll_y, viewport_height)
	} else {
		1.0
	}
}

fn apply_opacity(window: &Window, canvas: &HtmlCanvasElement, fade_on_scroll: bool) {
	let scroll_y = window.scroll_y().unwrap_or(0.0);
	let viewport = window
		.inner_height()
		.ok()
		.and_then(|v| v.as_f64())
		.unwrap_or(0.0);
	let opacity = field_opacity(fade_on_scroll, scroll_y, viewport);
	// Leptos' `ElementExt::style` shadows the DOM getter on canvas elements
	let _ = web_sys::HtmlElement::style(canvas).set_property("opacity", &opacity.to_string());
}

fn pointer_position(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Renders an animated particle field on a canvas element.
///
/// The canvas sizes itself to its parent container by default; set
/// `fullscreen = true` to fill the viewport. Either way the particle set is
/// regenerated whenever the window is resized.
#[component]
pub fn ParticleFieldCanvas(
	#[prop(into)] config: Signal<FieldConfig>,
	#[prop(default = false)] fullscreen: bool,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let handles = FieldHandles {
		context: Rc::new(RefCell::new(None)),
		animate: Rc::new(RefCell::new(None)),
		resize_cb: Rc::new(RefCell::new(None)),
		scroll_cb: Rc::new(RefCell::new(None)),
	};
	let context = handles.context.clone();
	let handles_init = handles.clone();

	Effect::new(move |_| {
		let config = config.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = measure(&window, &canvas, fullscreen);
		handles_init.sync_scroll_fade(&window, &canvas, config.fade_on_scroll);

		// Config changed after the loop started: swap the field, keep the loop
		if let Some(ref mut c) = *handles_init.context.borrow_mut() {
			c.field = ParticleField::new(config, w, h);
			return;
		}

		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let Some(mut ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|o| o.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			return;
		};

		*handles_init.context.borrow_mut() = Some(FieldContext {
			field: ParticleField::new(config, w, h),
			frames: FrameLoop::new(),
		});

		let (context_resize, canvas_resize) = (handles_init.context.clone(), canvas.clone());
		*handles_init.resize_cb.borrow_mut() = Some(Closure::new(move || {
			let Some(win) = web_sys::window() else {
				return;
			};
			let (nw, nh) = measure(&win, &canvas_resize, fullscreen);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			if let Some(ref mut c) = *context_resize.borrow_mut() {
				c.field.resize(nw, nh);
			}
		}));
		if let Some(ref cb) = *handles_init.resize_cb.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let handles_anim = handles_init.clone();
		*handles_init.animate.borrow_mut() = Some(Closure::new(move || {
			{
				let mut guard = handles_anim.context.borrow_mut();
				let Some(c) = guard.as_mut() else {
					return;
				};
				if !c.frames.begin_frame() {
					return;
				}
				c.field.update();
				render::render(&c.field, &mut ctx);
			}
			if let Some(win) = web_sys::window() {
				handles_anim.schedule_next(&win);
			}
		}));
		handles_init.schedule_next(&window);
		info!("particle-field: animation started ({}x{})", w, h);
	});

	let handles_cleanup = StoredValue::new_local(handles);
	on_cleanup(move || {
		handles_cleanup.try_with_value(FieldHandles::teardown);
	});

	let context_mm = context.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_mm.borrow_mut() {
			c.field.pointer_move(x, y);
		}
	};

	let context_ml = context.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_ml.borrow_mut() {
			c.field.pointer_leave();
		}
	};

	let context_click = context.clone();
	let on_click = move |ev: MouseEvent| {
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_click.borrow_mut() {
			c.field.burst(x, y);
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="particle-field-canvas"
			on:mousemove=on_mousemove
			on:mouseleave=on_mouseleave
			on:click=on_click
			style="display: block;"
		/>
	}
}
