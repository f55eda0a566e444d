//! Animation-frame bookkeeping.
//!
//! Tracks the pending `requestAnimationFrame` handle so teardown can cancel
//! it, and refuses to schedule anything once stopped.

/// Source of animation-frame callbacks.
pub trait FrameScheduler {
	/// Request the next frame. Returns the handle, or `None` if the host refused.
	fn request_frame(&self) -> Option<i32>;
	/// Cancel a previously requested frame.
	fn cancel_frame(&self, handle: i32);
}

#[derive(Clone, Debug, Default)]
pub struct FrameLoop {
	pending: Option<i32>,
	stopped: bool,
}

impl FrameLoop {
	pub fn new() -> Self {
		Self::default()
	}

	/// Ask for the next frame unless stopped or one is already pending.
	pub fn schedule<S: FrameScheduler>(&mut self, scheduler: &S) {
		if self.stopped || self.pending.is_some() {
			return;
		}
		self.pending = scheduler.request_frame();
	}

	/// Called at the top of a frame callback. Returns whether the frame should run.
	pub fn begin_frame(&mut self) -> bool {
		self.pending = None;
		!self.stopped
	}

	/// Cancel the pending frame and refuse all later requests.
	pub fn stop<S: FrameScheduler>(&mut self, scheduler: &S) {
		self.stopped = true;
		if let Some(handle) = self.pending.take() {
			scheduler.cancel_frame(handle);
		}
	}

	pub fn is_stopped(&self) -> bool {
		self.stopped
	}

	pub fn pending(&self) -> Option<i32> {
		self.pending
	}
}
