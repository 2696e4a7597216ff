use std::sync::Arc;
use winit::window::Window;

use super::window::Dimensions;
use crate::traits::{Container, FrameHandle, Host, ListenerId, OutputId, Rect};

/// Monotonic id allocator that remembers which ids are still live
#[derive(Debug, Default, Clone)]
pub struct HandleRegistry {
    next: u64,
    live: Vec<u64>,
}

impl HandleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh id; ids are never reused
    pub fn issue(&mut self) -> u64 {
        self.next += 1;
        self.live.push(self.next);
        self.next
    }

    /// Returns whether `id` was live
    pub fn release(&mut self, id: u64) -> bool {
        let before = self.live.len();
        self.live.retain(|&live| live != id);
        self.live.len() != before
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Release every live id, oldest first
    pub fn drain(&mut self) -> Vec<u64> {
        std::mem::take(&mut self.live)
    }
}

/// [`Host`] backed by a winit window
///
/// Frame requests turn into `request_redraw`; the event loop collects the
/// due handles with [`WindowHost::take_due_frames`] on `RedrawRequested`.
pub struct WindowHost {
    window: Arc<Window>,
    resize_listeners: HandleRegistry,
    frames: HandleRegistry,
}

impl WindowHost {
    pub fn new(window: Arc<Window>) -> Self {
        Self {
            window,
            resize_listeners: HandleRegistry::new(),
            frames: HandleRegistry::new(),
        }
    }

    pub fn has_resize_listeners(&self) -> bool {
        !self.resize_listeners.is_empty()
    }

    /// Frame requests that have not been cancelled since the last redraw
    pub fn take_due_frames(&mut self) -> Vec<FrameHandle> {
        self.frames.drain().into_iter().map(FrameHandle).collect()
    }
}

impl Host for WindowHost {
    /// Client area of the window; zero while minimized
    fn window_size(&self) -> Dimensions {
        let size = self.window.inner_size();
        Dimensions::new(size.width, size.height)
    }

    fn add_resize_listener(&mut self) -> ListenerId {
        ListenerId(self.resize_listeners.issue())
    }

    fn remove_resize_listener(&mut self, id: ListenerId) {
        self.resize_listeners.release(id.0);
    }

    fn request_animation_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.frames.issue());
        self.window.request_redraw();
        handle
    }

    fn cancel_animation_frame(&mut self, handle: FrameHandle) {
        self.frames.release(handle.0);
    }
}

/// [`Container`] covering the whole client area of a winit window
pub struct WindowContainer {
    window: Arc<Window>,
    outputs: Vec<OutputId>,
    pointer_listeners: HandleRegistry,
}

impl WindowContainer {
    pub fn new(window: Arc<Window>) -> Self {
        Self {
            window,
            outputs: Vec::new(),
            pointer_listeners: HandleRegistry::new(),
        }
    }

    pub fn has_pointer_listeners(&self) -> bool {
        !self.pointer_listeners.is_empty()
    }
}

impl Container for WindowContainer {
    fn is_attached(&self) -> bool {
        true
    }

    fn client_size(&self) -> Dimensions {
        let size = self.window.inner_size();
        Dimensions::new(size.width, size.height)
    }

    fn bounding_rect(&self) -> Rect {
        Rect::from_dimensions(self.client_size())
    }

    fn append_output(&mut self, output: OutputId) {
        if !self.outputs.contains(&output) {
            self.outputs.push(output);
        }
    }

    fn contains_output(&self, output: OutputId) -> bool {
        self.outputs.contains(&output)
    }

    fn remove_output(&mut self, output: OutputId) {
        self.outputs.retain(|&o| o != output);
    }

    fn add_pointer_listener(&mut self) -> ListenerId {
        ListenerId(self.pointer_listeners.issue())
    }

    fn remove_pointer_listener(&mut self, id: ListenerId) {
        self.pointer_listeners.release(id.0);
    }
}
