use crate::core::Dimensions;

/// Registered host or container listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Pending animation frame request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Output element a render surface draws into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OutputId(pub u64);

/// Container bounds in host (client) coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn from_dimensions(dims: Dimensions) -> Self {
        Self::new(0.0, 0.0, dims.width as f32, dims.height as f32)
    }
}

/// Pointer position in host (client) coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub client_x: f32,
    pub client_y: f32,
}

impl PointerEvent {
    pub fn new(client_x: f32, client_y: f32) -> Self {
        Self { client_x, client_y }
    }
}

/// Element that hosts the render output and receives pointer movement
pub trait Container {
    /// False until the element is mounted in the host
    fn is_attached(&self) -> bool;

    /// Client size in physical pixels, zero when the host has not laid it out
    fn client_size(&self) -> Dimensions;

    fn bounding_rect(&self) -> Rect;

    fn append_output(&mut self, output: OutputId);

    fn contains_output(&self, output: OutputId) -> bool;

    fn remove_output(&mut self, output: OutputId);

    fn add_pointer_listener(&mut self) -> ListenerId;

    fn remove_pointer_listener(&mut self, id: ListenerId);
}

/// Window-level services: size, resize notifications and frame scheduling
pub trait Host {
    fn window_size(&self) -> Dimensions;

    fn add_resize_listener(&mut self) -> ListenerId;

    fn remove_resize_listener(&mut self, id: ListenerId);

    /// Ask for one callback before the next repaint
    fn request_animation_frame(&mut self) -> FrameHandle;

    fn cancel_animation_frame(&mut self, handle: FrameHandle);
}
