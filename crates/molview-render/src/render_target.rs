//! The seam between camera modes and the graphics backend.

/// Which drawing buffer a view is rendered into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawBuffer {
    /// The single back buffer of mono rendering.
    Mono,
    /// Left-eye buffer of sequential stereo.
    Left,
    /// Right-eye buffer of sequential stereo.
    Right,
}

/// Something that can be drawn into, one camera view at a time.
///
/// Implemented by the renderer; camera modes only choose buffers.
pub trait RenderTarget {
    /// Directs subsequent drawing to `buffer`.
    fn select_buffer(&mut self, buffer: DrawBuffer);
}
