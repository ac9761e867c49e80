pub mod display;
pub mod renderer;

pub use display::DisplayState;
pub use renderer::DerivedViewRenderer;

/// Board widget capability: the visual board follows the session, never the reverse
pub trait BoardWidget {
    fn set_position(&mut self, fen: &str);
    fn reset_to_start(&mut self);
    /// Return a dropped piece to its origin square
    fn snapback(&mut self, from: &str, to: &str);
}
