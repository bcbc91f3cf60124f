use crate::coords::Viewport;

/// Render-thread graphics context, as far as the bridge needs it.
///
/// The bridge holds no viewport state; it forwards geometry changes here.
pub trait GraphicsContext {
    fn set_viewport(&mut self, viewport: Viewport);
}

impl<F> GraphicsContext for F
where
    F: FnMut(Viewport),
{
    fn set_viewport(&mut self, viewport: Viewport) {
        self(viewport)
    }
}
