/// Drawable surface size in physical pixels.
///
/// Signed to match the `int32` arguments of native create entry points.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct SurfaceSize {
    pub width: i32,
    pub height: i32,
}

impl SurfaceSize {
    #[inline]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// True when both dimensions are strictly positive.
    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Viewport rectangle issued to the graphics context.
///
/// The bridge only ever issues full-surface viewports (`x = y = 0`), but the
/// rectangle is kept general so contexts can forward it verbatim.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct Viewport {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Viewport {
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Full-surface viewport anchored at the origin.
    #[inline]
    pub const fn full(size: SurfaceSize) -> Self {
        Self::new(0, 0, size.width, size.height)
    }

    #[inline]
    pub fn size(self) -> SurfaceSize {
        SurfaceSize::new(self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_viewport_starts_at_origin() {
        let vp = Viewport::full(SurfaceSize::new(1080, 1920));
        assert_eq!(vp, Viewport::new(0, 0, 1080, 1920));
        assert_eq!(vp.size(), SurfaceSize::new(1080, 1920));
    }

    #[test]
    fn zero_or_negative_size_is_invalid() {
        assert!(!SurfaceSize::new(0, 10).is_valid());
        assert!(!SurfaceSize::new(10, -1).is_valid());
        assert!(SurfaceSize::new(1, 1).is_valid());
    }
}
