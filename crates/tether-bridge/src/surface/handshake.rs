use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use state::InitCell;

use crate::coords::SurfaceSize;

use super::descriptor::{AssetContext, SurfaceDescriptor};

/// Which arguments the engine's create entry point takes.
///
/// All three are variants of one contract: the descriptor is still captured
/// once, but only the configured part of it is passed along.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum HandshakeMode {
    /// Create takes nothing; the engine queries its graphics context.
    SelfSized,
    /// Create takes `(width, height)`.
    #[default]
    Sized,
    /// Create takes `(width, height, assets)`.
    SizedWithAssets,
}

/// Arguments handed to `Engine::create`.
#[derive(Debug, Clone)]
pub enum CreateArgs {
    Unsized,
    Sized(SurfaceSize),
    SizedWithAssets(SurfaceSize, AssetContext),
}

impl CreateArgs {
    pub fn size(&self) -> Option<SurfaceSize> {
        match self {
            CreateArgs::Unsized => None,
            CreateArgs::Sized(size) | CreateArgs::SizedWithAssets(size, _) => Some(*size),
        }
    }

    pub fn assets(&self) -> Option<&AssetContext> {
        match self {
            CreateArgs::SizedWithAssets(_, assets) => Some(assets),
            _ => None,
        }
    }
}

/// One-shot transfer of the surface description from window to engine.
///
/// `capture` runs on the UI thread before the render surface is attached;
/// `deliver` runs inside the render thread's creation callback and yields the
/// create arguments exactly once. The descriptor stays readable afterwards.
pub struct SurfaceHandshake {
    mode: HandshakeMode,
    descriptor: InitCell<SurfaceDescriptor>,
    delivered: AtomicBool,
}

impl SurfaceHandshake {
    pub fn new(mode: HandshakeMode) -> Self {
        Self {
            mode,
            descriptor: InitCell::new(),
            delivered: AtomicBool::new(false),
        }
    }

    #[inline]
    pub fn mode(&self) -> HandshakeMode {
        self.mode
    }

    /// Same handshake under another mode; a captured descriptor is kept.
    pub(crate) fn with_mode(mut self, mode: HandshakeMode) -> Self {
        self.mode = mode;
        self
    }

    /// Stores the descriptor. Returns false if one was already captured or the
    /// size is not strictly positive; the first valid capture wins.
    pub fn capture(&self, descriptor: SurfaceDescriptor) -> bool {
        if !descriptor.size().is_valid() {
            log::warn!(
                "ignoring surface capture with invalid size {}x{}",
                descriptor.width,
                descriptor.height
            );
            return false;
        }

        let (w, h) = (descriptor.width, descriptor.height);
        if self.descriptor.set(descriptor) {
            log::debug!("surface captured: {w}x{h}");
            true
        } else {
            log::debug!("surface already captured; ignoring {w}x{h}");
            false
        }
    }

    /// The captured descriptor, if any.
    pub fn descriptor(&self) -> Option<&SurfaceDescriptor> {
        self.descriptor.try_get()
    }

    pub fn is_delivered(&self) -> bool {
        self.delivered.load(Ordering::Acquire)
    }

    /// Yields the create arguments for the configured mode, at most once.
    ///
    /// Sized modes return `None` until a descriptor has been captured, without
    /// consuming the handshake. Every call after a successful delivery
    /// returns `None`.
    pub fn deliver(&self) -> Option<CreateArgs> {
        let args = match self.mode {
            HandshakeMode::SelfSized => CreateArgs::Unsized,
            HandshakeMode::Sized => CreateArgs::Sized(self.descriptor()?.size()),
            HandshakeMode::SizedWithAssets => {
                let d = self.descriptor()?;
                match &d.assets {
                    Some(assets) => CreateArgs::SizedWithAssets(d.size(), assets.clone()),
                    None => {
                        log::warn!("asset handle missing from surface; creating with size only");
                        CreateArgs::Sized(d.size())
                    }
                }
            }
        };

        self.delivered
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| args)
    }
}

impl fmt::Debug for SurfaceHandshake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SurfaceHandshake")
            .field("mode", &self.mode)
            .field("descriptor", &self.descriptor())
            .field("delivered", &self.is_delivered())
            .finish()
    }
}

impl Default for SurfaceHandshake {
    fn default() -> Self {
        Self::new(HandshakeMode::default())
    }
}
