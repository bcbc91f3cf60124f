use std::ffi::c_void;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::coords::SurfaceSize;

/// Opaque resource-loading handle lent to the engine at creation.
///
/// Owned by the window; the engine only borrows it and must not use it past
/// its own destroy. `raw` is forwarded untouched to native engines (it may be
/// null). `root`, when set, lets Rust engines read named assets directly.
#[derive(Debug, Clone)]
pub struct AssetContext {
    raw: *mut c_void,
    root: Option<PathBuf>,
}

// The handle is never dereferenced by the bridge. The window guarantees it
// stays valid for the engine's lifetime, which the lifecycle bounds.
unsafe impl Send for AssetContext {}
unsafe impl Sync for AssetContext {}

impl AssetContext {
    /// Wraps a platform handle (e.g. a native asset manager pointer).
    pub fn from_raw(raw: *mut c_void) -> Self {
        Self { raw, root: None }
    }

    /// Asset context backed by a directory.
    pub fn from_dir(root: impl Into<PathBuf>) -> Self {
        Self {
            raw: std::ptr::null_mut(),
            root: Some(root.into()),
        }
    }

    #[inline]
    pub fn as_raw(&self) -> *mut c_void {
        self.raw
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Reads a named asset in full.
    pub fn read(&self, name: &str) -> Result<Vec<u8>> {
        let root = self
            .root
            .as_ref()
            .with_context(|| format!("asset context has no directory to read {name:?} from"))?;

        let path = root.join(name);
        std::fs::read(&path).with_context(|| format!("failed to read asset {}", path.display()))
    }
}

/// Drawable surface description captured once by the window.
#[derive(Debug, Clone)]
pub struct SurfaceDescriptor {
    pub width: i32,
    pub height: i32,
    pub assets: Option<AssetContext>,
}

impl SurfaceDescriptor {
    pub fn new(size: SurfaceSize) -> Self {
        Self {
            width: size.width,
            height: size.height,
            assets: None,
        }
    }

    pub fn with_assets(mut self, assets: AssetContext) -> Self {
        self.assets = Some(assets);
        self
    }

    #[inline]
    pub fn size(&self) -> SurfaceSize {
        SurfaceSize::new(self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_asset_from_directory() {
        let dir = std::env::temp_dir().join(format!("tether-assets-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("hello.txt"), b"hi").unwrap();

        let assets = AssetContext::from_dir(&dir);
        assert_eq!(assets.read("hello.txt").unwrap(), b"hi");
        assert!(assets.read("missing.bin").is_err());
        assert!(assets.as_raw().is_null());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn raw_context_cannot_read_by_name() {
        let assets = AssetContext::from_raw(std::ptr::null_mut());
        let err = assets.read("anything").unwrap_err();
        assert!(err.to_string().contains("no directory"));
    }
}
