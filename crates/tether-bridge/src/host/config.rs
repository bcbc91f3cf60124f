use std::time::Duration;

use crate::lifecycle::FaultPolicy;
use crate::surface::HandshakeMode;

/// Bridge configuration shared by hosts.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Which arguments the engine's create entry point receives. Engines
    /// that declare their own mode override this.
    pub handshake: HandshakeMode,

    /// Draw tick pacing on the render thread.
    pub frame_interval: Duration,

    /// Reaction to a panic inside the engine.
    pub on_fault: FaultPolicy,
}

impl BridgeConfig {
    /// Typical display refresh rate.
    pub const DEFAULT_FPS: u32 = 60;

    /// Sets `frame_interval` from a refresh rate. Zero is treated as 1 Hz.
    pub fn with_fps(mut self, fps: u32) -> Self {
        self.frame_interval = Duration::from_secs(1) / fps.max(1);
        self
    }

    pub fn with_handshake(mut self, handshake: HandshakeMode) -> Self {
        self.handshake = handshake;
        self
    }

    pub fn with_fault_policy(mut self, on_fault: FaultPolicy) -> Self {
        self.on_fault = on_fault;
        self
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            handshake: HandshakeMode::default(),
            frame_interval: Duration::from_secs(1) / Self::DEFAULT_FPS,
            on_fault: FaultPolicy::default(),
        }
    }
}
