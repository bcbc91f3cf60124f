//! Render lifecycle.
//!
//! State machine that sequences engine create/update/destroy against the
//! surface and window lifecycles delivered by the host.

mod fault;
mod gfx;
mod machine;
mod state;

pub use fault::FaultPolicy;
pub use gfx::GraphicsContext;
pub use machine::RenderLifecycle;
pub use state::LifecycleState;
