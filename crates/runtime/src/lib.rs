pub mod benchmark;
pub mod logging;
pub mod replay;
pub mod session;

pub use session::{run_logged, try_run_logged};

/// Steps per second the engine is expected to sustain on one core.
pub const TARGET_STEPS_PER_SEC: u64 = 10_000_000;

pub fn module_ready() -> bool {
    true
}
