//! Sliding Sample Window
//!
//! Fixed-capacity FIFO of recent samples used to damp per-frame jitter.

mod window;

pub use window::SlidingWindow;

/// Default window capacity (8 frames, ~0.5 s at 15 fps)
pub const DEFAULT_CAPACITY: usize = 8;
