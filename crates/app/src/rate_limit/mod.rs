//! In-memory fixed-window rate limiting.
//!
//! Counters live in process memory only: they are lost on restart and are not shared between
//! instances, so a horizontally scaled deployment gets one budget per process.

mod clock;
pub mod keys;
mod limiter;
mod registry;
mod sweeper;

pub use clock::{Clock, ManualClock, SystemClock};
pub use limiter::{RateLimitDecision, RateLimitPolicy, RateLimitStatus, RateLimiter};
pub use registry::{RateLimitSettings, RateLimiters};
pub use sweeper::SweeperHandle;
