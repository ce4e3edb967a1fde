//! Embassy async tasks
//!
//! Each task loops over one step function from `missive_core::tasks`. Waits
//! are bounded by the configured liveness timeout so a stalled producer shows
//! up in the log instead of as a silent hang.

pub mod clock;
pub mod display;
pub mod navigation;
pub mod receive;
pub mod tick;

pub use clock::clock_task;
pub use display::display_task;
pub use navigation::navigation_task;
pub use receive::receive_task;
pub use tick::tick_task;
