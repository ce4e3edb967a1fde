//! Task step functions
//!
//! Each firmware task is a `loop` around one wait and one step. The waits
//! and steps live here, generic over the raw mutex, so they run on the host
//! under `NoopRawMutex`. The firmware only adds the executor, timeouts and
//! logging around them.

pub mod clock;
pub mod navigation;
pub mod receive;
pub mod tick;

pub use clock::{clock_step, wait_clock, ClockTrigger};
pub use navigation::{navigation_step, wait_navigation, NavReport, NavTrigger, NavigationState};
pub use receive::{interrupt_step, receive_step, wait_message_ready, ReceiveReport};
pub use tick::tick_step;
