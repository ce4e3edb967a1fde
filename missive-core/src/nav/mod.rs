//! Message browsing
//!
//! [`machine`] holds the cursor and delete-prompt transitions; [`render`]
//! lays the result out on an 8 x 16 character screen.

pub mod machine;
pub mod render;

pub use machine::{Choice, Cursor, Mode, NavOutcome, Navigator, Redraw};
pub use render::{render_all, render_clock, render_header, render_page};
