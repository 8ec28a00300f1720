//! Screen modules for the debug view and popups.

mod debug;
mod popup;

pub use debug::{DebugInfo, draw_debug_page};
pub use popup::draw_popup;
