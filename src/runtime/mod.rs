//! Runtime module - winit/platform integration
//!
//! - `app` - ApplicationHandler and window management
//! - `input` - Keyboard event to action mapping
//! - `mouse` - Click counting, wheel deltas and cursor shapes

pub mod app;
pub mod input;
pub mod mouse;

pub use app::App;
