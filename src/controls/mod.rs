//! Camera controls
//!
//! - [`Input`]: per-frame pointer state accumulated from host events
//! - [`TrackballControls`]: rotate, zoom and pan of the camera pose

pub mod input;
pub mod trackball;

pub use input::{Input, MouseButton};
pub use trackball::TrackballControls;
