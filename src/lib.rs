#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod controls;
pub mod errors;
pub mod framing;
pub mod geom;
pub mod helpers;
pub mod interaction;
pub mod picking;
pub mod scene;
pub mod selection;
pub mod settings;
pub mod shape;
pub mod viewer;

pub use controls::{Input, TrackballControls};
pub use errors::{Result, ViewerError};
pub use framing::{CameraFramingController, PresetView};
pub use geom::{BoundingBox, Ray};
pub use interaction::InteractionMode;
pub use picking::{HitRecord, PickingResolver, PointerEvent, PointerEventKind, SurfaceRect};
pub use scene::{Camera, CameraPose, Node, NodeHandle, NodeRole, Scene};
pub use selection::{SelectionChange, SelectionState};
pub use settings::{ControlSettings, ViewerSettings};
pub use shape::ShapePayload;
pub use viewer::{FocusTarget, RedrawFlags, RenderBackend, SceneLayer, Viewer};
