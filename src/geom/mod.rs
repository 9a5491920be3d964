//! Geometry Module
//!
//! - [`BoundingBox`]: axis-aligned box with an explicit empty state
//! - [`Ray`]: ray with triangle, box, plane and segment queries
//! - [`tools`]: subtree bounding volumes, center of gravity and helper layouts

pub mod bounding_box;
pub mod ray;
pub mod tools;

pub use bounding_box::BoundingBox;
pub use ray::{Ray, SegmentApproach};
pub use tools::{bounding_box, bounding_box_local, center_of_gravity, gizmo_corners};
