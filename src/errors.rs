//! Error Types
//!
//! This module defines the error type used by the viewer.
//!
//! # Overview
//!
//! Almost every viewer operation absorbs degenerate input as a no-op (empty
//! bounding boxes, picks that miss, unknown preset names, stale background
//! loads). The failures that do surface are limited to:
//! - Scene-description payload and settings decoding
//! - Background image loads reported by the host
//! - Malformed face or edge geometry inside a payload
//! - Strict lookups by name
//!
//! # Usage
//!
//! ```rust,ignore
//! use solidview::errors::{ViewerError, Result};
//!
//! fn load(viewer: &mut Viewer, json: &str) -> Result<()> {
//!     viewer.update_shape_object_json(json)?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// The main error type for the viewer.
#[derive(Error, Debug)]
pub enum ViewerError {
    // ========================================================================
    // Payload Errors
    // ========================================================================
    /// The scene description could not be decoded.
    #[error("Payload parse error: {0}")]
    Payload(#[from] serde_json::Error),

    /// A face or edge entry carries geometry that cannot be built.
    #[error("Invalid mesh '{name}': {reason}")]
    InvalidMesh {
        /// Name of the offending face or edge entry
        name: String,
        /// What is wrong with it
        reason: String,
    },

    /// The settings document could not be decoded.
    #[error("Settings parse error: {0}")]
    Settings(serde_json::Error),

    // ========================================================================
    // Asset Errors
    // ========================================================================
    /// The host failed to load or decode a background image.
    #[error("Background '{url}' failed to load: {reason}")]
    BackgroundLoad {
        /// Requested image
        url: String,
        /// Host-reported cause
        reason: String,
    },

    // ========================================================================
    // Lookup Errors
    // ========================================================================
    /// No node with the given name exists under the searched root.
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    /// The preset view name is not one of the recognised names.
    #[error("Unknown preset view: {0}")]
    UnknownPresetView(String),
}

/// Alias for `Result<T, ViewerError>`.
pub type Result<T> = std::result::Result<T, ViewerError>;
