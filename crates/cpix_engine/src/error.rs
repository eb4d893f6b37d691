//! Unified error types for cpix_engine

use std::path::PathBuf;
use thiserror::Error;

use crate::{LayerId, PaletteKind};

/// Main error type for cpix_engine operations
#[derive(Debug, Error)]
pub enum EngineError {
    // === Reference Errors ===
    #[error("Layer {id} does not exist")]
    InvalidLayer { id: LayerId },

    #[error("Stack index {index} out of range (0..{len})")]
    InvalidStackIndex { index: usize, len: usize },

    #[error("{kind} palette slot {index} is out of range")]
    InvalidPaletteSlot { kind: PaletteKind, index: usize },

    #[error("{kind} palette slot 0 is reserved and can't be changed")]
    ProtectedSlot { kind: PaletteKind },

    #[error("Invalid palette edit: {message}")]
    InvalidPaletteEdit { message: String },

    #[error("Font '{name}' is not registered")]
    UnknownFont { name: String },

    #[error("Brush {index} out of range (0..{len})")]
    InvalidBrush { index: usize, len: usize },

    // === Capacity Errors ===
    #[error("{kind} palette is full ({capacity} slots)")]
    PaletteExhausted { kind: PaletteKind, capacity: usize },

    #[error("Font registry is full ({capacity} fonts)")]
    FontRegistryFull { capacity: usize },

    // === Geometry Errors ===
    #[error("Geometry mismatch: {message}")]
    GeometryMismatch { message: String },

    #[error("Invalid dimensions: {message}")]
    InvalidDimensions { message: String },

    // === Value Errors ===
    #[error("Invalid hex color: {value}")]
    InvalidHexColor { value: String },

    // === Persistence Errors ===
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read project '{path}': {message}")]
    ReadProject { path: PathBuf, message: String },

    #[error("Unsupported project version {version} (expected <= {supported})")]
    UnsupportedVersion { version: u32, supported: u32 },

    #[error("Project data error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for cpix_engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

// === Convenience constructors ===
impl EngineError {
    pub fn geometry(msg: impl Into<String>) -> Self {
        Self::GeometryMismatch { message: msg.into() }
    }

    pub fn dimensions(msg: impl Into<String>) -> Self {
        Self::InvalidDimensions { message: msg.into() }
    }

    pub fn palette_edit(msg: impl Into<String>) -> Self {
        Self::InvalidPaletteEdit { message: msg.into() }
    }
}
