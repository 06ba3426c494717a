//! Error types for optistrip.
//!
//! This module defines all error types used throughout the library.

use std::path::PathBuf;
use thiserror::Error;

use crate::milp::SolveError;

/// Result type alias using [`StripError`].
pub type Result<T> = std::result::Result<T, StripError>;

/// Errors that can occur while building triangle strips.
#[derive(Error, Debug)]
pub enum StripError {
    /// The index buffer length is not a multiple of three.
    #[error("index count {len} is not a multiple of 3")]
    InvalidIndexCount {
        /// Length of the index buffer.
        len: usize,
    },

    /// A triangle uses the same vertex more than once.
    #[error("triangle {triangle} is degenerate (has duplicate vertices)")]
    DegenerateTriangle {
        /// The triangle index.
        triangle: usize,
    },

    /// An edge has more than two incident triangles.
    #[error("edge ({v0}, {v1}) has more than two incident triangles")]
    NonManifoldEdge {
        /// Smaller vertex of the edge.
        v0: u32,
        /// Larger vertex of the edge.
        v1: u32,
    },

    /// A face references a vertex that does not exist.
    #[error("face {face} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The face index.
        face: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// The solving backend did not certify an optimal solution.
    #[error("solver failed: {0}")]
    Solve(#[from] SolveError),

    /// The solved edge selection is not a linear forest.
    #[error("model consistency violated at triangle {triangle}: {details}")]
    ModelConsistency {
        /// The triangle where the violation was detected.
        triangle: usize,
        /// Description of the violation.
        details: String,
    },

    /// The backend tolerance is too coarse for the anti-cycle slack.
    #[error("solver feasibility tolerance {tolerance} is not tighter than cycle slack {slack}")]
    ToleranceTooLoose {
        /// Tolerance reported by the backend.
        tolerance: f64,
        /// Configured cycle slack.
        slack: f64,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error loading mesh from file.
    #[error("failed to load mesh from {path}: {message}")]
    LoadError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Unsupported file format.
    #[error("unsupported file format: {extension}")]
    UnsupportedFormat {
        /// The file extension.
        extension: String,
    },
}

impl StripError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        StripError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }

    /// Create a model consistency error.
    pub fn consistency(triangle: usize, details: impl Into<String>) -> Self {
        StripError::ModelConsistency {
            triangle,
            details: details.into(),
        }
    }

    /// Whether the error is a violated input precondition (malformed or non-manifold mesh).
    pub fn is_input_precondition(&self) -> bool {
        matches!(
            self,
            StripError::InvalidIndexCount { .. }
                | StripError::DegenerateTriangle { .. }
                | StripError::NonManifoldEdge { .. }
        )
    }
}
