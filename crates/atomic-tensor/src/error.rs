// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for tensor operations.

use crate::Shape;

/// Coarse classification of a [`TensorError`].
///
/// Callers that only care about *what kind* of failure happened (bad shape,
/// bad index, division by zero) match on this instead of the full enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Invalid or incompatible shape.
    Shape,
    /// Index rank mismatch or out-of-bounds component.
    Index,
    /// Element-wise division by an exact zero.
    DivisionByZero,
    /// Display configuration could not be read or parsed.
    Config,
}

/// Errors that can occur during tensor operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TensorError {
    /// A tensor was constructed without any data.
    #[error("no data provided for shape {shape}")]
    EmptyData { shape: Shape },

    /// The data length does not match the element count implied by the shape.
    #[error("data length mismatch for shape {shape}: expected {expected} elements, got {actual}")]
    DataLengthMismatch {
        shape: Shape,
        expected: usize,
        actual: usize,
    },

    /// A shape was rejected outright (zero dimension, empty broadcast target, ...).
    #[error("invalid shape {shape}: {reason}")]
    InvalidShape { shape: Shape, reason: &'static str },

    /// Two shapes cannot be aligned or broadcast for the requested operation.
    #[error("incompatible shapes for {op}: {lhs} vs {rhs}")]
    ShapeMismatch {
        op: &'static str,
        lhs: Shape,
        rhs: Shape,
    },

    /// A reshape would change the total number of elements.
    #[error("invalid reshape from {from} to {to}")]
    InvalidReshape { from: Shape, to: Shape },

    /// An index has the wrong number of components.
    #[error("index rank mismatch: expected {expected} components, got {actual}")]
    IndexRankMismatch { expected: usize, actual: usize },

    /// An index component lies outside its dimension.
    #[error("index out of bounds at dimension {dim}: {index} >= {size}")]
    IndexOutOfBounds {
        dim: usize,
        index: usize,
        size: usize,
    },

    /// A divisor element was exactly zero.
    #[error("division by zero at flat position {position}")]
    DivisionByZero { position: usize },

    /// Display options could not be loaded.
    #[error("configuration error: {0}")]
    Config(String),
}

impl TensorError {
    /// Returns the coarse kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            TensorError::EmptyData { .. }
            | TensorError::DataLengthMismatch { .. }
            | TensorError::InvalidShape { .. }
            | TensorError::ShapeMismatch { .. }
            | TensorError::InvalidReshape { .. } => ErrorKind::Shape,
            TensorError::IndexRankMismatch { .. } | TensorError::IndexOutOfBounds { .. } => {
                ErrorKind::Index
            }
            TensorError::DivisionByZero { .. } => ErrorKind::DivisionByZero,
            TensorError::Config(_) => ErrorKind::Config,
        }
    }
}
