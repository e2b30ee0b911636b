// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The read-only accessor contract shared by tensors, views and broadcasts.

use crate::Shape;

/// A shaped, strided window onto a flat `f64` buffer.
///
/// Implemented by [`crate::Tensor`] (owns its buffer), [`crate::TensorView`]
/// (borrows a buffer and remaps shape and stride) and [`crate::Broadcast`]
/// (borrows a buffer and logically repeats it). None of them hands out
/// mutable access, which is what makes sharing a buffer between them sound.
pub trait Strided {
    /// Logical shape.
    fn shape(&self) -> &Shape;

    /// Per-dimension element skip; `0` marks a repeated dimension.
    fn stride(&self) -> &[usize];

    /// The backing buffer, in storage order.
    fn data(&self) -> &[f64];

    /// Number of dimensions.
    fn rank(&self) -> usize {
        self.shape().rank()
    }

    /// Number of logical elements.
    fn num_elements(&self) -> usize {
        self.shape().num_elements()
    }

    /// Returns `true` when the stride is empty, i.e. the value is a scalar.
    fn is_scalar(&self) -> bool {
        self.stride().is_empty()
    }

    /// Returns `true` if the stride is the row-major stride of the shape.
    fn is_contiguous(&self) -> bool {
        self.is_scalar() || self.stride() == self.shape().strides().as_slice()
    }
}
