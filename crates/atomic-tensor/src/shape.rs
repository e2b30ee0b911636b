// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Tensor shape descriptors and dimension utilities.
//!
//! Besides the [`Shape`] type, this module holds the free functions every
//! other component builds on: row-major stride computation, broadcast
//! alignment, broadcast strides, reshape validity and flat/multi index
//! conversion.

use std::fmt;

use crate::TensorError;

/// Describes the dimensionality of a [`crate::Tensor`].
///
/// Shapes are immutable once created. The empty shape is a scalar; the
/// single-dimension shape `[0]` is accepted as a scalar alias by
/// [`crate::Tensor::new`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Shape {
    dims: Vec<usize>,
}

impl Shape {
    /// Creates a new shape from the given dimensions.
    ///
    /// # Examples
    /// ```
    /// use atomic_tensor::Shape;
    /// let s = Shape::new(vec![2, 3, 4]);
    /// assert_eq!(s.rank(), 3);
    /// assert_eq!(s.num_elements(), 24);
    /// ```
    pub fn new(dims: Vec<usize>) -> Self {
        Self { dims }
    }

    /// Creates a scalar shape (rank 0).
    pub fn scalar() -> Self {
        Self { dims: vec![] }
    }

    /// Creates a 1-D shape.
    pub fn vector(len: usize) -> Self {
        Self { dims: vec![len] }
    }

    /// Creates a 2-D shape (matrix).
    pub fn matrix(rows: usize, cols: usize) -> Self {
        Self {
            dims: vec![rows, cols],
        }
    }

    /// Returns the number of dimensions (rank).
    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    /// Returns the total number of elements.
    ///
    /// For a scalar shape (rank 0), returns 1. Saturates at `usize::MAX`;
    /// use [`Shape::checked_num_elements`] to detect overflow.
    pub fn num_elements(&self) -> usize {
        self.dims.iter().fold(1usize, |acc, &d| acc.saturating_mul(d))
    }

    /// Returns the total number of elements, or `None` if it overflows
    /// `usize`.
    pub fn checked_num_elements(&self) -> Option<usize> {
        checked_product(&self.dims)
    }

    /// Returns the dimensions as a slice.
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Returns the size of a specific dimension, or `None` if out of bounds.
    pub fn dim(&self, index: usize) -> Option<usize> {
        self.dims.get(index).copied()
    }

    /// Returns `true` for the empty shape and for the `[0]` scalar alias.
    pub fn is_scalar(&self) -> bool {
        is_scalar_dims(&self.dims)
    }

    /// Computes row-major (C-order) strides for this shape.
    pub fn strides(&self) -> Vec<usize> {
        compute_strides(&self.dims)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, d) in self.dims.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{d}")?;
        }
        write!(f, "]")
    }
}

/// Convenience: `Shape::from(vec![2, 3])`.
impl From<Vec<usize>> for Shape {
    fn from(dims: Vec<usize>) -> Self {
        Self::new(dims)
    }
}

/// Convenience: `Shape::from(&[2, 3][..])`.
impl From<&[usize]> for Shape {
    fn from(dims: &[usize]) -> Self {
        Self::new(dims.to_vec())
    }
}

/// Convenience: `Shape::from([2, 3])`.
impl<const N: usize> From<[usize; N]> for Shape {
    fn from(dims: [usize; N]) -> Self {
        Self::new(dims.to_vec())
    }
}

pub(crate) fn is_scalar_dims(dims: &[usize]) -> bool {
    dims.is_empty() || dims == [0]
}

fn checked_product(dims: &[usize]) -> Option<usize> {
    dims.iter().try_fold(1usize, |acc, &d| acc.checked_mul(d))
}

/// Element count of `shape` as an `f64` buffer length.
///
/// Fails with [`TensorError::InvalidShape`] when the count overflows
/// `usize` or the buffer could never be allocated.
pub(crate) fn buffer_len(shape: &Shape) -> Result<usize, TensorError> {
    shape
        .checked_num_elements()
        .filter(|&n| n <= isize::MAX as usize / std::mem::size_of::<f64>())
        .ok_or_else(|| TensorError::InvalidShape {
            shape: shape.clone(),
            reason: "element count exceeds the addressable size",
        })
}

/// Computes row-major strides for `dims`.
///
/// The stride for dimension `i` is the number of elements to skip in the
/// flat buffer to advance one step along that dimension. An empty shape
/// has empty strides. Strides saturate at `usize::MAX` for shapes whose
/// element count overflows; no tensor can have such a shape.
///
/// # Examples
/// ```
/// use atomic_tensor::compute_strides;
/// assert_eq!(compute_strides(&[2, 3, 4]), vec![12, 4, 1]);
/// assert!(compute_strides(&[]).is_empty());
/// ```
pub fn compute_strides(dims: &[usize]) -> Vec<usize> {
    let rank = dims.len();
    if rank == 0 {
        return vec![];
    }
    let mut strides = vec![0usize; rank];
    strides[rank - 1] = 1;
    for i in (0..rank - 1).rev() {
        strides[i] = strides[i + 1].saturating_mul(dims[i + 1]);
    }
    strides
}

/// Right-aligns `source` against `target` and returns the shape `source`
/// must be viewed as to broadcast.
///
/// Missing leading dimensions of `source` are padded with `1`, so the
/// result has the rank of `target` and holds the same elements as
/// `source`.
///
/// # Errors
/// Returns a shape error when either input holds a zero dimension, when
/// both inputs are scalar-like (`[]` or `[1]`), when `source` has the
/// higher rank, or when an aligned source dimension is neither equal to
/// the target's nor `1`.
///
/// # Examples
/// ```
/// use atomic_tensor::{align_shapes, Shape};
/// assert_eq!(align_shapes(&[2], &[4, 2]).unwrap(), Shape::new(vec![1, 2]));
/// assert!(align_shapes(&[2], &[4, 3]).is_err());
/// assert!(align_shapes(&[4, 2], &[2]).is_err());
/// ```
pub fn align_shapes(source: &[usize], target: &[usize]) -> Result<Shape, TensorError> {
    for dims in [source, target] {
        if dims.contains(&0) {
            return Err(TensorError::InvalidShape {
                shape: dims.into(),
                reason: "alignment requires every dimension to be positive",
            });
        }
    }

    let unit_like = |dims: &[usize]| dims.is_empty() || dims == [1];
    if unit_like(source) && unit_like(target) {
        return Err(TensorError::ShapeMismatch {
            op: "align",
            lhs: source.into(),
            rhs: target.into(),
        });
    }

    align_dims(source, target)
        .map(Shape::new)
        .ok_or_else(|| TensorError::ShapeMismatch {
            op: "align",
            lhs: source.into(),
            rhs: target.into(),
        })
}

/// Pads `source` to the rank of `target` and checks every aligned pair.
///
/// Returns `None` if `source` has the higher rank or an aligned source
/// dimension is neither equal to the target's nor `1`. Shared by
/// [`align_shapes`] and broadcast construction.
pub(crate) fn align_dims(source: &[usize], target: &[usize]) -> Option<Vec<usize>> {
    if source.len() > target.len() {
        return None;
    }
    let aligned = pad_leading(source, target.len());
    aligned
        .iter()
        .zip(target)
        .all(|(&s, &t)| s == t || s == 1)
        .then_some(aligned)
}

/// Pads `dims` on the left with `1`s up to `rank`.
fn pad_leading(dims: &[usize], rank: usize) -> Vec<usize> {
    let pad = rank.saturating_sub(dims.len());
    let mut out = vec![1usize; pad];
    out.extend_from_slice(dims);
    out
}

/// Computes the strides of `source` viewed under `broadcast_shape`.
///
/// Dimensions that line up with an equal source dimension keep the source
/// stride. Leading dimensions the source does not have, and dimensions
/// whose size differs from the source's, get stride `0`: reading along
/// them repeats the same element.
///
/// # Examples
/// ```
/// use atomic_tensor::compute_broadcast_strides;
/// assert_eq!(compute_broadcast_strides(&[1, 4], &[3, 4], &[4, 1]), vec![0, 1]);
/// assert_eq!(compute_broadcast_strides(&[4], &[2, 3, 4], &[1]), vec![0, 0, 1]);
/// ```
pub fn compute_broadcast_strides(
    source_shape: &[usize],
    broadcast_shape: &[usize],
    source_stride: &[usize],
) -> Vec<usize> {
    let pad = broadcast_shape.len().saturating_sub(source_shape.len());
    broadcast_shape
        .iter()
        .enumerate()
        .map(|(i, &dim)| {
            if i < pad {
                return 0;
            }
            let j = i - pad;
            match source_shape.get(j) {
                Some(&src) if src == dim => source_stride.get(j).copied().unwrap_or(0),
                _ => 0,
            }
        })
        .collect()
}

/// Returns `true` if a buffer shaped `current` can be reinterpreted as
/// `desired` without copying, i.e. both hold the same number of elements.
///
/// A shape whose element count overflows `usize` is never a valid target.
pub fn valid_reshape(current: &[usize], desired: &[usize]) -> bool {
    match (checked_product(current), checked_product(desired)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Decomposes a row-major flat position into a multi-index over `dims`.
///
/// The last dimension varies fastest.
pub fn unravel_index(flat: usize, dims: &[usize]) -> Vec<usize> {
    let mut index = vec![0usize; dims.len()];
    let mut remaining = flat;
    for (slot, &dim) in index.iter_mut().zip(dims).rev() {
        if dim == 0 {
            continue;
        }
        *slot = remaining % dim;
        remaining /= dim;
    }
    index
}

/// Dots a multi-index with a stride to get a flat buffer offset.
pub fn ravel_index(index: &[usize], stride: &[usize]) -> usize {
    index.iter().zip(stride).map(|(i, s)| i * s).sum()
}

/// Checks `index` against `dims`, component by component.
pub(crate) fn check_index(index: &[usize], dims: &[usize]) -> Result<(), TensorError> {
    if index.len() != dims.len() {
        return Err(TensorError::IndexRankMismatch {
            expected: dims.len(),
            actual: index.len(),
        });
    }
    for (dim, (&i, &size)) in index.iter().zip(dims).enumerate() {
        if i >= size {
            return Err(TensorError::IndexOutOfBounds {
                dim,
                index: i,
                size,
            });
        }
    }
    Ok(())
}
