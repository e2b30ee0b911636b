// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Lazy broadcasting of a [`Tensor`] to a larger shape.
//!
//! A [`Broadcast`] never copies its source. Dimensions that are added on the
//! left, or expanded from size `1`, get stride `0` so that walking them
//! re-reads the same elements. [`Broadcast::to_tensor`] materializes the
//! logical values into a fresh tensor.

use crate::shape::{align_dims, buffer_len, check_index, compute_broadcast_strides, unravel_index};
use crate::{Shape, Strided, Tensor, TensorError};

/// A read-only logical expansion of a [`Tensor`] to a target shape.
#[derive(Debug, Clone)]
pub struct Broadcast<'a> {
    shape: Shape,
    stride: Vec<usize>,
    source: &'a Tensor,
}

impl<'a> Broadcast<'a> {
    /// Broadcasts `source` to `shape` following NumPy rules.
    ///
    /// Shapes are compared from the trailing dimension leftward, padding the
    /// shorter one with `1`s. A scalar source (shape `[]` or `[0]`) aligns
    /// as rank 0.
    ///
    /// # Errors
    /// Returns a shape error if `shape` is empty, if its element count
    /// overflows `usize`, if any aligned pair is neither equal nor has a
    /// side equal to `1`, if `shape` has a lower rank than the source, or if
    /// a source dimension would have to shrink to fit the target.
    ///
    /// # Examples
    /// ```
    /// use atomic_tensor::{Broadcast, Tensor};
    /// let t = Tensor::new([1, 1], vec![5.0]).unwrap();
    /// let b = Broadcast::new([2, 2], &t).unwrap();
    /// assert_eq!(b.to_tensor().unwrap().data(), &[5.0; 4]);
    /// ```
    pub fn new(shape: impl Into<Shape>, source: &'a Tensor) -> Result<Self, TensorError> {
        let shape = shape.into();
        let source_dims = effective_dims(source);
        validate(source, source_dims, &shape)?;

        let stride = compute_broadcast_strides(source_dims, shape.dims(), source.stride());
        tracing::debug!("broadcasting {} to {} (stride {:?})", source.shape(), shape, stride);

        Ok(Self {
            shape,
            stride,
            source,
        })
    }

    /// Returns the target shape.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Returns the broadcast stride; `0` marks a repeated dimension.
    pub fn stride(&self) -> &[usize] {
        &self.stride
    }

    /// Returns the source tensor's buffer.
    pub fn data(&self) -> &'a [f64] {
        self.source.data()
    }

    /// Returns the tensor being broadcast.
    pub fn source(&self) -> &'a Tensor {
        self.source
    }

    /// Reads the value at a row-major flat position by cycling through the
    /// source buffer.
    ///
    /// Only correct when [`Broadcast::is_flat_repeat`] holds; otherwise use
    /// [`Broadcast::get`].
    pub fn get_flat(&self, flat: usize) -> f64 {
        let data = self.source.data();
        data[flat % data.len()]
    }

    /// Returns `true` if the source repeats only along leading dimensions,
    /// so that row-major iteration over the target cycles through the
    /// source buffer in order and [`Broadcast::get_flat`] is exact.
    pub fn is_flat_repeat(&self) -> bool {
        let source_dims = effective_dims(self.source);
        let len: usize = source_dims.iter().product();
        if self.source.data().len() != len {
            return false;
        }
        let leading_ones = source_dims.iter().take_while(|&&d| d == 1).count();
        let core = &source_dims[leading_ones..];
        let target = self.shape.dims();
        core.len() <= target.len() && &target[target.len() - core.len()..] == core
    }

    /// Reads the value at a multi-index of the target shape.
    ///
    /// Each target index maps to the source: along a size-`1` source
    /// dimension it collapses to `0`, leading dimensions the source lacks
    /// are dropped, and the rest pass through unchanged.
    ///
    /// # Errors
    /// Returns an index error if the index rank or any component is out of
    /// range.
    pub fn get(&self, index: &[usize]) -> Result<f64, TensorError> {
        check_index(index, self.shape.dims())?;

        let source_dims = effective_dims(self.source);
        let pad = index.len() - source_dims.len();
        let offset: usize = source_dims
            .iter()
            .zip(self.source.stride())
            .enumerate()
            .map(|(j, (&dim, &stride))| {
                let i = if dim == 1 { 0 } else { index[pad + j] };
                i * stride
            })
            .sum();
        Ok(self.source.data()[offset])
    }

    /// Materializes every logical value into a new tensor of the target
    /// shape.
    ///
    /// # Errors
    /// Propagates any failure from [`Broadcast::get`] or from constructing
    /// the result, e.g. a target shape holding no elements or too many to
    /// allocate.
    pub fn to_tensor(&self) -> Result<Tensor, TensorError> {
        let dims = self.shape.dims();
        let data = (0..buffer_len(&self.shape)?)
            .map(|flat| self.get(&unravel_index(flat, dims)))
            .collect::<Result<Vec<_>, _>>()?;
        Tensor::new(self.shape.clone(), data)
    }
}

impl Strided for Broadcast<'_> {
    fn shape(&self) -> &Shape {
        &self.shape
    }

    fn stride(&self) -> &[usize] {
        &self.stride
    }

    fn data(&self) -> &[f64] {
        self.source.data()
    }
}

/// Source dimensions as seen by broadcasting: scalars count as rank 0.
fn effective_dims(source: &Tensor) -> &[usize] {
    if source.stride().is_empty() {
        &[]
    } else {
        source.shape().dims()
    }
}

fn validate(source: &Tensor, source_dims: &[usize], target: &Shape) -> Result<(), TensorError> {
    if target.rank() == 0 {
        return Err(TensorError::InvalidShape {
            shape: target.clone(),
            reason: "cannot broadcast to a rank-0 shape",
        });
    }
    if target.checked_num_elements().is_none() {
        return Err(TensorError::InvalidShape {
            shape: target.clone(),
            reason: "element count overflows usize",
        });
    }

    let mismatch = || TensorError::ShapeMismatch {
        op: "broadcast",
        lhs: source.shape().clone(),
        rhs: target.clone(),
    };

    let dims = target.dims();
    let rank = dims.len().max(source_dims.len());
    for i in 0..rank {
        let t = trailing(dims, i);
        let s = trailing(source_dims, i);
        if s != t && s != 1 && t != 1 {
            return Err(mismatch());
        }
    }

    // Unlike `align_shapes`, zero-sized targets and a unit source against a
    // unit target are accepted here.
    match align_dims(source_dims, dims) {
        Some(_) => Ok(()),
        None => Err(mismatch()),
    }
}

/// The `i`-th dimension counted from the right, or `1` past the left end.
fn trailing(dims: &[usize], i: usize) -> usize {
    if i < dims.len() {
        dims[dims.len() - 1 - i]
    } else {
        1
    }
}
