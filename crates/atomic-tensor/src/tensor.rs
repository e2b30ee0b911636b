// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Core tensor type.

use crate::shape::{buffer_len, check_index, is_scalar_dims, ravel_index};
use crate::{Broadcast, Shape, Strided, TensorError, TensorView};

/// An owned, immutable n-dimensional tensor of `f64` values.
///
/// Every operation returns a new value; nothing mutates a tensor after
/// construction. [`TensorView`] and [`Broadcast`] borrow the buffer
/// instead of copying it, and the borrow checker keeps the tensor alive
/// for as long as they exist.
///
/// # Memory Layout
/// Data is stored in row-major (C) order. The stride is derived from the
/// shape at construction and is empty for scalars.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "TensorRepr", into = "TensorRepr")]
pub struct Tensor {
    shape: Shape,
    stride: Vec<usize>,
    data: Vec<f64>,
}

/// Wire form of a [`Tensor`]; deserialization re-runs [`Tensor::new`].
#[derive(serde::Serialize, serde::Deserialize)]
struct TensorRepr {
    shape: Shape,
    data: Vec<f64>,
}

impl TryFrom<TensorRepr> for Tensor {
    type Error = TensorError;

    fn try_from(repr: TensorRepr) -> Result<Self, Self::Error> {
        Tensor::new(repr.shape, repr.data)
    }
}

impl From<Tensor> for TensorRepr {
    fn from(tensor: Tensor) -> Self {
        Self {
            shape: tensor.shape,
            data: tensor.data,
        }
    }
}

impl Tensor {
    /// Creates a tensor from a shape and row-major data.
    ///
    /// The empty shape and the shape `[0]` both denote a scalar: the stride
    /// is empty and `data` is kept as given. Any other shape requires
    /// `data.len()` to equal the product of its dimensions.
    ///
    /// # Errors
    /// Returns [`TensorError::EmptyData`] if `data` is empty,
    /// [`TensorError::InvalidShape`] if the shape's element count overflows
    /// and [`TensorError::DataLengthMismatch`] if the length does not fit
    /// the shape.
    ///
    /// # Examples
    /// ```
    /// use atomic_tensor::Tensor;
    /// let t = Tensor::new([2, 2], vec![1.0, 2.0, 3.0, 4.0]).unwrap();
    /// assert_eq!(t.stride(), &[2, 1]);
    /// assert!(Tensor::new([2, 2], vec![1.0]).is_err());
    /// ```
    pub fn new(shape: impl Into<Shape>, data: Vec<f64>) -> Result<Self, TensorError> {
        let shape = shape.into();
        if data.is_empty() {
            return Err(TensorError::EmptyData { shape });
        }

        if is_scalar_dims(shape.dims()) {
            return Ok(Self {
                shape,
                stride: vec![],
                data,
            });
        }

        let expected = buffer_len(&shape)?;
        if data.len() != expected {
            return Err(TensorError::DataLengthMismatch {
                shape,
                expected,
                actual: data.len(),
            });
        }

        let stride = shape.strides();
        Ok(Self {
            shape,
            stride,
            data,
        })
    }

    /// Creates a tensor by copying `values`.
    pub fn from_slice(shape: impl Into<Shape>, values: &[f64]) -> Result<Self, TensorError> {
        Self::new(shape, values.to_vec())
    }

    /// Creates a rank-0 tensor holding `value`.
    pub fn scalar(value: f64) -> Self {
        Self {
            shape: Shape::scalar(),
            stride: vec![],
            data: vec![value],
        }
    }

    /// Creates a tensor with every element set to `value`.
    ///
    /// # Errors
    /// Fails like [`Tensor::new`] when the shape holds no elements, and
    /// with [`TensorError::InvalidShape`] before allocating when the
    /// element count is too large.
    pub fn full(shape: impl Into<Shape>, value: f64) -> Result<Self, TensorError> {
        let shape = shape.into();
        let len = buffer_len(&shape)?;
        Self::new(shape, vec![value; len])
    }

    /// Creates a tensor filled with zeros.
    ///
    /// # Examples
    /// ```
    /// use atomic_tensor::Tensor;
    /// let t = Tensor::zeros([2, 3]).unwrap();
    /// assert!(t.data().iter().all(|&x| x == 0.0));
    /// ```
    pub fn zeros(shape: impl Into<Shape>) -> Result<Self, TensorError> {
        Self::full(shape, 0.0)
    }

    /// Returns the tensor's shape.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Returns the row-major stride; empty for scalars.
    pub fn stride(&self) -> &[usize] {
        &self.stride
    }

    /// Returns the flat data buffer.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Returns the number of dimensions.
    pub fn rank(&self) -> usize {
        self.shape.rank()
    }

    /// Consumes the tensor and returns its buffer.
    pub fn into_data(self) -> Vec<f64> {
        self.data
    }

    /// Reads the element at a multi-index.
    ///
    /// Scalars are read with the empty index.
    ///
    /// # Errors
    /// Returns an index error if the index rank or any component is out of
    /// range.
    pub fn get(&self, index: &[usize]) -> Result<f64, TensorError> {
        if self.stride.is_empty() {
            if !index.is_empty() {
                return Err(TensorError::IndexRankMismatch {
                    expected: 0,
                    actual: index.len(),
                });
            }
            return Ok(self.data[0]);
        }
        check_index(index, self.shape.dims())?;
        Ok(self.data[ravel_index(index, &self.stride)])
    }

    /// Returns a zero-copy view of this tensor under `shape`.
    ///
    /// # Errors
    /// Returns [`TensorError::InvalidReshape`] if `shape` holds a different
    /// number of elements.
    ///
    /// # Examples
    /// ```
    /// use atomic_tensor::Tensor;
    /// let t = Tensor::new([3, 3], (1..=9).map(f64::from).collect()).unwrap();
    /// let v = t.view([9]).unwrap();
    /// assert_eq!(v.shape().dims(), &[9]);
    /// assert!(t.view([2]).is_err());
    /// ```
    pub fn view(&self, shape: impl Into<Shape>) -> Result<TensorView<'_>, TensorError> {
        TensorView::new(self).reshape(shape)
    }

    /// Returns a lazy broadcast of this tensor to `shape`.
    ///
    /// # Errors
    /// Returns a shape error if the tensor cannot be broadcast to `shape`.
    pub fn broadcast(&self, shape: impl Into<Shape>) -> Result<Broadcast<'_>, TensorError> {
        Broadcast::new(shape, self)
    }
}

impl Strided for Tensor {
    fn shape(&self) -> &Shape {
        &self.shape
    }

    fn stride(&self) -> &[usize] {
        &self.stride
    }

    fn data(&self) -> &[f64] {
        &self.data
    }
}
