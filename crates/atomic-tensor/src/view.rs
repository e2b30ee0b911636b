// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Zero-copy reshaped views over a [`Tensor`]'s buffer.

use crate::shape::{check_index, compute_strides, ravel_index, unravel_index, valid_reshape};
use crate::{Shape, Strided, Tensor, TensorError};

/// A borrowed, read-only reinterpretation of a [`Tensor`]'s buffer.
///
/// A view carries its own shape and stride but never copies, reorders or
/// duplicates the underlying data. It is tied to the lifetime of the source
/// tensor, enforced by the borrow checker.
#[derive(Debug, Clone)]
pub struct TensorView<'a> {
    shape: Shape,
    stride: Vec<usize>,
    source: &'a Tensor,
}

impl<'a> TensorView<'a> {
    /// Creates the identity view: same shape and stride as `source`.
    pub fn new(source: &'a Tensor) -> Self {
        Self {
            shape: source.shape().clone(),
            stride: source.stride().to_vec(),
            source,
        }
    }

    /// Returns the view's shape.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Returns the view's stride.
    pub fn stride(&self) -> &[usize] {
        &self.stride
    }

    /// Returns the shared source buffer.
    pub fn data(&self) -> &'a [f64] {
        self.source.data()
    }

    /// Returns the tensor this view reads from.
    pub fn source(&self) -> &'a Tensor {
        self.source
    }

    /// Reinterprets the same buffer under `shape` with a row-major stride.
    ///
    /// Any previous stride is discarded; reshaping assumes a contiguous
    /// buffer.
    ///
    /// # Errors
    /// Returns [`TensorError::InvalidReshape`] unless both shapes hold the
    /// same number of elements.
    pub fn reshape(&self, shape: impl Into<Shape>) -> Result<TensorView<'a>, TensorError> {
        let shape = shape.into();
        if !valid_reshape(self.shape.dims(), shape.dims()) {
            return Err(TensorError::InvalidReshape {
                from: self.shape.clone(),
                to: shape,
            });
        }
        let stride = compute_strides(shape.dims());
        Ok(TensorView {
            shape,
            stride,
            source: self.source,
        })
    }

    /// Starts again from the identity view of the source tensor, then
    /// reshapes to `shape`.
    pub fn view(&self, shape: impl Into<Shape>) -> Result<TensorView<'a>, TensorError> {
        TensorView::new(self.source).reshape(shape)
    }

    /// Reads the element at a multi-index of the view's shape.
    ///
    /// # Errors
    /// Returns an index error if the index rank or any component is out of
    /// range.
    pub fn get(&self, index: &[usize]) -> Result<f64, TensorError> {
        if self.stride.is_empty() && index.is_empty() {
            return Ok(self.data()[0]);
        }
        check_index(index, self.shape.dims())?;
        Ok(self.data()[ravel_index(index, &self.stride)])
    }

    /// Copies the viewed elements into a new tensor of the view's shape.
    pub fn to_tensor(&self) -> Result<Tensor, TensorError> {
        if self.stride.is_empty() {
            return Tensor::new(self.shape.clone(), self.data().to_vec());
        }
        let dims = self.shape.dims();
        let data = (0..self.shape.num_elements())
            .map(|flat| self.data()[ravel_index(&unravel_index(flat, dims), &self.stride)])
            .collect();
        Tensor::new(self.shape.clone(), data)
    }
}

impl<'a> From<&'a Tensor> for TensorView<'a> {
    fn from(tensor: &'a Tensor) -> Self {
        Self::new(tensor)
    }
}

impl Strided for TensorView<'_> {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    fn sample() -> Tensor {
        Tensor::new([2, 3], vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap()
    }

    #[test]
    fn test_identity_view() {
        let t = sample();
        let v = TensorView::new(&t);
        assert_eq!(v.shape(), t.shape());
        assert_eq!(v.stride(), &[3, 1]);
        assert_eq!(v.data(), t.data());
    }

    #[test]
    fn test_view_shares_buffer() {
        let t = sample();
        let v = t.view([3, 2]).unwrap();
        assert_eq!(v.data().as_ptr(), t.data().as_ptr());
        assert_eq!(v.stride(), &[2, 1]);
    }

    #[test]
    fn test_view_from_view() {
        let t = sample();
        let v = t.view([2, 3]).unwrap();
        let w = v.view([3, 2]).unwrap();
        assert_eq!(w.shape().dims(), &[3, 2]);
        assert_eq!(w.data(), t.data());
    }

    #[test]
    fn test_reshape_flattens() {
        let t = sample();
        let v = t.view([2, 3]).unwrap().reshape([6]).unwrap();
        assert_eq!(v.shape().dims(), &[6]);
        assert_eq!(v.stride(), &[1]);
        assert_eq!(v.data(), t.data());
    }

    #[test]
    fn test_reshape_error_cases() {
        let t = sample();
        let v = t.view([2, 3]).unwrap();
        for bad in [vec![7usize], vec![], vec![0, 6], vec![2, 2, 2]] {
            let err = v.reshape(bad).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Shape);
        }
        assert!(v.reshape([1, 6]).is_ok());
        assert!(v.reshape([2, 3]).is_ok());
    }

    #[test]
    fn test_reshape_rejects_overflowing_shapes() {
        let t = Tensor::new([2], vec![1.0, 2.0]).unwrap();
        let huge = (1usize << (usize::BITS - 1)) + 1;
        for bad in [vec![usize::MAX, 2], vec![huge, 2]] {
            let err = t.view(bad).unwrap_err();
            assert!(matches!(err, TensorError::InvalidReshape { .. }));
        }
        let v = TensorView::new(&t);
        assert_eq!(v.reshape([huge, 2]).unwrap_err().kind(), ErrorKind::Shape);
    }

    #[test]
    fn test_view_scalar() {
        let t = Tensor::scalar(42.0);
        let v = t.view([1]).unwrap();
        assert_eq!(v.shape().dims(), &[1]);
        assert_eq!(v.data(), &[42.0]);
        assert_eq!(v.get(&[0]).unwrap(), 42.0);
    }

    #[test]
    fn test_invalid_views() {
        let t = Tensor::new([2, 2], vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert!(t.view([2, 2, 2]).is_err());
        assert!(t.view([1]).is_err());
        assert!(t.view([0, 4]).is_err());
    }

    #[test]
    fn test_get_and_to_tensor() {
        let t = sample();
        let v = t.view([3, 2]).unwrap();
        assert_eq!(v.get(&[2, 1]).unwrap(), 6.0);
        assert_eq!(v.get(&[3, 0]).unwrap_err().kind(), ErrorKind::Index);

        let copy = v.to_tensor().unwrap();
        assert_eq!(copy.shape().dims(), &[3, 2]);
        assert_eq!(copy.data(), t.data());
    }
}
