// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Element-wise binary arithmetic with implicit broadcasting.
//!
//! Equal shapes combine element by element in buffer order. Otherwise the
//! lower-rank operand is broadcast against the higher-rank operand's shape
//! and the result takes the higher-rank shape. For equal ranks the left
//! operand is broadcast first; if that is impossible the right operand is
//! tried. Both operands can never be broadcast at once, so e.g. `[2, 1]`
//! against `[1, 3]` fails.

use crate::shape::unravel_index;
use crate::{Broadcast, Tensor, TensorError};

/// The four element-wise operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    /// Returns the operator name used in errors and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Add => "add",
            BinaryOp::Sub => "sub",
            BinaryOp::Mul => "mul",
            BinaryOp::Div => "div",
        }
    }

    /// Applies the operator to one pair of values.
    ///
    /// `position` is the flat result position, reported when a divisor is
    /// exactly zero.
    #[inline(always)]
    fn apply(self, position: usize, lhs: f64, rhs: f64) -> Result<f64, TensorError> {
        Ok(match self {
            BinaryOp::Add => lhs + rhs,
            BinaryOp::Sub => lhs - rhs,
            BinaryOp::Mul => lhs * rhs,
            BinaryOp::Div => {
                if rhs == 0.0 {
                    return Err(TensorError::DivisionByZero { position });
                }
                lhs / rhs
            }
        })
    }
}

/// Which operand is read through the broadcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Lhs,
    Rhs,
}

/// Element-wise `lhs + rhs`.
///
/// # Examples
/// ```
/// use atomic_tensor::{ops, Tensor};
/// let a = Tensor::new([2, 2], vec![1.0, 2.0, 3.0, 4.0]).unwrap();
/// let b = Tensor::scalar(10.0);
/// let c = ops::add(&a, &b).unwrap();
/// assert_eq!(c.data(), &[11.0, 12.0, 13.0, 14.0]);
/// ```
pub fn add(lhs: &Tensor, rhs: &Tensor) -> Result<Tensor, TensorError> {
    binary(BinaryOp::Add, lhs, rhs)
}

/// Element-wise `lhs - rhs`.
pub fn sub(lhs: &Tensor, rhs: &Tensor) -> Result<Tensor, TensorError> {
    binary(BinaryOp::Sub, lhs, rhs)
}

/// Element-wise `lhs * rhs`.
pub fn mul(lhs: &Tensor, rhs: &Tensor) -> Result<Tensor, TensorError> {
    binary(BinaryOp::Mul, lhs, rhs)
}

/// Element-wise `lhs / rhs`.
///
/// # Errors
/// Returns [`TensorError::DivisionByZero`] if any effective divisor,
/// including one repeated by broadcasting, is exactly zero.
pub fn div(lhs: &Tensor, rhs: &Tensor) -> Result<Tensor, TensorError> {
    binary(BinaryOp::Div, lhs, rhs)
}

/// Applies `op` element-wise, broadcasting when the shapes differ.
///
/// # Errors
/// Returns [`TensorError::ShapeMismatch`] if neither operand can be
/// broadcast to the other's shape, and [`TensorError::DivisionByZero`] for
/// a zero divisor.
pub fn binary(op: BinaryOp, lhs: &Tensor, rhs: &Tensor) -> Result<Tensor, TensorError> {
    // `[]` and `[0]` are both scalars and combine without broadcasting.
    let both_scalar = lhs.stride().is_empty() && rhs.stride().is_empty();
    if lhs.shape() == rhs.shape() || both_scalar {
        return same_shape(op, lhs, rhs);
    }

    let (broadcast, dense, side) = plan(op, lhs, rhs)?;
    tracing::debug!(
        "{}: broadcasting {} operand {} to {}",
        op.as_str(),
        if side == Side::Lhs { "left" } else { "right" },
        broadcast.source().shape(),
        dense.shape()
    );
    with_broadcast(op, &broadcast, dense, side)
}

fn same_shape(op: BinaryOp, lhs: &Tensor, rhs: &Tensor) -> Result<Tensor, TensorError> {
    // Scalar aliases keep their data as given, so lengths can still differ.
    if lhs.data().len() != rhs.data().len() {
        return Err(mismatch(op, lhs, rhs));
    }
    let data = lhs
        .data()
        .iter()
        .zip(rhs.data())
        .enumerate()
        .map(|(i, (&a, &b))| op.apply(i, a, b))
        .collect::<Result<Vec<_>, _>>()?;
    Tensor::new(lhs.shape().clone(), data)
}

/// Picks the operand to broadcast and builds the broadcast.
fn plan<'a>(
    op: BinaryOp,
    lhs: &'a Tensor,
    rhs: &'a Tensor,
) -> Result<(Broadcast<'a>, &'a Tensor, Side), TensorError> {
    let lhs_onto_rhs = || Broadcast::new(rhs.shape().clone(), lhs).map(|b| (b, rhs, Side::Lhs));
    let rhs_onto_lhs = || Broadcast::new(lhs.shape().clone(), rhs).map(|b| (b, lhs, Side::Rhs));

    let planned = match lhs.rank().cmp(&rhs.rank()) {
        std::cmp::Ordering::Less => lhs_onto_rhs(),
        std::cmp::Ordering::Greater => rhs_onto_lhs(),
        std::cmp::Ordering::Equal => lhs_onto_rhs().or_else(|_| rhs_onto_lhs()),
    };
    planned.map_err(|_| mismatch(op, lhs, rhs))
}

/// Combines the dense operand's buffer with the broadcast's logical values
/// at the same flat positions, keeping the original operand order.
fn with_broadcast(
    op: BinaryOp,
    broadcast: &Broadcast<'_>,
    dense: &Tensor,
    side: Side,
) -> Result<Tensor, TensorError> {
    let flat = broadcast.is_flat_repeat();
    tracing::trace!(
        "{}: {} read path",
        op.as_str(),
        if flat { "flat" } else { "indexed" }
    );

    let dims = dense.shape().dims();
    let data = dense
        .data()
        .iter()
        .enumerate()
        .map(|(i, &d)| {
            let b = if flat {
                broadcast.get_flat(i)
            } else {
                broadcast.get(&unravel_index(i, dims))?
            };
            match side {
                Side::Lhs => op.apply(i, b, d),
                Side::Rhs => op.apply(i, d, b),
            }
        })
        .collect::<Result<Vec<_>, _>>()?;
    Tensor::new(dense.shape().clone(), data)
}

fn mismatch(op: BinaryOp, lhs: &Tensor, rhs: &Tensor) -> TensorError {
    TensorError::ShapeMismatch {
        op: op.as_str(),
        lhs: lhs.shape().clone(),
        rhs: rhs.shape().clone(),
    }
}

impl Tensor {
    /// Element-wise `self + other`; see [`add`].
    pub fn add(&self, other: &Tensor) -> Result<Tensor, TensorError> {
        add(self, other)
    }

    /// Element-wise `self - other`; see [`sub`].
    pub fn sub(&self, other: &Tensor) -> Result<Tensor, TensorError> {
        sub(self, other)
    }

    /// Element-wise `self * other`; see [`mul`].
    pub fn mul(&self, other: &Tensor) -> Result<Tensor, TensorError> {
        mul(self, other)
    }

    /// Element-wise `self / other`; see [`div`].
    pub fn div(&self, other: &Tensor) -> Result<Tensor, TensorError> {
        div(self, other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ErrorKind, Shape};

    fn t(shape: &[usize], data: &[f64]) -> Tensor {
        Tensor::from_slice(shape, data).unwrap()
    }

    fn approx_eq(a: &[f64], b: &[f64]) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-6)
    }

    #[test]
    fn test_same_shape_scalars() {
        let a = Tensor::scalar(4.0);
        let b = Tensor::scalar(2.0);
        assert_eq!(a.add(&b).unwrap().data(), &[6.0]);
        assert_eq!(a.sub(&b).unwrap().data(), &[2.0]);
        assert_eq!(a.mul(&b).unwrap().data(), &[8.0]);
        assert_eq!(a.div(&b).unwrap().data(), &[2.0]);
        assert_eq!(a.add(&b).unwrap().shape(), &Shape::scalar());
    }

    #[test]
    fn test_same_shape_1d() {
        let a = t(&[3], &[1.0, 2.0, 3.0]);
        let b = t(&[3], &[4.0, 5.0, 6.0]);
        assert_eq!(a.add(&b).unwrap().data(), &[5.0, 7.0, 9.0]);
        assert_eq!(a.sub(&b).unwrap().data(), &[-3.0, -3.0, -3.0]);
        assert_eq!(a.mul(&b).unwrap().data(), &[4.0, 10.0, 18.0]);
        assert!(approx_eq(a.div(&b).unwrap().data(), &[0.25, 0.4, 0.5]));
    }

    #[test]
    fn test_same_shape_2d() {
        let a = t(&[2, 2], &[1.0, 2.0, 3.0, 4.0]);
        let b = t(&[2, 2], &[5.0, 6.0, 7.0, 8.0]);
        assert_eq!(a.add(&b).unwrap().data(), &[6.0, 8.0, 10.0, 12.0]);
        assert_eq!(a.sub(&b).unwrap().data(), &[-4.0; 4]);
        assert_eq!(a.mul(&b).unwrap().data(), &[5.0, 12.0, 21.0, 32.0]);
        assert!(approx_eq(
            a.div(&b).unwrap().data(),
            &[0.2, 0.333333, 0.428571, 0.5]
        ));
    }

    #[test]
    fn test_incompatible_shapes() {
        let a = t(&[2], &[1.0, 2.0]);
        let b = t(&[3], &[3.0, 4.0, 5.0]);
        for op in [BinaryOp::Add, BinaryOp::Sub, BinaryOp::Mul, BinaryOp::Div] {
            let err = binary(op, &a, &b).unwrap_err();
            assert_eq!(
                err,
                TensorError::ShapeMismatch {
                    op: op.as_str(),
                    lhs: Shape::vector(2),
                    rhs: Shape::vector(3),
                }
            );
        }
    }

    #[test]
    fn test_scalar_broadcast() {
        let a = t(&[2, 2], &[1.0, 2.0, 3.0, 4.0]);
        let s = Tensor::scalar(10.0);
        let c = a.add(&s).unwrap();
        assert_eq!(c.shape().dims(), &[2, 2]);
        assert_eq!(c.data(), &[11.0, 12.0, 13.0, 14.0]);
    }

    #[test]
    fn test_operand_order_kept_when_left_is_broadcast() {
        let s = Tensor::scalar(10.0);
        let a = t(&[2, 2], &[1.0, 2.0, 4.0, 5.0]);
        assert_eq!(s.sub(&a).unwrap().data(), &[9.0, 8.0, 6.0, 5.0]);
        assert_eq!(s.div(&a).unwrap().data(), &[10.0, 5.0, 2.5, 2.0]);
        assert_eq!(a.sub(&s).unwrap().data(), &[-9.0, -8.0, -6.0, -5.0]);
    }

    #[test]
    fn test_row_broadcast_uses_flat_path() {
        let m = t(&[2, 3], &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let r = t(&[3], &[10.0, 20.0, 30.0]);
        let c = m.add(&r).unwrap();
        assert_eq!(c.shape().dims(), &[2, 3]);
        assert_eq!(c.data(), &[11.0, 22.0, 33.0, 14.0, 25.0, 36.0]);
    }

    #[test]
    fn test_column_broadcast_uses_indexed_path() {
        let m = t(&[2, 3], &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let c = t(&[2, 1], &[10.0, 20.0]);
        let out = m.mul(&c).unwrap();
        assert_eq!(out.data(), &[10.0, 20.0, 30.0, 80.0, 100.0, 120.0]);
    }

    #[test]
    fn test_equal_rank_falls_back_to_right_operand() {
        let m = t(&[2, 3], &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let row = t(&[1, 3], &[1.0, 1.0, 1.0]);
        assert_eq!(m.sub(&row).unwrap().data(), &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(
            row.sub(&m).unwrap().data(),
            &[0.0, -1.0, -2.0, -3.0, -4.0, -5.0]
        );
    }

    #[test]
    fn test_double_broadcast_rejected() {
        let col = t(&[2, 1], &[1.0, 2.0]);
        let row = t(&[1, 3], &[1.0, 2.0, 3.0]);
        assert_eq!(col.add(&row).unwrap_err().kind(), ErrorKind::Shape);
    }

    #[test]
    fn test_higher_rank_on_left() {
        let a = t(&[2, 1, 2], &[1.0, 2.0, 3.0, 4.0]);
        let b = t(&[2], &[10.0, 100.0]);
        let c = a.mul(&b).unwrap();
        assert_eq!(c.shape().dims(), &[2, 1, 2]);
        assert_eq!(c.data(), &[10.0, 200.0, 30.0, 400.0]);
    }

    #[test]
    fn test_division_by_zero() {
        let a = t(&[2], &[1.0, 2.0]);
        let b = t(&[2], &[1.0, 0.0]);
        assert_eq!(
            a.div(&b).unwrap_err(),
            TensorError::DivisionByZero { position: 1 }
        );
    }

    #[test]
    fn test_division_by_broadcast_zero() {
        let a = t(&[2, 2], &[1.0, 2.0, 3.0, 4.0]);
        let zero = Tensor::scalar(0.0);
        assert_eq!(a.div(&zero).unwrap_err().kind(), ErrorKind::DivisionByZero);

        let col = t(&[2, 1], &[1.0, 0.0]);
        let err = a.div(&col).unwrap_err();
        assert_eq!(err, TensorError::DivisionByZero { position: 2 });
    }

    #[test]
    fn test_scalar_aliases_combine_as_scalars() {
        let empty = Tensor::scalar(4.0);
        let alias = t(&[0], &[2.0]);
        let sum = empty.add(&alias).unwrap();
        assert_eq!(sum.shape(), &Shape::scalar());
        assert_eq!(sum.data(), &[6.0]);
        assert_eq!(alias.div(&empty).unwrap().data(), &[0.5]);
        assert_eq!(alias.sub(&empty).unwrap().shape().dims(), &[0]);
    }

    #[test]
    fn test_scalar_aliases_with_unequal_buffers_rejected() {
        let long = Tensor::new(Shape::scalar(), vec![1.0, 2.0]).unwrap();
        let alias = t(&[0], &[5.0]);
        for op in [BinaryOp::Add, BinaryOp::Sub, BinaryOp::Mul, BinaryOp::Div] {
            let err = binary(op, &long, &alias).unwrap_err();
            assert!(matches!(err, TensorError::ShapeMismatch { .. }));
            assert_eq!(binary(op, &alias, &long).unwrap_err().kind(), ErrorKind::Shape);
        }
    }

    #[test]
    fn test_scalar_alias_broadcasts_against_vector() {
        let alias = t(&[0], &[10.0]);
        let v = t(&[2], &[1.0, 2.0]);
        assert_eq!(v.add(&alias).unwrap().data(), &[11.0, 12.0]);
        assert_eq!(alias.sub(&v).unwrap().data(), &[9.0, 8.0]);
        assert_eq!(alias.sub(&v).unwrap().shape().dims(), &[2]);
    }

    #[test]
    fn test_zero_numerator_is_fine() {
        let a = t(&[2], &[0.0, 0.0]);
        let b = t(&[2], &[1.0, 2.0]);
        assert_eq!(a.div(&b).unwrap().data(), &[0.0, 0.0]);
    }

    #[test]
    fn test_operands_untouched() {
        let a = t(&[2], &[1.0, 2.0]);
        let b = t(&[2], &[3.0, 4.0]);
        let before = (a.clone(), b.clone());
        let _ = a.add(&b).unwrap();
        let _ = a.div(&b).unwrap();
        assert_eq!((a, b), before);
    }
}
