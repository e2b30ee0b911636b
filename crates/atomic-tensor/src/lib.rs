// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # atomic-tensor
//!
//! A minimal n-dimensional array library: shaped, strided views over flat
//! `f64` buffers with NumPy-style broadcasting.
//!
//! This crate provides:
//! - [`Tensor`] — an owned, immutable tensor with a row-major stride.
//! - [`TensorView`] — a zero-copy reshape of a tensor's buffer.
//! - [`Broadcast`] — a lazy expansion of a tensor to a larger shape using
//!   zero strides, readable by index or materialized with
//!   [`Broadcast::to_tensor`].
//! - Element-wise [`ops::add`], [`ops::sub`], [`ops::mul`] and [`ops::div`]
//!   with implicit broadcasting.
//! - Shape utilities: [`compute_strides`], [`align_shapes`],
//!   [`compute_broadcast_strides`], [`valid_reshape`].
//!
//! # Ownership Model
//!
//! ```text
//! Tensor  ── owns Vec<f64>
//!   │
//!   ├── TensorView<'a>  ── &'a Tensor, own shape + row-major stride
//!   └── Broadcast<'a>   ── &'a Tensor, target shape + zero strides
//! ```
//!
//! Views and broadcasts borrow their source, so the borrow checker keeps
//! the buffer alive and rules out mutation while any alias exists. All
//! three implement the [`Strided`] accessor trait.
//!
//! # Example
//! ```
//! use atomic_tensor::Tensor;
//!
//! let m = Tensor::new([2, 2], vec![1.0, 2.0, 3.0, 4.0]).unwrap();
//! let row = Tensor::new([2], vec![10.0, 20.0]).unwrap();
//! let sum = m.add(&row).unwrap();
//! assert_eq!(sum.data(), &[11.0, 22.0, 13.0, 24.0]);
//!
//! let flat = m.view([4]).unwrap();
//! assert_eq!(flat.stride(), &[1]);
//! ```

mod broadcast;
mod config;
mod display;
mod error;
pub mod ops;
mod shape;
mod strided;
mod tensor;
mod view;

pub use broadcast::Broadcast;
pub use config::DisplayOptions;
pub use display::Formatted;
pub use error::{ErrorKind, TensorError};
pub use ops::BinaryOp;
pub use shape::{
    align_shapes, compute_broadcast_strides, compute_strides, ravel_index, unravel_index,
    valid_reshape, Shape,
};
pub use strided::Strided;
pub use tensor::Tensor;
pub use view::TensorView;
