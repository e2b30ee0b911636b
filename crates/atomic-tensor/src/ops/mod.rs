// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Tensor arithmetic operations.
//!
//! Every operation is value-producing: operands are only read and each call
//! allocates a fresh result buffer. Operands of different shapes are combined
//! through a lazy [`crate::Broadcast`] of the lower-rank side.

mod binary_op;

pub use binary_op::{add, binary, div, mul, sub, BinaryOp};
