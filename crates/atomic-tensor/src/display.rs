// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Text rendering for anything [`Strided`].
//!
//! Scalars print as a single number, rank 1 as a bracketed row, rank 2 as
//! bracketed rows of rows and higher ranks as a one-line shape and values
//! summary. Values are read in logical row-major order, so broadcasts print
//! their repeated elements.

use std::fmt;

use crate::shape::{ravel_index, unravel_index};
use crate::{Broadcast, DisplayOptions, Strided, Tensor, TensorView};

/// A value paired with the options used to print it.
///
/// Created by `display_with` on [`Tensor`], [`TensorView`] and [`Broadcast`].
pub struct Formatted<'a> {
    value: &'a dyn Strided,
    label: &'static str,
    options: &'a DisplayOptions,
}

impl fmt::Display for Formatted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render(f, self.value, self.label, self.options)
    }
}

fn logical(value: &dyn Strided, flat: usize) -> f64 {
    let stride = value.stride();
    if stride.is_empty() {
        return value.data()[0];
    }
    let index = unravel_index(flat, value.shape().dims());
    value.data()[ravel_index(&index, stride)]
}

fn write_row(
    f: &mut fmt::Formatter<'_>,
    value: &dyn Strided,
    start: usize,
    len: usize,
    precision: usize,
) -> fmt::Result {
    write!(f, "[")?;
    for j in 0..len {
        if j > 0 {
            write!(f, " ")?;
        }
        write!(f, "{:.precision$}", logical(value, start + j))?;
    }
    write!(f, "]")
}

fn render(
    f: &mut fmt::Formatter<'_>,
    value: &dyn Strided,
    label: &str,
    options: &DisplayOptions,
) -> fmt::Result {
    let precision = options.precision;
    let dims = value.shape().dims();

    if value.stride().is_empty() {
        return write!(f, "{:.precision$}", logical(value, 0));
    }

    match dims.len() {
        1 => write_row(f, value, 0, dims[0], precision),
        2 => {
            write!(f, "[")?;
            for i in 0..dims[0] {
                write!(f, "\n ")?;
                write_row(f, value, i * dims[1], dims[1], precision)?;
            }
            write!(f, "\n]")
        }
        _ => {
            let total = value.num_elements();
            let shown = total.min(options.summary_limit);
            write!(f, "{label}(shape={}, data=", value.shape())?;
            write_row(f, value, 0, shown, precision)?;
            if shown < total {
                write!(f, " ...")?;
            }
            write!(f, ")")
        }
    }
}

impl Tensor {
    /// Returns a [`fmt::Display`] adapter using `options`.
    pub fn display_with<'a>(&'a self, options: &'a DisplayOptions) -> Formatted<'a> {
        Formatted {
            value: self,
            label: "Tensor",
            options,
        }
    }
}

impl<'v> TensorView<'v> {
    /// Returns a [`fmt::Display`] adapter using `options`.
    pub fn display_with<'a>(&'a self, options: &'a DisplayOptions) -> Formatted<'a> {
        Formatted {
            value: self,
            label: "View",
            options,
        }
    }
}

impl<'b> Broadcast<'b> {
    /// Returns a [`fmt::Display`] adapter using `options`.
    pub fn display_with<'a>(&'a self, options: &'a DisplayOptions) -> Formatted<'a> {
        Formatted {
            value: self,
            label: "Broadcast",
            options,
        }
    }
}

impl fmt::Display for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render(f, self, "Tensor", &DisplayOptions::default())
    }
}

impl fmt::Display for TensorView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render(f, self, "View", &DisplayOptions::default())
    }
}

impl fmt::Display for Broadcast<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render(f, self, "Broadcast", &DisplayOptions::default())
    }
}
