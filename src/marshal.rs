// Copyright 2025-2026 JonTrain Contributors
// SPDX-License-Identifier: Apache-2.0

//! Conversion between native bytes and a foreign runtime's signed byte arrays.
//!
//! Content-provider streams on the mobile host only accept and produce
//! `byte[]` values in `-128..=127`. Every byte that crosses that boundary goes
//! through these two functions and nowhere else.

/// Map native bytes onto the signed representation.
pub fn to_foreign(bytes: &[u8]) -> Vec<i8> {
    bytes.iter().map(|&b| b as i8).collect()
}

/// Map the first `count` signed values back onto native bytes.
///
/// `count` is clamped to the slice length, so a stream that reports more
/// bytes than the buffer holds cannot cause an out-of-bounds read.
pub fn from_foreign(values: &[i8], count: usize) -> Vec<u8> {
    let n = count.min(values.len());
    values[..n].iter().map(|&v| v as u8).collect()
}

/// Copy signed values into an existing native buffer, returning how many were written.
pub fn from_foreign_into(values: &[i8], count: usize, out: &mut Vec<u8>) -> usize {
    let n = count.min(values.len());
    out.extend(values[..n].iter().map(|&v| v as u8));
    n
}

#[cfg(test)]
#[path = "marshal_tests.rs"]
mod tests;
