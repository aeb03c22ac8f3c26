// Copyright 2025-2026 JonTrain Contributors
// SPDX-License-Identifier: Apache-2.0

//! Chunked copies over host streams that speak signed bytes.

use std::io;

use crate::marshal;

/// Chunk size for host stream copies.
pub const CHUNK_SIZE: usize = 64 * 1024;

/// Input stream owned by the host runtime.
pub trait ForeignInputStream: Send {
    /// Fill `buf` and return the number of values read. Zero or a negative
    /// count ends the stream.
    fn read(&mut self, buf: &mut [i8]) -> io::Result<i32>;
    fn close(&mut self) -> io::Result<()>;
}

/// Output stream owned by the host runtime.
pub trait ForeignOutputStream: Send {
    fn write(&mut self, buf: &[i8]) -> io::Result<()>;
    fn flush(&mut self) -> io::Result<()>;
    fn close(&mut self) -> io::Result<()>;
}

/// Read the stream to its end and close it, on error paths too.
pub fn read_to_end(stream: &mut dyn ForeignInputStream) -> io::Result<Vec<u8>> {
    let result = read_chunks(stream);
    let closed = stream.close();
    let bytes = result?;
    closed?;
    Ok(bytes)
}

/// Write `bytes` in chunks, flush, and close the stream, on error paths too.
pub fn write_all(stream: &mut dyn ForeignOutputStream, bytes: &[u8]) -> io::Result<()> {
    let result = write_chunks(stream, bytes);
    let closed = stream.close();
    result?;
    closed
}

fn read_chunks(stream: &mut dyn ForeignInputStream) -> io::Result<Vec<u8>> {
    let mut buf = vec![0i8; CHUNK_SIZE];
    let mut out = Vec::new();
    loop {
        let n = stream.read(&mut buf)?;
        if n <= 0 {
            break;
        }
        marshal::from_foreign_into(&buf, n as usize, &mut out);
    }
    Ok(out)
}

fn write_chunks(stream: &mut dyn ForeignOutputStream, bytes: &[u8]) -> io::Result<()> {
    for chunk in bytes.chunks(CHUNK_SIZE) {
        stream.write(&marshal::to_foreign(chunk))?;
    }
    stream.flush()
}

#[cfg(test)]
#[path = "stream_tests.rs"]
mod tests;
