// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use {
    std::mem::size_of,
    zerocopy::{FromBytes, Unaligned},
};

/// Sequential, bounds-checked reader over a borrowed byte buffer.
///
/// Every read either returns a view that lies entirely within the original buffer or `None`,
/// in which case the reader is left untouched.
pub struct BufferReader<'a> {
    buffer: &'a [u8],
    bytes_read: usize,
}

impl<'a> BufferReader<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, bytes_read: 0 }
    }

    pub fn peek<T: FromBytes + Unaligned>(&self) -> Option<&'a T> {
        T::ref_from_prefix(self.buffer)
    }

    pub fn read<T: FromBytes + Unaligned>(&mut self) -> Option<&'a T> {
        let value = T::ref_from_prefix(self.buffer)?;
        self.advance(size_of::<T>());
        Some(value)
    }

    pub fn peek_byte(&self) -> Option<u8> {
        self.buffer.first().copied()
    }

    pub fn read_byte(&mut self) -> Option<u8> {
        let byte = self.peek_byte()?;
        self.advance(1);
        Some(byte)
    }

    pub fn read_bytes(&mut self, len: usize) -> Option<&'a [u8]> {
        if len > self.buffer.len() {
            return None;
        }
        let (bytes, _) = self.buffer.split_at(len);
        self.advance(len);
        Some(bytes)
    }

    pub fn bytes_read(&self) -> usize {
        self.bytes_read
    }

    pub fn bytes_remaining(&self) -> usize {
        self.buffer.len()
    }

    pub fn into_remaining(self) -> &'a [u8] {
        self.buffer
    }

    fn advance(&mut self, len: usize) {
        self.buffer = &self.buffer[len..];
        self.bytes_read += len;
    }
}
