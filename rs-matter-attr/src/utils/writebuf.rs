/*
 *
 *    Copyright (c) 2020-2022 Project CHIP Authors
 *
 *    Licensed under the Apache License, Version 2.0 (the "License");
 *    you may not use this file except in compliance with the License.
 *    You may obtain a copy of the License at
 *
 *        http://www.apache.org/licenses/LICENSE-2.0
 *
 *    Unless required by applicable law or agreed to in writing, software
 *    distributed under the License is distributed on an "AS IS" BASIS,
 *    WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *    See the License for the specific language governing permissions and
 *    limitations under the License.
 */

use crate::error::*;
use byteorder::{ByteOrder, LittleEndian};

/// A cursor appending little-endian storage data into a caller-owned buffer.
#[derive(Debug)]
pub struct WriteBuf<'a> {
    buf: &'a mut [u8],
    end: usize,
}

impl<'a> WriteBuf<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, end: 0 }
    }

    pub fn append_with<F>(&mut self, size: usize, f: F) -> Result<(), Error>
    where
        F: FnOnce(&mut [u8]),
    {
        if self.end + size <= self.buf.len() {
            f(&mut self.buf[self.end..self.end + size]);
            self.end += size;
            return Ok(());
        }
        Err(ErrorCode::BufferTooSmall.into())
    }

    /// Append `src`, zero-padded (or truncated) to exactly `size` bytes.
    pub fn copy_padded(&mut self, src: &[u8], size: usize) -> Result<(), Error> {
        self.append_with(size, |x| {
            let len = src.len().min(size);
            x[..len].copy_from_slice(&src[..len]);
            x[len..].fill(0);
        })
    }

    pub fn le_i8(&mut self, data: i8) -> Result<(), Error> {
        self.le_u8(data as u8)
    }

    pub fn le_u8(&mut self, data: u8) -> Result<(), Error> {
        self.append_with(1, |x| x[0] = data)
    }

    pub fn le_u16(&mut self, data: u16) -> Result<(), Error> {
        self.append_with(2, |x| LittleEndian::write_u16(x, data))
    }

    pub fn le_i16(&mut self, data: i16) -> Result<(), Error> {
        self.append_with(2, |x| LittleEndian::write_i16(x, data))
    }

    pub fn le_u32(&mut self, data: u32) -> Result<(), Error> {
        self.append_with(4, |x| LittleEndian::write_u32(x, data))
    }

    pub fn le_i32(&mut self, data: i32) -> Result<(), Error> {
        self.append_with(4, |x| LittleEndian::write_i32(x, data))
    }

    pub fn le_u64(&mut self, data: u64) -> Result<(), Error> {
        self.append_with(8, |x| LittleEndian::write_u64(x, data))
    }

    pub fn le_i64(&mut self, data: i64) -> Result<(), Error> {
        self.append_with(8, |x| LittleEndian::write_i64(x, data))
    }

    pub fn le_f32(&mut self, data: f32) -> Result<(), Error> {
        self.append_with(4, |x| LittleEndian::write_f32(x, data))
    }
}
