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

use byteorder::{ByteOrder, LittleEndian};

use crate::error::*;

/// A buffer for reading little-endian storage data from a byte slice.
///
/// Unlike a copying reader, the slices it hands out borrow the underlying
/// buffer for its full lifetime.
pub struct ParseBuf<'a> {
    buf: &'a [u8],
    read_off: usize,
}

impl<'a> ParseBuf<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, read_off: 0 }
    }

    // Return the data that is not parsed yet
    pub fn as_slice(&self) -> &'a [u8] {
        &self.buf[self.read_off..]
    }

    fn left(&self) -> usize {
        self.buf.len() - self.read_off
    }

    pub fn parse_as_array<F, R, const N: usize>(&mut self, f: F) -> Result<R, Error>
    where
        F: FnOnce([u8; N]) -> R,
    {
        if self.left() >= N {
            let end_offset = self.read_off + N;
            let data = f(self.buf[self.read_off..end_offset].try_into()?);
            self.read_off = end_offset;
            return Ok(data);
        }
        Err(ErrorCode::TruncatedPacket.into())
    }

    pub fn le_u8(&mut self) -> Result<u8, Error> {
        self.parse_as_array(|x: [u8; 1]| x[0])
    }

    pub fn le_u16(&mut self) -> Result<u16, Error> {
        self.parse_as_array(u16::from_le_bytes)
    }

    pub fn le_f32(&mut self) -> Result<f32, Error> {
        self.parse_as_array(f32::from_le_bytes)
    }

    /// Read an unsigned little-endian integer of `nbytes` (1 to 8) bytes.
    pub fn le_uint(&mut self, nbytes: usize) -> Result<u64, Error> {
        self.parse_with(nbytes, LittleEndian::read_uint)
    }

    /// Read a sign-extended little-endian integer of `nbytes` (1 to 8) bytes.
    pub fn le_int(&mut self, nbytes: usize) -> Result<i64, Error> {
        self.parse_with(nbytes, LittleEndian::read_int)
    }

    fn parse_with<F, R>(&mut self, nbytes: usize, f: F) -> Result<R, Error>
    where
        F: FnOnce(&[u8], usize) -> R,
    {
        if !(1..=8).contains(&nbytes) {
            return Err(ErrorCode::InvalidArgument.into());
        }
        if self.left() < nbytes {
            return Err(ErrorCode::TruncatedPacket.into());
        }
        let end_offset = self.read_off + nbytes;
        let data = f(&self.buf[self.read_off..end_offset], nbytes);
        self.read_off = end_offset;
        Ok(data)
    }

    /// Read an unsigned little-endian length of `nbytes` (1 or 2) bytes.
    pub fn le_len(&mut self, nbytes: u16) -> Result<u16, Error> {
        match nbytes {
            1 => self.le_u8().map(u16::from),
            2 => self.le_u16(),
            _ => Err(ErrorCode::InvalidArgument.into()),
        }
    }
}
