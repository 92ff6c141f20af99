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

//! The typed attribute value (`AttrVal`) exchanged between the application,
//! the callbacks and the codec.
//!
//! Numeric kinds carry their value directly. Nullable numeric kinds carry an
//! `Option`, where `None` is null. The constructors of the nullable kinds fold
//! a value equal to the kind's storage null pattern into `None`, because the
//! attribute store cannot tell the two apart anyway.
//!
//! Strings and arrays carry an `AttrBuf`, which borrows the caller's payload
//! and never owns it.

use strum::FromRepr;

use crate::nullable::NullableTraits;

/// Width of the length prefix of char/octet strings.
pub const SHORT_PREFIX_LEN: u16 = 1;
/// Width of the length prefix of long strings and arrays.
pub const LONG_PREFIX_LEN: u16 = 2;

/// Bit marking the nullable variant of a value kind.
pub const NULLABLE_BASE: u8 = 0x80;

/// The kind of an `AttrVal`.
///
/// Nullable kinds are the base kind with `NULLABLE_BASE` set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromRepr)]
#[repr(u8)]
pub enum ValType {
    Invalid = 0,
    Boolean = 2,
    Integer = 3,
    Float = 4,
    Array = 5,
    CharString = 6,
    OctetString = 7,
    Int8 = 8,
    Uint8 = 9,
    Int16 = 10,
    Uint16 = 11,
    Int32 = 12,
    Uint32 = 13,
    Int64 = 14,
    Uint64 = 15,
    Enum8 = 16,
    Bitmap8 = 17,
    Bitmap16 = 18,
    Bitmap32 = 19,
    Enum16 = 20,
    LongCharString = 21,
    LongOctetString = 22,
    NullableBoolean = NULLABLE_BASE | 2,
    NullableInteger = NULLABLE_BASE | 3,
    NullableFloat = NULLABLE_BASE | 4,
    NullableInt8 = NULLABLE_BASE | 8,
    NullableUint8 = NULLABLE_BASE | 9,
    NullableInt16 = NULLABLE_BASE | 10,
    NullableUint16 = NULLABLE_BASE | 11,
    NullableInt32 = NULLABLE_BASE | 12,
    NullableUint32 = NULLABLE_BASE | 13,
    NullableInt64 = NULLABLE_BASE | 14,
    NullableUint64 = NULLABLE_BASE | 15,
    NullableEnum8 = NULLABLE_BASE | 16,
    NullableBitmap8 = NULLABLE_BASE | 17,
    NullableBitmap16 = NULLABLE_BASE | 18,
    NullableBitmap32 = NULLABLE_BASE | 19,
    NullableEnum16 = NULLABLE_BASE | 20,
}

impl ValType {
    pub const fn is_nullable(&self) -> bool {
        (*self as u8) & NULLABLE_BASE != 0
    }

    /// The non-nullable kind underneath this one.
    pub fn base(&self) -> Self {
        Self::from_repr((*self as u8) & !NULLABLE_BASE).unwrap_or(Self::Invalid)
    }
}

/// A borrowed payload descriptor shared by char strings, octet strings and arrays.
///
/// `size` is the declared payload length in bytes, `count` the number of elements
/// (equal to `size` for strings) and `total` the declared length including the
/// length prefix. `total - size` is the prefix width of the kind.
///
/// `data` is not required to be `size` bytes long: decoded values take `size` from
/// the caller and `data` from what is left in the raw buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttrBuf<'a> {
    data: &'a [u8],
    size: u16,
    count: u16,
    total: u16,
}

impl<'a> AttrBuf<'a> {
    const fn new(data: &'a [u8], size: u16, count: u16, prefix_len: u16) -> Self {
        Self {
            data,
            size,
            count,
            total: size.wrapping_add(prefix_len),
        }
    }

    pub const fn data(&self) -> &'a [u8] {
        self.data
    }

    pub const fn size(&self) -> u16 {
        self.size
    }

    pub const fn count(&self) -> u16 {
        self.count
    }

    pub const fn total(&self) -> u16 {
        self.total
    }

    /// The width of the length prefix, recovered from the declared sizes.
    pub const fn prefix_len(&self) -> u16 {
        self.total.wrapping_sub(self.size)
    }
}

/// A typed attribute value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttrVal<'a> {
    Invalid,
    Bool(bool),
    NullableBool(Option<bool>),
    /// The platform `int`, stored with the 16-bit unsigned storage tag
    Int(i32),
    NullableInt(Option<i32>),
    Float(f32),
    NullableFloat(Option<f32>),
    I8(i8),
    NullableI8(Option<i8>),
    U8(u8),
    NullableU8(Option<u8>),
    I16(i16),
    NullableI16(Option<i16>),
    U16(u16),
    NullableU16(Option<u16>),
    I32(i32),
    NullableI32(Option<i32>),
    U32(u32),
    NullableU32(Option<u32>),
    I64(i64),
    NullableI64(Option<i64>),
    U64(u64),
    NullableU64(Option<u64>),
    Enum8(u8),
    NullableEnum8(Option<u8>),
    Enum16(u16),
    NullableEnum16(Option<u16>),
    Bitmap8(u8),
    NullableBitmap8(Option<u8>),
    Bitmap16(u16),
    NullableBitmap16(Option<u16>),
    Bitmap32(u32),
    NullableBitmap32(Option<u32>),
    CharStr(AttrBuf<'a>),
    LongCharStr(AttrBuf<'a>),
    OctetStr(AttrBuf<'a>),
    LongOctetStr(AttrBuf<'a>),
    Array(AttrBuf<'a>),
}

fn non_null<T: NullableTraits>(val: Option<T>) -> Option<T> {
    val.filter(|v| !v.is_null_value())
}

impl<'a> AttrVal<'a> {
    pub const fn invalid() -> Self {
        Self::Invalid
    }

    pub const fn bool(val: bool) -> Self {
        Self::Bool(val)
    }

    pub const fn nullable_bool(val: Option<bool>) -> Self {
        Self::NullableBool(val)
    }

    pub const fn int(val: i32) -> Self {
        Self::Int(val)
    }

    pub fn nullable_int(val: Option<i32>) -> Self {
        Self::NullableInt(non_null(val))
    }

    pub const fn float(val: f32) -> Self {
        Self::Float(val)
    }

    pub fn nullable_float(val: Option<f32>) -> Self {
        Self::NullableFloat(non_null(val))
    }

    pub const fn int8(val: i8) -> Self {
        Self::I8(val)
    }

    pub fn nullable_int8(val: Option<i8>) -> Self {
        Self::NullableI8(non_null(val))
    }

    pub const fn uint8(val: u8) -> Self {
        Self::U8(val)
    }

    pub fn nullable_uint8(val: Option<u8>) -> Self {
        Self::NullableU8(non_null(val))
    }

    pub const fn int16(val: i16) -> Self {
        Self::I16(val)
    }

    pub fn nullable_int16(val: Option<i16>) -> Self {
        Self::NullableI16(non_null(val))
    }

    pub const fn uint16(val: u16) -> Self {
        Self::U16(val)
    }

    pub fn nullable_uint16(val: Option<u16>) -> Self {
        Self::NullableU16(non_null(val))
    }

    pub const fn int32(val: i32) -> Self {
        Self::I32(val)
    }

    pub fn nullable_int32(val: Option<i32>) -> Self {
        Self::NullableI32(non_null(val))
    }

    pub const fn uint32(val: u32) -> Self {
        Self::U32(val)
    }

    pub fn nullable_uint32(val: Option<u32>) -> Self {
        Self::NullableU32(non_null(val))
    }

    pub const fn int64(val: i64) -> Self {
        Self::I64(val)
    }

    pub fn nullable_int64(val: Option<i64>) -> Self {
        Self::NullableI64(non_null(val))
    }

    pub const fn uint64(val: u64) -> Self {
        Self::U64(val)
    }

    pub fn nullable_uint64(val: Option<u64>) -> Self {
        Self::NullableU64(non_null(val))
    }

    pub const fn enum8(val: u8) -> Self {
        Self::Enum8(val)
    }

    pub fn nullable_enum8(val: Option<u8>) -> Self {
        Self::NullableEnum8(non_null(val))
    }

    pub const fn enum16(val: u16) -> Self {
        Self::Enum16(val)
    }

    pub fn nullable_enum16(val: Option<u16>) -> Self {
        Self::NullableEnum16(non_null(val))
    }

    pub const fn bitmap8(val: u8) -> Self {
        Self::Bitmap8(val)
    }

    pub fn nullable_bitmap8(val: Option<u8>) -> Self {
        Self::NullableBitmap8(non_null(val))
    }

    pub const fn bitmap16(val: u16) -> Self {
        Self::Bitmap16(val)
    }

    pub fn nullable_bitmap16(val: Option<u16>) -> Self {
        Self::NullableBitmap16(non_null(val))
    }

    pub const fn bitmap32(val: u32) -> Self {
        Self::Bitmap32(val)
    }

    pub fn nullable_bitmap32(val: Option<u32>) -> Self {
        Self::NullableBitmap32(non_null(val))
    }

    pub const fn char_str(data: &'a [u8], size: u16) -> Self {
        Self::CharStr(AttrBuf::new(data, size, size, SHORT_PREFIX_LEN))
    }

    pub const fn long_char_str(data: &'a [u8], size: u16) -> Self {
        Self::LongCharStr(AttrBuf::new(data, size, size, LONG_PREFIX_LEN))
    }

    pub const fn octet_str(data: &'a [u8], size: u16) -> Self {
        Self::OctetStr(AttrBuf::new(data, size, size, SHORT_PREFIX_LEN))
    }

    pub const fn long_octet_str(data: &'a [u8], size: u16) -> Self {
        Self::LongOctetStr(AttrBuf::new(data, size, size, LONG_PREFIX_LEN))
    }

    pub const fn array(data: &'a [u8], size: u16, count: u16) -> Self {
        Self::Array(AttrBuf::new(data, size, count, LONG_PREFIX_LEN))
    }

    pub const fn val_type(&self) -> ValType {
        match self {
            Self::Invalid => ValType::Invalid,
            Self::Bool(_) => ValType::Boolean,
            Self::NullableBool(_) => ValType::NullableBoolean,
            Self::Int(_) => ValType::Integer,
            Self::NullableInt(_) => ValType::NullableInteger,
            Self::Float(_) => ValType::Float,
            Self::NullableFloat(_) => ValType::NullableFloat,
            Self::I8(_) => ValType::Int8,
            Self::NullableI8(_) => ValType::NullableInt8,
            Self::U8(_) => ValType::Uint8,
            Self::NullableU8(_) => ValType::NullableUint8,
            Self::I16(_) => ValType::Int16,
            Self::NullableI16(_) => ValType::NullableInt16,
            Self::U16(_) => ValType::Uint16,
            Self::NullableU16(_) => ValType::NullableUint16,
            Self::I32(_) => ValType::Int32,
            Self::NullableI32(_) => ValType::NullableInt32,
            Self::U32(_) => ValType::Uint32,
            Self::NullableU32(_) => ValType::NullableUint32,
            Self::I64(_) => ValType::Int64,
            Self::NullableI64(_) => ValType::NullableInt64,
            Self::U64(_) => ValType::Uint64,
            Self::NullableU64(_) => ValType::NullableUint64,
            Self::Enum8(_) => ValType::Enum8,
            Self::NullableEnum8(_) => ValType::NullableEnum8,
            Self::Enum16(_) => ValType::Enum16,
            Self::NullableEnum16(_) => ValType::NullableEnum16,
            Self::Bitmap8(_) => ValType::Bitmap8,
            Self::NullableBitmap8(_) => ValType::NullableBitmap8,
            Self::Bitmap16(_) => ValType::Bitmap16,
            Self::NullableBitmap16(_) => ValType::NullableBitmap16,
            Self::Bitmap32(_) => ValType::Bitmap32,
            Self::NullableBitmap32(_) => ValType::NullableBitmap32,
            Self::CharStr(_) => ValType::CharString,
            Self::LongCharStr(_) => ValType::LongCharString,
            Self::OctetStr(_) => ValType::OctetString,
            Self::LongOctetStr(_) => ValType::LongOctetString,
            Self::Array(_) => ValType::Array,
        }
    }

    /// The payload descriptor of string and array values.
    pub const fn buf(&self) -> Option<&AttrBuf<'a>> {
        match self {
            Self::CharStr(buf)
            | Self::LongCharStr(buf)
            | Self::OctetStr(buf)
            | Self::LongOctetStr(buf)
            | Self::Array(buf) => Some(buf),
            _ => None,
        }
    }
}

impl Default for AttrVal<'_> {
    fn default() -> Self {
        Self::Invalid
    }
}
