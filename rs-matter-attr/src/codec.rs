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

//! Conversion between `AttrVal` and the raw, little-endian layout of the
//! attribute store.
//!
//! Encoding is split in two steps so that callers can size a buffer before
//! filling it: `raw_info` returns the storage type and the encoded length,
//! `encode_into` writes the bytes.
//!
//! Numeric layouts are the plain little-endian representation of the storage
//! width. Null is written as the width's null pattern (see `nullable`).
//! Strings and arrays are a little-endian length prefix (1 byte for char and
//! octet strings, 2 bytes for long strings and arrays) followed by the payload.

use log::{error, warn};

use crate::error::{Error, ErrorCode};
use crate::nullable::{NullableTraits, NULL_BOOL_STORAGE};
use crate::utils::{ParseBuf, WriteBuf};
use crate::val::{AttrBuf, AttrVal, ValType, LONG_PREFIX_LEN, SHORT_PREFIX_LEN};
use crate::zcl::{val_type_from_zcl_type, ZclType};

/// The storage type and encoded length of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawInfo {
    pub zcl_type: ZclType,
    pub size: u16,
}

impl RawInfo {
    pub const fn new(zcl_type: ZclType, size: u16) -> Self {
        Self { zcl_type, size }
    }
}

/// Return the storage type and encoded length of `val`.
///
/// `AttrVal::Invalid` has no encoding: it reports `ZclType::NoData` with a
/// length of 0 and logs an error.
pub fn raw_info(val: &AttrVal<'_>) -> Result<RawInfo, Error> {
    let info = match val {
        AttrVal::Invalid => {
            error!("Value type not handled: {}", val.val_type() as u8);
            RawInfo::new(ZclType::NoData, 0)
        }
        AttrVal::Bool(_) | AttrVal::NullableBool(_) => RawInfo::new(ZclType::Boolean, 1),
        // The platform `int` keeps the 16-bit unsigned storage type of existing deployments
        AttrVal::Int(_) | AttrVal::NullableInt(_) => RawInfo::new(ZclType::Int16u, 4),
        AttrVal::Float(_) | AttrVal::NullableFloat(_) => RawInfo::new(ZclType::Single, 4),
        AttrVal::I8(_) | AttrVal::NullableI8(_) => RawInfo::new(ZclType::Int8s, 1),
        AttrVal::U8(_) | AttrVal::NullableU8(_) => RawInfo::new(ZclType::Int8u, 1),
        AttrVal::I16(_) | AttrVal::NullableI16(_) => RawInfo::new(ZclType::Int16s, 2),
        AttrVal::U16(_) | AttrVal::NullableU16(_) => RawInfo::new(ZclType::Int16u, 2),
        AttrVal::I32(_) | AttrVal::NullableI32(_) => RawInfo::new(ZclType::Int32s, 4),
        AttrVal::U32(_) | AttrVal::NullableU32(_) => RawInfo::new(ZclType::Int32u, 4),
        AttrVal::I64(_) | AttrVal::NullableI64(_) => RawInfo::new(ZclType::Int64s, 8),
        AttrVal::U64(_) | AttrVal::NullableU64(_) => RawInfo::new(ZclType::Int64u, 8),
        AttrVal::Enum8(_) | AttrVal::NullableEnum8(_) => RawInfo::new(ZclType::Enum8, 1),
        AttrVal::Enum16(_) | AttrVal::NullableEnum16(_) => RawInfo::new(ZclType::Enum16, 2),
        AttrVal::Bitmap8(_) | AttrVal::NullableBitmap8(_) => RawInfo::new(ZclType::Bitmap8, 1),
        AttrVal::Bitmap16(_) | AttrVal::NullableBitmap16(_) => {
            RawInfo::new(ZclType::Bitmap16, 2)
        }
        AttrVal::Bitmap32(_) | AttrVal::NullableBitmap32(_) => {
            RawInfo::new(ZclType::Bitmap32, 4)
        }
        AttrVal::CharStr(buf) => RawInfo::new(
            ZclType::CharString,
            c_str_len(buf, SHORT_PREFIX_LEN)? + SHORT_PREFIX_LEN,
        ),
        AttrVal::LongCharStr(buf) => RawInfo::new(
            ZclType::LongCharString,
            c_str_len(buf, LONG_PREFIX_LEN)? + LONG_PREFIX_LEN,
        ),
        AttrVal::OctetStr(buf) => {
            RawInfo::new(ZclType::OctetString, prefixed_len(buf, SHORT_PREFIX_LEN)?)
        }
        AttrVal::LongOctetStr(buf) => RawInfo::new(
            ZclType::LongOctetString,
            prefixed_len(buf, LONG_PREFIX_LEN)?,
        ),
        AttrVal::Array(buf) => RawInfo::new(ZclType::Array, prefixed_len(buf, LONG_PREFIX_LEN)?),
    };

    Ok(info)
}

/// The encoded length of `val`.
pub fn encoded_len(val: &AttrVal<'_>) -> Result<u16, Error> {
    raw_info(val).map(|info| info.size)
}

/// Encode `val` into the start of `out`.
///
/// Fails with `ErrorCode::BufferTooSmall`, without writing anything, if `out`
/// is shorter than the encoded length.
pub fn encode_into(val: &AttrVal<'_>, out: &mut [u8]) -> Result<RawInfo, Error> {
    let info = raw_info(val)?;

    if out.len() < info.size as usize {
        error!(
            "Attribute buffer not enough: {} bytes needed, {} available",
            info.size,
            out.len()
        );
        return Err(ErrorCode::BufferTooSmall.into());
    }

    let mut wb = WriteBuf::new(out);

    match val {
        AttrVal::Invalid => (),
        AttrVal::Bool(v) => wb.le_u8(*v as u8)?,
        AttrVal::NullableBool(v) => wb.le_u8(v.map(u8::from).unwrap_or(NULL_BOOL_STORAGE))?,
        AttrVal::Int(v) | AttrVal::I32(v) => wb.le_i32(*v)?,
        AttrVal::NullableInt(v) | AttrVal::NullableI32(v) => wb.le_i32(i32::to_storage(*v))?,
        AttrVal::Float(v) => wb.le_f32(*v)?,
        AttrVal::NullableFloat(v) => wb.le_f32(f32::to_storage(*v))?,
        AttrVal::I8(v) => wb.le_i8(*v)?,
        AttrVal::NullableI8(v) => wb.le_i8(i8::to_storage(*v))?,
        AttrVal::U8(v) | AttrVal::Enum8(v) | AttrVal::Bitmap8(v) => wb.le_u8(*v)?,
        AttrVal::NullableU8(v) | AttrVal::NullableEnum8(v) | AttrVal::NullableBitmap8(v) => {
            wb.le_u8(u8::to_storage(*v))?
        }
        AttrVal::I16(v) => wb.le_i16(*v)?,
        AttrVal::NullableI16(v) => wb.le_i16(i16::to_storage(*v))?,
        AttrVal::U16(v) | AttrVal::Enum16(v) | AttrVal::Bitmap16(v) => wb.le_u16(*v)?,
        AttrVal::NullableU16(v) | AttrVal::NullableEnum16(v) | AttrVal::NullableBitmap16(v) => {
            wb.le_u16(u16::to_storage(*v))?
        }
        AttrVal::U32(v) | AttrVal::Bitmap32(v) => wb.le_u32(*v)?,
        AttrVal::NullableU32(v) | AttrVal::NullableBitmap32(v) => {
            wb.le_u32(u32::to_storage(*v))?
        }
        AttrVal::I64(v) => wb.le_i64(*v)?,
        AttrVal::NullableI64(v) => wb.le_i64(i64::to_storage(*v))?,
        AttrVal::U64(v) => wb.le_u64(*v)?,
        AttrVal::NullableU64(v) => wb.le_u64(u64::to_storage(*v))?,
        AttrVal::CharStr(buf) | AttrVal::LongCharStr(buf) => {
            let len = info.size - buf.prefix_len();
            write_len(&mut wb, buf.prefix_len(), len)?;
            wb.copy_padded(payload(buf), len as usize)?;
        }
        AttrVal::OctetStr(buf) | AttrVal::LongOctetStr(buf) | AttrVal::Array(buf) => {
            write_len(&mut wb, buf.prefix_len(), buf.count())?;
            wb.copy_padded(payload(buf), buf.size() as usize)?;
        }
    }

    Ok(info)
}

macro_rules! decode_num {
    ($read:expr, $nullable:expr, $ty:ty, $ctor:ident, $nullable_ctor:ident) => {{
        let (raw, null) = $read?;
        if $nullable {
            AttrVal::$nullable_ctor((!null).then_some(raw as $ty))
        } else {
            AttrVal::$ctor(raw as $ty)
        }
    }};
}

/// Decode the raw bytes of an attribute stored with storage type `zcl_type`.
///
/// `nullable` tells whether the attribute is nullable: a numeric null pattern
/// then decodes to null, otherwise it decodes to its plain value. Booleans
/// always decode to a non-nullable `AttrVal::Bool`.
///
/// Strings take their size from the parsed length prefix. Arrays take their
/// size from `attr_size` and only their element count from the prefix.
///
/// An unknown storage type decodes to `AttrVal::Invalid`.
pub fn decode<'a>(
    zcl_type: u8,
    attr_size: u16,
    data: &'a [u8],
    nullable: bool,
) -> Result<AttrVal<'a>, Error> {
    let Some(zcl) = ZclType::from_repr(zcl_type) else {
        warn!("Attribute type not handled: 0x{:02X}", zcl_type);
        return Ok(AttrVal::invalid());
    };

    let mut pb = ParseBuf::new(data);

    let val = match val_type_from_zcl_type(zcl) {
        ValType::Boolean => AttrVal::bool(pb.le_u8()? != 0),
        ValType::Float => {
            let v = pb.le_f32()?;
            if nullable {
                AttrVal::nullable_float(f32::from_storage(v))
            } else {
                AttrVal::float(v)
            }
        }
        ValType::Int8 => decode_num!(signed(&mut pb, zcl), nullable, i8, int8, nullable_int8),
        ValType::Uint8 => decode_num!(unsigned(&mut pb, zcl), nullable, u8, uint8, nullable_uint8),
        ValType::Int16 => decode_num!(signed(&mut pb, zcl), nullable, i16, int16, nullable_int16),
        ValType::Uint16 => {
            decode_num!(unsigned(&mut pb, zcl), nullable, u16, uint16, nullable_uint16)
        }
        ValType::Int32 => decode_num!(signed(&mut pb, zcl), nullable, i32, int32, nullable_int32),
        ValType::Uint32 => {
            decode_num!(unsigned(&mut pb, zcl), nullable, u32, uint32, nullable_uint32)
        }
        ValType::Int64 => decode_num!(signed(&mut pb, zcl), nullable, i64, int64, nullable_int64),
        ValType::Uint64 => {
            decode_num!(unsigned(&mut pb, zcl), nullable, u64, uint64, nullable_uint64)
        }
        ValType::Enum8 => decode_num!(unsigned(&mut pb, zcl), nullable, u8, enum8, nullable_enum8),
        ValType::Enum16 => {
            decode_num!(unsigned(&mut pb, zcl), nullable, u16, enum16, nullable_enum16)
        }
        ValType::Bitmap8 => {
            decode_num!(unsigned(&mut pb, zcl), nullable, u8, bitmap8, nullable_bitmap8)
        }
        ValType::Bitmap16 => {
            decode_num!(unsigned(&mut pb, zcl), nullable, u16, bitmap16, nullable_bitmap16)
        }
        ValType::Bitmap32 => {
            decode_num!(unsigned(&mut pb, zcl), nullable, u32, bitmap32, nullable_bitmap32)
        }
        ValType::CharString => {
            let count = pb.le_len(prefix_len_of(AttrVal::char_str(&[], 0)))?;
            AttrVal::char_str(take(pb.as_slice(), count), count)
        }
        ValType::LongCharString => {
            let count = pb.le_len(prefix_len_of(AttrVal::long_char_str(&[], 0)))?;
            AttrVal::long_char_str(take(pb.as_slice(), count), count)
        }
        ValType::OctetString => {
            let count = pb.le_len(prefix_len_of(AttrVal::octet_str(&[], 0)))?;
            AttrVal::octet_str(take(pb.as_slice(), count), count)
        }
        ValType::LongOctetString => {
            let count = pb.le_len(prefix_len_of(AttrVal::long_octet_str(&[], 0)))?;
            AttrVal::long_octet_str(take(pb.as_slice(), count), count)
        }
        ValType::Array => {
            let count = pb.le_len(prefix_len_of(AttrVal::array(&[], 0, 0)))?;
            AttrVal::array(pb.as_slice(), attr_size, count)
        }
        _ => {
            warn!("Attribute type not handled: {:?}", zcl);
            AttrVal::invalid()
        }
    };

    Ok(val)
}

fn storage_width(zcl: ZclType) -> Result<usize, Error> {
    zcl.fixed_size()
        .map(usize::from)
        .ok_or_else(|| ErrorCode::InvalidDataType.into())
}

// Read an unsigned value of the storage width, and whether it is the width's null pattern
fn unsigned(pb: &mut ParseBuf<'_>, zcl: ZclType) -> Result<(u64, bool), Error> {
    let width = storage_width(zcl)?;
    let raw = pb.le_uint(width)?;

    Ok((raw, raw == u64::MAX >> (64 - 8 * width)))
}

fn signed(pb: &mut ParseBuf<'_>, zcl: ZclType) -> Result<(i64, bool), Error> {
    let width = storage_width(zcl)?;
    let raw = pb.le_int(width)?;

    Ok((raw, raw == i64::MIN >> (64 - 8 * width)))
}

fn prefix_len_of(empty: AttrVal<'_>) -> u16 {
    empty.buf().map(AttrBuf::prefix_len).unwrap_or(0)
}

fn take(data: &[u8], count: u16) -> &[u8] {
    &data[..data.len().min(count as usize)]
}

fn payload<'a>(buf: &AttrBuf<'a>) -> &'a [u8] {
    take(buf.data(), buf.size())
}

fn write_len(wb: &mut WriteBuf<'_>, prefix_len: u16, len: u16) -> Result<(), Error> {
    match prefix_len {
        SHORT_PREFIX_LEN => wb.le_u8(u8::try_from(len).map_err(|_| ErrorCode::InvalidArgument)?),
        LONG_PREFIX_LEN => wb.le_u16(len),
        _ => Err(ErrorCode::InvalidArgument.into()),
    }
}

fn max_len(prefix_len: u16) -> u16 {
    if prefix_len == SHORT_PREFIX_LEN {
        u8::MAX as u16
    } else {
        u16::MAX
    }
}

// The length of a NUL-terminated string stored in at most `size` bytes
fn c_str_len(buf: &AttrBuf<'_>, prefix_len: u16) -> Result<u16, Error> {
    let data = payload(buf);
    let len = data.iter().position(|b| *b == 0).unwrap_or(data.len());

    if buf.prefix_len() != prefix_len
        || len >= max_len(prefix_len) as usize
        || len as u16 > u16::MAX - prefix_len
    {
        error!(
            "Invalid string: length {}, prefix width {}",
            len,
            buf.prefix_len()
        );
        return Err(ErrorCode::InvalidArgument.into());
    }

    Ok(len as u16)
}

fn prefixed_len(buf: &AttrBuf<'_>, prefix_len: u16) -> Result<u16, Error> {
    if buf.prefix_len() != prefix_len || buf.count() > max_len(prefix_len) {
        error!(
            "Invalid buffer: count {}, prefix width {}",
            buf.count(),
            buf.prefix_len()
        );
        return Err(ErrorCode::InvalidArgument.into());
    }

    buf.size()
        .checked_add(prefix_len)
        .ok_or_else(|| ErrorCode::InvalidArgument.into())
}
