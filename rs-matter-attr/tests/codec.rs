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

use rstest::rstest;

use rs_matter_attr::codec::{decode, encode_into, encoded_len, raw_info, RawInfo};
use rs_matter_attr::error::ErrorCode;
use rs_matter_attr::val::{AttrVal, ValType};
use rs_matter_attr::zcl::ZclType;

mod common;

use common::init_env_logger;

fn encode(val: &AttrVal<'_>) -> (RawInfo, Vec<u8>) {
    let mut raw = vec![0xAA; encoded_len(val).unwrap() as usize];
    let info = encode_into(val, &mut raw).unwrap();

    (info, raw)
}

#[test]
fn uint16_layout() {
    init_env_logger();

    let (info, raw) = encode(&AttrVal::uint16(0x1234));
    assert_eq!(info, RawInfo::new(ZclType::Int16u, 2));
    assert_eq!(raw, [0x34, 0x12]);

    assert_eq!(
        decode(ZclType::Int16u as u8, 2, &raw, false).unwrap(),
        AttrVal::uint16(0x1234)
    );
}

#[test]
fn char_str_layout() {
    init_env_logger();

    let (info, raw) = encode(&AttrVal::char_str(b"AB", 2));
    assert_eq!(info, RawInfo::new(ZclType::CharString, 3));
    assert_eq!(raw, [2, b'A', b'B']);

    let (info, raw) = encode(&AttrVal::long_char_str(b"AB", 2));
    assert_eq!(info, RawInfo::new(ZclType::LongCharString, 4));
    assert_eq!(raw, [2, 0, b'A', b'B']);
}

#[test]
fn char_str_decode_takes_size_from_prefix() {
    init_env_logger();

    let raw = [3, b'a', b'b', b'c', 0, 0, 0, 0];
    let val = decode(ZclType::CharString as u8, 32, &raw, false).unwrap();

    assert_eq!(val, AttrVal::char_str(b"abc", 3));
    assert_eq!(val.buf().unwrap().total(), 4);
}

#[test]
fn nullable_int8_follows_the_hint() {
    init_env_logger();

    let raw = [0x80];

    let val = decode(ZclType::Int8s as u8, 1, &raw, true).unwrap();
    assert_eq!(val, AttrVal::nullable_int8(None));
    assert!(val.is_null());

    let val = decode(ZclType::Int8s as u8, 1, &raw, false).unwrap();
    assert_eq!(val, AttrVal::int8(-128));
    assert!(!val.is_null());
}

#[test]
fn array_prefix_and_payload() {
    init_env_logger();

    let elements = [1, 2, 3, 4];
    let (info, raw) = encode(&AttrVal::array(&elements, 4, 2));
    assert_eq!(info, RawInfo::new(ZclType::Array, 6));
    assert_eq!(raw, [2, 0, 1, 2, 3, 4]);

    let val = decode(ZclType::Array as u8, 4, &raw, false).unwrap();
    assert_eq!(val, AttrVal::array(&elements, 4, 2));

    let buf = val.buf().unwrap();
    assert_eq!((buf.size(), buf.count(), buf.total()), (4, 2, 6));
    assert_eq!(buf.data(), &raw[2..]);
}

#[test]
fn sentinel_reads_back_as_null() {
    init_env_logger();

    let (_, raw) = encode(&AttrVal::nullable_uint8(Some(0xFF)));
    assert_eq!(raw, [0xFF]);
    assert_eq!(
        decode(ZclType::Int8u as u8, 1, &raw, true).unwrap(),
        AttrVal::nullable_uint8(None)
    );

    let (_, raw) = encode(&AttrVal::nullable_bool(None));
    assert_eq!(raw, [0xFF]);
}

#[test]
fn alias_storage_types() {
    init_env_logger();

    assert_eq!(
        decode(ZclType::Percent as u8, 1, &[50], false).unwrap(),
        AttrVal::uint8(50)
    );
    assert_eq!(
        decode(ZclType::NodeId as u8, 8, &[1, 0, 0, 0, 0, 0, 0, 0x80], false).unwrap(),
        AttrVal::uint64(0x8000_0000_0000_0001)
    );
    assert_eq!(
        decode(ZclType::Temperature as u8, 2, &[0x00, 0x80], true).unwrap(),
        AttrVal::nullable_int16(None)
    );
    assert_eq!(
        decode(ZclType::Int48s as u8, 6, &[0xfe, 0xff, 0xff, 0xff, 0xff, 0xff], false).unwrap(),
        AttrVal::int64(-2)
    );
}

#[rstest]
#[case::int8(AttrVal::int8(-7))]
#[case::uint8(AttrVal::uint8(7))]
#[case::int16(AttrVal::int16(-300))]
#[case::uint16(AttrVal::uint16(0xfffe))]
#[case::int32(AttrVal::int32(i32::MIN + 1))]
#[case::uint32(AttrVal::uint32(0xdead_beef))]
#[case::int64(AttrVal::int64(i64::MIN + 1))]
#[case::uint64(AttrVal::uint64(0x0102_0304_0506_0708))]
#[case::float(AttrVal::float(1.5))]
#[case::enum8(AttrVal::enum8(0x03))]
#[case::enum16(AttrVal::enum16(0x0102))]
#[case::bitmap8(AttrVal::bitmap8(0x81))]
#[case::bitmap16(AttrVal::bitmap16(0x8001))]
#[case::bitmap32(AttrVal::bitmap32(0x8000_0001))]
#[case::null_i8(AttrVal::nullable_int8(None))]
#[case::some_i8(AttrVal::nullable_int8(Some(-1)))]
#[case::null_u8(AttrVal::nullable_uint8(None))]
#[case::some_u8(AttrVal::nullable_uint8(Some(0xfe)))]
#[case::null_i16(AttrVal::nullable_int16(None))]
#[case::some_i16(AttrVal::nullable_int16(Some(i16::MAX)))]
#[case::null_u16(AttrVal::nullable_uint16(None))]
#[case::some_u16(AttrVal::nullable_uint16(Some(0)))]
#[case::null_i32(AttrVal::nullable_int32(None))]
#[case::some_i32(AttrVal::nullable_int32(Some(-1)))]
#[case::null_u32(AttrVal::nullable_uint32(None))]
#[case::some_u32(AttrVal::nullable_uint32(Some(0xffff_fffe)))]
#[case::null_i64(AttrVal::nullable_int64(None))]
#[case::some_i64(AttrVal::nullable_int64(Some(i64::MAX)))]
#[case::null_u64(AttrVal::nullable_uint64(None))]
#[case::some_u64(AttrVal::nullable_uint64(Some(42)))]
#[case::null_float(AttrVal::nullable_float(None))]
#[case::some_float(AttrVal::nullable_float(Some(-2.25)))]
#[case::null_enum8(AttrVal::nullable_enum8(None))]
#[case::some_enum8(AttrVal::nullable_enum8(Some(1)))]
#[case::null_enum16(AttrVal::nullable_enum16(None))]
#[case::some_enum16(AttrVal::nullable_enum16(Some(0x0100)))]
#[case::null_bitmap8(AttrVal::nullable_bitmap8(None))]
#[case::some_bitmap8(AttrVal::nullable_bitmap8(Some(0x7f)))]
#[case::null_bitmap16(AttrVal::nullable_bitmap16(None))]
#[case::some_bitmap16(AttrVal::nullable_bitmap16(Some(0x00ff)))]
#[case::null_bitmap32(AttrVal::nullable_bitmap32(None))]
#[case::some_bitmap32(AttrVal::nullable_bitmap32(Some(1)))]
fn numeric_values_survive_the_store(#[case] val: AttrVal<'static>) {
    init_env_logger();

    let (info, raw) = encode(&val);
    let decoded = decode(
        info.zcl_type as u8,
        info.size,
        &raw,
        val.val_type().is_nullable(),
    )
    .unwrap();

    assert_eq!(decoded, val);
    assert_eq!(decoded.is_null(), val.is_null());
}

#[test]
fn octet_str_round_trip() {
    init_env_logger();

    let bytes = [1, 0, 2];

    let (info, raw) = encode(&AttrVal::octet_str(&bytes, 3));
    assert_eq!(info, RawInfo::new(ZclType::OctetString, 4));
    assert_eq!(raw, [3, 1, 0, 2]);

    let val = decode(info.zcl_type as u8, info.size, &raw, false).unwrap();
    assert_eq!(val, AttrVal::octet_str(&bytes, 3));
    assert_eq!(val.buf().unwrap().data(), &raw[1..]);

    let (info, raw) = encode(&AttrVal::long_octet_str(&bytes, 3));
    assert_eq!(info, RawInfo::new(ZclType::LongOctetString, 5));
    assert_eq!(raw, [3, 0, 1, 0, 2]);

    let val = decode(info.zcl_type as u8, info.size, &raw, false).unwrap();
    assert_eq!(val, AttrVal::long_octet_str(&bytes, 3));
    assert_eq!(val.buf().unwrap().data(), &raw[2..]);
}

#[test]
fn array_decode_takes_size_from_the_caller() {
    init_env_logger();

    let elements = [0x10, 0x00, 0x20, 0x00, 0x30, 0x00];
    let (info, raw) = encode(&AttrVal::array(&elements, 6, 3));
    assert_eq!(raw[..2], [3, 0]);

    // The stack passes the whole attribute size, prefix included
    let val = decode(ZclType::Array as u8, info.size, &raw, false).unwrap();

    let buf = val.buf().unwrap();
    assert_eq!(buf.count(), 3);
    assert_eq!(buf.size(), 8);
    assert_eq!(buf.data(), &elements);
    assert_eq!(buf.data().as_ptr(), raw[2..].as_ptr());
}

#[test]
fn integer_reads_back_as_uint16_kind() {
    init_env_logger();

    let (info, raw) = encode(&AttrVal::int(0x1234));
    assert_eq!(info.zcl_type, ZclType::Int16u);

    let val = decode(info.zcl_type as u8, info.size, &raw, false).unwrap();
    assert_eq!(val.val_type(), ValType::Uint16);
    assert_eq!(val, AttrVal::uint16(0x1234));
}

#[test]
fn bad_values_are_rejected() {
    init_env_logger();

    let data = [0u8; 8];

    let err = raw_info(&AttrVal::octet_str(&data, 256)).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidArgument);

    let mut out = [0u8; 1];
    let err = encode_into(&AttrVal::char_str(b"AB", 2), &mut out).unwrap_err();
    assert_eq!(err.code(), ErrorCode::BufferTooSmall);
    assert_eq!(out, [0]);
}
