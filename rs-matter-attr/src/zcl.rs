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

//! The storage type ids the attribute store uses to describe the raw layout
//! of an attribute.

use strum::FromRepr;

use crate::val::ValType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromRepr)]
#[repr(u8)]
pub enum ZclType {
    NoData = 0x00,
    Boolean = 0x10,
    Bitmap8 = 0x18,
    Bitmap16 = 0x19,
    Bitmap32 = 0x1B,
    Bitmap64 = 0x1F,
    Int8u = 0x20,
    Int16u = 0x21,
    Int24u = 0x22,
    Int32u = 0x23,
    Int40u = 0x24,
    Int48u = 0x25,
    Int56u = 0x26,
    Int64u = 0x27,
    Int8s = 0x28,
    Int16s = 0x29,
    Int24s = 0x2A,
    Int32s = 0x2B,
    Int40s = 0x2C,
    Int48s = 0x2D,
    Int56s = 0x2E,
    Int64s = 0x2F,
    Enum8 = 0x30,
    Enum16 = 0x31,
    Priority = 0x32,
    Status = 0x33,
    Single = 0x39,
    Double = 0x3A,
    OctetString = 0x41,
    CharString = 0x42,
    LongOctetString = 0x43,
    LongCharString = 0x44,
    Array = 0x48,
    Struct = 0x4C,
    GroupId = 0xC0,
    EndpointNo = 0xC1,
    VendorId = 0xC2,
    DevtypeId = 0xC3,
    FabricId = 0xC4,
    FabricIdx = 0xC5,
    EntryIdx = 0xC6,
    DataVer = 0xC7,
    EventNo = 0xC8,
    Semtag = 0xC9,
    Namespace = 0xCA,
    Tag = 0xCB,
    SystimeUs = 0xCC,
    SystimeMs = 0xCD,
    ElapsedS = 0xCE,
    Temperature = 0xCF,
    PowerMw = 0xD0,
    AmperageMa = 0xD1,
    VoltageMv = 0xD2,
    EnergyMwh = 0xD3,
    Tod = 0xE0,
    Date = 0xE1,
    EpochUs = 0xE3,
    EpochS = 0xE4,
    PosixMs = 0xE5,
    Percent = 0xE6,
    Percent100ths = 0xE7,
    ClusterId = 0xE8,
    AttribId = 0xE9,
    FieldId = 0xEA,
    EventId = 0xEB,
    CommandId = 0xEC,
    ActionId = 0xED,
    TransId = 0xEF,
    NodeId = 0xF0,
    Ipadr = 0xF2,
    Ipv4adr = 0xF3,
    Ipv6adr = 0xF4,
    Ipv6pre = 0xF5,
    Hwadr = 0xF6,
    Unknown = 0xFF,
}

impl ZclType {
    /// The storage width in bytes of the fixed-size numeric types.
    pub const fn fixed_size(&self) -> Option<u16> {
        use ZclType::*;

        let size = match self {
            Boolean | Bitmap8 | Int8u | Int8s | Enum8 | Priority | Status | ActionId | Tag
            | Namespace | FabricIdx | Percent => 1,
            Bitmap16 | Int16u | Int16s | Enum16 | Temperature | EntryIdx | GroupId
            | EndpointNo | VendorId | Percent100ths => 2,
            Int24u | Int24s => 3,
            Bitmap32 | Int32u | Int32s | Single | TransId | ClusterId | AttribId | FieldId
            | EventId | CommandId | EpochS | ElapsedS | DataVer | DevtypeId => 4,
            Int40u | Int40s => 5,
            Int48u | Int48s => 6,
            Int56u | Int56s => 7,
            Bitmap64 | Int64u | Int64s | Double | EnergyMwh | AmperageMa | PowerMw | FabricId
            | NodeId | PosixMs | EpochUs | SystimeUs | SystimeMs | EventNo => 8,
            _ => return None,
        };

        Some(size)
    }
}

impl From<ZclType> for u8 {
    fn from(zcl_type: ZclType) -> Self {
        zcl_type as u8
    }
}

/// The value kind used for attributes stored with the given storage type.
///
/// Returns `ValType::Invalid` for storage types without a typed value representation.
pub fn val_type_from_zcl_type(zcl_type: ZclType) -> ValType {
    use ZclType::*;

    match zcl_type {
        Boolean => ValType::Boolean,
        Single => ValType::Float,
        Array => ValType::Array,
        CharString => ValType::CharString,
        LongCharString => ValType::LongCharString,
        OctetString | Ipadr | Ipv4adr | Ipv6adr | Ipv6pre | Hwadr => ValType::OctetString,
        LongOctetString => ValType::LongOctetString,
        Int8s => ValType::Int8,
        Int8u | ActionId | Tag | Namespace | FabricIdx | Percent => ValType::Uint8,
        Int16s | Temperature => ValType::Int16,
        Int16u | EntryIdx | GroupId | EndpointNo | VendorId | Percent100ths => ValType::Uint16,
        Int32s | Int24s => ValType::Int32,
        Int32u | TransId | ClusterId | AttribId | FieldId | EventId | CommandId | EpochS
        | ElapsedS | DataVer | DevtypeId | Int24u => ValType::Uint32,
        Int64s | EnergyMwh | AmperageMa | PowerMw | Int56s | Int48s | Int40s => ValType::Int64,
        Int64u | FabricId | NodeId | PosixMs | EpochUs | SystimeUs | SystimeMs | EventNo
        | Int56u | Int48u | Int40u => ValType::Uint64,
        Enum8 | Status | Priority => ValType::Enum8,
        Enum16 => ValType::Enum16,
        Bitmap8 => ValType::Bitmap8,
        Bitmap16 => ValType::Bitmap16,
        Bitmap32 => ValType::Bitmap32,
        _ => ValType::Invalid,
    }
}

/// Like `val_type_from_zcl_type`, for a raw storage type id.
pub fn val_type_from_raw(zcl_type: u8) -> ValType {
    ZclType::from_repr(zcl_type)
        .map(val_type_from_zcl_type)
        .unwrap_or(ValType::Invalid)
}
