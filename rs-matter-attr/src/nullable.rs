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

//! Null patterns of the numeric storage types.
//!
//! The attribute store has no separate null flag: a nullable numeric attribute
//! is null when its bytes hold the reserved pattern of its width. Unsigned
//! types reserve their maximum, signed types their minimum, floats NaN and
//! booleans the storage byte `0xFF`.
//!
//! A value equal to the pattern therefore cannot be stored as a non-null
//! nullable value. It reads back as null.

use crate::val::AttrVal;

/// The storage byte of a null boolean.
pub const NULL_BOOL_STORAGE: u8 = 0xFF;

pub trait NullableTraits: Copy + PartialEq {
    /// The reserved null pattern of this type.
    const NULL_VALUE: Self;

    fn is_null_value(self) -> bool {
        self == Self::NULL_VALUE
    }

    /// The storage representation of a nullable value.
    fn to_storage(val: Option<Self>) -> Self {
        val.unwrap_or(Self::NULL_VALUE)
    }

    /// The nullable value of a storage representation.
    fn from_storage(raw: Self) -> Option<Self> {
        (!raw.is_null_value()).then_some(raw)
    }
}

macro_rules! nullable_traits {
    ($null:ident: $($t:ty),*) => {
        $(
            impl NullableTraits for $t {
                const NULL_VALUE: Self = <$t>::$null;
            }
        )*
    };
}

nullable_traits!(MAX: u8, u16, u32, u64);
nullable_traits!(MIN: i8, i16, i32, i64);

impl NullableTraits for f32 {
    const NULL_VALUE: Self = f32::NAN;

    fn is_null_value(self) -> bool {
        self.is_nan()
    }
}

impl AttrVal<'_> {
    /// Return `true` if this is a nullable numeric value holding null.
    ///
    /// Non-nullable kinds, strings, arrays and `Invalid` are never null.
    pub fn is_null(&self) -> bool {
        matches!(
            self,
            Self::NullableBool(None)
                | Self::NullableInt(None)
                | Self::NullableFloat(None)
                | Self::NullableI8(None)
                | Self::NullableU8(None)
                | Self::NullableI16(None)
                | Self::NullableU16(None)
                | Self::NullableI32(None)
                | Self::NullableU32(None)
                | Self::NullableI64(None)
                | Self::NullableU64(None)
                | Self::NullableEnum8(None)
                | Self::NullableEnum16(None)
                | Self::NullableBitmap8(None)
                | Self::NullableBitmap16(None)
                | Self::NullableBitmap32(None)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_patterns() {
        assert!(0xFFu8.is_null_value());
        assert!(0xFFFF_FFFF_FFFF_FFFFu64.is_null_value());
        assert!(i16::MIN.is_null_value());
        assert!(!(-1i16).is_null_value());
        assert!(f32::NAN.is_null_value());
        assert!(!0.0f32.is_null_value());

        assert_eq!(u16::to_storage(None), 0xFFFF);
        assert_eq!(i8::to_storage(None), -128);
        assert_eq!(u32::from_storage(0xFFFF_FFFF), None);
        assert_eq!(u32::from_storage(7), Some(7));
    }

    #[test]
    fn test_is_null_only_for_nullable_kinds() {
        let data = [0xFFu8; 4];

        assert!(AttrVal::nullable_uint8(None).is_null());
        assert!(AttrVal::nullable_bool(None).is_null());
        assert!(!AttrVal::nullable_uint8(Some(3)).is_null());

        assert!(!AttrVal::uint8(0xFF).is_null());
        assert!(!AttrVal::int8(i8::MIN).is_null());
        assert!(!AttrVal::float(f32::NAN).is_null());
        assert!(!AttrVal::invalid().is_null());
        assert!(!AttrVal::array(&data, 4, 4).is_null());
        assert!(!AttrVal::char_str(&data, 4).is_null());
        assert!(!AttrVal::octet_str(&data, 4).is_null());
    }

    #[test]
    fn test_sentinel_aliases_null() {
        assert!(AttrVal::nullable_uint8(Some(u8::NULL_VALUE)).is_null());
        assert!(AttrVal::nullable_int32(Some(i32::NULL_VALUE)).is_null());
        assert!(AttrVal::nullable_bitmap16(Some(0xFFFF)).is_null());
        assert_eq!(
            AttrVal::nullable_uint64(Some(u64::MAX)),
            AttrVal::nullable_uint64(None)
        );
    }
}
