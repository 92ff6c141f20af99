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

use core::fmt;

use log::info;

use crate::im::AttrPath;
use crate::val::AttrVal;

/// Log the value of an attribute being read (`is_read`) or written.
pub fn val_print(path: &AttrPath, val: &AttrVal<'_>, is_read: bool) {
    let action = if is_read { 'R' } else { 'W' };

    info!(
        "********** {} : {} is {} **********",
        action,
        path,
        Printable(val)
    );
}

/// The diagnostic rendering of a value.
pub struct Printable<'a, 'b>(pub &'b AttrVal<'a>);

impl fmt::Display for Printable<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let val = self.0;

        if val.is_null() {
            return f.write_str("null");
        }

        match val {
            AttrVal::Bool(v) | AttrVal::NullableBool(Some(v)) => write!(f, "{}", *v as u8),
            AttrVal::Float(v) | AttrVal::NullableFloat(Some(v)) => write!(f, "{:.6}", v),
            AttrVal::I8(v) | AttrVal::NullableI8(Some(v)) => write!(f, "{}", v),
            AttrVal::I16(v) | AttrVal::NullableI16(Some(v)) => write!(f, "{}", v),
            AttrVal::Int(v)
            | AttrVal::NullableInt(Some(v))
            | AttrVal::I32(v)
            | AttrVal::NullableI32(Some(v)) => write!(f, "{}", v),
            AttrVal::I64(v) | AttrVal::NullableI64(Some(v)) => write!(f, "{}", v),
            AttrVal::U8(v)
            | AttrVal::NullableU8(Some(v))
            | AttrVal::Enum8(v)
            | AttrVal::NullableEnum8(Some(v))
            | AttrVal::Bitmap8(v)
            | AttrVal::NullableBitmap8(Some(v)) => write!(f, "{}", v),
            AttrVal::U16(v)
            | AttrVal::NullableU16(Some(v))
            | AttrVal::Enum16(v)
            | AttrVal::NullableEnum16(Some(v))
            | AttrVal::Bitmap16(v)
            | AttrVal::NullableBitmap16(Some(v)) => write!(f, "{}", v),
            AttrVal::U32(v)
            | AttrVal::NullableU32(Some(v))
            | AttrVal::Bitmap32(v)
            | AttrVal::NullableBitmap32(Some(v)) => write!(f, "{}", v),
            AttrVal::U64(v) | AttrVal::NullableU64(Some(v)) => write!(f, "{}", v),
            AttrVal::CharStr(buf) | AttrVal::LongCharStr(buf) => {
                if buf.data().is_empty() {
                    return f.write_str("(empty)");
                }

                let data = &buf.data()[..buf.data().len().min(buf.size() as usize)];
                // Printed as a C string
                let data = data.split(|b| *b == 0).next().unwrap_or(data);

                write!(f, "{}", String::from_utf8_lossy(data))
            }
            _ => write!(f, "<invalid type: {}>", val.val_type() as u8),
        }
    }
}
