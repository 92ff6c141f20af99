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

//! Attribute value marshalling for Matter devices
//!
//! This crate sits between the typed attribute values an application works
//! with and the raw, little-endian attribute store of a Matter stack. It
//! converts values in both directions, keeps store access under the stack
//! lock, and routes attribute events to the application callbacks.
//!
//! # Examples
//! ```
//! use rs_matter_attr::codec;
//! use rs_matter_attr::val::AttrVal;
//! use rs_matter_attr::zcl::ZclType;
//!
//! let mut raw = [0u8; 2];
//! let info = codec::encode_into(&AttrVal::uint16(0x1234), &mut raw).unwrap();
//!
//! assert_eq!(info.zcl_type, ZclType::Int16u);
//! assert_eq!(raw, [0x34, 0x12]);
//!
//! let val = codec::decode(ZclType::Int16u as u8, 2, &raw, false).unwrap();
//! assert_eq!(val, AttrVal::uint16(0x1234));
//! ```
//!
//! Start off exploring by going to the [attr::AttrCore] object.

pub mod attr;
pub mod callback;
pub mod codec;
pub mod config;
pub mod dm;
pub mod error;
pub mod im;
pub mod lock;
pub mod nullable;
pub mod print;
pub mod store;
pub mod utils;
pub mod val;
pub mod zcl;
