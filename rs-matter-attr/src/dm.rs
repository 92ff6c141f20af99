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

//! The application-side data model caching the typed attribute values.

#![allow(clippy::bad_bit_mask)]

use core::any::Any;

use bitflags::bitflags;

use crate::error::Error;
use crate::im::{AttrPath, EndptId};
use crate::val::AttrVal;

bitflags! {
    #[repr(transparent)]
    #[derive(Default, Debug, Copy, Clone, Eq, PartialEq, Hash)]
    pub struct AttrFlags: u16 {
        const NONE = 0x0000;
        const WRITABLE = 0x0001;
        const NONVOLATILE = 0x0002;
        const MIN_MAX = 0x0004;
        const MUST_USE_TIMED_WRITE = 0x0008;
        const EXTERNAL_STORAGE = 0x0010;
        const SINGLETON = 0x0020;
        const NULLABLE = 0x0040;
        /// Reads and writes are served by the attribute's override callback
        const OVERRIDE = 0x0080;
        const DEFERRED = 0x0100;
        const MANAGED_INTERNALLY = 0x0200;

        const WN = Self::WRITABLE.bits() | Self::NONVOLATILE.bits();
        const WX = Self::WRITABLE.bits() | Self::NULLABLE.bits();
    }
}

/// Opaque per-endpoint context handed to the callbacks.
pub type PrivData = dyn Any + Send + Sync;

/// The data model of the application, holding the cached value of every attribute.
pub trait AttrDataModel {
    /// The flags of an attribute, or `None` if the data model has no such attribute.
    fn flags(&self, path: &AttrPath) -> Option<AttrFlags>;

    /// Call `f` with the cached value of an attribute.
    fn with_val(&self, path: &AttrPath, f: &mut dyn FnMut(&AttrVal<'_>)) -> Result<(), Error>;

    /// Replace the cached value of an attribute. String and array payloads are copied.
    fn set_val(&self, path: &AttrPath, val: &AttrVal<'_>) -> Result<(), Error>;

    fn priv_data(&self, endpoint: EndptId) -> Option<&PrivData>;
}
