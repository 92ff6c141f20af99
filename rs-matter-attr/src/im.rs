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

//! The status vocabulary of the Matter stack's attribute store and the
//! identifiers addressing an attribute in the data model.

use core::fmt;

use strum::FromRepr;

use crate::error::{Error, ErrorCode};

pub type EndptId = u16;
pub type ClusterId = u32;
pub type AttrId = u32;

/// The path of a concrete attribute in the data model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AttrPath {
    pub endpoint: EndptId,
    pub cluster: ClusterId,
    pub attr: AttrId,
}

impl AttrPath {
    pub const fn new(endpoint: EndptId, cluster: ClusterId, attr: AttrId) -> Self {
        Self {
            endpoint,
            cluster,
            attr,
        }
    }
}

impl fmt::Display for AttrPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Endpoint 0x{:04X}'s Cluster 0x{:08X}'s Attribute 0x{:08X}",
            self.endpoint, self.cluster, self.attr
        )
    }
}

/// Interaction Model status codes, as returned by the attribute store
/// and expected back from the store callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromRepr)]
#[repr(u16)]
pub enum IMStatusCode {
    Success = 0,
    Failure = 1,
    UnsupportedAccess = 0x7E,
    UnsupportedEndpoint = 0x7F,
    InvalidAction = 0x80,
    UnsupportedAttribute = 0x86,
    ConstraintError = 0x87,
    UnsupportedWrite = 0x88,
    ResourceExhausted = 0x89,
    NotFound = 0x8b,
    InvalidDataType = 0x8d,
    UnsupportedRead = 0x8f,
    Timeout = 0x94,
    Busy = 0x9c,
    UnsupportedCluster = 0xc3,
}

impl IMStatusCode {
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl From<ErrorCode> for IMStatusCode {
    fn from(e: ErrorCode) -> Self {
        match e {
            ErrorCode::AttributeNotFound => IMStatusCode::UnsupportedAttribute,
            ErrorCode::InvalidDataType => IMStatusCode::InvalidDataType,
            ErrorCode::Busy => IMStatusCode::Busy,
            ErrorCode::ResourceExhausted => IMStatusCode::ResourceExhausted,
            _ => IMStatusCode::Failure,
        }
    }
}

impl From<Error> for IMStatusCode {
    fn from(value: Error) -> Self {
        Self::from(value.code())
    }
}
