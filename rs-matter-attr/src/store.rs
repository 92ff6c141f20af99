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

//! Synchronized raw access to the Matter stack's attribute store.

use log::{debug, error};

use crate::codec;
use crate::config::Config;
use crate::error::{Error, ErrorCode};
use crate::im::{AttrId, AttrPath, ClusterId, EndptId, IMStatusCode};
use crate::lock::{StackLock, StackLockGuard};
use crate::val::AttrVal;
use crate::zcl::ZclType;

/// The store's description of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttrMetadata {
    pub attr_id: AttrId,
    /// The raw storage type id
    pub zcl_type: u8,
    /// The declared size of the attribute in the store
    pub size: u16,
    pub nullable: bool,
}

/// The attribute store of the Matter stack.
///
/// Implementations are not expected to synchronize: every call made through
/// `StoreGateway` happens with the stack lock held.
pub trait AttrStore {
    /// Read the raw bytes of an attribute into `buf`.
    fn read(&self, path: &AttrPath, buf: &mut [u8]) -> IMStatusCode;

    /// Write the raw bytes of an attribute, with their storage type.
    fn write(&self, path: &AttrPath, data: &[u8], zcl_type: ZclType) -> IMStatusCode;

    /// Return `true` if `endpoint` has a server instance of `cluster`.
    fn contains_server(&self, endpoint: EndptId, cluster: ClusterId) -> bool;

    fn metadata(&self, path: &AttrPath) -> Option<AttrMetadata>;

    /// Schedule a report of the attribute to the subscribers.
    fn mark_dirty(&self, path: &AttrPath);
}

/// What `StoreGateway::update` did with a valid value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateStatus {
    Written,
    /// The endpoint has no server instance of the cluster, nothing was written
    NoServerInstance,
}

pub struct StoreGateway<'a, S, L> {
    store: &'a S,
    lock: &'a L,
    config: Config,
}

impl<'a, S, L> StoreGateway<'a, S, L>
where
    S: AttrStore,
    L: StackLock,
{
    pub const fn new(store: &'a S, lock: &'a L, config: Config) -> Self {
        Self {
            store,
            lock,
            config,
        }
    }

    pub const fn store(&self) -> &'a S {
        self.store
    }

    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Take the stack lock for the lifetime of the returned guard.
    pub fn lock(&self) -> Result<StackLockGuard<'a, L>, Error> {
        StackLockGuard::acquire(self.lock, self.config.lock_timeout)
    }

    /// Read the raw bytes of an attribute into `buf`.
    ///
    /// The content of `buf` is unspecified on error.
    pub fn get_val_raw(&self, path: &AttrPath, buf: &mut [u8]) -> Result<(), Error> {
        let _guard = self.lock()?;

        let status = self.store.read(path, buf);
        if !status.is_success() {
            error!(
                "Error getting {}'s raw value from matter: 0x{:x}",
                path, status as u16
            );
            return Err(ErrorCode::Failure.into());
        }

        Ok(())
    }

    /// Encode `val` and write it to the attribute store.
    ///
    /// A write to a cluster without a server instance on the endpoint succeeds
    /// without touching the store and reports `UpdateStatus::NoServerInstance`.
    pub fn update(&self, path: &AttrPath, val: &AttrVal<'_>) -> Result<UpdateStatus, Error> {
        let _guard = self.lock()?;

        let info = codec::raw_info(val)?;
        let size = info.size as usize;

        if size > self.config.max_attr_size {
            error!(
                "Attribute buffer not enough for {}: {} bytes needed, {} configured",
                path, size, self.config.max_attr_size
            );
            return Err(ErrorCode::NoSpace.into());
        }

        let mut buf = Vec::new();
        if buf.try_reserve_exact(size).is_err() {
            error!("Could not allocate value buffer");
            return Err(ErrorCode::NoMemory.into());
        }
        buf.resize(size, 0);

        codec::encode_into(val, &mut buf)?;

        if !self.store.contains_server(path.endpoint, path.cluster) {
            debug!("No server instance for {}, skipping update", path);
            return Ok(UpdateStatus::NoServerInstance);
        }

        let status = self.store.write(path, &buf, info.zcl_type);
        if !status.is_success() {
            error!(
                "Error updating {} to matter: 0x{:X}",
                path, status as u16
            );
            return Err(ErrorCode::Failure.into());
        }

        Ok(UpdateStatus::Written)
    }
}
