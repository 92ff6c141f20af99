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

//! `AttrCore`, the attribute layer of a running Matter node.
//!
//! It serves the application (`update`, `get_val_raw`, `report`) and the four
//! entry points the Matter stack calls on attribute access: external reads and
//! writes of attributes cached by the application data model, and the pre/post
//! change notifications of attributes held by the stack itself.

use embassy_sync::blocking_mutex::raw::RawMutex;
use log::{debug, error};

use crate::callback::{AttrCallback, CallbackType, Callbacks};
use crate::codec;
use crate::config::Config;
use crate::dm::{AttrDataModel, AttrFlags};
use crate::error::{Error, ErrorCode};
use crate::im::{AttrPath, ClusterId, EndptId, IMStatusCode};
use crate::lock::StackLock;
use crate::print::val_print;
use crate::store::{AttrMetadata, AttrStore, StoreGateway, UpdateStatus};
use crate::val::{AttrVal, ValType};

pub struct AttrCore<'a, S, L, D, M, const N: usize>
where
    M: RawMutex,
{
    gateway: StoreGateway<'a, S, L>,
    dm: &'a D,
    callbacks: Callbacks<'a, M, N>,
}

impl<'a, S, L, D, M, const N: usize> AttrCore<'a, S, L, D, M, N>
where
    S: AttrStore,
    L: StackLock,
    D: AttrDataModel,
    M: RawMutex,
{
    pub const fn new(store: &'a S, lock: &'a L, dm: &'a D, config: Config) -> Self {
        Self {
            gateway: StoreGateway::new(store, lock, config),
            dm,
            callbacks: Callbacks::new(),
        }
    }

    pub fn gateway(&self) -> &StoreGateway<'a, S, L> {
        &self.gateway
    }

    pub fn callbacks(&self) -> &Callbacks<'a, M, N> {
        &self.callbacks
    }

    /// Set the common application callback.
    pub fn set_callback(&self, callback: &'a dyn AttrCallback) {
        self.callbacks.set_callback(callback);
    }

    /// Set the callback serving reads and writes of an `AttrFlags::OVERRIDE` attribute.
    pub fn set_override_callback(
        &self,
        path: &AttrPath,
        callback: &'a dyn AttrCallback,
    ) -> Result<(), Error> {
        self.callbacks.set_override_callback(path, callback)
    }

    pub fn update(&self, path: &AttrPath, val: &AttrVal<'_>) -> Result<UpdateStatus, Error> {
        self.gateway.update(path, val)
    }

    pub fn get_val_raw(&self, path: &AttrPath, buf: &mut [u8]) -> Result<(), Error> {
        self.gateway.get_val_raw(path, buf)
    }

    /// Replace the cached value of an attribute and report the change to the
    /// subscribers, without going through the attribute store.
    ///
    /// `val` must be of the same kind as the cached value.
    pub fn report(&self, path: &AttrPath, val: &AttrVal<'_>) -> Result<(), Error> {
        let _guard = self.gateway.lock()?;

        if self.dm.flags(path).is_none() {
            error!("Could not find {}", path);
            return Err(ErrorCode::AttributeNotFound.into());
        }

        let mut cached = ValType::Invalid;
        self.dm.with_val(path, &mut |val| cached = val.val_type())?;

        if cached != val.val_type() {
            error!("Attribute type mismatch when trying to report {}", path);
            return Err(ErrorCode::InvalidDataType.into());
        }

        self.dm.set_val(path, val)?;
        self.gateway.store().mark_dirty(path);

        Ok(())
    }

    /// Serve a read of an attribute cached by the data model, encoding its
    /// value into `buf`.
    ///
    /// Returns `IMStatusCode::ResourceExhausted`, leaving `buf` untouched, if the
    /// encoded value does not fit.
    pub fn external_read(
        &self,
        endpoint: EndptId,
        cluster: ClusterId,
        meta: &AttrMetadata,
        buf: &mut [u8],
    ) -> IMStatusCode {
        let path = AttrPath::new(endpoint, cluster, meta.attr_id);

        let Some(flags) = self.dm.flags(&path) else {
            return IMStatusCode::Failure;
        };

        if flags.contains(AttrFlags::OVERRIDE) {
            let mut val = AttrVal::invalid();

            if let Err(e) = self.callbacks.execute_override_callback(
                CallbackType::Read,
                &path,
                &mut val,
                self.dm.priv_data(endpoint),
            ) {
                error!("Read callback of {} failed: {}", path, e);
                return IMStatusCode::Failure;
            }

            read_val(&path, &val, buf)
        } else {
            let mut status = IMStatusCode::Failure;

            if let Err(e) = self
                .dm
                .with_val(&path, &mut |val| status = read_val(&path, val, buf))
            {
                error!("Could not get the value of {}: {}", path, e);
                return IMStatusCode::Failure;
            }

            status
        }
    }

    /// Serve a write of an attribute cached by the data model.
    ///
    /// `data` is decoded according to `meta`. Override attributes hand the
    /// value to their callback, the others replace the cached value.
    pub fn external_write(
        &self,
        endpoint: EndptId,
        cluster: ClusterId,
        meta: &AttrMetadata,
        data: &[u8],
    ) -> IMStatusCode {
        let path = AttrPath::new(endpoint, cluster, meta.attr_id);

        let Some(flags) = self.dm.flags(&path) else {
            return IMStatusCode::Failure;
        };

        let mut val = match codec::decode(meta.zcl_type, meta.size, data, meta.nullable) {
            Ok(val) => val,
            Err(e) => {
                error!("Could not decode the value of {}: {}", path, e);
                return IMStatusCode::Failure;
            }
        };

        if flags.contains(AttrFlags::OVERRIDE) {
            return match self.callbacks.execute_override_callback(
                CallbackType::Write,
                &path,
                &mut val,
                self.dm.priv_data(endpoint),
            ) {
                Ok(()) => IMStatusCode::Success,
                Err(_) => IMStatusCode::Failure,
            };
        }

        if val.val_type() == ValType::Invalid {
            return IMStatusCode::Failure;
        }

        match self.dm.set_val(&path, &val) {
            Ok(()) => IMStatusCode::Success,
            Err(e) => {
                error!("Could not set the value of {}: {}", path, e);
                e.into()
            }
        }
    }

    /// Notify the application of a pending change of an attribute held by the
    /// stack. Anything but `IMStatusCode::Success` rejects the change.
    pub fn pre_change(
        &self,
        path: &AttrPath,
        zcl_type: u8,
        size: u16,
        data: &[u8],
    ) -> IMStatusCode {
        let Ok(mut val) = self.decode_change(path, zcl_type, size, data) else {
            return IMStatusCode::Failure;
        };

        val_print(path, &val, false);

        match self.callbacks.execute_callback(
            CallbackType::PreUpdate,
            path,
            &mut val,
            self.dm.priv_data(path.endpoint),
        ) {
            Ok(()) => IMStatusCode::Success,
            Err(e) => {
                debug!("Change of {} rejected: {}", path, e);
                IMStatusCode::Failure
            }
        }
    }

    /// Notify the application of a completed change of an attribute held by the stack.
    pub fn post_change(&self, path: &AttrPath, zcl_type: u8, size: u16, data: &[u8]) {
        let Ok(mut val) = self.decode_change(path, zcl_type, size, data) else {
            return;
        };

        if let Err(e) = self.callbacks.execute_callback(
            CallbackType::PostUpdate,
            path,
            &mut val,
            self.dm.priv_data(path.endpoint),
        ) {
            debug!("Post update callback of {} failed: {}", path, e);
        }
    }

    fn decode_change<'d>(
        &self,
        path: &AttrPath,
        zcl_type: u8,
        size: u16,
        data: &'d [u8],
    ) -> Result<AttrVal<'d>, Error> {
        let nullable = self
            .gateway
            .store()
            .metadata(path)
            .map(|meta| meta.nullable)
            .unwrap_or(false);

        codec::decode(zcl_type, size, data, nullable).map_err(|e| {
            error!("Could not decode the value of {}: {}", path, e);
            e
        })
    }
}

fn read_val(path: &AttrPath, val: &AttrVal<'_>, buf: &mut [u8]) -> IMStatusCode {
    val_print(path, val, true);

    let size = match codec::encoded_len(val) {
        Ok(size) => size as usize,
        Err(e) => return e.into(),
    };

    if size > buf.len() {
        error!(
            "Insufficient space for reading {}: required: {}, max: {}",
            path,
            size,
            buf.len()
        );
        return IMStatusCode::ResourceExhausted;
    }

    match codec::encode_into(val, buf) {
        Ok(_) => IMStatusCode::Success,
        Err(e) => e.into(),
    }
}
