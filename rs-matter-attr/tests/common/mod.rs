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

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use rs_matter_attr::codec;
use rs_matter_attr::config::LockTimeout;
use rs_matter_attr::dm::{AttrDataModel, AttrFlags, PrivData};
use rs_matter_attr::error::{Error, ErrorCode};
use rs_matter_attr::im::{AttrPath, ClusterId, EndptId, IMStatusCode};
use rs_matter_attr::lock::{LockStatus, StackLock, StdStackLock};
use rs_matter_attr::store::{AttrMetadata, AttrStore};
use rs_matter_attr::val::AttrVal;
use rs_matter_attr::zcl::ZclType;

pub fn init_env_logger() {
    let _ = env_logger::try_init_from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "info"),
    );
}

/// A stack lock counting the times it was taken and released.
#[derive(Default)]
pub struct RecordingLock {
    inner: StdStackLock,
    locks: AtomicUsize,
    unlocks: AtomicUsize,
    fail: AtomicBool,
}

impl RecordingLock {
    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn is_held(&self) -> bool {
        self.inner.is_held()
    }

    pub fn locks(&self) -> usize {
        self.locks.load(Ordering::SeqCst)
    }

    pub fn unlocks(&self) -> usize {
        self.unlocks.load(Ordering::SeqCst)
    }
}

impl StackLock for RecordingLock {
    fn lock(&self, timeout: LockTimeout) -> LockStatus {
        if self.fail.load(Ordering::SeqCst) {
            return LockStatus::Failed;
        }

        let status = self.inner.lock(timeout);
        if status == LockStatus::Success {
            self.locks.fetch_add(1, Ordering::SeqCst);
        }

        status
    }

    fn unlock(&self) {
        self.unlocks.fetch_add(1, Ordering::SeqCst);
        self.inner.unlock();
    }
}

/// An in-memory attribute store, asserting that it is only used with its lock held.
#[derive(Default)]
pub struct MemStore {
    pub lock: RecordingLock,
    attrs: Mutex<HashMap<AttrPath, (Vec<u8>, ZclType)>>,
    servers: Mutex<HashSet<(EndptId, ClusterId)>>,
    metadata: Mutex<HashMap<AttrPath, AttrMetadata>>,
    dirty: Mutex<Vec<AttrPath>>,
    fail_with: Mutex<Option<IMStatusCode>>,
    writes: AtomicUsize,
}

impl MemStore {
    pub fn add_server(&self, endpoint: EndptId, cluster: ClusterId) {
        self.servers.lock().unwrap().insert((endpoint, cluster));
    }

    pub fn add_metadata(&self, path: &AttrPath, meta: AttrMetadata) {
        self.metadata.lock().unwrap().insert(*path, meta);
    }

    pub fn set_raw(&self, path: &AttrPath, data: &[u8], zcl_type: ZclType) {
        self.attrs
            .lock()
            .unwrap()
            .insert(*path, (data.to_vec(), zcl_type));
    }

    pub fn raw(&self, path: &AttrPath) -> Option<(Vec<u8>, ZclType)> {
        self.attrs.lock().unwrap().get(path).cloned()
    }

    pub fn fail_with(&self, status: Option<IMStatusCode>) {
        *self.fail_with.lock().unwrap() = status;
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn dirty(&self) -> Vec<AttrPath> {
        self.dirty.lock().unwrap().clone()
    }

    fn check_locked(&self) {
        assert!(self.lock.is_held(), "attribute store used without the stack lock");
    }

    fn failure(&self) -> Option<IMStatusCode> {
        *self.fail_with.lock().unwrap()
    }
}

impl AttrStore for MemStore {
    fn read(&self, path: &AttrPath, buf: &mut [u8]) -> IMStatusCode {
        self.check_locked();

        if let Some(status) = self.failure() {
            return status;
        }

        match self.attrs.lock().unwrap().get(path) {
            Some((data, _)) => {
                let len = data.len().min(buf.len());
                buf[..len].copy_from_slice(&data[..len]);
                IMStatusCode::Success
            }
            None => IMStatusCode::UnsupportedAttribute,
        }
    }

    fn write(&self, path: &AttrPath, data: &[u8], zcl_type: ZclType) -> IMStatusCode {
        self.check_locked();

        if let Some(status) = self.failure() {
            return status;
        }

        self.writes.fetch_add(1, Ordering::SeqCst);
        self.set_raw(path, data, zcl_type);

        IMStatusCode::Success
    }

    fn contains_server(&self, endpoint: EndptId, cluster: ClusterId) -> bool {
        self.check_locked();

        self.servers.lock().unwrap().contains(&(endpoint, cluster))
    }

    fn metadata(&self, path: &AttrPath) -> Option<AttrMetadata> {
        self.metadata.lock().unwrap().get(path).copied()
    }

    fn mark_dirty(&self, path: &AttrPath) {
        self.check_locked();

        self.dirty.lock().unwrap().push(*path);
    }
}

struct Cached {
    flags: AttrFlags,
    raw: Vec<u8>,
    zcl_type: u8,
    size: u16,
    nullable: bool,
}

impl Cached {
    fn encode(flags: AttrFlags, val: &AttrVal<'_>) -> Result<Self, Error> {
        let mut raw = vec![0; codec::encoded_len(val)? as usize];
        let info = codec::encode_into(val, &mut raw)?;

        Ok(Self {
            flags,
            raw,
            zcl_type: info.zcl_type as u8,
            size: val.buf().map(|buf| buf.size()).unwrap_or(info.size),
            nullable: val.val_type().is_nullable(),
        })
    }
}

/// An in-memory application data model keeping its values in their raw layout.
///
/// Values round-trip through the codec, so kinds sharing a storage type (like
/// `AttrVal::Int` and `AttrVal::U16`) read back as the decoded kind.
#[derive(Default)]
pub struct MemDataModel {
    attrs: Mutex<HashMap<AttrPath, Cached>>,
    priv_data: Option<Box<PrivData>>,
}

impl MemDataModel {
    pub fn with_priv_data(priv_data: Box<PrivData>) -> Self {
        Self {
            attrs: Mutex::new(HashMap::new()),
            priv_data: Some(priv_data),
        }
    }

    pub fn add(&self, path: &AttrPath, flags: AttrFlags, val: &AttrVal<'_>) {
        let cached = Cached::encode(flags, val).unwrap();
        self.attrs.lock().unwrap().insert(*path, cached);
    }

    /// The cached value printed with `Debug`, as values borrow the cache.
    pub fn val_debug(&self, path: &AttrPath) -> Option<String> {
        let mut out = None;
        self.with_val(path, &mut |val| out = Some(format!("{:?}", val)))
            .ok()?;
        out
    }
}

impl AttrDataModel for MemDataModel {
    fn flags(&self, path: &AttrPath) -> Option<AttrFlags> {
        self.attrs.lock().unwrap().get(path).map(|cached| cached.flags)
    }

    fn with_val(&self, path: &AttrPath, f: &mut dyn FnMut(&AttrVal<'_>)) -> Result<(), Error> {
        let attrs = self.attrs.lock().unwrap();
        let cached = attrs.get(path).ok_or(ErrorCode::AttributeNotFound)?;

        let val = codec::decode(cached.zcl_type, cached.size, &cached.raw, cached.nullable)?;
        f(&val);

        Ok(())
    }

    fn set_val(&self, path: &AttrPath, val: &AttrVal<'_>) -> Result<(), Error> {
        let mut attrs = self.attrs.lock().unwrap();
        let flags = attrs
            .get(path)
            .map(|cached| cached.flags)
            .ok_or(ErrorCode::AttributeNotFound)?;

        attrs.insert(*path, Cached::encode(flags, val)?);

        Ok(())
    }

    fn priv_data(&self, _endpoint: EndptId) -> Option<&PrivData> {
        self.priv_data.as_deref()
    }
}
