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

//! The stack lock serializing every access to the attribute store.
//!
//! The lock detects re-entry: taking it from the context that already holds it
//! reports `LockStatus::AlreadyTaken` rather than blocking. Only the caller that
//! got `LockStatus::Success` releases it, which `StackLockGuard` takes care of.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, ThreadId};

use embassy_sync::blocking_mutex::raw::RawMutex;
use log::{error, warn};

use crate::config::LockTimeout;
use crate::error::{Error, ErrorCode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockStatus {
    /// The lock was taken by this call
    Success,
    /// The calling context already holds the lock
    AlreadyTaken,
    /// The lock could not be taken within the timeout
    Failed,
}

pub trait StackLock {
    fn lock(&self, timeout: LockTimeout) -> LockStatus;

    fn unlock(&self);
}

/// Holds the stack lock for its lifetime, if it was the one taking it.
pub struct StackLockGuard<'a, L>
where
    L: StackLock + ?Sized,
{
    lock: &'a L,
    status: LockStatus,
}

impl<'a, L> StackLockGuard<'a, L>
where
    L: StackLock + ?Sized,
{
    /// Take `lock`, failing with `ErrorCode::Busy` if it cannot be taken.
    pub fn acquire(lock: &'a L, timeout: LockTimeout) -> Result<Self, Error> {
        match lock.lock(timeout) {
            LockStatus::Failed => {
                error!("Could not get task context");
                Err(ErrorCode::Busy.into())
            }
            status => Ok(Self { lock, status }),
        }
    }

    pub fn status(&self) -> LockStatus {
        self.status
    }
}

impl<L> Drop for StackLockGuard<'_, L>
where
    L: StackLock + ?Sized,
{
    fn drop(&mut self) {
        if self.status == LockStatus::Success {
            self.lock.unlock();
        }
    }
}

/// A `StackLock` on top of `std::sync`, owned by one thread at a time.
#[derive(Default)]
pub struct StdStackLock {
    owner: Mutex<Option<ThreadId>>,
    released: Condvar,
}

impl StdStackLock {
    pub const fn new() -> Self {
        Self {
            owner: Mutex::new(None),
            released: Condvar::new(),
        }
    }

    /// Return `true` if the calling thread holds the lock.
    pub fn is_held(&self) -> bool {
        *self.owner() == Some(thread::current().id())
    }

    fn owner(&self) -> MutexGuard<'_, Option<ThreadId>> {
        // A poisoned owner id is still a valid owner id
        self.owner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl StackLock for StdStackLock {
    fn lock(&self, timeout: LockTimeout) -> LockStatus {
        let me = thread::current().id();
        let owner = self.owner();

        if *owner == Some(me) {
            return LockStatus::AlreadyTaken;
        }

        let mut owner = match timeout {
            LockTimeout::Forever => self
                .released
                .wait_while(owner, |owner| owner.is_some())
                .unwrap_or_else(PoisonError::into_inner),
            LockTimeout::Bounded(timeout) => {
                let (owner, _) = self
                    .released
                    .wait_timeout_while(owner, timeout, |owner| owner.is_some())
                    .unwrap_or_else(PoisonError::into_inner);
                owner
            }
        };

        if owner.is_some() {
            return LockStatus::Failed;
        }

        *owner = Some(me);

        LockStatus::Success
    }

    fn unlock(&self) {
        let mut owner = self.owner();

        if *owner != Some(thread::current().id()) {
            warn!("Stack lock released by a thread not holding it");
            return;
        }

        *owner = None;
        self.released.notify_one();
    }
}

/// An `embassy-sync` `RawMutex` on top of `std::sync::Mutex`, for sharing the
/// callback registry between threads.
///
/// Unlike the std `RawMutex` of `rs-matter`, a mutex poisoned by a panicking
/// callback stays usable.
#[derive(Default)]
pub struct StdRawMutex(Mutex<()>);

impl StdRawMutex {
    pub const fn new() -> Self {
        Self(Mutex::new(()))
    }
}

unsafe impl RawMutex for StdRawMutex {
    #[allow(clippy::declare_interior_mutable_const)]
    const INIT: Self = StdRawMutex::new();

    fn lock<R>(&self, f: impl FnOnce() -> R) -> R {
        let _guard = self.0.lock().unwrap_or_else(PoisonError::into_inner);

        f()
    }
}
