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

//! Routing of attribute events to the application callbacks.
//!
//! There is one common callback and, for attributes flagged with
//! `AttrFlags::OVERRIDE`, an optional override callback per attribute.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use log::info;

use crate::dm::PrivData;
use crate::error::{Error, ErrorCode};
use crate::im::AttrPath;
use crate::val::AttrVal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallbackType {
    /// Before the value is updated in the store. A failure vetoes the update.
    PreUpdate,
    /// After the value was updated in the store
    PostUpdate,
    /// The value of an override attribute is read
    Read,
    /// The value of an override attribute is written
    Write,
}

/// An application callback.
///
/// `val` may borrow from the callback itself, so that a `CallbackType::Read`
/// override can serve a string or an array out of its own buffers.
pub trait AttrCallback: Sync {
    fn call<'v>(
        &'v self,
        ty: CallbackType,
        path: &AttrPath,
        val: &mut AttrVal<'v>,
        priv_data: Option<&'v PrivData>,
    ) -> Result<(), Error>;
}

impl<T> AttrCallback for T
where
    T: Fn(CallbackType, &AttrPath, &mut AttrVal<'_>, Option<&PrivData>) -> Result<(), Error> + Sync,
{
    fn call<'v>(
        &'v self,
        ty: CallbackType,
        path: &AttrPath,
        val: &mut AttrVal<'v>,
        priv_data: Option<&'v PrivData>,
    ) -> Result<(), Error> {
        self(ty, path, val, priv_data)
    }
}

struct State<'a, const N: usize> {
    common: Option<&'a dyn AttrCallback>,
    overrides: heapless::Vec<(AttrPath, &'a dyn AttrCallback), N>,
}

/// The callback registry, with room for `N` override callbacks.
pub struct Callbacks<'a, M, const N: usize>
where
    M: RawMutex,
{
    state: Mutex<M, RefCell<State<'a, N>>>,
}

impl<'a, M, const N: usize> Callbacks<'a, M, N>
where
    M: RawMutex,
{
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(RefCell::new(State {
                common: None,
                overrides: heapless::Vec::new(),
            })),
        }
    }

    /// Set the common callback, replacing the previous one.
    pub fn set_callback(&self, callback: &'a dyn AttrCallback) {
        self.state.lock(|state| state.borrow_mut().common = Some(callback));
    }

    /// Set the override callback of an attribute, replacing the previous one.
    ///
    /// Fails with `ErrorCode::NoSpace` if the registry is full.
    pub fn set_override_callback(
        &self,
        path: &AttrPath,
        callback: &'a dyn AttrCallback,
    ) -> Result<(), Error> {
        self.state.lock(|state| {
            let mut state = state.borrow_mut();

            if let Some(entry) = state.overrides.iter_mut().find(|(p, _)| p == path) {
                entry.1 = callback;
                return Ok(());
            }

            state
                .overrides
                .push((*path, callback))
                .map_err(|_| ErrorCode::NoSpace.into())
        })
    }

    pub fn override_callback(&self, path: &AttrPath) -> Option<&'a dyn AttrCallback> {
        self.state.lock(|state| {
            state
                .borrow()
                .overrides
                .iter()
                .find(|(p, _)| p == path)
                .map(|(_, callback)| *callback)
        })
    }

    fn common(&self) -> Option<&'a dyn AttrCallback> {
        self.state.lock(|state| state.borrow().common)
    }

    /// Call the common callback, if any.
    pub fn execute_callback<'v>(
        &self,
        ty: CallbackType,
        path: &AttrPath,
        val: &mut AttrVal<'v>,
        priv_data: Option<&'v PrivData>,
    ) -> Result<(), Error>
    where
        'a: 'v,
    {
        match self.common() {
            Some(callback) => callback.call(ty, path, val, priv_data),
            None => Ok(()),
        }
    }

    /// Call the override callback of the attribute, or the common callback if
    /// the attribute has none.
    pub fn execute_override_callback<'v>(
        &self,
        ty: CallbackType,
        path: &AttrPath,
        val: &mut AttrVal<'v>,
        priv_data: Option<&'v PrivData>,
    ) -> Result<(), Error>
    where
        'a: 'v,
    {
        if let Some(callback) = self.override_callback(path) {
            return callback.call(ty, path, val, priv_data);
        }

        info!(
            "Attribute override callback not set for {}, calling the common callback",
            path
        );

        self.execute_callback(ty, path, val, priv_data)
    }
}

impl<M, const N: usize> Default for Callbacks<'_, M, N>
where
    M: RawMutex,
{
    fn default() -> Self {
        Self::new()
    }
}
