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

use core::time::Duration;

/// How long an operation waits for the stack lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LockTimeout {
    #[default]
    Forever,
    Bounded(Duration),
}

/// Tunables of the attribute layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub lock_timeout: LockTimeout,
    /// The largest encoded attribute `update` hands over to the attribute store
    pub max_attr_size: usize,
}

impl Config {
    pub const DEFAULT_MAX_ATTR_SIZE: usize = 259;

    pub const fn new() -> Self {
        Self {
            lock_timeout: LockTimeout::Forever,
            max_attr_size: Self::DEFAULT_MAX_ATTR_SIZE,
        }
    }

    pub const fn with_lock_timeout(mut self, lock_timeout: LockTimeout) -> Self {
        self.lock_timeout = lock_timeout;
        self
    }

    pub const fn with_max_attr_size(mut self, max_attr_size: usize) -> Self {
        self.max_attr_size = max_attr_size;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
