// Copyright (c) 2022 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

/// Platform hooks used while polling for a command completion.
#[derive(Clone)]
pub struct OptigaTime {
    /// Suspend the caller for `us` microseconds.
    pub sleep_cb: fn(us: usize),
}
