// Copyright (c) 2020 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

pub mod completion;
pub mod instance;

pub use completion::Completion;
pub use instance::{
    CommandDone, CompletionStatus, InstanceSlot, OptigaCallback, OptigaCallbackContext,
};

use crate::config;
use crate::error::OptigaResult;
use crate::protocol::OptigaProtectionLevel;

/// Driver interface to the secure element.
///
/// `send` hands the command over and returns without waiting for the secure
/// element to execute it. The driver reports the outcome by consuming `done`,
/// either from inside `send`, from its own context, or from `poll`. When
/// `send` fails the driver must not complete `done`; a late completion is
/// dropped.
pub trait OptigaDeviceIo {
    fn send(
        &mut self,
        channel: u8,
        protection: OptigaProtectionLevel,
        apdu: &[u8],
        done: CommandDone,
    ) -> OptigaResult;

    /// Progress pending commands, called while a caller waits.
    fn poll(&mut self) {}
}

#[derive(Debug, Clone)]
pub struct OptigaConfigInfo {
    /// Sleep between two completion checks in `wait`.
    pub poll_interval_us: usize,
    /// Protection level of newly created instances.
    pub default_protection_level: OptigaProtectionLevel,
}

impl Default for OptigaConfigInfo {
    fn default() -> Self {
        OptigaConfigInfo {
            poll_interval_us: config::OPTIGA_DEFAULT_POLL_INTERVAL_US,
            default_protection_level: OptigaProtectionLevel::NO_PROTECTION,
        }
    }
}
