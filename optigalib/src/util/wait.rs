// Copyright (c) 2020 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

use super::context::{InstanceHandle, OptigaUtilContext};
use crate::common::{Completion, CompletionStatus};
use crate::error::{OptigaResult, OptigaStatus, OPTIGA_STATUS_TIMEOUT};
use crate::time;
use core::time::Duration;

impl OptigaUtilContext {
    /// Block until the operation in flight completes or `timeout` passes.
    ///
    /// Returns the status reported for the operation, success or not. On
    /// timeout the instance stays busy and a later `wait` may still collect
    /// the outcome.
    pub fn wait(&self, handle: InstanceHandle, timeout: Duration) -> OptigaResult<OptigaStatus> {
        let slot = self.slot(handle)?;
        let interval = self.config_info().poll_interval_us.max(1);
        let timeout_us = timeout.as_micros();
        let mut elapsed_us = 0u128;

        loop {
            self.poll_device();
            if let Some(status) = slot.take_outcome()? {
                return Ok(status);
            }
            if elapsed_us >= timeout_us {
                warn!(
                    "instance {} no completion after {} us\n",
                    handle, elapsed_us
                );
                return Err(OPTIGA_STATUS_TIMEOUT);
            }
            time::sleep(interval);
            elapsed_us += interval as u128;
        }
    }

    /// Like [`wait`](Self::wait), with a failed operation reported as `Err`.
    pub fn wait_and_check(&self, handle: InstanceHandle, timeout: Duration) -> OptigaResult {
        let status = self.wait(handle, timeout)?;
        if status.is_success() {
            Ok(())
        } else {
            Err(status)
        }
    }

    /// Current state of the operation submitted last, without blocking.
    pub fn status(&self, handle: InstanceHandle) -> OptigaResult<CompletionStatus> {
        let slot = self.slot(handle)?;
        self.poll_device();
        slot.status()
    }

    pub fn completion(&self, handle: InstanceHandle) -> OptigaResult<Completion> {
        Ok(Completion::new(self.slot(handle)?))
    }
}
