// Copyright (c) 2020 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

use super::context::{InstanceHandle, OptigaUtilContext};
use crate::error::{OptigaResult, OPTIGA_STATUS_INSTANCE_IN_USE, OPTIGA_STATUS_INVALID_INPUT};
use crate::message::{OptigaSetDataObjectParam, OptigaSetDataObjectRequest};
use crate::protocol::{OptigaOid, OptigaWriteMode};

impl OptigaUtilContext {
    /// Write `data` into the object `oid` starting at `offset`.
    ///
    /// Returns once the command is handed to the driver; the outcome is
    /// reported through the instance callback and `wait`.
    pub fn write_data(
        &self,
        handle: InstanceHandle,
        oid: OptigaOid,
        mode: OptigaWriteMode,
        offset: u16,
        data: &[u8],
    ) -> OptigaResult {
        let slot = self.slot(handle)?;
        if slot.is_busy() {
            return Err(OPTIGA_STATUS_INSTANCE_IN_USE);
        }

        if data.is_empty() {
            error!("write_data: empty payload for {}\n", oid);
            return Err(OPTIGA_STATUS_INVALID_INPUT);
        }
        let max_size = match oid.max_size() {
            Some(max_size) => max_size,
            None => {
                error!("write_data: {} is not a writable data object\n", oid);
                return Err(OPTIGA_STATUS_INVALID_INPUT);
            }
        };
        if offset as usize + data.len() > max_size {
            error!(
                "write_data: {} bytes at offset {} exceed {} ({} bytes)\n",
                data.len(),
                offset,
                oid,
                max_size
            );
            return Err(OPTIGA_STATUS_INVALID_INPUT);
        }

        let request = OptigaSetDataObjectRequest {
            param: OptigaSetDataObjectParam::from(mode),
            oid,
            offset,
            data: data.to_vec(),
        };
        self.send_command(&slot, &request)
    }
}
