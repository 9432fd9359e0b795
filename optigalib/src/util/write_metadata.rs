// Copyright (c) 2020 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

use super::context::{InstanceHandle, OptigaUtilContext};
use crate::error::{OptigaResult, OPTIGA_STATUS_INSTANCE_IN_USE};
use crate::message::{OptigaSetDataObjectParam, OptigaSetDataObjectRequest};
use crate::metadata::{decode_metadata, encode_metadata, MetadataRecord};
use crate::protocol::OptigaOid;

impl OptigaUtilContext {
    /// Replace the metadata of `oid` with an encoded metadata record.
    ///
    /// The record is checked locally first, a malformed one is never sent.
    pub fn write_metadata(
        &self,
        handle: InstanceHandle,
        oid: OptigaOid,
        metadata: &[u8],
    ) -> OptigaResult {
        let slot = self.slot(handle)?;
        if slot.is_busy() {
            return Err(OPTIGA_STATUS_INSTANCE_IN_USE);
        }

        if let Err(e) = decode_metadata(metadata) {
            error!("write_metadata: rejected for {}: {:02X?}\n", oid, metadata);
            return Err(e);
        }

        let request = OptigaSetDataObjectRequest {
            param: OptigaSetDataObjectParam::WriteMetadata,
            oid,
            offset: 0,
            data: metadata.to_vec(),
        };
        self.send_command(&slot, &request)
    }

    pub fn write_metadata_record(
        &self,
        handle: InstanceHandle,
        oid: OptigaOid,
        record: &MetadataRecord,
    ) -> OptigaResult {
        let metadata = encode_metadata(record)?;
        self.write_metadata(handle, oid, &metadata)
    }
}
