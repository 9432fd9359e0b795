// Copyright (c) 2020 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

use super::{OptigaCommandCode, OptigaCommandHeader, OPTIGA_APDU_HEADER_SIZE};
use crate::protocol::{OptigaOid, OptigaWriteMode};
use codec::enum_builder;
use codec::{Codec, Reader, Writer};
use alloc::vec::Vec;
use zeroize::ZeroizeOnDrop;

/// OID and offset in front of the data.
pub const OPTIGA_SET_DATA_OBJECT_FIXED_SIZE: usize = 4;

enum_builder! {
    @U8
    EnumName: OptigaSetDataObjectParam;
    EnumVal{
        WriteData => 0x00,
        WriteMetadata => 0x01,
        EraseAndWriteData => 0x40
    }
}
impl Default for OptigaSetDataObjectParam {
    fn default() -> OptigaSetDataObjectParam {
        OptigaSetDataObjectParam::WriteData
    }
}

impl From<OptigaWriteMode> for OptigaSetDataObjectParam {
    fn from(mode: OptigaWriteMode) -> Self {
        match mode {
            OptigaWriteMode::Write => OptigaSetDataObjectParam::WriteData,
            OptigaWriteMode::EraseAndWrite => OptigaSetDataObjectParam::EraseAndWriteData,
        }
    }
}

/// Complete `SetDataObject` command APDU. The data is scrubbed on drop.
#[derive(Debug, Clone, Default, PartialEq, Eq, ZeroizeOnDrop)]
pub struct OptigaSetDataObjectRequest {
    #[zeroize(skip)]
    pub param: OptigaSetDataObjectParam,
    #[zeroize(skip)]
    pub oid: OptigaOid,
    pub offset: u16,
    pub data: Vec<u8>,
}

impl OptigaSetDataObjectRequest {
    pub fn encoded_size(&self) -> usize {
        OPTIGA_APDU_HEADER_SIZE + OPTIGA_SET_DATA_OBJECT_FIXED_SIZE + self.data.len()
    }
}

impl Codec for OptigaSetDataObjectRequest {
    fn encode(&self, bytes: &mut Writer) -> Result<usize, codec::EncodeErr> {
        let length = OPTIGA_SET_DATA_OBJECT_FIXED_SIZE + self.data.len();
        if length > u16::MAX as usize {
            return Err(codec::EncodeErr);
        }
        let header = OptigaCommandHeader {
            command_code: OptigaCommandCode::OptigaCmdSetDataObject,
            param: self.param.get_u8(),
            length: length as u16,
        };
        let mut cnt = 0usize;
        cnt += header.encode(bytes)?;
        cnt += self.oid.encode(bytes)?;
        cnt += self.offset.encode(bytes)?;
        cnt += bytes
            .extend_from_slice(&self.data)
            .ok_or(codec::EncodeErr)?;
        Ok(cnt)
    }

    fn read(r: &mut Reader) -> Option<OptigaSetDataObjectRequest> {
        let header = OptigaCommandHeader::read(r)?;
        if header.command_code != OptigaCommandCode::OptigaCmdSetDataObject {
            return None;
        }
        let param = OptigaSetDataObjectParam::read_bytes(&[header.param])?;
        if let OptigaSetDataObjectParam::Unknown(_) = param {
            return None;
        }
        let length = header.length as usize;
        if length < OPTIGA_SET_DATA_OBJECT_FIXED_SIZE {
            return None;
        }
        let mut payload = r.sub(length)?;
        let oid = OptigaOid::read(&mut payload)?;
        let offset = u16::read(&mut payload)?;
        let data = payload.rest().to_vec();
        Some(OptigaSetDataObjectRequest {
            param,
            oid,
            offset,
            data,
        })
    }
}

#[cfg(test)]
#[path = "set_data_object_test.rs"]
mod set_data_object_test;
