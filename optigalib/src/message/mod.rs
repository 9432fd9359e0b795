// Copyright (c) 2020 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

use crate::error::{optiga_device_status, OptigaStatus, OPTIGA_STATUS_SUCCESS};
use codec::enum_builder;
use codec::{Codec, Reader, Writer};

pub mod set_data_object;

pub use set_data_object::*;

pub const OPTIGA_APDU_HEADER_SIZE: usize = 4;

enum_builder! {
    @U8
    EnumName: OptigaCommandCode;
    EnumVal{
        OptigaCmdGetDataObject => 0x81,
        OptigaCmdSetDataObject => 0x82
    }
}
impl Default for OptigaCommandCode {
    fn default() -> OptigaCommandCode {
        OptigaCommandCode::Unknown(0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptigaCommandHeader {
    pub command_code: OptigaCommandCode,
    pub param: u8,
    pub length: u16,
}

impl Codec for OptigaCommandHeader {
    fn encode(&self, bytes: &mut Writer) -> Result<usize, codec::EncodeErr> {
        let mut cnt = 0usize;
        cnt += self.command_code.encode(bytes)?;
        cnt += self.param.encode(bytes)?;
        cnt += self.length.encode(bytes)?;
        Ok(cnt)
    }

    fn read(r: &mut Reader) -> Option<OptigaCommandHeader> {
        let command_code = OptigaCommandCode::read(r)?;
        let param = u8::read(r)?;
        let length = u16::read(r)?;
        Some(OptigaCommandHeader {
            command_code,
            param,
            length,
        })
    }
}

enum_builder! {
    @U8
    EnumName: OptigaResponseStatus;
    EnumVal{
        OptigaResponseSuccess => 0x00,
        OptigaResponseFailure => 0xFF
    }
}
impl Default for OptigaResponseStatus {
    fn default() -> OptigaResponseStatus {
        OptigaResponseStatus::OptigaResponseSuccess
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptigaResponseHeader {
    pub status: OptigaResponseStatus,
    pub length: u16,
}

impl Codec for OptigaResponseHeader {
    fn encode(&self, bytes: &mut Writer) -> Result<usize, codec::EncodeErr> {
        let mut cnt = 0usize;
        cnt += self.status.encode(bytes)?;
        cnt += 0u8.encode(bytes)?; // undefined
        cnt += self.length.encode(bytes)?;
        Ok(cnt)
    }

    fn read(r: &mut Reader) -> Option<OptigaResponseHeader> {
        let status = OptigaResponseStatus::read(r)?;
        u8::read(r)?; // undefined
        let length = u16::read(r)?;
        Some(OptigaResponseHeader { status, length })
    }
}

/// Map a response APDU onto the status reported to the caller.
///
/// A failure response carries the device error code as its first data byte.
/// `None` if the response is not a well formed APDU.
pub fn decode_response_status(response: &[u8]) -> Option<OptigaStatus> {
    let mut reader = Reader::init(response);
    let header = OptigaResponseHeader::read(&mut reader)?;
    let data = reader.take(header.length as usize)?;
    if reader.any_left() {
        return None;
    }
    match header.status {
        OptigaResponseStatus::OptigaResponseSuccess => Some(OPTIGA_STATUS_SUCCESS),
        OptigaResponseStatus::OptigaResponseFailure => {
            Some(optiga_device_status(*data.first()?))
        }
        OptigaResponseStatus::Unknown(_) => None,
    }
}

/// Build a response APDU. Failures carry `error_code` as the only data byte.
pub fn encode_response(error_code: Option<u8>, buf: &mut [u8]) -> Option<usize> {
    let mut writer = Writer::init(buf);
    let header = match error_code {
        None => OptigaResponseHeader {
            status: OptigaResponseStatus::OptigaResponseSuccess,
            length: 0,
        },
        Some(_) => OptigaResponseHeader {
            status: OptigaResponseStatus::OptigaResponseFailure,
            length: 1,
        },
    };
    header.encode(&mut writer).ok()?;
    if let Some(code) = error_code {
        code.encode(&mut writer).ok()?;
    }
    Some(writer.used())
}
