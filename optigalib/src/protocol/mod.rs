// Copyright (c) 2020 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

use codec::{enum_builder, Codec, Reader, Writer};
use core::fmt;

/// Reference to a data object in the secure element's object store.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct OptigaOid(pub u16);

impl OptigaOid {
    pub const DEVICE_CERTIFICATE_1: OptigaOid = OptigaOid(0xE0E0);
    pub const DEVICE_CERTIFICATE_2: OptigaOid = OptigaOid(0xE0E1);
    pub const DEVICE_CERTIFICATE_3: OptigaOid = OptigaOid(0xE0E2);
    pub const DEVICE_CERTIFICATE_4: OptigaOid = OptigaOid(0xE0E3);
    pub const TRUST_ANCHOR_1: OptigaOid = OptigaOid(0xE0E8);
    pub const TRUST_ANCHOR_2: OptigaOid = OptigaOid(0xE0E9);
    pub const ROOT_OF_TRUST: OptigaOid = OptigaOid(0xE0EF);
    pub const ARBITRARY_DATA_TYPE1_FIRST: OptigaOid = OptigaOid(0xF1D0);
    pub const ARBITRARY_DATA_TYPE1_LAST: OptigaOid = OptigaOid(0xF1DB);
    pub const ARBITRARY_DATA_TYPE2_FIRST: OptigaOid = OptigaOid(0xF1E0);
    pub const ARBITRARY_DATA_TYPE2_LAST: OptigaOid = OptigaOid(0xF1E1);

    pub fn get_u16(&self) -> u16 {
        self.0
    }

    /// Addressable size in bytes of the object, `None` for objects whose
    /// layout is not known to the host.
    pub fn max_size(&self) -> Option<usize> {
        match self.0 {
            0xE0E0..=0xE0E3 => Some(1728),
            0xE0E8..=0xE0E9 => Some(1200),
            0xE0EF => Some(1200),
            0xF1D0..=0xF1DB => Some(140),
            0xF1E0..=0xF1E1 => Some(1500),
            _ => None,
        }
    }
}

impl fmt::Display for OptigaOid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:04X}", self.0)
    }
}

impl From<u16> for OptigaOid {
    fn from(oid: u16) -> Self {
        OptigaOid(oid)
    }
}

impl Codec for OptigaOid {
    fn encode(&self, bytes: &mut Writer) -> Result<usize, codec::EncodeErr> {
        self.0.encode(bytes)
    }

    fn read(r: &mut Reader) -> Option<OptigaOid> {
        u16::read(r).map(OptigaOid)
    }
}

/// How a data write treats the content already stored in the object.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum OptigaWriteMode {
    /// Overwrite the addressed range only; bytes past it stay as they were.
    Write,
    /// Clear the whole object first, then write.
    EraseAndWrite,
}

bitflags! {
    #[derive(Default)]
    pub struct OptigaProtectionLevel: u8 {
        const NO_PROTECTION = 0b0000_0000;
        const COMMAND_PROTECTION = 0b0000_0001;
        const RESPONSE_PROTECTION = 0b0000_0010;
        const FULL_PROTECTION = Self::COMMAND_PROTECTION.bits | Self::RESPONSE_PROTECTION.bits;
    }
}

impl Codec for OptigaProtectionLevel {
    fn encode(&self, bytes: &mut Writer) -> Result<usize, codec::EncodeErr> {
        self.bits().encode(bytes)
    }

    fn read(r: &mut Reader) -> Option<OptigaProtectionLevel> {
        let bits = u8::read(r)?;

        OptigaProtectionLevel::from_bits(bits)
    }
}

enum_builder! {
    @U8
    EnumName: OptigaLifeCycleState;
    EnumVal{
        Creation => 0x01,
        Initialization => 0x03,
        Operational => 0x07,
        Termination => 0x0F
    }
}
impl Default for OptigaLifeCycleState {
    fn default() -> OptigaLifeCycleState {
        OptigaLifeCycleState::Creation
    }
}

enum_builder! {
    @U8
    EnumName: OptigaDeviceErrorCode;
    EnumVal{
        InvalidOid => 0x01,
        InvalidParamField => 0x03,
        InvalidLengthField => 0x04,
        InvalidParameterInDataField => 0x05,
        InternalProcessError => 0x06,
        AccessConditionsNotSatisfied => 0x07,
        DataObjectBoundaryExceeded => 0x08,
        MetadataTruncationError => 0x09,
        InvalidCommandField => 0x0A
    }
}
impl Default for OptigaDeviceErrorCode {
    fn default() -> OptigaDeviceErrorCode {
        OptigaDeviceErrorCode::Unknown(0)
    }
}
