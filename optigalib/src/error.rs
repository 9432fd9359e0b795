// Copyright (c) 2023 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

use core::convert::TryFrom;
use core::fmt;

// Wire layout of a status word:
//
// | bits   | meaning                                  |
// |--------|------------------------------------------|
// | 0x8000 | set for errors reported by the device    |
// | 0x7F00 | status class for host side errors        |
// | 0x00FF | code within the class                    |
//
// `0x0000` is success. Device errors keep the device error code verbatim
// in the low byte.

#[repr(u8)]
#[allow(dead_code)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum StatusSeverity {
    SUCCESS = 0,
    ERROR = 8,
}

impl Default for StatusSeverity {
    fn default() -> Self {
        Self::ERROR
    }
}

#[repr(u8)]
#[allow(dead_code)]
#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum StatusCodeComms {
    ERROR = 0x02,
    SEND_FAIL = 0x03,
    RESPONSE_FAIL = 0x04,
}

impl TryFrom<u8> for StatusCodeComms {
    type Error = ();

    fn try_from(value: u8) -> core::result::Result<Self, Self::Error> {
        match value {
            0x02 => Ok(Self::ERROR),
            0x03 => Ok(Self::SEND_FAIL),
            0x04 => Ok(Self::RESPONSE_FAIL),
            _ => Err(()),
        }
    }
}

#[repr(u8)]
#[allow(dead_code)]
#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum StatusCodeUtil {
    ERROR = 0x00,
    INVALID_INPUT = 0x01,
    INSTANCE_IN_USE = 0x03,
    INSTANCE_INVALID = 0x04,
    CHANNEL_UNAVAILABLE = 0x05,
    TIMEOUT = 0x06,
    NO_OPERATION = 0x07,
}

impl TryFrom<u8> for StatusCodeUtil {
    type Error = ();

    fn try_from(value: u8) -> core::result::Result<Self, Self::Error> {
        match value {
            0x00 => Ok(Self::ERROR),
            0x01 => Ok(Self::INVALID_INPUT),
            0x03 => Ok(Self::INSTANCE_IN_USE),
            0x04 => Ok(Self::INSTANCE_INVALID),
            0x05 => Ok(Self::CHANNEL_UNAVAILABLE),
            0x06 => Ok(Self::TIMEOUT),
            0x07 => Ok(Self::NO_OPERATION),
            _ => Err(()),
        }
    }
}

#[repr(u8)]
#[allow(dead_code)]
#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum StatusCodeMetadata {
    ENCODING_ERROR = 0x01,
    MALFORMED_METADATA = 0x02,
}

impl TryFrom<u8> for StatusCodeMetadata {
    type Error = ();

    fn try_from(value: u8) -> core::result::Result<Self, Self::Error> {
        match value {
            0x01 => Ok(Self::ENCODING_ERROR),
            0x02 => Ok(Self::MALFORMED_METADATA),
            _ => Err(()),
        }
    }
}

#[allow(dead_code)]
#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum StatusCode {
    SUCCESS,
    COMMS(StatusCodeComms),
    UTIL(StatusCodeUtil),
    METADATA(StatusCodeMetadata),
    /// Error code reported by the secure element, passed through untouched.
    DEVICE(u8),
}

impl Default for StatusCode {
    fn default() -> Self {
        Self::UTIL(StatusCodeUtil::ERROR)
    }
}

const STATUS_CLASS_COMMS: u8 = 0x01;
const STATUS_CLASS_UTIL: u8 = 0x06;
const STATUS_CLASS_METADATA: u8 = 0x07;
const STATUS_DEVICE_ERROR: u16 = 0x8000;

impl TryFrom<u16> for StatusCode {
    type Error = ();

    fn try_from(value: u16) -> core::result::Result<Self, Self::Error> {
        if value == 0 {
            return Ok(StatusCode::SUCCESS);
        }
        let code = (value & 0x00FF) as u8;
        if value & STATUS_DEVICE_ERROR != 0 {
            if value & 0x7F00 != 0 {
                return Err(());
            }
            return Ok(StatusCode::DEVICE(code));
        }
        match (value >> 8) as u8 {
            STATUS_CLASS_COMMS => Ok(StatusCode::COMMS(StatusCodeComms::try_from(code)?)),
            STATUS_CLASS_UTIL => Ok(StatusCode::UTIL(StatusCodeUtil::try_from(code)?)),
            STATUS_CLASS_METADATA => Ok(StatusCode::METADATA(StatusCodeMetadata::try_from(
                code,
            )?)),
            _ => Err(()),
        }
    }
}

impl From<StatusCode> for u16 {
    fn from(status_code: StatusCode) -> u16 {
        match status_code {
            StatusCode::SUCCESS => 0,
            StatusCode::COMMS(c) => ((STATUS_CLASS_COMMS as u16) << 8) | c as u16,
            StatusCode::UTIL(c) => ((STATUS_CLASS_UTIL as u16) << 8) | c as u16,
            StatusCode::METADATA(c) => ((STATUS_CLASS_METADATA as u16) << 8) | c as u16,
            StatusCode::DEVICE(c) => STATUS_DEVICE_ERROR | c as u16,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct OptigaStatus {
    pub severity: StatusSeverity,
    pub status_code: StatusCode,
}

impl OptigaStatus {
    /// return the u16 encoding
    pub fn get_u16(&self) -> u16 {
        self.status_code.into()
    }

    /// get OptigaStatus structure from u16 value
    pub fn from_u16(status: u16) -> Option<Self> {
        let status_code = StatusCode::try_from(status).ok()?;
        let severity = match status_code {
            StatusCode::SUCCESS => StatusSeverity::SUCCESS,
            _ => StatusSeverity::ERROR,
        };
        Some(Self {
            severity,
            status_code,
        })
    }

    /// Returns true if severity is StatusSeverity::SUCCESS else it returns false.
    pub fn is_success(&self) -> bool {
        self.severity == StatusSeverity::SUCCESS
    }

    /// Returns true if severity is StatusSeverity::ERROR else it returns false.
    pub fn is_error(&self) -> bool {
        self.severity == StatusSeverity::ERROR
    }

    /// The error code the secure element reported, if this status came from it.
    pub fn device_error_code(&self) -> Option<u8> {
        match self.status_code {
            StatusCode::DEVICE(code) => Some(code),
            _ => None,
        }
    }
}

impl fmt::Display for OptigaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:04X} ({:?})", self.get_u16(), self.status_code)
    }
}

#[macro_export]
macro_rules! optiga_return_status {
    ($severity:expr, $status_code:expr) => {
        OptigaStatus {
            severity: $severity,
            status_code: $status_code,
        }
    };
}

pub use optiga_return_status;

pub const OPTIGA_STATUS_SUCCESS: OptigaStatus =
    optiga_return_status!(StatusSeverity::SUCCESS, StatusCode::SUCCESS);

/* - Comms Errors - */

/* Generic failure of the channel to the secure element. */
pub const OPTIGA_STATUS_COMMS_ERROR: OptigaStatus = optiga_return_status!(
    StatusSeverity::ERROR,
    StatusCode::COMMS(StatusCodeComms::ERROR)
);

/* Unable to hand the command to the transport. */
pub const OPTIGA_STATUS_SEND_FAIL: OptigaStatus = optiga_return_status!(
    StatusSeverity::ERROR,
    StatusCode::COMMS(StatusCodeComms::SEND_FAIL)
);

/* The response from the secure element could not be parsed. */
pub const OPTIGA_STATUS_RESPONSE_FAIL: OptigaStatus = optiga_return_status!(
    StatusSeverity::ERROR,
    StatusCode::COMMS(StatusCodeComms::RESPONSE_FAIL)
);

/* - Util Errors - */

/* Generic util layer failure. */
pub const OPTIGA_STATUS_UTIL_ERROR: OptigaStatus = optiga_return_status!(
    StatusSeverity::ERROR,
    StatusCode::UTIL(StatusCodeUtil::ERROR)
);

/* Bad offset, length, object reference or empty payload. */
pub const OPTIGA_STATUS_INVALID_INPUT: OptigaStatus = optiga_return_status!(
    StatusSeverity::ERROR,
    StatusCode::UTIL(StatusCodeUtil::INVALID_INPUT)
);

/* The instance already has an operation in flight, or no instance slot is free. */
pub const OPTIGA_STATUS_INSTANCE_IN_USE: OptigaStatus = optiga_return_status!(
    StatusSeverity::ERROR,
    StatusCode::UTIL(StatusCodeUtil::INSTANCE_IN_USE)
);

/* The handle does not name a live instance (destroyed or never created). */
pub const OPTIGA_STATUS_INSTANCE_INVALID: OptigaStatus = optiga_return_status!(
    StatusSeverity::ERROR,
    StatusCode::UTIL(StatusCodeUtil::INSTANCE_INVALID)
);

/* The channel does not exist or is bound to another instance. */
pub const OPTIGA_STATUS_CHANNEL_UNAVAILABLE: OptigaStatus = optiga_return_status!(
    StatusSeverity::ERROR,
    StatusCode::UTIL(StatusCodeUtil::CHANNEL_UNAVAILABLE)
);

/* The wait budget elapsed; the outcome of the operation is unknown. */
pub const OPTIGA_STATUS_TIMEOUT: OptigaStatus = optiga_return_status!(
    StatusSeverity::ERROR,
    StatusCode::UTIL(StatusCodeUtil::TIMEOUT)
);

/* Nothing was submitted on this instance, or its outcome was already collected. */
pub const OPTIGA_STATUS_NO_OPERATION: OptigaStatus = optiga_return_status!(
    StatusSeverity::ERROR,
    StatusCode::UTIL(StatusCodeUtil::NO_OPERATION)
);

/* - Metadata Errors - */

/* The record cannot be represented in the TLV layout. */
pub const OPTIGA_STATUS_ENCODING_ERROR: OptigaStatus = optiga_return_status!(
    StatusSeverity::ERROR,
    StatusCode::METADATA(StatusCodeMetadata::ENCODING_ERROR)
);

/* The bytes are not a well formed metadata record. */
pub const OPTIGA_STATUS_MALFORMED_METADATA: OptigaStatus = optiga_return_status!(
    StatusSeverity::ERROR,
    StatusCode::METADATA(StatusCodeMetadata::MALFORMED_METADATA)
);

/* - Device Errors - */

pub const fn optiga_device_status(code: u8) -> OptigaStatus {
    optiga_return_status!(StatusSeverity::ERROR, StatusCode::DEVICE(code))
}

pub type OptigaResult<T = ()> = core::result::Result<T, OptigaStatus>;
