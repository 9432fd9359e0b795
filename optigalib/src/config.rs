// Copyright (c) 2021 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

/// Number of util instances that may be alive at the same time.
pub const MAX_OPTIGA_UTIL_INSTANCES: usize = 4;

/// Number of logical channels to the secure element.
pub const MAX_OPTIGA_CHANNELS: usize = 8;

/// Size of the command buffer, APDU header included.
pub const MAX_OPTIGA_COMMS_BUFFER_SIZE: usize = 0x615;

/// Upper bound of an encoded metadata record, `0x20` wrapper included.
pub const MAX_OPTIGA_METADATA_SIZE: usize = 255;

/// Interval between two status checks while waiting for a completion.
pub const OPTIGA_DEFAULT_POLL_INTERVAL_US: usize = 1_000;
