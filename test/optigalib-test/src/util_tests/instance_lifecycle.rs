// Copyright (c) 2020 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

use crate::common::{recording_callback, TestHarness};
use optiga_emu::CompletionMode;
use optigalib::config::MAX_OPTIGA_UTIL_INSTANCES;
use optigalib::error::{
    OPTIGA_STATUS_CHANNEL_UNAVAILABLE, OPTIGA_STATUS_INSTANCE_INVALID,
    OPTIGA_STATUS_INSTANCE_IN_USE, OPTIGA_STATUS_SUCCESS,
};
use optigalib::protocol::{OptigaOid, OptigaWriteMode};
use std::time::Duration;

#[test]
fn test_channel_released_on_destroy() {
    let harness = TestHarness::new(CompletionMode::Inline);
    let context = &harness.context;

    let handle = harness.create(1);
    assert_eq!(
        context.create(1, recording_callback, None),
        Err(OPTIGA_STATUS_CHANNEL_UNAVAILABLE)
    );
    context.destroy(handle).unwrap();
    let again = context.create(1, recording_callback, None).unwrap();
    assert_ne!(handle, again);
    assert_eq!(context.is_busy(handle), Err(OPTIGA_STATUS_INSTANCE_INVALID));
}

#[test]
fn test_destroy_busy_keeps_instance() {
    let harness = TestHarness::new(CompletionMode::Never);
    let context = &harness.context;
    let handle = harness.create(0);

    context
        .write_data(handle, OptigaOid(0xF1D0), OptigaWriteMode::Write, 0, &[1])
        .unwrap();
    assert_eq!(context.destroy(handle), Err(OPTIGA_STATUS_INSTANCE_IN_USE));
    // handle and channel binding survive
    assert_eq!(context.is_busy(handle), Ok(true));
    assert_eq!(
        context.create(0, recording_callback, None),
        Err(OPTIGA_STATUS_CHANNEL_UNAVAILABLE)
    );

    harness.device_io.lock().release_held();
    assert_eq!(
        context.wait(handle, Duration::from_millis(10)),
        Ok(OPTIGA_STATUS_SUCCESS)
    );
    assert!(context.destroy(handle).is_ok());
}

#[test]
fn test_instance_limit() {
    let harness = TestHarness::new(CompletionMode::Inline);
    let context = &harness.context;
    let handles: Vec<_> = (0..MAX_OPTIGA_UTIL_INSTANCES)
        .map(|channel| harness.create(channel as u8))
        .collect();
    assert_eq!(
        context.create(MAX_OPTIGA_UTIL_INSTANCES as u8, recording_callback, None),
        Err(OPTIGA_STATUS_INSTANCE_IN_USE)
    );
    context.destroy(handles[0]).unwrap();
    assert!(context
        .create(MAX_OPTIGA_UTIL_INSTANCES as u8, recording_callback, None)
        .is_ok());
}
