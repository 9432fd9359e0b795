// Copyright (c) 2020 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

use super::init_logger;
use crate::common::TestHarness;
use optiga_emu::CompletionMode;
use optigalib::common::CompletionStatus;
use optigalib::error::{
    OPTIGA_STATUS_INSTANCE_IN_USE, OPTIGA_STATUS_NO_OPERATION, OPTIGA_STATUS_SUCCESS,
    OPTIGA_STATUS_TIMEOUT,
};
use optigalib::protocol::{OptigaOid, OptigaWriteMode};
use std::time::{Duration, Instant};

const SHORT: Duration = Duration::from_millis(5);
const LONG: Duration = Duration::from_secs(2);

#[test]
fn test_wait_timeout_leaves_instance_busy() {
    init_logger();
    let harness = TestHarness::new(CompletionMode::Never);
    let context = &harness.context;
    let handle = harness.create(0);

    context
        .write_data(
            handle,
            OptigaOid::TRUST_ANCHOR_1,
            OptigaWriteMode::EraseAndWrite,
            0,
            &[1, 2, 3],
        )
        .unwrap();
    assert_eq!(context.wait(handle, SHORT), Err(OPTIGA_STATUS_TIMEOUT));
    assert_eq!(context.is_busy(handle), Ok(true));
    assert_eq!(context.status(handle), Ok(CompletionStatus::Pending));
    assert_eq!(harness.log.count(), 0);

    // still busy: no second command, no destroy
    assert_eq!(
        context.write_data(handle, OptigaOid::TRUST_ANCHOR_1, OptigaWriteMode::Write, 0, &[4]),
        Err(OPTIGA_STATUS_INSTANCE_IN_USE)
    );
    assert_eq!(context.destroy(handle), Err(OPTIGA_STATUS_INSTANCE_IN_USE));
    assert_eq!(harness.sent_count(), 1);

    // the device answers late, the outcome is still collected
    harness.device_io.lock().release_held();
    assert_eq!(context.wait(handle, SHORT), Ok(OPTIGA_STATUS_SUCCESS));
    assert_eq!(harness.log.count(), 1);
    assert!(context.destroy(handle).is_ok());
}

#[test]
fn test_wait_timeout_duration() {
    let harness = TestHarness::new(CompletionMode::Never);
    let context = &harness.context;
    let handle = harness.create(0);
    let timeout = Duration::from_millis(50);

    context
        .write_data(handle, OptigaOid(0xF1D0), OptigaWriteMode::Write, 0, &[1])
        .unwrap();
    let start = Instant::now();
    assert_eq!(context.wait(handle, timeout), Err(OPTIGA_STATUS_TIMEOUT));
    let elapsed = start.elapsed();
    assert!(elapsed >= timeout, "returned after {:?}", elapsed);
    assert!(elapsed < timeout + LONG, "returned after {:?}", elapsed);
}

#[test]
fn test_wait_zero_timeout() {
    let harness = TestHarness::new(CompletionMode::Never);
    let handle = harness.create(0);
    harness
        .context
        .write_data(handle, OptigaOid(0xF1D0), OptigaWriteMode::Write, 0, &[1])
        .unwrap();
    assert_eq!(
        harness.context.wait(handle, Duration::from_secs(0)),
        Err(OPTIGA_STATUS_TIMEOUT)
    );
}

#[test]
fn test_wait_without_operation() {
    let harness = TestHarness::new(CompletionMode::Inline);
    let handle = harness.create(0);
    assert_eq!(
        harness.context.wait(handle, SHORT),
        Err(OPTIGA_STATUS_NO_OPERATION)
    );
    assert_eq!(harness.context.status(handle), Err(OPTIGA_STATUS_NO_OPERATION));
}

#[test]
fn test_inline_completion_is_deferred() {
    let harness = TestHarness::new(CompletionMode::Inline);
    let context = &harness.context;
    let handle = harness.create(0);

    harness
        .log
        .submit(|| context.write_data(handle, OptigaOid(0xF1D0), OptigaWriteMode::Write, 0, &[1]))
        .unwrap();
    // executed inside send, reported only once the caller looks
    assert_eq!(harness.secure_element.lock().executed(), 1);
    assert_eq!(harness.log.count(), 0);
    assert_eq!(context.is_busy(handle), Ok(true));

    assert_eq!(
        context.status(handle),
        Ok(CompletionStatus::Complete(OPTIGA_STATUS_SUCCESS))
    );
    assert_eq!(harness.log.count(), 1);
    assert!(!harness.log.calls.lock()[0].1);
    assert_eq!(context.is_busy(handle), Ok(false));
    assert_eq!(context.wait(handle, SHORT), Ok(OPTIGA_STATUS_SUCCESS));
}

#[test]
fn test_no_stale_status() {
    let harness = TestHarness::new(CompletionMode::Inline);
    let context = &harness.context;
    let handle = harness.create(0);

    // fails on the device: past the end of the object
    context
        .write_data(handle, OptigaOid(0xF1D0), OptigaWriteMode::Write, 139, &[1])
        .unwrap();
    harness.device_io.lock().set_mode(CompletionMode::Never);
    let _ = context.status(handle);

    // the failure is not collected before the next command
    context
        .write_data(handle, OptigaOid(0xF1D0), OptigaWriteMode::Write, 0, &[1])
        .unwrap();
    assert_eq!(context.status(handle), Ok(CompletionStatus::Pending));
    assert_eq!(context.wait(handle, SHORT), Err(OPTIGA_STATUS_TIMEOUT));

    harness.device_io.lock().release_held();
    assert_eq!(context.wait(handle, SHORT), Ok(OPTIGA_STATUS_SUCCESS));
}

#[test]
fn test_device_error_surfaces_verbatim() {
    let harness = TestHarness::new(CompletionMode::Inline);
    let context = &harness.context;
    let handle = harness.create(0);

    // never writable
    context
        .write_metadata(handle, OptigaOid(0xF1D1), &[0x20, 0x03, 0xD0, 0x01, 0xFF])
        .unwrap();
    context.wait_and_check(handle, LONG).unwrap();

    context
        .write_data(handle, OptigaOid(0xF1D1), OptigaWriteMode::Write, 0, &[1])
        .unwrap();
    let status = context.wait(handle, LONG).unwrap();
    assert_eq!(status.get_u16(), 0x8007);
    assert_eq!(status.device_error_code(), Some(0x07));

    context
        .write_data(handle, OptigaOid(0xF1D1), OptigaWriteMode::Write, 0, &[1])
        .unwrap();
    assert_eq!(context.wait_and_check(handle, LONG), Err(status));
    assert_eq!(harness.log.statuses()[1], status);
}

#[test]
fn test_completion_future() {
    init_logger();
    let harness = TestHarness::new(CompletionMode::Threaded(Duration::from_millis(10)));
    let context = &harness.context;
    let handle = harness.create(2);

    context
        .write_data(
            handle,
            OptigaOid::TRUST_ANCHOR_2,
            OptigaWriteMode::EraseAndWrite,
            0,
            &[0x30, 0x00],
        )
        .unwrap();
    let completion = context.completion(handle).unwrap();
    let status = futures::executor::block_on(completion);
    assert_eq!(status, Ok(OPTIGA_STATUS_SUCCESS));
    assert_eq!(harness.log.count(), 1);
    assert_eq!(context.is_busy(handle), Ok(false));

    let completion = context.completion(handle).unwrap();
    assert_eq!(
        futures::executor::block_on(completion),
        Err(OPTIGA_STATUS_NO_OPERATION)
    );
}

#[test]
fn test_independent_instances() {
    let harness = TestHarness::new(CompletionMode::Threaded(Duration::from_millis(2)));
    let context = &harness.context;
    let first = harness.create(0);
    let second = harness.create(1);

    context
        .write_data(first, OptigaOid(0xF1D0), OptigaWriteMode::Write, 0, &[1])
        .unwrap();
    context
        .write_data(second, OptigaOid(0xF1D1), OptigaWriteMode::Write, 0, &[2])
        .unwrap();
    assert_eq!(context.wait(second, LONG), Ok(OPTIGA_STATUS_SUCCESS));
    assert_eq!(context.wait(first, LONG), Ok(OPTIGA_STATUS_SUCCESS));

    let device_io = harness.device_io.lock();
    let channels: Vec<u8> = device_io.sent().iter().map(|c| c.channel).collect();
    assert_eq!(channels, vec![0, 1]);
}
