// Copyright (c) 2020 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

use super::init_logger;
use crate::common::{sample_certificate, TestHarness};
use optiga_emu::CompletionMode;
use optigalib::error::OPTIGA_STATUS_SUCCESS;
use optigalib::metadata::{
    encode_metadata, AccessCondition, MetadataEntry, MetadataRecord, MetadataTag,
};
use optigalib::protocol::{OptigaLifeCycleState, OptigaOid, OptigaProtectionLevel, OptigaWriteMode};
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(2);

fn provision(harness: &TestHarness) {
    let certificate = sample_certificate();
    let metadata = [0x20u8, 0x05, 0xD1, 0x03, 0xE1, 0xFB, 0x03];
    let context = &harness.context;

    let handle = harness.create(0);
    context
        .set_protection_level(handle, OptigaProtectionLevel::NO_PROTECTION)
        .unwrap();

    harness
        .log
        .submit(|| {
            context.write_data(
                handle,
                OptigaOid::TRUST_ANCHOR_1,
                OptigaWriteMode::EraseAndWrite,
                0,
                &certificate,
            )
        })
        .unwrap();
    assert_eq!(context.wait(handle, TIMEOUT), Ok(OPTIGA_STATUS_SUCCESS));

    harness
        .log
        .submit(|| context.write_metadata(handle, OptigaOid::TRUST_ANCHOR_1, &metadata))
        .unwrap();
    assert_eq!(context.wait(handle, TIMEOUT), Ok(OPTIGA_STATUS_SUCCESS));

    assert!(context.destroy(handle).is_ok());

    let secure_element = harness.secure_element.lock();
    assert_eq!(
        secure_element.data(OptigaOid::TRUST_ANCHOR_1),
        Some(certificate.as_slice())
    );
    let record = secure_element.metadata(OptigaOid::TRUST_ANCHOR_1).unwrap();
    assert_eq!(encode_metadata(record).unwrap(), metadata.to_vec());

    // one callback per command, none while submitting
    assert_eq!(
        harness.log.statuses(),
        vec![OPTIGA_STATUS_SUCCESS, OPTIGA_STATUS_SUCCESS]
    );
    assert!(harness.log.calls.lock().iter().all(|(_, submitting)| !submitting));
}

#[test]
fn test_provision_trust_anchor_threaded() {
    init_logger();
    let harness = TestHarness::new(CompletionMode::Threaded(Duration::from_millis(2)));
    provision(&harness);
}

#[test]
fn test_provision_trust_anchor_inline() {
    init_logger();
    let harness = TestHarness::new(CompletionMode::Inline);
    provision(&harness);
}

#[test]
fn test_provision_trust_anchor_polled() {
    init_logger();
    let harness = TestHarness::new(CompletionMode::Polled);
    provision(&harness);
}

#[test]
fn test_sent_apdus() {
    let harness = TestHarness::new(CompletionMode::Inline);
    let context = &harness.context;
    let handle = harness.create(0);
    let record = MetadataRecord::new().with_entry(MetadataEntry::access_condition(
        MetadataTag::Read,
        AccessCondition::lcso_gt(OptigaLifeCycleState::Initialization),
    ));

    context
        .write_data(
            handle,
            OptigaOid::TRUST_ANCHOR_1,
            OptigaWriteMode::EraseAndWrite,
            0,
            &[0xAA, 0xBB],
        )
        .unwrap();
    context.wait_and_check(handle, TIMEOUT).unwrap();
    context
        .write_metadata_record(handle, OptigaOid::TRUST_ANCHOR_1, &record)
        .unwrap();
    context.wait_and_check(handle, TIMEOUT).unwrap();

    let device_io = harness.device_io.lock();
    let sent = device_io.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(
        sent[0].apdu,
        vec![0x82u8, 0x40, 0x00, 0x06, 0xE0, 0xE8, 0x00, 0x00, 0xAA, 0xBB]
    );
    assert_eq!(
        sent[1].apdu,
        vec![0x82u8, 0x01, 0x00, 0x0B, 0xE0, 0xE8, 0x00, 0x00, 0x20, 0x05, 0xD1, 0x03, 0xE1, 0xFB, 0x03]
    );
    assert_eq!(sent[0].channel, 0);
}
