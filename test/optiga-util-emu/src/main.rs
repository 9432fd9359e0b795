// Copyright (c) 2020 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

#![forbid(unsafe_code)]

use log::*;
use simple_logger::SimpleLogger;

use optiga_emu::{CompletionMode, EmuDeviceIo, SecureElementEmu};
use optigalib::common::{OptigaCallbackContext, OptigaConfigInfo};
use optigalib::error::{OptigaResult, OptigaStatus};
use optigalib::metadata::{
    encode_metadata, AccessCondition, MetadataEntry, MetadataRecord, MetadataTag,
};
use optigalib::protocol::{OptigaLifeCycleState, OptigaOid, OptigaProtectionLevel, OptigaWriteMode};
use optigalib::util::{InstanceHandle, OptigaUtilContext};
use spin::Mutex;
use std::sync::Arc;
use std::time::Duration;

const WAIT_TIMEOUT: Duration = Duration::from_secs(1);

fn util_callback(_context: Option<&OptigaCallbackContext>, status: OptigaStatus) {
    debug!("util callback: {}", status);
}

/// A DER sequence header followed by filler, standing in for a certificate.
fn sample_trust_anchor() -> Vec<u8> {
    let body_len = 380usize;
    let mut certificate = vec![0x30, 0x82, (body_len >> 8) as u8, body_len as u8];
    certificate.extend((0..body_len).map(|i| i as u8));
    certificate
}

fn load_trust_anchor() -> Vec<u8> {
    match std::env::args().nth(1) {
        Some(path) => match std::fs::read(&path) {
            Ok(certificate) => {
                info!("trust anchor from {} ({} bytes)", path, certificate.len());
                certificate
            }
            Err(e) => {
                error!("cannot read {}: {}, using the built-in sample", path, e);
                sample_trust_anchor()
            }
        },
        None => sample_trust_anchor(),
    }
}

fn provision_trust_anchor(
    context: &OptigaUtilContext,
    handle: InstanceHandle,
    trust_anchor: &[u8],
) -> OptigaResult {
    let oid = OptigaOid::TRUST_ANCHOR_1;

    context.set_protection_level(handle, OptigaProtectionLevel::NO_PROTECTION)?;

    // erase first so no tail of an older, longer certificate survives
    context.write_data(handle, oid, OptigaWriteMode::EraseAndWrite, 0, trust_anchor)?;
    context.wait_and_check(handle, WAIT_TIMEOUT)?;
    info!("wrote {} bytes to {}", trust_anchor.len(), oid);

    let record = MetadataRecord::new().with_entry(MetadataEntry::access_condition(
        MetadataTag::Read,
        AccessCondition::lcso_gt(OptigaLifeCycleState::Initialization),
    ));
    let metadata = encode_metadata(&record)?;
    context.write_metadata(handle, oid, &metadata)?;
    let status = futures::executor::block_on(context.completion(handle)?)?;
    if !status.is_success() {
        return Err(status);
    }
    info!("wrote metadata {:02X?} to {}", metadata, oid);
    Ok(())
}

fn new_logger_from_env() -> SimpleLogger {
    let level = match std::env::var("OPTIGA_LOG") {
        Ok(x) => match x.to_lowercase().as_str() {
            "trace" => LevelFilter::Trace,
            "debug" => LevelFilter::Debug,
            "info" => LevelFilter::Info,
            "warn" => LevelFilter::Warn,
            "off" => LevelFilter::Off,
            _ => LevelFilter::Error,
        },
        _ => LevelFilter::Info,
    };

    SimpleLogger::new().with_utc_timestamps().with_level(level)
}

fn main() {
    new_logger_from_env().init().unwrap();

    let trust_anchor = load_trust_anchor();
    let secure_element = Arc::new(Mutex::new(SecureElementEmu::new()));
    let device_io = Arc::new(Mutex::new(EmuDeviceIo::new(
        secure_element.clone(),
        CompletionMode::Threaded(Duration::from_millis(5)),
    )));
    let context = OptigaUtilContext::new(device_io, OptigaConfigInfo::default());

    let handle = match context.create(0, util_callback, None) {
        Ok(handle) => handle,
        Err(e) => {
            error!("create util instance failed: {}", e);
            return;
        }
    };

    match provision_trust_anchor(&context, handle, &trust_anchor) {
        Ok(()) => info!("trust anchor provisioned"),
        Err(e) => error!("trust anchor provisioning failed: {}", e),
    }

    if let Err(e) = context.destroy(handle) {
        error!("destroy util instance failed: {}", e);
    }

    let secure_element = secure_element.lock();
    let stored = secure_element
        .data(OptigaOid::TRUST_ANCHOR_1)
        .map_or(0, |data| data.len());
    info!("secure element holds {} bytes in {}", stored, OptigaOid::TRUST_ANCHOR_1);
}
