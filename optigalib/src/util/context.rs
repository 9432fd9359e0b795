// Copyright (c) 2020 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

use crate::common::{
    InstanceSlot, OptigaCallback, OptigaCallbackContext, OptigaConfigInfo, OptigaDeviceIo,
};
use crate::config::{MAX_OPTIGA_CHANNELS, MAX_OPTIGA_COMMS_BUFFER_SIZE, MAX_OPTIGA_UTIL_INSTANCES};
use crate::error::{
    OptigaResult, OPTIGA_STATUS_CHANNEL_UNAVAILABLE, OPTIGA_STATUS_INSTANCE_INVALID,
    OPTIGA_STATUS_INSTANCE_IN_USE, OPTIGA_STATUS_INVALID_INPUT, OPTIGA_STATUS_SEND_FAIL,
};
use crate::message::OptigaSetDataObjectRequest;
use crate::protocol::OptigaProtectionLevel;
use alloc::sync::Arc;
use alloc::vec::Vec;
use codec::{Codec, Writer};
use core::fmt;
use spin::Mutex;
use zeroize::Zeroizing;

/// Names one util instance. Stays invalid once the instance is destroyed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct InstanceHandle {
    index: usize,
    generation: u32,
}

impl fmt::Display for InstanceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.index, self.generation)
    }
}

struct InstanceEntry {
    generation: u32,
    slot: Arc<InstanceSlot>,
}

struct InstanceTable {
    entries: Vec<Option<InstanceEntry>>,
    generation: u32,
}

pub struct OptigaUtilContext {
    device_io: Arc<Mutex<dyn OptigaDeviceIo + Send + Sync>>,
    config_info: OptigaConfigInfo,
    instances: Mutex<InstanceTable>,
}

impl OptigaUtilContext {
    pub fn new(
        device_io: Arc<Mutex<dyn OptigaDeviceIo + Send + Sync>>,
        config_info: OptigaConfigInfo,
    ) -> Self {
        OptigaUtilContext {
            device_io,
            config_info,
            instances: Mutex::new(InstanceTable {
                entries: (0..MAX_OPTIGA_UTIL_INSTANCES).map(|_| None).collect(),
                generation: 0,
            }),
        }
    }

    pub fn config_info(&self) -> &OptigaConfigInfo {
        &self.config_info
    }

    /// Create an instance bound to `channel`, completing through `callback`.
    pub fn create(
        &self,
        channel: u8,
        callback: OptigaCallback,
        context: Option<OptigaCallbackContext>,
    ) -> OptigaResult<InstanceHandle> {
        if channel as usize >= MAX_OPTIGA_CHANNELS {
            error!("channel {} out of range\n", channel);
            return Err(OPTIGA_STATUS_CHANNEL_UNAVAILABLE);
        }

        let mut table = self.instances.lock();
        let bound = table
            .entries
            .iter()
            .flatten()
            .any(|entry| entry.slot.channel() == channel);
        if bound {
            error!("channel {} already bound\n", channel);
            return Err(OPTIGA_STATUS_CHANNEL_UNAVAILABLE);
        }

        let index = match table.entries.iter().position(|entry| entry.is_none()) {
            Some(index) => index,
            None => {
                error!("no free instance\n");
                return Err(OPTIGA_STATUS_INSTANCE_IN_USE);
            }
        };
        table.generation = table.generation.wrapping_add(1);
        let generation = table.generation;
        table.entries[index] = Some(InstanceEntry {
            generation,
            slot: Arc::new(InstanceSlot::new(
                channel,
                self.config_info.default_protection_level,
                callback,
                context,
            )),
        });

        let handle = InstanceHandle { index, generation };
        info!("create instance {} on channel {}\n", handle, channel);
        Ok(handle)
    }

    /// Destroy an idle instance and release its channel.
    ///
    /// An instance with an operation in flight is left untouched and its
    /// handle stays valid.
    pub fn destroy(&self, handle: InstanceHandle) -> OptigaResult {
        let mut table = self.instances.lock();
        let entry = table
            .entries
            .get_mut(handle.index)
            .ok_or(OPTIGA_STATUS_INSTANCE_INVALID)?;
        match entry {
            Some(e) if e.generation == handle.generation => {
                // a caller may still hold the slot
                if let Err(status) = e.slot.retire() {
                    warn!("destroy instance {} while busy\n", handle);
                    return Err(status);
                }
            }
            _ => return Err(OPTIGA_STATUS_INSTANCE_INVALID),
        }
        *entry = None;
        info!("destroy instance {}\n", handle);
        Ok(())
    }

    pub fn set_protection_level(
        &self,
        handle: InstanceHandle,
        level: OptigaProtectionLevel,
    ) -> OptigaResult {
        self.slot(handle)?.set_protection_level(level)
    }

    pub fn protection_level(&self, handle: InstanceHandle) -> OptigaResult<OptigaProtectionLevel> {
        Ok(self.slot(handle)?.protection_level())
    }

    pub fn is_busy(&self, handle: InstanceHandle) -> OptigaResult<bool> {
        Ok(self.slot(handle)?.is_busy())
    }

    pub(crate) fn slot(&self, handle: InstanceHandle) -> OptigaResult<Arc<InstanceSlot>> {
        let table = self.instances.lock();
        match table.entries.get(handle.index) {
            Some(Some(entry)) if entry.generation == handle.generation => Ok(entry.slot.clone()),
            _ => Err(OPTIGA_STATUS_INSTANCE_INVALID),
        }
    }

    pub(crate) fn poll_device(&self) {
        self.device_io.lock().poll();
    }

    /// Encode `request` and hand it to the driver. The instance stays busy
    /// until the driver completes the command.
    pub(crate) fn send_command(
        &self,
        slot: &Arc<InstanceSlot>,
        request: &OptigaSetDataObjectRequest,
    ) -> OptigaResult {
        if request.encoded_size() > MAX_OPTIGA_COMMS_BUFFER_SIZE {
            return Err(OPTIGA_STATUS_INVALID_INPUT);
        }
        // payload may be a secret
        let mut buffer = Zeroizing::new([0u8; MAX_OPTIGA_COMMS_BUFFER_SIZE]);
        let mut writer = Writer::init(&mut buffer[..]);
        request
            .encode(&mut writer)
            .map_err(|_| OPTIGA_STATUS_INVALID_INPUT)?;

        let done = slot.begin()?;
        let protection = slot.protection_level();
        debug!(
            "send {:?} oid {} on channel {}, {} bytes\n",
            request.param,
            request.oid,
            slot.channel(),
            writer.used()
        );
        let result =
            self.device_io
                .lock()
                .send(slot.channel(), protection, writer.used_slice(), done);
        match result {
            Ok(()) => {
                slot.submitted();
                Ok(())
            }
            Err(e) => {
                error!("send failed on channel {}: {}\n", slot.channel(), e);
                slot.abort();
                Err(OPTIGA_STATUS_SEND_FAIL)
            }
        }
    }
}
