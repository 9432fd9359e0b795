// Copyright (c) 2020 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

use crate::error::{
    OptigaResult, OptigaStatus, OPTIGA_STATUS_INSTANCE_INVALID, OPTIGA_STATUS_INSTANCE_IN_USE,
    OPTIGA_STATUS_NO_OPERATION, OPTIGA_STATUS_RESPONSE_FAIL, OPTIGA_STATUS_UTIL_ERROR,
};
use crate::message::decode_response_status;
use crate::protocol::OptigaProtectionLevel;
use alloc::sync::Arc;
use core::any::Any;
use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};
use futures::channel::oneshot;
use spin::Mutex;

/// Opaque caller state handed back to the completion callback.
pub type OptigaCallbackContext = Arc<dyn Any + Send + Sync>;

/// Invoked once per submitted command, in the context that delivered the
/// completion.
pub type OptigaCallback = fn(context: Option<&OptigaCallbackContext>, status: OptigaStatus);

/// Outcome of the operation submitted last on an instance.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CompletionStatus {
    Pending,
    Complete(OptigaStatus),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum OperationPhase {
    Idle,
    // inside OptigaDeviceIo::send
    Submitting,
    InFlight,
}

struct SlotState {
    phase: OperationPhase,
    seq: u32,
    protection: OptigaProtectionLevel,
    sender: Option<oneshot::Sender<OptigaStatus>>,
    receiver: Option<oneshot::Receiver<OptigaStatus>>,
    // completed while still submitting
    deferred: Option<OptigaStatus>,
    // received but not yet collected
    outcome: Option<OptigaStatus>,
    // destroyed, its channel may already be bound again
    retired: bool,
}

impl SlotState {
    fn collect(&mut self) {
        if self.outcome.is_some() {
            return;
        }
        if let Some(receiver) = self.receiver.as_mut() {
            match receiver.try_recv() {
                Ok(Some(status)) => {
                    self.outcome = Some(status);
                    self.receiver = None;
                }
                Ok(None) => {}
                Err(oneshot::Canceled) => {
                    self.outcome = Some(OPTIGA_STATUS_UTIL_ERROR);
                    self.receiver = None;
                }
            }
        }
    }
}

/// Dispatch state of one util instance, shared between the caller and the
/// context completing its commands.
pub struct InstanceSlot {
    channel: u8,
    callback: OptigaCallback,
    context: Option<OptigaCallbackContext>,
    state: Mutex<SlotState>,
}

impl InstanceSlot {
    pub fn new(
        channel: u8,
        protection: OptigaProtectionLevel,
        callback: OptigaCallback,
        context: Option<OptigaCallbackContext>,
    ) -> Self {
        InstanceSlot {
            channel,
            callback,
            context,
            state: Mutex::new(SlotState {
                phase: OperationPhase::Idle,
                seq: 0,
                protection,
                sender: None,
                receiver: None,
                deferred: None,
                outcome: None,
                retired: false,
            }),
        }
    }

    pub fn channel(&self) -> u8 {
        self.channel
    }

    pub fn is_busy(&self) -> bool {
        self.state.lock().phase != OperationPhase::Idle
    }

    pub fn protection_level(&self) -> OptigaProtectionLevel {
        self.state.lock().protection
    }

    pub fn set_protection_level(&self, level: OptigaProtectionLevel) -> OptigaResult {
        let mut state = self.state.lock();
        if state.phase != OperationPhase::Idle {
            return Err(OPTIGA_STATUS_INSTANCE_IN_USE);
        }
        state.protection = level;
        Ok(())
    }

    /// Mark an idle instance as destroyed. Later operations on it fail
    /// with `INSTANCE_INVALID`.
    pub fn retire(&self) -> OptigaResult {
        let mut state = self.state.lock();
        if state.phase != OperationPhase::Idle {
            return Err(OPTIGA_STATUS_INSTANCE_IN_USE);
        }
        state.retired = true;
        Ok(())
    }

    /// Move the instance to busy and hand out the token for the new
    /// operation. Any outcome of the previous operation is dropped.
    pub fn begin(self: &Arc<Self>) -> OptigaResult<CommandDone> {
        let mut state = self.state.lock();
        if state.retired {
            return Err(OPTIGA_STATUS_INSTANCE_INVALID);
        }
        if state.phase != OperationPhase::Idle {
            return Err(OPTIGA_STATUS_INSTANCE_IN_USE);
        }
        let (sender, receiver) = oneshot::channel();
        state.seq = state.seq.wrapping_add(1);
        state.phase = OperationPhase::Submitting;
        state.sender = Some(sender);
        state.receiver = Some(receiver);
        state.deferred = None;
        state.outcome = None;
        debug!("channel {} begin operation {}\n", self.channel, state.seq);
        Ok(CommandDone {
            slot: self.clone(),
            seq: state.seq,
        })
    }

    /// The driver accepted the command.
    pub fn submitted(&self) {
        let mut state = self.state.lock();
        if state.phase == OperationPhase::Submitting {
            state.phase = OperationPhase::InFlight;
        }
    }

    /// The driver refused the command. Back to idle without a completion;
    /// a token the driver kept is stale from now on.
    pub fn abort(&self) {
        let mut state = self.state.lock();
        state.phase = OperationPhase::Idle;
        state.seq = state.seq.wrapping_add(1);
        state.sender = None;
        state.receiver = None;
        state.deferred = None;
    }

    fn complete(&self, seq: u32, status: OptigaStatus) {
        let sender = {
            let mut state = self.state.lock();
            if seq != state.seq || state.phase == OperationPhase::Idle {
                warn!(
                    "channel {} drop stale completion {} of operation {}\n",
                    self.channel, status, seq
                );
                return;
            }
            if state.phase == OperationPhase::Submitting {
                state.deferred = Some(status);
                return;
            }
            state.phase = OperationPhase::Idle;
            state.sender.take()
        };
        self.deliver(sender, status);
    }

    fn deliver(&self, sender: Option<oneshot::Sender<OptigaStatus>>, status: OptigaStatus) {
        info!("channel {} operation completed: {}\n", self.channel, status);
        (self.callback)(self.context.as_ref(), status);
        if let Some(sender) = sender {
            // the receiver lives in the slot, it is gone only if a new
            // operation replaced it
            let _ = sender.send(status);
        }
    }

    /// Deliver a completion that arrived while the command was still being
    /// submitted.
    pub fn flush(&self) {
        let pending = {
            let mut state = self.state.lock();
            if state.phase != OperationPhase::InFlight {
                return;
            }
            match state.deferred.take() {
                Some(status) => {
                    state.phase = OperationPhase::Idle;
                    Some((state.sender.take(), status))
                }
                None => None,
            }
        };
        if let Some((sender, status)) = pending {
            self.deliver(sender, status);
        }
    }

    /// Non-consuming view of the current operation.
    pub fn status(&self) -> OptigaResult<CompletionStatus> {
        self.flush();
        let mut state = self.state.lock();
        state.collect();
        match (state.outcome, state.receiver.is_some()) {
            (Some(status), _) => Ok(CompletionStatus::Complete(status)),
            (None, true) => Ok(CompletionStatus::Pending),
            (None, false) => Err(OPTIGA_STATUS_NO_OPERATION),
        }
    }

    /// Collect the outcome of the current operation, `None` while pending.
    pub fn take_outcome(&self) -> OptigaResult<Option<OptigaStatus>> {
        self.flush();
        let mut state = self.state.lock();
        state.collect();
        if let Some(status) = state.outcome.take() {
            return Ok(Some(status));
        }
        if state.receiver.is_some() {
            Ok(None)
        } else {
            Err(OPTIGA_STATUS_NO_OPERATION)
        }
    }

    pub fn poll_outcome(&self, cx: &mut Context<'_>) -> Poll<OptigaResult<OptigaStatus>> {
        self.flush();
        let mut state = self.state.lock();
        if let Some(status) = state.outcome.take() {
            return Poll::Ready(Ok(status));
        }
        let receiver = match state.receiver.as_mut() {
            Some(receiver) => receiver,
            None => return Poll::Ready(Err(OPTIGA_STATUS_NO_OPERATION)),
        };
        match Pin::new(receiver).poll(cx) {
            Poll::Ready(Ok(status)) => {
                state.receiver = None;
                Poll::Ready(Ok(status))
            }
            Poll::Ready(Err(oneshot::Canceled)) => {
                state.receiver = None;
                Poll::Ready(Err(OPTIGA_STATUS_UTIL_ERROR))
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Completion token of one submitted command.
///
/// Handed to [`OptigaDeviceIo::send`](super::OptigaDeviceIo::send) and
/// consumed by the driver once the secure element answered, so a command
/// completes at most once. Tokens of earlier operations are ignored.
pub struct CommandDone {
    slot: Arc<InstanceSlot>,
    seq: u32,
}

impl CommandDone {
    pub fn channel(&self) -> u8 {
        self.slot.channel()
    }

    pub fn complete(self, status: OptigaStatus) {
        self.slot.complete(self.seq, status)
    }

    /// Complete with the status carried by a response APDU.
    pub fn complete_with_response(self, response: &[u8]) {
        let status = match decode_response_status(response) {
            Some(status) => status,
            None => {
                error!("malformed response APDU {:02X?}\n", response);
                OPTIGA_STATUS_RESPONSE_FAIL
            }
        };
        self.complete(status)
    }
}

impl core::fmt::Debug for CommandDone {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CommandDone")
            .field("channel", &self.slot.channel())
            .field("seq", &self.seq)
            .finish()
    }
}
