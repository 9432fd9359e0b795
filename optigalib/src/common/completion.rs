// Copyright (c) 2020 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

use super::instance::InstanceSlot;
use crate::error::{OptigaResult, OptigaStatus};
use alloc::sync::Arc;
use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};

/// Resolves once with the status of the operation in flight on an instance.
///
/// Does not drive the driver's `poll`; meant for drivers that complete
/// from their own context.
pub struct Completion {
    slot: Arc<InstanceSlot>,
}

impl Completion {
    pub(crate) fn new(slot: Arc<InstanceSlot>) -> Self {
        Completion { slot }
    }
}

impl Future for Completion {
    type Output = OptigaResult<OptigaStatus>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.slot.poll_outcome(cx)
    }
}
