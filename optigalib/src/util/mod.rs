// Copyright (c) 2020 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

mod context;
mod wait;
mod write_data;
mod write_metadata;

pub use context::{InstanceHandle, OptigaUtilContext};
