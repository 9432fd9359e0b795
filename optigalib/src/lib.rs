// Copyright (c) 2020 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

#![forbid(unsafe_code)]
#![cfg_attr(not(feature = "std"), no_std)]

#[macro_use]
extern crate log;

#[macro_use]
extern crate bitflags;

extern crate alloc;
extern crate codec;

pub mod protocol;
#[macro_use]
pub mod error;
pub mod common;
pub mod message;
pub mod metadata;
pub mod time;
pub mod util;

pub mod config;
