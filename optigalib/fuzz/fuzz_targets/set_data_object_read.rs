// Copyright (c) 2020 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

#![no_main]

use codec::{Codec, Writer};
use libfuzzer_sys::fuzz_target;
use optigalib::config::MAX_OPTIGA_COMMS_BUFFER_SIZE;
use optigalib::message::OptigaSetDataObjectRequest;

fuzz_target!(|data: &[u8]| {
    if let Some(request) = OptigaSetDataObjectRequest::read_bytes_exact(data) {
        let mut buffer = vec![0u8; data.len().max(MAX_OPTIGA_COMMS_BUFFER_SIZE)];
        let mut writer = Writer::init(&mut buffer);
        request.encode(&mut writer).unwrap();
        assert_eq!(writer.used_slice(), data);
    }
});
