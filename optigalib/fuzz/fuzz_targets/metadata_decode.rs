// Copyright (c) 2020 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

#![no_main]

use libfuzzer_sys::fuzz_target;
use optigalib::metadata::{decode_metadata, encode_metadata};

fuzz_target!(|data: &[u8]| {
    // anything that decodes must encode back to the same bytes
    if let Ok(record) = decode_metadata(data) {
        let encoded = encode_metadata(&record).unwrap();
        assert_eq!(encoded.as_slice(), data);
    }
});
