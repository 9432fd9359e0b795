// Copyright (c) 2020 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

//! TLV encoding of data object metadata.
//!
//! ```text
//! 20 <len>                      metadata record
//!    <tag> <len> <value>        entry, repeated
//! ```
//!
//! Values of the access condition tags (`D0`, `D1`, `D3`) are access
//! condition expressions, every other tag carries raw bytes.

use crate::config;
use crate::error::{
    OptigaResult, OPTIGA_STATUS_ENCODING_ERROR, OPTIGA_STATUS_MALFORMED_METADATA,
};
use alloc::vec::Vec;
use codec::enum_builder;
use codec::{Codec, Reader, Writer};

pub mod access_condition;

pub use access_condition::*;

pub const OPTIGA_METADATA_RECORD_TAG: u8 = 0x20;

enum_builder! {
    @U8
    EnumName: MetadataTag;
    EnumVal{
        LifeCycleState => 0xC0,
        Version => 0xC1,
        MaxSize => 0xC4,
        UsedSize => 0xC5,
        Change => 0xD0,
        Read => 0xD1,
        Execute => 0xD3,
        AlgorithmAssociated => 0xE0,
        KeyUsage => 0xE1,
        DataObjectType => 0xE8
    }
}

impl MetadataTag {
    pub fn is_access_condition(&self) -> bool {
        matches!(
            self,
            MetadataTag::Change | MetadataTag::Read | MetadataTag::Execute
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataValue {
    Bytes(Vec<u8>),
    AccessCondition(AccessCondition),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataEntry {
    pub tag: MetadataTag,
    pub value: MetadataValue,
}

impl MetadataEntry {
    pub fn bytes(tag: MetadataTag, value: &[u8]) -> Self {
        MetadataEntry {
            tag,
            value: MetadataValue::Bytes(value.to_vec()),
        }
    }

    pub fn access_condition(tag: MetadataTag, condition: AccessCondition) -> Self {
        MetadataEntry {
            tag,
            value: MetadataValue::AccessCondition(condition),
        }
    }
}

// Writes `tag`, a placeholder length, the body and then back-fills the
// length with the number of body bytes.
fn encode_tlv<F>(tag: u8, bytes: &mut Writer, body: F) -> Result<usize, codec::EncodeErr>
where
    F: FnOnce(&mut Writer) -> Result<usize, codec::EncodeErr>,
{
    tag.encode(bytes)?;
    let length_pos = bytes.used();
    0u8.encode(bytes)?;
    let length = body(bytes)?;
    if length > u8::MAX as usize {
        return Err(codec::EncodeErr);
    }
    bytes
        .patch(length_pos, length as u8)
        .ok_or(codec::EncodeErr)?;
    Ok(2 + length)
}

impl Codec for MetadataEntry {
    fn encode(&self, bytes: &mut Writer) -> Result<usize, codec::EncodeErr> {
        // `Unknown` must not carry the value of a named tag
        if MetadataTag::read_bytes(&[self.tag.get_u8()]) != Some(self.tag) {
            return Err(codec::EncodeErr);
        }
        match &self.value {
            MetadataValue::AccessCondition(condition) => {
                if !self.tag.is_access_condition() {
                    return Err(codec::EncodeErr);
                }
                encode_tlv(self.tag.get_u8(), bytes, |w| condition.encode(w))
            }
            MetadataValue::Bytes(value) => {
                if self.tag.is_access_condition() {
                    return Err(codec::EncodeErr);
                }
                encode_tlv(self.tag.get_u8(), bytes, |w| {
                    w.extend_from_slice(value).ok_or(codec::EncodeErr)
                })
            }
        }
    }

    fn read(r: &mut Reader) -> Option<MetadataEntry> {
        let tag = MetadataTag::read(r)?;
        let length = u8::read(r)? as usize;
        let mut value = r.sub(length)?;
        let value = if tag.is_access_condition() {
            MetadataValue::AccessCondition(AccessCondition::read(&mut value)?)
        } else {
            MetadataValue::Bytes(value.rest().to_vec())
        };
        Some(MetadataEntry { tag, value })
    }
}

/// Content of the `0x20` metadata tag of one data object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataRecord {
    pub entries: Vec<MetadataEntry>,
}

impl MetadataRecord {
    pub fn new() -> Self {
        MetadataRecord {
            entries: Vec::new(),
        }
    }

    pub fn with_entry(mut self, entry: MetadataEntry) -> Self {
        self.entries.push(entry);
        self
    }

    pub fn get(&self, tag: MetadataTag) -> Option<&MetadataValue> {
        self.entries
            .iter()
            .find(|entry| entry.tag == tag)
            .map(|entry| &entry.value)
    }

    /// Access condition stored under `tag`, if any.
    pub fn access_condition(&self, tag: MetadataTag) -> Option<&AccessCondition> {
        match self.get(tag)? {
            MetadataValue::AccessCondition(condition) => Some(condition),
            MetadataValue::Bytes(_) => None,
        }
    }
}

impl Codec for MetadataRecord {
    fn encode(&self, bytes: &mut Writer) -> Result<usize, codec::EncodeErr> {
        encode_tlv(OPTIGA_METADATA_RECORD_TAG, bytes, |w| {
            let mut cnt = 0usize;
            for entry in self.entries.iter() {
                cnt += entry.encode(w)?;
            }
            Ok(cnt)
        })
    }

    fn read(r: &mut Reader) -> Option<MetadataRecord> {
        if u8::read(r)? != OPTIGA_METADATA_RECORD_TAG {
            return None;
        }
        let length = u8::read(r)? as usize;
        let mut content = r.sub(length)?;
        let mut entries = Vec::new();
        while content.any_left() {
            entries.push(MetadataEntry::read(&mut content)?);
        }
        Some(MetadataRecord { entries })
    }
}

/// Encode `record` into the byte layout the secure element expects.
pub fn encode_metadata(record: &MetadataRecord) -> OptigaResult<Vec<u8>> {
    let mut buffer = [0u8; config::MAX_OPTIGA_METADATA_SIZE];
    let mut writer = Writer::init(&mut buffer);
    record
        .encode(&mut writer)
        .map_err(|_| OPTIGA_STATUS_ENCODING_ERROR)?;
    Ok(writer.used_slice().to_vec())
}

/// Decode a complete metadata buffer. Trailing bytes are rejected.
pub fn decode_metadata(bytes: &[u8]) -> OptigaResult<MetadataRecord> {
    if bytes.len() > config::MAX_OPTIGA_METADATA_SIZE {
        return Err(OPTIGA_STATUS_MALFORMED_METADATA);
    }
    MetadataRecord::read_bytes_exact(bytes).ok_or(OPTIGA_STATUS_MALFORMED_METADATA)
}
