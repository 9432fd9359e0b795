// Copyright (c) 2020 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

use crate::protocol::{OptigaLifeCycleState, OptigaOid};
use alloc::vec::Vec;
use codec::enum_builder;
use codec::{Codec, Reader, Writer};

enum_builder! {
    @U8
    EnumName: AcIdentifier;
    EnumVal{
        Always => 0x00,
        Conf => 0x20,
        Int => 0x21,
        Auto => 0x23,
        Luc => 0x40,
        LcsG => 0x70,
        LcsA => 0xE0,
        LcsO => 0xE1,
        And => 0xFD,
        Or => 0xFE,
        Never => 0xFF
    }
}

impl AcIdentifier {
    /// Identifiers followed by an operator and a one byte value.
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            AcIdentifier::LcsG | AcIdentifier::LcsA | AcIdentifier::LcsO
        )
    }

    /// Identifiers followed by a data object reference.
    pub fn is_reference(&self) -> bool {
        matches!(
            self,
            AcIdentifier::Conf | AcIdentifier::Int | AcIdentifier::Auto | AcIdentifier::Luc
        )
    }
}

enum_builder! {
    @U8
    EnumName: AcOperator;
    EnumVal{
        Equal => 0xFA,
        GreaterThan => 0xFB,
        LessThan => 0xFC
    }
}

/// One element of an access condition expression.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AcTerm {
    Always,
    Never,
    And,
    Or,
    Compare {
        id: AcIdentifier,
        op: AcOperator,
        value: u8,
    },
    Reference {
        id: AcIdentifier,
        oid: OptigaOid,
    },
}

impl Codec for AcTerm {
    fn encode(&self, bytes: &mut Writer) -> Result<usize, codec::EncodeErr> {
        match self {
            AcTerm::Always => AcIdentifier::Always.encode(bytes),
            AcTerm::Never => AcIdentifier::Never.encode(bytes),
            AcTerm::And => AcIdentifier::And.encode(bytes),
            AcTerm::Or => AcIdentifier::Or.encode(bytes),
            AcTerm::Compare { id, op, value } => {
                if !id.is_comparison() {
                    return Err(codec::EncodeErr);
                }
                if let AcOperator::Unknown(_) = op {
                    return Err(codec::EncodeErr);
                }
                let mut cnt = 0usize;
                cnt += id.encode(bytes)?;
                cnt += op.encode(bytes)?;
                cnt += value.encode(bytes)?;
                Ok(cnt)
            }
            AcTerm::Reference { id, oid } => {
                if !id.is_reference() {
                    return Err(codec::EncodeErr);
                }
                let mut cnt = 0usize;
                cnt += id.encode(bytes)?;
                cnt += oid.encode(bytes)?;
                Ok(cnt)
            }
        }
    }

    fn read(r: &mut Reader) -> Option<AcTerm> {
        let id = AcIdentifier::read(r)?;
        match id {
            AcIdentifier::Always => Some(AcTerm::Always),
            AcIdentifier::Never => Some(AcTerm::Never),
            AcIdentifier::And => Some(AcTerm::And),
            AcIdentifier::Or => Some(AcTerm::Or),
            AcIdentifier::Unknown(_) => None,
            id if id.is_comparison() => {
                let op = AcOperator::read(r)?;
                if let AcOperator::Unknown(_) = op {
                    return None;
                }
                let value = u8::read(r)?;
                Some(AcTerm::Compare { id, op, value })
            }
            id => {
                let oid = OptigaOid::read(r)?;
                Some(AcTerm::Reference { id, oid })
            }
        }
    }
}

/// Access condition expression carried by the change, read and execute
/// tags. Evaluation is up to the secure element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessCondition {
    pub terms: Vec<AcTerm>,
}

impl AccessCondition {
    pub fn always() -> Self {
        AccessCondition {
            terms: alloc::vec![AcTerm::Always],
        }
    }

    pub fn never() -> Self {
        AccessCondition {
            terms: alloc::vec![AcTerm::Never],
        }
    }

    pub fn compare(id: AcIdentifier, op: AcOperator, value: u8) -> Self {
        AccessCondition {
            terms: alloc::vec![AcTerm::Compare { id, op, value }],
        }
    }

    /// Object life cycle state below `lcs`.
    pub fn lcso_lt(lcs: OptigaLifeCycleState) -> Self {
        Self::compare(AcIdentifier::LcsO, AcOperator::LessThan, lcs.get_u8())
    }

    /// Object life cycle state above `lcs`.
    pub fn lcso_gt(lcs: OptigaLifeCycleState) -> Self {
        Self::compare(AcIdentifier::LcsO, AcOperator::GreaterThan, lcs.get_u8())
    }

    pub fn lcso_eq(lcs: OptigaLifeCycleState) -> Self {
        Self::compare(AcIdentifier::LcsO, AcOperator::Equal, lcs.get_u8())
    }

    /// Requires a shielded connection bound to the secret in `oid`.
    pub fn conf(oid: OptigaOid) -> Self {
        AccessCondition {
            terms: alloc::vec![AcTerm::Reference {
                id: AcIdentifier::Conf,
                oid,
            }],
        }
    }

    /// Requires an integrity protected update verified with `oid`.
    pub fn int(oid: OptigaOid) -> Self {
        AccessCondition {
            terms: alloc::vec![AcTerm::Reference {
                id: AcIdentifier::Int,
                oid,
            }],
        }
    }

    pub fn and(self, other: AccessCondition) -> Self {
        self.join(AcTerm::And, other)
    }

    pub fn or(self, other: AccessCondition) -> Self {
        self.join(AcTerm::Or, other)
    }

    fn join(mut self, op: AcTerm, mut other: AccessCondition) -> Self {
        self.terms.push(op);
        self.terms.append(&mut other.terms);
        self
    }
}

impl Codec for AccessCondition {
    fn encode(&self, bytes: &mut Writer) -> Result<usize, codec::EncodeErr> {
        let mut cnt = 0usize;
        for term in self.terms.iter() {
            cnt += term.encode(bytes)?;
        }
        Ok(cnt)
    }

    /// Consumes the whole reader, so callers hand in a reader limited to the
    /// declared value length.
    fn read(r: &mut Reader) -> Option<AccessCondition> {
        let mut terms = Vec::new();
        while r.any_left() {
            terms.push(AcTerm::read(r)?);
        }
        Some(AccessCondition { terms })
    }
}
