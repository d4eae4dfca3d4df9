//! R12 instruction set tables: registers, format families and opcodes.

use crate::error::AsmError;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Bit layout an instruction is packed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatFamily {
    /// `nop`
    F0,
    /// `op rd, rs1, rs2`
    F1,
    /// `op rd, rs1`
    F2,
    /// `op rd, rs1, imm4`
    F3,
    /// `op rs, imm6`
    F4,
}

/// Field value(s) selecting an operation within its family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpcodeEncoding {
    Single(u16),
    GroupFunction(u16, u16),
}

impl OpcodeEncoding {
    /// The leading 4-bit field: the opcode, or the group of a pair.
    pub const fn primary(self) -> u16 {
        match self {
            OpcodeEncoding::Single(op) => op,
            OpcodeEncoding::GroupFunction(group, _) => group,
        }
    }

    /// The trailing function field of a pair; zero for single opcodes.
    pub const fn function(self) -> u16 {
        match self {
            OpcodeEncoding::Single(_) => 0,
            OpcodeEncoding::GroupFunction(_, func) => func,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Descriptor {
    pub mnemonic: &'static str,
    pub family: FormatFamily,
    pub encoding: OpcodeEncoding,
}

use FormatFamily::*;
use OpcodeEncoding::*;

// ── Instruction set ────────────────────────────────
const INSTRUCTIONS: &[(&str, FormatFamily, OpcodeEncoding)] = &[
    ("nop",   F0, Single(0)),

    ("add",   F1, GroupFunction(0b0000, 0b01)),
    ("sub",   F1, GroupFunction(0b0000, 0b10)),
    ("mult",  F1, GroupFunction(0b0000, 0b11)),
    ("div",   F1, GroupFunction(0b0001, 0b00)),
    ("mod",   F1, GroupFunction(0b0001, 0b01)),
    ("and",   F1, GroupFunction(0b0001, 0b10)),
    ("or",    F1, GroupFunction(0b0001, 0b11)),
    ("xor",   F1, GroupFunction(0b0010, 0b00)),

    ("not",   F2, GroupFunction(0b0010, 0b11)),

    ("addi",  F3, Single(3)),
    ("subi",  F3, Single(4)),
    ("multi", F3, Single(5)),
    ("divi",  F3, Single(6)),
    ("modi",  F3, Single(7)),
    ("shli",  F3, Single(8)),
    ("shri",  F3, Single(9)),
    ("ld",    F3, Single(10)),
    ("sd",    F3, Single(11)),
    ("jalr",  F3, Single(12)),

    ("jal",   F4, Single(13)),
    ("bz",    F4, Single(14)),
    ("bnz",   F4, Single(15)),
];

static DESCRIPTORS: LazyLock<HashMap<&'static str, Descriptor>> = LazyLock::new(|| {
    INSTRUCTIONS
        .iter()
        .map(|&(mnemonic, family, encoding)| {
            (mnemonic, Descriptor { mnemonic, family, encoding })
        })
        .collect()
});

/// Looks up a mnemonic. Mnemonics are lowercase and matched exactly.
pub fn lookup(mnemonic: &str) -> Result<Descriptor, AsmError> {
    DESCRIPTORS
        .get(mnemonic)
        .copied()
        .ok_or_else(|| AsmError::UnknownMnemonic(mnemonic.to_string()))
}

/// Every descriptor, in table order.
#[cfg(test)]
pub(crate) fn descriptors() -> impl Iterator<Item = Descriptor> {
    INSTRUCTIONS.iter().map(|&(mnemonic, family, encoding)| Descriptor {
        mnemonic,
        family,
        encoding,
    })
}

/// Resolves a register name (`R0`..`R3`, any case) to its 2-bit index.
pub fn resolve_register(name: &str) -> Result<u16, AsmError> {
    match name.to_ascii_uppercase().as_str() {
        "R0" => Ok(0),
        "R1" => Ok(1),
        "R2" => Ok(2),
        "R3" => Ok(3),
        _ => Err(AsmError::UnknownRegister(name.to_string())),
    }
}
