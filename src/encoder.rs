use crate::{
    error::AsmError,
    isa::{self, Descriptor, FormatFamily, OpcodeEncoding},
    parser::Statement,
};
use bitvec::prelude::*;
use std::{fmt, num::IntErrorKind, ops::RangeInclusive};

pub const WORD_BITS: usize = 12;

const IMM4: RangeInclusive<i64> = 0..=15;
const IMM6: RangeInclusive<i64> = -32..=31;

/// Trailing nibble of every F2 word.
const F2_TAIL: u16 = 0b0011;

/// A 12-bit machine word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Word(u16);

impl Word {
    pub const ZERO: Word = Word(0);

    pub fn value(self) -> u16 {
        self.0
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03x}", self.0)
    }
}

type WordBits = BitArr!(for WORD_BITS, in u16, Msb0);

/// Packs fields MSB-first into a 12-bit word, refusing values wider than
/// their field.
struct Packer {
    bits: WordBits,
    cursor: usize,
}

impl Packer {
    fn new() -> Self {
        Self { bits: WordBits::ZERO, cursor: 0 }
    }

    fn field(mut self, name: &'static str, value: u16, width: usize) -> Result<Self, AsmError> {
        let end = self.cursor + width;
        if end > WORD_BITS || u32::from(value) >= 1 << width {
            return Err(AsmError::FieldOverflow { field: name, value, width });
        }
        self.bits[self.cursor..end].store_be(value);
        self.cursor = end;
        Ok(self)
    }

    fn finish(self) -> Word {
        debug_assert_eq!(self.cursor, WORD_BITS);
        Word(self.bits[..WORD_BITS].load_be::<u16>())
    }
}

type Encoded = Result<Word, Vec<AsmError>>;

fn one(err: AsmError) -> Vec<AsmError> {
    vec![err]
}

/// Resolves every register operand, collecting one fault per bad name.
fn registers<const N: usize>(names: [&str; N]) -> Result<[u16; N], Vec<AsmError>> {
    let mut idx = [0u16; N];
    let mut faults = Vec::new();
    for (slot, name) in idx.iter_mut().zip(names) {
        match isa::resolve_register(name) {
            Ok(r) => *slot = r,
            Err(e) => faults.push(e),
        }
    }
    if faults.is_empty() { Ok(idx) } else { Err(faults) }
}

/// Parses a base-10 immediate and checks it against `domain`.
fn immediate(text: &str, domain: RangeInclusive<i64>) -> Result<i64, AsmError> {
    let value = text.parse::<i64>().map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
            AsmError::ImmediateOutOfRange(text.to_string())
        }
        _ => AsmError::MalformedImmediate(text.to_string()),
    })?;
    if !domain.contains(&value) {
        return Err(AsmError::ImmediateOutOfRange(text.to_string()));
    }
    Ok(value)
}

fn enc_f0() -> Encoded {
    Ok(Word::ZERO)
}

fn enc_f1(op: OpcodeEncoding, [rd, rs1, rs2]: [&str; 3]) -> Encoded {
    let [rd, rs1, rs2] = registers([rd, rs1, rs2])?;
    let word = Packer::new()
        .field("group", op.primary(), 4)
        .and_then(|p| p.field("rd", rd, 2))
        .and_then(|p| p.field("rs1", rs1, 2))
        .and_then(|p| p.field("rs2", rs2, 2))
        .and_then(|p| p.field("func", op.function(), 2))
        .map_err(one)?
        .finish();
    Ok(word)
}

fn enc_f2(op: OpcodeEncoding, [rd, rs1]: [&str; 2]) -> Encoded {
    let [rd, rs1] = registers([rd, rs1])?;
    let word = Packer::new()
        .field("group", op.primary(), 4)
        .and_then(|p| p.field("rd", rd, 2))
        .and_then(|p| p.field("rs1", rs1, 2))
        .and_then(|p| p.field("tail", F2_TAIL, 4))
        .map_err(one)?
        .finish();
    Ok(word)
}

fn enc_f3(op: OpcodeEncoding, [rd, rs1, imm]: [&str; 3]) -> Encoded {
    let [rd, rs1] = registers([rd, rs1])?;
    let imm4 = immediate(imm, IMM4).map_err(one)? as u16;
    let word = Packer::new()
        .field("opcode", op.primary(), 4)
        .and_then(|p| p.field("rd", rd, 2))
        .and_then(|p| p.field("rs1", rs1, 2))
        .and_then(|p| p.field("imm4", imm4, 4))
        .map_err(one)?
        .finish();
    Ok(word)
}

fn enc_f4(op: OpcodeEncoding, [rs, imm]: [&str; 2]) -> Encoded {
    let [rs] = registers([rs])?;
    let value = immediate(imm, IMM6).map_err(one)?;
    // 6-bit two's complement
    let imm6 = (if value < 0 { value + 64 } else { value }) as u16;
    let word = Packer::new()
        .field("opcode", op.primary(), 4)
        .and_then(|p| p.field("rs", rs, 2))
        .and_then(|p| p.field("imm6", imm6, 6))
        .map_err(one)?
        .finish();
    Ok(word)
}

fn operands<'a, const N: usize>(st: &'a Statement, desc: &Descriptor) -> Result<[&'a str; N], Vec<AsmError>> {
    let ops: Vec<&str> = st.operands.iter().map(String::as_str).collect();
    <[&str; N]>::try_from(ops).map_err(|ops| {
        one(AsmError::OperandCount {
            mnemonic: desc.mnemonic.to_string(),
            expected: N,
            found: ops.len(),
        })
    })
}

/// Encodes one statement: descriptor lookup, then the family's encoder.
///
/// Every fault found is returned; a statement with any fault yields no word.
pub fn encode(st: &Statement) -> Encoded {
    let desc = isa::lookup(&st.mnemonic).map_err(one)?;
    match desc.family {
        FormatFamily::F0 => operands::<0>(st, &desc).and_then(|_| enc_f0()),
        FormatFamily::F1 => enc_f1(desc.encoding, operands(st, &desc)?),
        FormatFamily::F2 => enc_f2(desc.encoding, operands(st, &desc)?),
        FormatFamily::F3 => enc_f3(desc.encoding, operands(st, &desc)?),
        FormatFamily::F4 => enc_f4(desc.encoding, operands(st, &desc)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_line;

    fn enc(src: &str) -> Encoded {
        encode(&parse_line(1, src).unwrap())
    }

    fn hex(src: &str) -> String {
        enc(src).unwrap().to_string()
    }

    #[test]
    fn packer_is_msb_first() {
        let w = Packer::new()
            .field("a", 0b1010, 4)
            .and_then(|p| p.field("b", 0b0101_0101, 8))
            .unwrap()
            .finish();
        assert_eq!(w.value(), 0b1010_0101_0101);
    }

    #[test]
    fn packer_rejects_wide_values() {
        let err = Packer::new().field("rd", 4, 2).err().unwrap();
        assert_eq!(err, AsmError::FieldOverflow { field: "rd", value: 4, width: 2 });
    }

    #[test]
    fn every_table_entry_fits_its_fields() {
        for d in isa::descriptors() {
            assert!(d.encoding.primary() < 16, "{}", d.mnemonic);
            assert!(d.encoding.function() < 4, "{}", d.mnemonic);
        }
    }

    #[test]
    fn one_word_per_family() {
        assert_eq!(hex("nop"), "000");
        assert_eq!(hex("add R0, R1, R2"), "019");
        assert_eq!(hex("sub R3, R3, R3"), "0fe");
        assert_eq!(hex("div R1, R2, R3"), "16c");
        assert_eq!(hex("not R1, R2"), "263");
        assert_eq!(hex("addi R1, R0, 5"), "345");
        assert_eq!(hex("shri R2, R3, 15"), "9bf");
        assert_eq!(hex("jal R0, 31"), "d1f");
        assert_eq!(hex("bz R2, -1"), "ebf");
        assert_eq!(hex("bnz R3, -32"), "fe0");
    }

    #[test]
    fn register_case_does_not_matter() {
        assert_eq!(enc("add r0, r1, r2"), enc("add R0, R1, R2"));
    }

    #[test]
    fn imm4_domain() {
        for v in 0..=15 {
            assert!(enc(&format!("addi R0, R0, {v}")).is_ok());
        }
        for v in ["16", "-1"] {
            assert_eq!(
                enc(&format!("addi R0, R0, {v}")),
                Err(vec![AsmError::ImmediateOutOfRange(v.into())])
            );
        }
    }

    #[test]
    fn imm6_domain_and_twos_complement() {
        for v in -32..=31i64 {
            let w = enc(&format!("bz R0, {v}")).unwrap().value();
            assert_eq!(w & 0x3F, ((v + 64) % 64) as u16);
            assert!(w <= 0xFFF);
        }
        for v in ["32", "-33"] {
            assert_eq!(
                enc(&format!("bnz R1, {v}")),
                Err(vec![AsmError::ImmediateOutOfRange(v.into())])
            );
        }
    }

    #[test]
    fn huge_immediates_are_out_of_range_not_malformed() {
        assert_eq!(
            enc("bz R0, 99999999999999999999"),
            Err(vec![AsmError::ImmediateOutOfRange("99999999999999999999".into())])
        );
    }

    #[test]
    fn malformed_immediate() {
        assert_eq!(
            enc("addi R0, R1, 0x5"),
            Err(vec![AsmError::MalformedImmediate("0x5".into())])
        );
        assert_eq!(enc("bz R0, "), Err(vec![AsmError::MalformedImmediate("".into())]));
    }

    #[test]
    fn every_bad_register_is_reported_once() {
        assert_eq!(
            enc("add R4, R1, x"),
            Err(vec![
                AsmError::UnknownRegister("R4".into()),
                AsmError::UnknownRegister("x".into()),
            ])
        );
    }

    #[test]
    fn bad_register_in_pair_format() {
        assert_eq!(enc("not R9, r0"), Err(vec![AsmError::UnknownRegister("R9".into())]));
        assert_eq!(
            enc("not x, y"),
            Err(vec![
                AsmError::UnknownRegister("x".into()),
                AsmError::UnknownRegister("y".into()),
            ])
        );
    }

    #[test]
    fn registers_are_checked_before_immediates() {
        assert_eq!(
            enc("addi R9, R0, 99"),
            Err(vec![AsmError::UnknownRegister("R9".into())])
        );
    }

    #[test]
    fn unknown_mnemonic() {
        assert_eq!(enc("foo R0, R1"), Err(vec![AsmError::UnknownMnemonic("foo".into())]));
    }

    #[test]
    fn wrong_operand_count() {
        assert_eq!(
            enc("add R0, R1"),
            Err(vec![AsmError::OperandCount { mnemonic: "add".into(), expected: 3, found: 2 }])
        );
        assert_eq!(
            enc("nop R0"),
            Err(vec![AsmError::OperandCount { mnemonic: "nop".into(), expected: 0, found: 1 }])
        );
    }
}
