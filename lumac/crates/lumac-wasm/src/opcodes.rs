//! WASM opcode and section constants, plus instruction metadata.
//!
//! The constants cover the instruction subset the Luma generator emits;
//! the metadata table additionally describes operand shapes so the decoder
//! can walk an instruction stream without knowing the generator.

/// Module preamble: magic `\0asm` followed by version 1 (little-endian).
pub const MAGIC: [u8; 4] = [0x00, 0x61, 0x73, 0x6D];
/// Module version bytes.
pub const VERSION: [u8; 4] = [0x01, 0x00, 0x00, 0x00];

// Section ids
pub const TYPE_SECTION: u8 = 1;
pub const FUNCTION_SECTION: u8 = 3;
pub const MEMORY_SECTION: u8 = 5;
pub const EXPORT_SECTION: u8 = 7;
pub const CODE_SECTION: u8 = 10;

// Type encodings
pub const FUNC_TYPE: u8 = 0x60;
pub const I32_TYPE: u8 = 0x7F;
pub const I64_TYPE: u8 = 0x7E;
pub const F32_TYPE: u8 = 0x7D;
pub const F64_TYPE: u8 = 0x7C;

/// Block type for blocks that produce no value.
pub const VOID_TYPE: u8 = 0x40;

/// Export kind for functions.
pub const EXPORT_FUNC: u8 = 0x00;

/// One linear-memory page, in bytes.
pub const PAGE_SIZE: u32 = 65_536;

// Control instructions
pub const UNREACHABLE: u8 = 0x00;
pub const NOP: u8 = 0x01;
pub const BLOCK: u8 = 0x02;
pub const LOOP: u8 = 0x03;
pub const IF: u8 = 0x04;
pub const ELSE: u8 = 0x05;
pub const END: u8 = 0x0B;
pub const BR: u8 = 0x0C;
pub const BR_IF: u8 = 0x0D;
pub const RETURN: u8 = 0x0F;

// Parametric instructions
pub const DROP: u8 = 0x1A;

// Variable instructions
pub const LOCAL_GET: u8 = 0x20;
pub const LOCAL_SET: u8 = 0x21;
pub const LOCAL_TEE: u8 = 0x22;
pub const GLOBAL_GET: u8 = 0x23;
pub const GLOBAL_SET: u8 = 0x24;

// Memory instructions
pub const I32_LOAD: u8 = 0x28;
pub const I64_LOAD: u8 = 0x29;
pub const F32_LOAD: u8 = 0x2A;
pub const F64_LOAD: u8 = 0x2B;
pub const I32_STORE: u8 = 0x36;
pub const I64_STORE: u8 = 0x37;
pub const F32_STORE: u8 = 0x38;
pub const F64_STORE: u8 = 0x39;
pub const MEMORY_SIZE: u8 = 0x3F;
pub const MEMORY_GROW: u8 = 0x40;

// Numeric constants
pub const I32_CONST: u8 = 0x41;
pub const I64_CONST: u8 = 0x42;
pub const F32_CONST: u8 = 0x43;
pub const F64_CONST: u8 = 0x44;

// Comparison instructions
pub const I32_EQZ: u8 = 0x45;
pub const I32_EQ: u8 = 0x46;
pub const I32_NE: u8 = 0x47;
pub const I32_LT_S: u8 = 0x48;
pub const I32_LT_U: u8 = 0x49;
pub const I32_GT_S: u8 = 0x4A;
pub const I32_GT_U: u8 = 0x4B;
pub const I32_LE_S: u8 = 0x4C;
pub const I32_LE_U: u8 = 0x4D;
pub const I32_GE_S: u8 = 0x4E;
pub const I32_GE_U: u8 = 0x4F;

// Arithmetic instructions
pub const I32_ADD: u8 = 0x6A;
pub const I32_SUB: u8 = 0x6B;
pub const I32_MUL: u8 = 0x6C;
pub const I32_DIV_S: u8 = 0x6D;
pub const I32_DIV_U: u8 = 0x6E;

// Conversion instructions
pub const I32_WRAP_I64: u8 = 0xA7;
pub const I64_EXTEND_I32_S: u8 = 0xAC;
pub const I64_EXTEND_I32_U: u8 = 0xAD;

/// The shape of one instruction operand in the binary encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperandKind {
    /// Unsigned LEB128 (indices, labels, memarg fields).
    Uleb,
    /// Signed LEB128 (`i32.const`/`i64.const` values).
    Sleb,
    /// A single raw byte (block types, reserved memory index).
    Byte,
    /// Four raw little-endian bytes (`f32.const`).
    F32,
    /// Eight raw little-endian bytes (`f64.const`).
    F64,
}

/// Metadata for one instruction: its name and operand shapes.
#[derive(Debug)]
pub struct InstrInfo {
    pub name: &'static str,
    pub operands: &'static [OperandKind],
}

use OperandKind::{Byte, Sleb, Uleb, F32, F64};

static INSTRUCTIONS: &[(u8, InstrInfo)] = &[
    (UNREACHABLE, InstrInfo { name: "unreachable", operands: &[] }),
    (NOP, InstrInfo { name: "nop", operands: &[] }),
    (BLOCK, InstrInfo { name: "block", operands: &[Byte] }),
    (LOOP, InstrInfo { name: "loop", operands: &[Byte] }),
    (IF, InstrInfo { name: "if", operands: &[Byte] }),
    (ELSE, InstrInfo { name: "else", operands: &[] }),
    (END, InstrInfo { name: "end", operands: &[] }),
    (BR, InstrInfo { name: "br", operands: &[Uleb] }),
    (BR_IF, InstrInfo { name: "br_if", operands: &[Uleb] }),
    (RETURN, InstrInfo { name: "return", operands: &[] }),
    (DROP, InstrInfo { name: "drop", operands: &[] }),
    (LOCAL_GET, InstrInfo { name: "local.get", operands: &[Uleb] }),
    (LOCAL_SET, InstrInfo { name: "local.set", operands: &[Uleb] }),
    (LOCAL_TEE, InstrInfo { name: "local.tee", operands: &[Uleb] }),
    (GLOBAL_GET, InstrInfo { name: "global.get", operands: &[Uleb] }),
    (GLOBAL_SET, InstrInfo { name: "global.set", operands: &[Uleb] }),
    (I32_LOAD, InstrInfo { name: "i32.load", operands: &[Uleb, Uleb] }),
    (I64_LOAD, InstrInfo { name: "i64.load", operands: &[Uleb, Uleb] }),
    (F32_LOAD, InstrInfo { name: "f32.load", operands: &[Uleb, Uleb] }),
    (F64_LOAD, InstrInfo { name: "f64.load", operands: &[Uleb, Uleb] }),
    (I32_STORE, InstrInfo { name: "i32.store", operands: &[Uleb, Uleb] }),
    (I64_STORE, InstrInfo { name: "i64.store", operands: &[Uleb, Uleb] }),
    (F32_STORE, InstrInfo { name: "f32.store", operands: &[Uleb, Uleb] }),
    (F64_STORE, InstrInfo { name: "f64.store", operands: &[Uleb, Uleb] }),
    (MEMORY_SIZE, InstrInfo { name: "memory.size", operands: &[Byte] }),
    (MEMORY_GROW, InstrInfo { name: "memory.grow", operands: &[Byte] }),
    (I32_CONST, InstrInfo { name: "i32.const", operands: &[Sleb] }),
    (I64_CONST, InstrInfo { name: "i64.const", operands: &[Sleb] }),
    (F32_CONST, InstrInfo { name: "f32.const", operands: &[F32] }),
    (F64_CONST, InstrInfo { name: "f64.const", operands: &[F64] }),
    (I32_EQZ, InstrInfo { name: "i32.eqz", operands: &[] }),
    (I32_EQ, InstrInfo { name: "i32.eq", operands: &[] }),
    (I32_NE, InstrInfo { name: "i32.ne", operands: &[] }),
    (I32_LT_S, InstrInfo { name: "i32.lt_s", operands: &[] }),
    (I32_LT_U, InstrInfo { name: "i32.lt_u", operands: &[] }),
    (I32_GT_S, InstrInfo { name: "i32.gt_s", operands: &[] }),
    (I32_GT_U, InstrInfo { name: "i32.gt_u", operands: &[] }),
    (I32_LE_S, InstrInfo { name: "i32.le_s", operands: &[] }),
    (I32_LE_U, InstrInfo { name: "i32.le_u", operands: &[] }),
    (I32_GE_S, InstrInfo { name: "i32.ge_s", operands: &[] }),
    (I32_GE_U, InstrInfo { name: "i32.ge_u", operands: &[] }),
    (I32_ADD, InstrInfo { name: "i32.add", operands: &[] }),
    (I32_SUB, InstrInfo { name: "i32.sub", operands: &[] }),
    (I32_MUL, InstrInfo { name: "i32.mul", operands: &[] }),
    (I32_DIV_S, InstrInfo { name: "i32.div_s", operands: &[] }),
    (I32_DIV_U, InstrInfo { name: "i32.div_u", operands: &[] }),
    (I32_WRAP_I64, InstrInfo { name: "i32.wrap_i64", operands: &[] }),
    (I64_EXTEND_I32_S, InstrInfo { name: "i64.extend_i32_s", operands: &[] }),
    (I64_EXTEND_I32_U, InstrInfo { name: "i64.extend_i32_u", operands: &[] }),
];

/// Look up instruction metadata by opcode.
pub fn lookup(opcode: u8) -> Option<&'static InstrInfo> {
    INSTRUCTIONS
        .iter()
        .find(|(op, _)| *op == opcode)
        .map(|(_, info)| info)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known() {
        assert_eq!(lookup(I32_ADD).unwrap().name, "i32.add");
        assert_eq!(lookup(I32_CONST).unwrap().operands, &[OperandKind::Sleb][..]);
        assert_eq!(lookup(I32_LOAD).unwrap().operands.len(), 2);
    }

    #[test]
    fn test_lookup_unknown() {
        assert!(lookup(0xFE).is_none());
    }

    #[test]
    fn test_no_duplicate_opcodes() {
        for (i, (op, _)) in INSTRUCTIONS.iter().enumerate() {
            assert!(
                INSTRUCTIONS[i + 1..].iter().all(|(other, _)| other != op),
                "duplicate opcode 0x{op:02X}"
            );
        }
    }
}
