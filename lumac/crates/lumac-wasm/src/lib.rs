//! lumac-wasm - WebAssembly binary format primitives.
//!
//! The pieces of the WASM MVP binary format shared by the code generator
//! and the inspection tooling:
//!
//! - [`leb128`] - unsigned and signed LEB128 encoding/decoding, used for
//!   every count, index, length, and `i32.const` operand in a module.
//! - [`opcodes`] - named constants for section ids, value types, and the
//!   instruction subset this compiler emits, plus a metadata table
//!   ([`opcodes::lookup`]) describing each instruction's operands.
//! - [`decoder`] - a structural decoder that walks an emitted module
//!   section by section. It exists for inspection and testing; the
//!   generator's output is validated by round-tripping through it.

pub mod decoder;
mod error;
pub mod leb128;
pub mod opcodes;

pub use decoder::{decode_module, Export, FuncBody, FuncType, Instr, Limits, Module, Section, SectionPayload};
pub use error::DecodeError;
