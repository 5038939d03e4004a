//! lumac-util - Core Utilities and Foundation Types
//!
//! Foundation types shared by every phase of the Luma compiler:
//!
//! - [`Span`] - source location tracking (byte offsets plus 1-based
//!   line/column), attached to tokens, AST nodes, and errors.
//! - [`Symbol`] - a 4-byte handle to an interned string, used for
//!   identifiers and string literals so that name comparison is an integer
//!   comparison and the same name is stored once.
//!
//! These utilities hold no per-compilation state; the interner is a global
//! append-only table and spans are plain values.

pub mod span;
pub mod symbol;

pub use span::Span;
pub use symbol::Symbol;
