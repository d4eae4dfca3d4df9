//! r12-asm – single-pass assembler for the R12 12-bit ISA
//!
//! Each source line yields at most one word; faulty lines are reported
//! and dropped without stopping the pass.

pub mod diagnostics;
pub mod driver;
pub mod encoder;
pub mod error;
pub mod image;
pub mod isa;
pub mod lexer;
pub mod parser;

pub use diagnostics::{Diagnostic, Diagnostics, Emitter};
pub use driver::assemble;
pub use encoder::{encode, Word};
pub use error::AsmError;
pub use image::Program;
pub use parser::Statement;
