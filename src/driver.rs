use crate::{
    diagnostics::{Diagnostic, Diagnostics},
    encoder,
    image::Program,
    parser,
};

/// Assembles a whole source text in one pass.
///
/// Faulty statements are reported to `sink` and dropped; assembly always
/// continues with the next line.
pub fn assemble(source: &str, sink: &mut impl Diagnostics) -> Program {
    let mut program = Program::new();
    let mut dropped = 0usize;

    for st in parser::statements(source) {
        match encoder::encode(&st) {
            Ok(word) => {
                tracing::trace!(line = st.line, %word, "encoded");
                program.push(word);
            }
            Err(faults) => {
                tracing::debug!(line = st.line, faults = faults.len(), "statement dropped");
                dropped += 1;
                for error in faults {
                    sink.report(Diagnostic { line: st.line, error });
                }
            }
        }
    }

    tracing::debug!(words = program.len(), dropped, "assembly finished");
    program
}
