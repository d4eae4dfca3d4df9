use crate::error::AsmError;
use std::{fmt, io::Write};

/// One line-numbered fault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub line: usize,
    pub error: AsmError,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "erreur ligne {}: {}", self.line, self.error)
    }
}

/// Append-only receiver of diagnostics.
pub trait Diagnostics {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl Diagnostics for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Writes each diagnostic as one line to a stream.
pub struct Emitter<W: Write> {
    out: W,
}

impl<W: Write> Emitter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl Emitter<std::io::Stderr> {
    pub fn stderr() -> Self {
        Self::new(std::io::stderr())
    }
}

impl<W: Write> Diagnostics for Emitter<W> {
    fn report(&mut self, diagnostic: Diagnostic) {
        if let Err(err) = writeln!(self.out, "{diagnostic}") {
            tracing::error!(%err, line = diagnostic.line, "cannot write diagnostic");
        }
    }
}
