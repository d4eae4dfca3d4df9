use thiserror::Error;

/// A fault attributed to a single source statement.
///
/// Display output is the `<category> <token>` half of a diagnostic line;
/// [`crate::diagnostics::Diagnostic`] prepends the line number.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AsmError {
    #[error("opcode invalide {0}")]
    UnknownMnemonic(String),

    #[error("registre invalide {0}")]
    UnknownRegister(String),

    #[error("valeur invalide {0}")]
    MalformedImmediate(String),

    #[error("valeur hors limites {0}")]
    ImmediateOutOfRange(String),

    #[error("nombre d'operandes invalide {mnemonic}")]
    OperandCount {
        mnemonic: String,
        expected: usize,
        found: usize,
    },

    #[error("champ trop large {field}")]
    FieldOverflow {
        field: &'static str,
        value: u16,
        width: usize,
    },
}
