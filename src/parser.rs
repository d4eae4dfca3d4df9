use crate::lexer::Token;
use logos::Logos;

/// One instruction line, split into mnemonic and raw operand text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    /// 1-based physical line number.
    pub line: usize,
    pub mnemonic: String,
    pub operands: Vec<String>,
}

/// Splits a physical source line into a statement.
///
/// Returns `None` for blank lines and for lines whose first non-space
/// character is `#`.
pub fn parse_line(line: usize, text: &str) -> Option<Statement> {
    let text = text.trim();
    if text.is_empty() || text.starts_with('#') {
        return None;
    }

    let (mnemonic, rest) = text
        .split_once(char::is_whitespace)
        .unwrap_or((text, ""));

    Some(Statement {
        line,
        mnemonic: mnemonic.to_string(),
        operands: split_operands(rest),
    })
}

/// Numbered statements of a whole source text, comments and blanks removed.
///
/// `\n`, `\r\n` and a lone `\r` all end a line.
pub fn statements(source: &str) -> impl Iterator<Item = Statement> + '_ {
    source
        .lines()
        .flat_map(|line| line.split('\r'))
        .enumerate()
        .filter_map(|(i, text)| parse_line(i + 1, text))
}

fn split_operands(rest: &str) -> Vec<String> {
    let mut operands = Vec::new();
    let mut current = Vec::<&str>::new();
    let mut any = false;

    // every input char is either a comma, a word, or skipped whitespace
    for tok in Token::lexer(rest).filter_map(Result::ok) {
        any = true;
        match tok {
            Token::Comma => operands.push(std::mem::take(&mut current).join(" ")),
            Token::Word(w) => current.push(w),
        }
    }
    if any {
        operands.push(current.join(" "));
    }
    operands
}
