use logos::Logos;

#[derive(Logos, Debug, PartialEq, Clone, Copy)]
#[logos(skip r"\s+")]
pub enum Token<'src> {
    #[token(",")]
    Comma,

    // Mnemonics, registers and immediates all lex as one run of text;
    // what a word means depends on its position in the statement.
    #[regex(r"[^,\s]+", |lex| lex.slice())]
    Word(&'src str),
}
