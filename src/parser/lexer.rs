use itertools::{Itertools, PeekingNext};

use super::{CompileErrorType, Result};

#[derive(PartialEq, Debug)]
pub enum Token {
    Arrow,
    Or,
    Word(String)
}

fn is_word_char(c: char) -> bool {
    !c.is_whitespace() && c != '|' && c != '-'
}

pub fn lex_arrow(line: &mut impl Iterator<Item = char>) -> Result<Token> {
    line.next(); // Consume the dash
    if line.next() != Some('>') {
        return Err(CompileErrorType::MalformedArrow);
    }
    Ok(Token::Arrow)
}

pub fn lex_word(line: &mut impl PeekingNext<Item = char>) -> Result<Token> {
    Ok(Token::Word(line.peeking_take_while(|&c| is_word_char(c)).collect()))
}

pub fn lex_line(line: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();

    let mut line_chars = line.chars().peekable();

    while let Some(c) = line_chars.peek() {
        if *c == '-' {
            tokens.push(lex_arrow(&mut line_chars)?);
        } else if *c == '|' {
            line_chars.next();
            tokens.push(Token::Or);
        } else if !c.is_whitespace() {
            tokens.push(lex_word(&mut line_chars)?);
        } else {
            line_chars.next();
        }
    }

    Ok(tokens)
}

// Splits the tokens after the left side into alternatives
pub fn split_alternatives(tokens: &[Token]) -> Vec<&[Token]> {
    tokens.split(|t| *t == Token::Or).collect_vec()
}
