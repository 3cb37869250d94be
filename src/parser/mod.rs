/*
    This module reads grammar files. Each rule line is either `A BCD`
    (left side, then one right side) or `A -> BCD | e | a`.
*/

mod lexer;
mod verifier;

use std::fmt::Display;
use std::fs::File;
use std::io::BufRead;
use std::path::PathBuf;

use crate::grammar::*;
use crate::error_handling::*;
use itertools::Itertools;
use lexer::*;
use log::debug;
use verifier::verify_rules;

#[derive(Debug)]
pub enum CompileErrorType {
    // A rule line does not start with a left side
    MissingLeftSide,
    // The left side is more than one letter
    LongLeftSide(String),
    // The empty marker was used as a left side
    EmptyMarkerOnLeft,
    // An alternative is blank
    MissingRightSide,
    // A `-` that is not part of `->`
    MalformedArrow,
    // A `->` somewhere other than right after the left side
    UnexpectedArrow,
    // Two words in one alternative, without a `|` between them
    UnexpectedWord(String),
    // A character that is not an ASCII letter
    InvalidSymbol(char),
    // `e` used inside a longer right side
    MisplacedEmptyMarker,
    // The file has fewer productions than a conversion needs
    TooFewRules(usize),
    // No rule has the start symbol on its left side
    UndefinedStartSymbol(Symbol),
    // A blank line got too deep into the parser
    // This is a problem with chomskify, not the grammar
    UnexpectedBlankLine,
    // There was an issue with reading a file
    FileError(std::io::Error),
}

impl ErrorType for CompileErrorType {}

impl PartialEq for CompileErrorType {
    fn eq(&self, other: &Self) -> bool {
        if let CompileErrorType::FileError(a) = self {
            if let CompileErrorType::FileError(b) = other {
                return a.kind() == b.kind();
            }
        }
        return std::mem::discriminant(self) == std::mem::discriminant(other);
    }
}

impl Display for CompileErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompileErrorType::MissingLeftSide => write!(f, "Expected a nonterminal at the start of the rule"),
            CompileErrorType::LongLeftSide(word) => write!(f, "Left side `{}` must be a single letter", word),
            CompileErrorType::EmptyMarkerOnLeft => write!(f, "`{}` is reserved for the empty string and cannot be a left side", EMPTY_MARKER),
            CompileErrorType::MissingRightSide => write!(f, "Expected a right side"),
            CompileErrorType::MalformedArrow => write!(f, "Expected `->`"),
            CompileErrorType::UnexpectedArrow => write!(f, "Unexpected `->` encountered"),
            CompileErrorType::UnexpectedWord(word) => write!(f, "Unexpected `{}`; separate alternatives with `|`", word),
            CompileErrorType::InvalidSymbol(c) => write!(f, "`{}` is not a letter", c),
            CompileErrorType::MisplacedEmptyMarker => write!(f, "`{}` must stand alone on a right side", EMPTY_MARKER),
            CompileErrorType::TooFewRules(count) => write!(f, "Expected at least {} rules, found {}", verifier::MIN_RULES, count),
            CompileErrorType::UndefinedStartSymbol(symbol) => write!(f, "Could not find definition for start symbol `{}`", symbol),
            CompileErrorType::UnexpectedBlankLine => write!(f, "Blank line encountered in rule parser (this is a problem with chomskify, not the grammar)"),
            CompileErrorType::FileError(e) => write!(f, "File error: {}", e),
        }
    }
}

pub type CompileError = Error<CompileErrorType>;
pub type CompileErrors = Errors<CompileErrorType>;

fn io_error(error: std::io::Error, file: PathBuf) -> CompileError {
    CompileError {
        location: Location::whole_file(file),
        error: CompileErrorType::FileError(error)
    }
}

pub type Result<T> = std::result::Result<T, CompileErrorType>;
pub type LineResult<T> = std::result::Result<T, CompileError>;
pub type FileResult<T> = std::result::Result<T, CompileErrors>;

#[derive(PartialEq, Debug)]
struct Rule {
    lhs: Symbol,
    alternatives: Vec<Rhs>,
    location: Location
}

fn parse_letter(c: char) -> Result<Symbol> {
    if c.is_ascii_alphabetic() {
        Ok(Symbol::from_char(c))
    } else {
        Err(CompileErrorType::InvalidSymbol(c))
    }
}

fn parse_lhs(word: &str) -> Result<Symbol> {
    let letter = match word.chars().exactly_one() {
        Ok(c) => parse_letter(c),
        Err(_) => Err(CompileErrorType::LongLeftSide(word.to_string()))
    }?;

    match letter {
        Symbol::Epsilon => Err(CompileErrorType::EmptyMarkerOnLeft),
        letter => Ok(letter)
    }
}

fn parse_rhs(word: &str) -> Result<Rhs> {
    let rhs = word.chars().map(parse_letter).collect::<Result<Rhs>>()?;
    if rhs.len() > 1 && rhs.contains(&Symbol::Epsilon) {
        return Err(CompileErrorType::MisplacedEmptyMarker);
    }
    Ok(rhs)
}

fn parse_alternative(tokens: &[Token]) -> Result<Rhs> {
    match tokens {
        [] => Err(CompileErrorType::MissingRightSide),
        [Token::Word(word)] => parse_rhs(word),
        [Token::Word(_), Token::Word(extra), ..] => Err(CompileErrorType::UnexpectedWord(extra.clone())),
        [Token::Or, ..] => Err(CompileErrorType::MissingRightSide),
        _ => Err(CompileErrorType::UnexpectedArrow)
    }
}

fn parse_line(tokens: &[Token], location: Location) -> Result<Rule> {
    let lhs = match tokens.get(0) {
        Some(Token::Word(word)) => parse_lhs(word),
        Some(_) => Err(CompileErrorType::MissingLeftSide),
        None => Err(CompileErrorType::UnexpectedBlankLine)
    }?;

    // The arrow is optional
    let rest = match tokens.get(1) {
        Some(Token::Arrow) => &tokens[2..],
        _ => &tokens[1..]
    };

    let alternatives = split_alternatives(rest)
        .into_iter()
        .map(parse_alternative)
        .collect::<Result<Vec<_>>>()?;

    Ok(Rule {
        lhs,
        alternatives,
        location
    })
}

fn parse_lex_line(line: &str, location: Location) -> LineResult<Rule> {
    lexer::lex_line(line)
        .and_then(|lexed_line| parse_line(&lexed_line, location.clone()))
        .map_err(|error| CompileError { location, error })
}

fn is_rule_line(line: &String) -> bool {
    !line.trim().is_empty() && !line.starts_with(';')
}

// Returns an iterator over the rule lines of a file, with the io errors
// wrapped in CompileError and the line numbers attached
fn file_line_nums<'a>(file: File, path: &'a PathBuf) -> impl Iterator<Item = (usize, LineResult<String>)> + 'a {
    std::io::BufReader::new(file)
        .lines()
        .map(move |line| line.map_err(|e| io_error(e, path.clone())))
        .enumerate()
        .filter(|(_, line)| line.as_ref().is_ok_and(is_rule_line) || line.is_err())
        .map(|(num, line)| (num + 1, line))
}

fn grammar_from_rules(rule_list: Vec<Rule>, start: Option<Symbol>, path: &PathBuf) -> FileResult<Grammar> {
    // Default to the left side of the first rule
    let start_symbol = start.or_else(|| rule_list.first().map(|rule| rule.lhs));

    verify_rules(&rule_list, start_symbol, path)?;

    let productions = rule_list
        .into_iter()
        .flat_map(|rule| rule.alternatives.into_iter().map(move |rhs| (rule.lhs, rhs)))
        .collect_vec();

    // verify_rules rejects files with no rules, so there is always a start symbol
    let start_symbol = start_symbol.ok_or_else(|| vec![CompileError {
        location: Location::whole_file(path.clone()),
        error: CompileErrorType::TooFewRules(0)
    }])?;

    let grammar = Grammar::from_rules(start_symbol, productions);
    debug!("Read {} productions from {}", grammar.production_count(), path.display());
    Ok(grammar)
}

pub fn parse_file(path: &PathBuf, start: Option<char>) -> FileResult<Grammar> {
    let file = File::open(path).map_err(|e| vec![io_error(e, path.clone())])?;
    let lines = file_line_nums(file, path);

    let parsed_lines = lines.map(|(num, line_res)| {
        line_res.and_then(|line| parse_lex_line(&line, Location {
            file: path.clone(),
            line: num
        }))
    });

    let (rules, errors): (Vec<_>, Vec<_>) = parsed_lines.partition_result();
    if !errors.is_empty() {
        return Err(errors);
    }

    grammar_from_rules(rules, start.map(Symbol::from_char), path)
}
