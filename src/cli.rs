use std::path::PathBuf;

use clap::Parser;

use crate::convert::{ClosureCopy, Options};
use crate::grammar::EMPTY_MARKER;

#[derive(Parser)]
#[command(version, about = "Converts a context-free grammar to Chomsky normal form")]
pub struct Cli {
    /// File containing the grammar
    pub file: PathBuf,

    /// Start symbol (default: left side of the first rule)
    #[arg(short, long, value_name = "SYMBOL", value_parser = parse_start_symbol)]
    pub start: Option<char>,

    /// Only print the final rules, not the rules after every stage
    #[arg(short, long)]
    pub final_only: bool,

    /// Copy the productions of every nonterminal the start symbol reaches
    /// through unit rules, even once it has productions of its own
    #[arg(long)]
    pub copy_closure: bool,

    /// Replace terminals in two-symbol right sides with new nonterminals
    #[arg(long)]
    pub lift_terminals: bool,

    /// Remove rules that are unreachable or derive no terminal string
    #[arg(long)]
    pub prune: bool
}

impl Cli {
    pub fn options(&self) -> Options {
        Options {
            closure_copy: if self.copy_closure { ClosureCopy::EveryMember } else { ClosureCopy::WhileEmpty },
            lift_terminals: self.lift_terminals,
            prune: self.prune
        }
    }
}

fn parse_start_symbol(text: &str) -> Result<char, String> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c == EMPTY_MARKER => Err(format!("`{}` is reserved for the empty string", EMPTY_MARKER)),
        (Some(c), None) if c.is_ascii_alphabetic() => Ok(c),
        _ => Err("Start symbol must be a single letter".to_string())
    }
}
