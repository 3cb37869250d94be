use std::path::PathBuf;

use crate::grammar::Symbol;
use super::CompileErrorType::{TooFewRules, UndefinedStartSymbol};
use super::{CompileError, CompileErrors, FileResult, Location, Rule};

// Fewer productions than this and there is nothing worth converting
pub const MIN_RULES: usize = 3;

fn count_productions(rules: &[Rule]) -> usize {
    rules.iter().map(|rule| rule.alternatives.len()).sum()
}

fn get_rule_count_errors(rules: &[Rule], path: &PathBuf) -> CompileErrors {
    let count = count_productions(rules);
    if count >= MIN_RULES {
        return Vec::new();
    }
    vec![CompileError {
        location: Location::whole_file(path.clone()),
        error: TooFewRules(count)
    }]
}

fn get_start_symbol_errors(rules: &[Rule], start: Option<Symbol>, path: &PathBuf) -> CompileErrors {
    // Without any rules there is no start symbol to check, and the rule
    // count error already covers it
    let Some(start) = start else {
        return Vec::new();
    };
    if rules.iter().any(|rule| rule.lhs == start) {
        return Vec::new();
    }
    vec![CompileError {
        location: Location::whole_file(path.clone()),
        error: UndefinedStartSymbol(start)
    }]
}

pub fn verify_rules(rules: &[Rule], start: Option<Symbol>, path: &PathBuf) -> FileResult<()> {
    let mut errors = Vec::new();

    errors.extend(get_rule_count_errors(rules, path));
    errors.extend(get_start_symbol_errors(rules, start, path));

    if errors.len() > 0 {
        Err(errors)
    } else {
        Ok(())
    }
}
