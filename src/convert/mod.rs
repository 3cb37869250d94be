/*
    This module converts a grammar to Chomsky normal form
*/

mod empty;
mod finalize;
mod lift;
mod long;
mod prune;
mod unit;

use std::fmt::Display;

use log::{debug, warn};

use crate::error_handling::*;
use crate::grammar::*;

pub use empty::eliminate_empty_productions;
pub use finalize::{finalize_start_symbol, ClosureCopy};
pub use lift::lift_terminals;
pub use long::eliminate_long_productions;
pub use prune::remove_useless_rules;
pub use unit::{eliminate_unit_productions, unit_closure};

#[derive(Debug, PartialEq)]
pub enum ConvertErrorType {
    // A long production or a lifted terminal needed a new nonterminal, but
    // every letter is already taken
    PoolExhausted(Symbol),
    // A nonterminal has no entry in the unit closure
    // This is a problem with chomskify, not the grammar
    MissingClosure(Symbol),
}

impl ErrorType for ConvertErrorType {}

impl Display for ConvertErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConvertErrorType::PoolExhausted(lhs) => write!(f, "Ran out of letters for new nonterminals while rewriting `{}`", lhs),
            ConvertErrorType::MissingClosure(symbol) => write!(f, "No unit closure for nonterminal `{}` (this is a problem with chomskify, not the grammar)", symbol),
        }
    }
}

pub type ConvertError = Error<ConvertErrorType>;
pub type Result<T> = std::result::Result<T, ConvertErrorType>;

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Stage {
    LongRules,
    EmptyRules,
    UnitRules,
    Final,
    TerminalLifting,
    UselessRules,
}

impl Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::LongRules => write!(f, "Rules after large rules removal"),
            Stage::EmptyRules => write!(f, "Rules after empty rules removal"),
            Stage::UnitRules => write!(f, "Rules after short rules removal"),
            Stage::Final => write!(f, "Final rules"),
            Stage::TerminalLifting => write!(f, "Rules after terminal lifting"),
            Stage::UselessRules => write!(f, "Rules after useless rules removal"),
        }
    }
}

#[derive(Debug, PartialEq, Clone, Default)]
pub struct Options {
    pub closure_copy: ClosureCopy,
    pub lift_terminals: bool,
    pub prune: bool,
}

// Runs every stage in order, showing the grammar to `observe` after each one.
// Nothing is returned if any stage fails.
pub fn run_pipeline(grammar: Grammar, options: &Options, mut observe: impl FnMut(Stage, &Grammar)) -> Result<Grammar> {
    debug!("Converting {} productions, {} letters free", grammar.production_count(), grammar.pool.len());

    let grammar = eliminate_long_productions(grammar)?;
    observe(Stage::LongRules, &grammar);

    let grammar = eliminate_empty_productions(grammar);
    observe(Stage::EmptyRules, &grammar);

    let closure = unit_closure(&grammar);
    let grammar = eliminate_unit_productions(grammar, &closure)?;
    observe(Stage::UnitRules, &grammar);

    let mut grammar = finalize_start_symbol(grammar, &closure, options.closure_copy)?;
    observe(Stage::Final, &grammar);

    if options.lift_terminals {
        grammar = lift_terminals(grammar)?;
        observe(Stage::TerminalLifting, &grammar);
    }

    if options.prune {
        grammar = remove_useless_rules(grammar);
        observe(Stage::UselessRules, &grammar);
    }

    if grammar.productions(grammar.start_symbol).is_empty() {
        warn!("Start symbol `{}` has no productions; the grammar generates nothing", grammar.start_symbol);
    }

    Ok(grammar)
}

#[cfg(test)]
mod tests {
    use rand::prelude::*;

    use super::*;

    const NONTERMINALS: &[char] = &['S', 'A', 'B', 'C', 'D'];
    const TERMINALS: &[char] = &['a', 'b', 'c', 'd'];

    fn random_grammar(rng: &mut StdRng) -> Grammar {
        let rule_count = rng.gen_range(3..=8);
        let mut rules = Vec::new();
        for _ in 0..rule_count {
            let lhs = *NONTERMINALS.choose(&mut *rng).unwrap();
            let rhs = if rng.gen_bool(0.15) {
                "e".to_string()
            } else {
                let length = rng.gen_range(1..=4);
                let mut rhs = String::new();
                for _ in 0..length {
                    let pick = if rng.gen_bool(0.6) { NONTERMINALS } else { TERMINALS };
                    rhs.push(*pick.choose(&mut *rng).unwrap());
                }
                rhs
            };
            rules.push((Symbol::Letter(lhs), rhs.chars().map(Symbol::from_char).collect::<Rhs>()));
        }
        let mut grammar = Grammar::from_rules(Symbol::Letter('S'), rules);
        grammar.add_production(Symbol::Letter('S'), vec![Symbol::Letter('a')]);
        grammar
    }

    fn record_stages(grammar: Grammar, options: &Options) -> (Vec<(Stage, Grammar)>, Grammar) {
        let mut stages = Vec::new();
        let result = run_pipeline(grammar, options, |stage, grammar| stages.push((stage, grammar.clone()))).unwrap();
        (stages, result)
    }

    fn stage<'a>(stages: &'a [(Stage, Grammar)], wanted: Stage) -> &'a Grammar {
        &stages.iter().find(|(stage, _)| *stage == wanted).unwrap().1
    }

    #[test]
    fn stages_are_observed_in_order() {
        let grammar = grammar_of('S', &[("S", "ABC"), ("A", "e"), ("B", "b"), ("C", "c")]);
        let (stages, _) = record_stages(grammar.clone(), &Options::default());
        let names = stages.iter().map(|(stage, _)| *stage).collect::<Vec<_>>();
        assert_eq!(names, vec![Stage::LongRules, Stage::EmptyRules, Stage::UnitRules, Stage::Final]);

        let options = Options { lift_terminals: true, prune: true, ..Options::default() };
        let (stages, _) = record_stages(grammar, &options);
        assert_eq!(stages.len(), 6);
        assert_eq!(stages[4].0, Stage::TerminalLifting);
        assert_eq!(stages[5].0, Stage::UselessRules);
    }

    #[test]
    fn converts_small_grammar() {
        // S -> ABC | a, A -> e, B -> b, C -> c
        let grammar = grammar_of('S', &[("S", "ABC"), ("S", "a"), ("A", "e"), ("B", "b"), ("C", "c")]);
        let (stages, result) = record_stages(grammar, &Options::default());

        assert_eq!(stage(&stages, Stage::LongRules).lines(), vec!["S->AD", "S->a", "A->e", "B->b", "C->c", "D->BC"]);
        assert_eq!(stage(&stages, Stage::EmptyRules).lines(), vec!["S->a", "S->D", "B->b", "C->c", "D->BC"]);
        assert_eq!(stage(&stages, Stage::UnitRules).lines(), vec!["S->a", "B->b", "C->c", "D->BC"]);
        // S already has `S->a`, so `D->BC` is not copied into it
        assert_eq!(result.lines(), vec!["S->a", "B->b", "C->c", "D->BC"]);
    }

    #[test]
    fn copy_closure_completes_start_symbol() {
        let grammar = grammar_of('S', &[("S", "ABC"), ("S", "a"), ("A", "e"), ("B", "b"), ("C", "c")]);
        let options = Options { closure_copy: ClosureCopy::EveryMember, ..Options::default() };
        let (_, result) = record_stages(grammar, &options);
        assert_eq!(result.productions(symbol("S")), &[rhs_of("a"), rhs_of("BC")]);
    }

    #[test]
    fn pool_exhaustion_is_fatal() {
        // A right side of 60 symbols needs 58 new letters, and only 48 are free
        let long_rhs = "ab".repeat(30);
        let grammar = grammar_of('S', &[("S", long_rhs.as_str()), ("S", "a"), ("S", "b")]);
        let result = run_pipeline(grammar, &Options::default(), |_, _| panic!("no stage may finish"));
        assert_eq!(result, Err(ConvertErrorType::PoolExhausted(symbol("S"))));
    }

    #[test]
    fn random_grammars_keep_invariants() {
        let mut rng = StdRng::seed_from_u64(0xC0FFEE);
        for _ in 0..200 {
            let grammar = random_grammar(&mut rng);
            let (stages, result) = record_stages(grammar, &Options::default());

            let long_free = stage(&stages, Stage::LongRules);
            assert!(long_free.rules.values().flatten().all(|rhs| rhs.len() <= 2), "{}", long_free);

            let empty_free = stage(&stages, Stage::EmptyRules);
            assert!(empty_free.rules.values().flatten().all(|rhs| !is_empty_rhs(rhs)), "{}", empty_free);

            let closure = unit_closure(empty_free);
            for (symbol, reachable) in &closure {
                assert!(reachable.contains(symbol));
                for middle in reachable {
                    assert!(closure[middle].is_subset(reachable), "closure of {} is not transitive", symbol);
                }
            }

            for rhs in result.rules.values().flatten() {
                assert!(rhs.len() == 1 || rhs.len() == 2, "{}", result);
                assert!(!result.is_unit(rhs), "{}", result);
                assert!(!rhs.contains(&Symbol::Epsilon));
            }
            assert!(result.rules.contains_key(&result.start_symbol));
        }
    }

    #[test]
    fn random_grammars_reach_strict_normal_form() {
        let mut rng = StdRng::seed_from_u64(7);
        let options = Options { lift_terminals: true, prune: true, ..Options::default() };
        for _ in 0..200 {
            let grammar = random_grammar(&mut rng);
            let (_, result) = record_stages(grammar, &options);

            for (lhs, alternatives) in &result.rules {
                assert!(result.is_nonterminal(*lhs));
                for rhs in alternatives {
                    match rhs[..] {
                        [terminal] => assert!(!result.is_nonterminal(terminal), "{}", result),
                        [left, right] => assert!(result.is_nonterminal(left) && result.is_nonterminal(right), "{}", result),
                        _ => panic!("{} is not in normal form", result),
                    }
                }
            }
        }
    }
}
