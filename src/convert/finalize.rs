use log::debug;

use crate::grammar::*;
use super::{ConvertErrorType, Result};

// Which closure members the start symbol takes productions from
#[derive(Debug, PartialEq, Clone, Copy, Default)]
pub enum ClosureCopy {
    // Only while the start symbol has no productions of its own, so at most
    // one member is copied in. Members reached after that are skipped, which
    // is likely not what a textbook conversion wants, but it is the default
    // output.
    #[default]
    WhileEmpty,
    // Every member, regardless of what the start symbol already has
    EveryMember,
}

// Gives the start symbol the productions of the nonterminals it reaches
// through unit productions
pub fn finalize_start_symbol(mut grammar: Grammar, closure: &ClosureMap, mode: ClosureCopy) -> Result<Grammar> {
    let start = grammar.start_symbol;
    let members = closure.get(&start).ok_or(ConvertErrorType::MissingClosure(start))?;

    grammar.rules.entry(start).or_default();

    for &member in members.iter().filter(|&&member| member != start) {
        if mode == ClosureCopy::WhileEmpty && !grammar.productions(start).is_empty() {
            break;
        }
        for rhs in grammar.productions(member).to_vec() {
            if grammar.add_production(start, rhs) {
                debug!("Copied a production of `{}` into `{}`", member, start);
            }
        }
    }

    Ok(grammar)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::{eliminate_unit_productions, unit_closure};

    fn through_unit_stage(grammar: Grammar) -> (Grammar, ClosureMap) {
        let closure = unit_closure(&grammar);
        (eliminate_unit_productions(grammar, &closure).unwrap(), closure)
    }

    #[test]
    fn empty_start_takes_member_productions() {
        let (grammar, closure) = through_unit_stage(grammar_of('S', &[("S", "L"), ("L", "XY"), ("X", "x"), ("Y", "y")]));
        assert_eq!(grammar.productions(symbol("S")), &[] as &[Rhs]);

        let finished = finalize_start_symbol(grammar, &closure, ClosureCopy::WhileEmpty).unwrap();
        assert_eq!(finished.productions(symbol("S")), &[rhs_of("XY")]);
    }

    #[test]
    fn unit_chain_reaches_start() {
        let (grammar, closure) = through_unit_stage(grammar_of('A', &[("A", "B"), ("B", "CD"), ("C", "c"), ("D", "d")]));
        let finished = finalize_start_symbol(grammar, &closure, ClosureCopy::WhileEmpty).unwrap();
        assert_eq!(finished.lines(), vec!["A->CD", "B->CD", "C->c", "D->d"]);
        assert!(!finished.lines().contains(&"A->B".to_string()));
    }

    #[test]
    fn only_first_member_is_copied_while_empty() {
        let rules = [("S", "A"), ("S", "B"), ("A", "XX"), ("B", "YY"), ("X", "x"), ("Y", "y")];
        let (grammar, closure) = through_unit_stage(grammar_of('S', &rules));

        let finished = finalize_start_symbol(grammar.clone(), &closure, ClosureCopy::WhileEmpty).unwrap();
        assert_eq!(finished.productions(symbol("S")), &[rhs_of("XX")]);

        let finished = finalize_start_symbol(grammar, &closure, ClosureCopy::EveryMember).unwrap();
        assert_eq!(finished.productions(symbol("S")), &[rhs_of("XX"), rhs_of("YY")]);
    }

    #[test]
    fn start_with_productions_is_left_alone() {
        let (grammar, closure) = through_unit_stage(grammar_of('S', &[("S", "L"), ("S", "s"), ("L", "XY"), ("X", "x"), ("Y", "y")]));
        let finished = finalize_start_symbol(grammar, &closure, ClosureCopy::WhileEmpty).unwrap();
        assert_eq!(finished.productions(symbol("S")), &[rhs_of("s")]);
    }

    #[test]
    fn start_with_nothing_to_copy_stays_empty() {
        let (grammar, closure) = through_unit_stage(grammar_of('S', &[("S", "A"), ("A", "B"), ("B", "A")]));
        let finished = finalize_start_symbol(grammar, &closure, ClosureCopy::EveryMember).unwrap();
        assert!(finished.rules.contains_key(&symbol("S")));
        assert_eq!(finished.production_count(), 0);
    }

    #[test]
    fn start_without_closure_is_an_error() {
        let (grammar, mut closure) = through_unit_stage(grammar_of('S', &[("S", "AB"), ("A", "a"), ("B", "b")]));
        closure.shift_remove(&symbol("S"));
        assert_eq!(
            finalize_start_symbol(grammar, &closure, ClosureCopy::WhileEmpty),
            Err(ConvertErrorType::MissingClosure(symbol("S")))
        );
    }
}
