use indexmap::IndexSet;
use itertools::{iproduct, Itertools};
use log::debug;

use crate::grammar::*;
use super::{ConvertErrorType, Result};

// For every nonterminal, the set of nonterminals it reaches through zero or
// more unit productions. Sweeps until no set grows.
pub fn unit_closure(grammar: &Grammar) -> ClosureMap {
    let mut closure: ClosureMap = grammar
        .vocabulary
        .iter()
        .map(|&symbol| (symbol, IndexSet::from([symbol])))
        .collect();

    let mut changed = true;
    while changed {
        changed = false;
        for reachable in closure.values_mut() {
            let targets = reachable
                .iter()
                .flat_map(|&key| grammar.productions(key))
                .filter(|rhs| grammar.is_unit(rhs))
                .map(|rhs| rhs[0])
                .collect_vec();
            for target in targets {
                changed |= reachable.insert(target);
            }
        }
    }

    for (symbol, reachable) in &closure {
        debug!("D({}) = {{{}}}", symbol, reachable.iter().join(", "));
    }
    closure
}

// Symbols outside the vocabulary are terminals and only stand for themselves
fn closure_of(grammar: &Grammar, closure: &ClosureMap, symbol: Symbol) -> Result<Vec<Symbol>> {
    if !grammar.is_nonterminal(symbol) {
        return Ok(vec![symbol]);
    }
    closure
        .get(&symbol)
        .map(|reachable| reachable.iter().copied().collect())
        .ok_or(ConvertErrorType::MissingClosure(symbol))
}

// Drops every unit production, then rewrites each `A -> BC` into `A -> B'C'`
// for all `B'` in the closure of `B` and `C'` in the closure of `C`.
// `closure` must come from the grammar as it was before this call.
pub fn eliminate_unit_productions(mut grammar: Grammar, closure: &ClosureMap) -> Result<Grammar> {
    let start = grammar.start_symbol;

    let Grammar { rules, vocabulary, .. } = &mut grammar;
    for alternatives in rules.values_mut() {
        alternatives.retain(|rhs| !matches!(rhs[..], [only] if vocabulary.contains(&only)));
    }
    rules.retain(|lhs, alternatives| !alternatives.is_empty() || *lhs == start);

    let snapshot = grammar.rules.clone();
    for (&lhs, alternatives) in &snapshot {
        for rhs in alternatives {
            if let [left, right] = rhs[..] {
                let lefts = closure_of(&grammar, closure, left)?;
                let rights = closure_of(&grammar, closure, right)?;
                for (l, r) in iproduct!(lefts, rights) {
                    grammar.add_production(lhs, vec![l, r]);
                }
            }
        }
    }

    Ok(grammar)
}
