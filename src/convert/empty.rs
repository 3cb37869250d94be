use indexmap::IndexSet;
use itertools::Itertools;
use log::{debug, warn};

use crate::grammar::*;

// Every nonterminal that can derive the empty string. Repeats until no new
// nullable symbol turns up, so chains like `A -> B`, `B -> CC`, `C -> e` are
// found no matter which order the rules come in.
pub fn nullable_symbols(rules: &ProductionTable) -> IndexSet<Symbol> {
    let mut nullable = IndexSet::new();

    loop {
        let before = nullable.len();
        for (lhs, alternatives) in rules {
            let derives_empty = alternatives
                .iter()
                .any(|rhs| rhs.iter().all(|s| *s == Symbol::Epsilon || nullable.contains(s)));
            if derives_empty {
                nullable.insert(*lhs);
            }
        }
        if nullable.len() == before {
            return nullable;
        }
    }
}

// Removes every `A -> e` and makes up for it by adding, for each `A -> BC`
// with a nullable side, the production that drops that side
pub fn eliminate_empty_productions(mut grammar: Grammar) -> Grammar {
    let nullable = nullable_symbols(&grammar.rules);
    debug!("Nullable symbols: {{{}}}", nullable.iter().join(", "));

    if nullable.contains(&grammar.start_symbol) {
        warn!("Start symbol `{}` derives the empty string, which cannot be kept in normal form", grammar.start_symbol);
    }

    for alternatives in grammar.rules.values_mut() {
        alternatives.retain(|rhs| !is_empty_rhs(rhs));
    }

    let snapshot = grammar.rules.clone();
    for (&lhs, alternatives) in &snapshot {
        for rhs in alternatives {
            if let [left, right] = rhs[..] {
                // Never add a trivial `A -> A`
                if nullable.contains(&left) && lhs != right {
                    grammar.add_production(lhs, vec![right]);
                }
                if nullable.contains(&right) && lhs != left && left != right {
                    grammar.add_production(lhs, vec![left]);
                }
            }
        }
    }

    remove_dead_symbols(&mut grammar);
    grammar
}

// A nonterminal left without productions can only have derived the empty
// string, which the compensation above already covers. Drop it and every
// production that mentions it, until nothing else dies.
fn remove_dead_symbols(grammar: &mut Grammar) {
    let start = grammar.start_symbol;
    let mut dead = IndexSet::new();

    loop {
        let newly_dead = grammar
            .rules
            .iter()
            .filter(|(lhs, alternatives)| alternatives.is_empty() && !dead.contains(*lhs))
            .map(|(lhs, _)| *lhs)
            .collect_vec();
        if newly_dead.is_empty() {
            return;
        }

        for symbol in newly_dead {
            debug!("`{}` has no productions left", symbol);
            dead.insert(symbol);
            // The start symbol stays, with an empty list
            if symbol != start {
                grammar.rules.shift_remove(&symbol);
                grammar.vocabulary.shift_remove(&symbol);
            }
        }

        for alternatives in grammar.rules.values_mut() {
            alternatives.retain(|rhs| !rhs.iter().any(|s| dead.contains(s)));
        }
    }
}
