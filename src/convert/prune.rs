use indexmap::IndexSet;
use itertools::Itertools;
use log::debug;

use crate::grammar::*;

// A symbol is productive if it is a terminal, or if one of its productions
// only uses productive symbols
fn productive_symbols(grammar: &Grammar) -> IndexSet<Symbol> {
    let mut productive = IndexSet::new();

    loop {
        let before = productive.len();
        for (lhs, alternatives) in &grammar.rules {
            let productive_rhs = alternatives
                .iter()
                .any(|rhs| rhs.iter().all(|s| !grammar.is_nonterminal(*s) || productive.contains(s)));
            if productive_rhs {
                productive.insert(*lhs);
            }
        }
        if productive.len() == before {
            return productive;
        }
    }
}

fn reachable_symbols(grammar: &Grammar) -> IndexSet<Symbol> {
    let mut reachable = IndexSet::from([grammar.start_symbol]);
    let mut i = 0;
    while let Some(&symbol) = reachable.get_index(i) {
        for rhs in grammar.productions(symbol) {
            reachable.extend(rhs.iter().copied().filter(|s| grammar.rules.contains_key(s)));
        }
        i += 1;
    }
    reachable
}

// Drops nonterminals that derive no terminal string, then those the start
// symbol never reaches. The start symbol itself always keeps its key.
pub fn remove_useless_rules(mut grammar: Grammar) -> Grammar {
    let start = grammar.start_symbol;

    let productive = productive_symbols(&grammar);
    let unproductive = grammar
        .vocabulary
        .iter()
        .copied()
        .filter(|s| !productive.contains(s))
        .collect::<IndexSet<_>>();
    debug!("Unproductive: {{{}}}", unproductive.iter().join(", "));

    for alternatives in grammar.rules.values_mut() {
        alternatives.retain(|rhs| !rhs.iter().any(|s| unproductive.contains(s)));
    }
    grammar.rules.retain(|lhs, _| !unproductive.contains(lhs) || *lhs == start);

    let reachable = reachable_symbols(&grammar);
    grammar.rules.retain(|lhs, _| reachable.contains(lhs));
    debug!("Reachable: {{{}}}", reachable.iter().join(", "));

    let Grammar { rules, vocabulary, .. } = &mut grammar;
    vocabulary.retain(|s| rules.contains_key(s));

    grammar
}
