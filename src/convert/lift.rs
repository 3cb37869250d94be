use indexmap::IndexMap;
use log::debug;

use crate::grammar::*;
use super::{ConvertErrorType, Result};

// Replaces every terminal on the side of a binary production with a new
// nonterminal that derives just that terminal: `A -> aB` becomes `A -> TB`
// and `T -> a`. Each terminal gets one nonterminal, shared by all its uses.
pub fn lift_terminals(mut grammar: Grammar) -> Result<Grammar> {
    let snapshot = std::mem::take(&mut grammar.rules);
    let mut lifted: IndexMap<Symbol, Symbol> = IndexMap::new();

    for (lhs, alternatives) in snapshot {
        grammar.rules.entry(lhs).or_default();

        for rhs in alternatives {
            if rhs.len() != 2 {
                grammar.add_production(lhs, rhs);
                continue;
            }

            let mut binary = Vec::with_capacity(2);
            for symbol in rhs {
                if grammar.is_nonterminal(symbol) {
                    binary.push(symbol);
                } else if let Some(&stand_in) = lifted.get(&symbol) {
                    binary.push(stand_in);
                } else {
                    let stand_in = grammar.draw_fresh().ok_or(ConvertErrorType::PoolExhausted(lhs))?;
                    debug!("`{}` stands in for terminal `{}`", stand_in, symbol);
                    lifted.insert(symbol, stand_in);
                    binary.push(stand_in);
                }
            }
            grammar.add_production(lhs, binary);
        }
    }

    for (terminal, stand_in) in lifted {
        grammar.add_production(stand_in, vec![terminal]);
    }

    Ok(grammar)
}
