use log::debug;

use crate::grammar::*;
use super::{ConvertErrorType, Result};

// Splits every right side longer than two symbols into a chain of binary
// productions: `A -> BCD` becomes `A -> BF` and `F -> CD`
pub fn eliminate_long_productions(mut grammar: Grammar) -> Result<Grammar> {
    let snapshot = std::mem::take(&mut grammar.rules);

    // Chain productions go after every existing key, in the order they are made
    let mut introduced = Vec::new();

    for (lhs, alternatives) in snapshot {
        grammar.rules.entry(lhs).or_default();

        for rhs in alternatives {
            if rhs.len() <= 2 {
                grammar.add_production(lhs, rhs);
                continue;
            }

            let (leading, last_two) = rhs.split_at(rhs.len() - 2);
            let mut head = lhs;
            for (i, &symbol) in leading.iter().enumerate() {
                let fresh = grammar.draw_fresh().ok_or(ConvertErrorType::PoolExhausted(lhs))?;
                debug!("Drew `{}` for `{}->{}`", fresh, lhs, rhs_to_string(&rhs));
                if i == 0 {
                    grammar.add_production(head, vec![symbol, fresh]);
                } else {
                    introduced.push((head, vec![symbol, fresh]));
                }
                head = fresh;
            }
            introduced.push((head, last_two.to_vec()));
        }
    }

    for (lhs, rhs) in introduced {
        grammar.add_production(lhs, rhs);
    }

    Ok(grammar)
}
