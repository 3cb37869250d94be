/*
    This module is for storing and manipulating grammars
*/

use std::fmt::Display;

use indexmap::{IndexMap, IndexSet};

// Letter reserved for the empty string
pub const EMPTY_MARKER: char = 'e';

// The base unit in a grammar rule. Whether a letter is a terminal or a
// nonterminal is decided by the vocabulary, not by the symbol itself.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum Symbol {
    Epsilon,
    Letter(char),
}

impl Symbol {
    pub fn from_char(c: char) -> Symbol {
        if c == EMPTY_MARKER {
            Symbol::Epsilon
        } else {
            Symbol::Letter(c)
        }
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Symbol::Epsilon => write!(f, "{}", EMPTY_MARKER),
            Symbol::Letter(c) => write!(f, "{}", c),
        }
    }
}

// The symbols on the right side of a single production
pub type Rhs = Vec<Symbol>;

// Alternatives for one nonterminal, in insertion order
pub type Productions = Vec<Rhs>;

pub type ProductionTable = IndexMap<Symbol, Productions>;
pub type Vocabulary = IndexSet<Symbol>;

// For each nonterminal, the nonterminals reachable through unit productions
pub type ClosureMap = IndexMap<Symbol, IndexSet<Symbol>>;

pub fn is_empty_rhs(rhs: &[Symbol]) -> bool {
    rhs == [Symbol::Epsilon]
}

pub fn rhs_to_string(rhs: &[Symbol]) -> String {
    rhs.iter().map(Symbol::to_string).collect()
}

/// Letters that are still free to name new nonterminals.
///
/// Uppercase letters are handed out first, then lowercase ones. The empty
/// marker is never part of the pool.
#[derive(Debug, PartialEq, Clone)]
pub struct FreshPool {
    letters: IndexSet<char>,
}

impl FreshPool {
    pub fn excluding(used: impl IntoIterator<Item = char>) -> Self {
        let mut letters: IndexSet<char> = ('A'..='Z')
            .chain('a'..='z')
            .filter(|&c| c != EMPTY_MARKER)
            .collect();
        for c in used {
            letters.shift_remove(&c);
        }
        FreshPool { letters }
    }

    pub fn draw(&mut self) -> Option<Symbol> {
        self.letters.shift_remove_index(0).map(Symbol::Letter)
    }

    pub fn len(&self) -> usize {
        self.letters.len()
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct Grammar {
    pub start_symbol: Symbol,
    pub rules: ProductionTable,
    pub vocabulary: Vocabulary,
    pub pool: FreshPool,
}

impl Grammar {
    // Builds a grammar from `(lhs, rhs)` pairs and seeds the pool with every
    // letter the rules and the start symbol leave unused
    pub fn from_rules(start_symbol: Symbol, rules: impl IntoIterator<Item = (Symbol, Rhs)>) -> Self {
        let rules = rules.into_iter().collect::<Vec<_>>();

        let used = rules
            .iter()
            .flat_map(|(lhs, rhs)| std::iter::once(lhs).chain(rhs.iter()))
            .chain(std::iter::once(&start_symbol))
            .filter_map(|symbol| match symbol {
                Symbol::Letter(c) => Some(*c),
                Symbol::Epsilon => None,
            });

        let mut grammar = Grammar {
            start_symbol,
            rules: ProductionTable::new(),
            vocabulary: Vocabulary::new(),
            pool: FreshPool::excluding(used),
        };
        for (lhs, rhs) in rules {
            grammar.add_production(lhs, rhs);
        }
        grammar
    }

    // Returns false if `lhs` already had this exact alternative
    pub fn add_production(&mut self, lhs: Symbol, rhs: Rhs) -> bool {
        self.vocabulary.insert(lhs);
        let alternatives = self.rules.entry(lhs).or_default();
        if alternatives.contains(&rhs) {
            return false;
        }
        alternatives.push(rhs);
        true
    }

    pub fn productions(&self, lhs: Symbol) -> &[Rhs] {
        self.rules.get(&lhs).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_nonterminal(&self, symbol: Symbol) -> bool {
        self.vocabulary.contains(&symbol)
    }

    // A unit production has a single nonterminal on its right side
    pub fn is_unit(&self, rhs: &[Symbol]) -> bool {
        matches!(rhs, [only] if self.is_nonterminal(*only))
    }

    // Takes the next free letter and registers it as a nonterminal
    pub fn draw_fresh(&mut self) -> Option<Symbol> {
        let fresh = self.pool.draw()?;
        self.vocabulary.insert(fresh);
        Some(fresh)
    }

    pub fn production_count(&self) -> usize {
        self.rules.values().map(Vec::len).sum()
    }

    // Every production as a `key->value` string, in table then list order
    pub fn lines(&self) -> Vec<String> {
        self.rules
            .iter()
            .flat_map(|(lhs, alternatives)| {
                alternatives.iter().map(move |rhs| format!("{}->{}", lhs, rhs_to_string(rhs)))
            })
            .collect()
    }
}

impl Display for Grammar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for line in self.lines() {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

// Shorthand used by tests across the crate: `grammar_of('S', &[("S", "AB")])`
#[cfg(test)]
pub fn grammar_of(start: char, rules: &[(&str, &str)]) -> Grammar {
    Grammar::from_rules(
        Symbol::from_char(start),
        rules.iter().map(|(lhs, rhs)| (symbol(lhs), rhs_of(rhs))),
    )
}

#[cfg(test)]
pub fn symbol(text: &str) -> Symbol {
    Symbol::from_char(text.chars().next().unwrap())
}

#[cfg(test)]
pub fn rhs_of(text: &str) -> Rhs {
    text.chars().map(Symbol::from_char).collect()
}
