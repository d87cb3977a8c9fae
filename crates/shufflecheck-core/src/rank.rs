//! Lexicographic ranking of permutations (Lehmer code).
//!
//! Position `i` of an ordering contributes `index * (N-1-i)!`, where `index`
//! is the position of the symbol among the symbols not yet used. The sorted
//! ordering ranks 0 and the reversed ordering ranks `N! - 1`.

use crate::error::{Error, Result, SampleDefect};
use crate::symbols::{SymbolSet, factorial};

/// Maps orderings of a [`SymbolSet`] to ranks in `0..N!` and back.
#[derive(Debug, Clone)]
pub struct RankEncoder {
    symbols: SymbolSet,
    /// `place_values[i] = (N-1-i)!`
    place_values: Vec<u64>,
}

impl RankEncoder {
    pub fn new(symbols: SymbolSet) -> Self {
        let n = symbols.len();
        let place_values = (0..n).map(|i| factorial(n - 1 - i)).collect();
        Self {
            symbols,
            place_values,
        }
    }

    pub fn symbols(&self) -> &SymbolSet {
        &self.symbols
    }

    /// Number of possible outcomes, `N!`.
    pub fn outcome_count(&self) -> u64 {
        self.symbols.outcome_count()
    }

    /// Rank of `ordering`.
    ///
    /// Fails when the ordering has the wrong length, repeats a symbol, or
    /// uses a symbol outside the set.
    pub fn rank(&self, ordering: &[u32]) -> std::result::Result<u64, SampleDefect> {
        let n = self.symbols.len();
        if ordering.len() != n {
            return Err(SampleDefect::WrongLength {
                expected: n,
                got: ordering.len(),
            });
        }
        let mut pool = self.symbols.as_slice().to_vec();
        let mut rank = 0u64;
        for (&symbol, &place) in ordering.iter().zip(&self.place_values) {
            let Some(index) = pool.iter().position(|&s| s == symbol) else {
                return Err(if self.symbols.contains(symbol) {
                    SampleDefect::DuplicateSymbol(symbol)
                } else {
                    SampleDefect::UnknownSymbol(symbol)
                });
            };
            rank += index as u64 * place;
            pool.remove(index);
        }
        Ok(rank)
    }

    /// Ordering with the given rank.
    pub fn unrank(&self, rank: u64) -> Result<Vec<u32>> {
        let outcomes = self.outcome_count();
        if rank >= outcomes {
            return Err(Error::AggregationFault { rank, outcomes });
        }
        let mut pool = self.symbols.as_slice().to_vec();
        let mut remainder = rank;
        let mut ordering = Vec::with_capacity(pool.len());
        for &place in &self.place_values {
            let index = (remainder / place) as usize;
            remainder %= place;
            ordering.push(pool.remove(index));
        }
        Ok(ordering)
    }

    /// Every ordering, in rank order.
    pub fn enumerate(&self) -> impl Iterator<Item = Vec<u32>> + '_ {
        (0..self.outcome_count()).filter_map(move |r| self.unrank(r).ok())
    }

    /// Canonical label for every rank, in rank order.
    pub fn labels(&self) -> Vec<String> {
        self.enumerate().map(|o| self.symbols.label(&o)).collect()
    }
}
