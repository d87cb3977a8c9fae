//! The fixed symbol universe a subject permutes.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Largest supported universe. 10! outcomes is the biggest table we allocate.
pub const MAX_SYMBOLS: usize = 10;

/// Default universe size, matching a four-element list shuffle.
pub const DEFAULT_SYMBOL_COUNT: usize = 4;

/// `n!` as `u64`. Callers stay within [`MAX_SYMBOLS`].
pub fn factorial(n: usize) -> u64 {
    (1..=n as u64).product()
}

/// Sorted, duplicate-free set of symbols.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u32>", into = "Vec<u32>")]
pub struct SymbolSet {
    symbols: Vec<u32>,
}

impl SymbolSet {
    /// Build a set from arbitrary-order symbols.
    pub fn new(mut symbols: Vec<u32>) -> Result<Self> {
        if symbols.is_empty() {
            return Err(Error::EmptySymbolSet);
        }
        if symbols.len() > MAX_SYMBOLS {
            return Err(Error::TooManySymbols {
                size: symbols.len(),
                max: MAX_SYMBOLS,
            });
        }
        symbols.sort_unstable();
        if let Some(pair) = symbols.windows(2).find(|w| w[0] == w[1]) {
            return Err(Error::DuplicateSymbolInSet(pair[0]));
        }
        Ok(Self { symbols })
    }

    /// The set `1..=n`.
    pub fn range(n: usize) -> Result<Self> {
        Self::new((1..=n as u32).collect())
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Symbols in ascending order.
    pub fn as_slice(&self) -> &[u32] {
        &self.symbols
    }

    /// Number of distinct orderings, `N!`.
    pub fn outcome_count(&self) -> u64 {
        factorial(self.symbols.len())
    }

    pub fn contains(&self, symbol: u32) -> bool {
        self.symbols.binary_search(&symbol).is_ok()
    }

    /// Canonical label of an ordering: digits run together ("3142") when
    /// every symbol is a single digit, otherwise joined with '-'.
    pub fn label(&self, ordering: &[u32]) -> String {
        let compact = self.symbols.iter().all(|&s| s < 10);
        let parts: Vec<String> = ordering.iter().map(|s| s.to_string()).collect();
        parts.join(if compact { "" } else { "-" })
    }

    /// Space-separated rendering, as a subject prints a list.
    pub fn display(ordering: &[u32]) -> String {
        let parts: Vec<String> = ordering.iter().map(|s| s.to_string()).collect();
        parts.join(" ")
    }
}

impl Default for SymbolSet {
    fn default() -> Self {
        Self {
            symbols: (1..=DEFAULT_SYMBOL_COUNT as u32).collect(),
        }
    }
}

impl TryFrom<Vec<u32>> for SymbolSet {
    type Error = Error;

    fn try_from(symbols: Vec<u32>) -> Result<Self> {
        Self::new(symbols)
    }
}

impl From<SymbolSet> for Vec<u32> {
    fn from(set: SymbolSet) -> Self {
        set.symbols
    }
}
