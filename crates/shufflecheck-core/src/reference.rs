//! In-process shuffle sources for calibrating the harness.
//!
//! A known-good source (Fisher-Yates over a seeded [`StdRng`]) should pass
//! both tests; the classic "swap with any index" shuffle is biased and the
//! chi-squared test should flag it given enough samples.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::symbols::SymbolSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReferenceShuffle {
    /// Uniform Fisher-Yates shuffle.
    #[default]
    FisherYates,
    /// Swap every position with a uniformly chosen position. Produces
    /// `N^N` equally likely paths over `N!` outcomes, hence non-uniform.
    NaiveSwap,
}

impl ReferenceShuffle {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FisherYates => "fisher-yates",
            Self::NaiveSwap => "naive-swap",
        }
    }
}

/// `count` shuffles of `symbols`, reproducible from `seed`.
///
/// Every sample shuffles a fresh ascending list, so samples are independent
/// and any bias of the shuffle shows up in the outcome frequencies.
pub fn samples(symbols: &SymbolSet, count: usize, seed: u64, shuffle: ReferenceShuffle) -> Vec<Vec<u32>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        let mut list = symbols.as_slice().to_vec();
        match shuffle {
            ReferenceShuffle::FisherYates => list.shuffle(&mut rng),
            ReferenceShuffle::NaiveSwap => {
                let n = list.len();
                for i in 0..n {
                    let j = rng.random_range(0..n);
                    list.swap(i, j);
                }
            }
        }
        out.push(list);
    }
    out
}
