//! Outcome counting over a stream of samples.

use log::debug;

use crate::error::{Error, Result};
use crate::rank::RankEncoder;

/// Observed count for every one of the `N!` outcomes, indexed by rank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: Vec<u64>,
    total: u64,
}

impl FrequencyTable {
    /// A table with every outcome at zero.
    pub fn new(outcomes: u64) -> Self {
        Self {
            counts: vec![0; outcomes as usize],
            total: 0,
        }
    }

    /// Count one occurrence of `rank`.
    pub fn record(&mut self, rank: u64) -> Result<()> {
        let outcomes = self.counts.len() as u64;
        let slot = self
            .counts
            .get_mut(rank as usize)
            .ok_or(Error::AggregationFault { rank, outcomes })?;
        *slot += 1;
        self.total += 1;
        Ok(())
    }

    /// Counts in rank order.
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn count(&self, rank: u64) -> u64 {
        self.counts.get(rank as usize).copied().unwrap_or(0)
    }

    /// Number of outcomes (always `N!`).
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Outcomes seen at least once.
    pub fn observed_outcomes(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }
}

/// Everything one pass over the samples produces.
#[derive(Debug, Clone)]
pub struct Aggregation {
    pub table: FrequencyTable,
    /// Rank of each sample, in emission order.
    pub ranks: Vec<u64>,
}

/// Rank every sample and count outcomes.
///
/// The first malformed sample aborts the whole aggregation.
pub fn aggregate<S: AsRef<[u32]>>(encoder: &RankEncoder, samples: &[S]) -> Result<Aggregation> {
    let mut table = FrequencyTable::new(encoder.outcome_count());
    let mut ranks = Vec::with_capacity(samples.len());
    for (index, sample) in samples.iter().enumerate() {
        let rank = encoder
            .rank(sample.as_ref())
            .map_err(|defect| Error::MalformedSample { index, defect })?;
        table.record(rank)?;
        ranks.push(rank);
    }
    debug!(
        "aggregated {} samples into {} outcomes ({} observed)",
        ranks.len(),
        table.len(),
        table.observed_outcomes()
    );
    Ok(Aggregation { table, ranks })
}
