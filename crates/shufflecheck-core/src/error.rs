//! Error types for the shuffle audit pipeline and the subject driver.

use std::time::Duration;

use thiserror::Error;

/// Why a single sample is not a permutation of the symbol set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SampleDefect {
    #[error("expected {expected} symbols, got {got}")]
    WrongLength { expected: usize, got: usize },
    #[error("symbol {0} appears more than once")]
    DuplicateSymbol(u32),
    #[error("symbol {0} is not in the symbol set")]
    UnknownSymbol(u32),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("symbol set is empty")]
    EmptySymbolSet,
    #[error("symbol {0} is listed more than once in the symbol set")]
    DuplicateSymbolInSet(u32),
    #[error("symbol set has {size} symbols; at most {max} are supported")]
    TooManySymbols { size: usize, max: usize },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("malformed sample #{index}: {defect}")]
    MalformedSample { index: usize, defect: SampleDefect },
    #[error("rank {rank} is outside the {outcomes} possible outcomes")]
    AggregationFault { rank: u64, outcomes: u64 },
    #[error("expected count per outcome is zero ({samples} samples over {outcomes} outcomes)")]
    DegenerateExpectation { samples: usize, outcomes: u64 },

    #[error("line {line}: cannot parse {token:?} as a symbol")]
    InvalidToken { line: usize, token: String },
    #[error("marker {marker:?} not found in subject output")]
    MarkerNotFound { marker: String },
    #[error("subject printed {extracted} samples for {requested} sample commands")]
    SampleCountMismatch { requested: usize, extracted: usize },

    #[error("failed to start subject {program:?}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("subject {program:?} did not finish within {timeout:?}")]
    Timeout { program: String, timeout: Duration },
    #[error("subject {program:?} exited with {status}: {stderr}")]
    SubjectFailed {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
