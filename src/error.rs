use thiserror::Error;

use crate::Itemset;

/// Errors raised while validating input, mining or reading transaction files.
#[derive( Debug, Error )]
pub enum MineError {
    #[error( "invalid parameter {name} = {value}" )]
    InvalidParameter { name: &'static str, value: f64 },

    #[error( "no transactions to analyze" )]
    EmptyInput,

    /// Raised for a rule whose confidence or lift has no finite value.
    /// The rule generator logs and skips these, it never returns them.
    #[error( "degenerate rule {antecedent:?} => {consequent:?}" )]
    NumericDegeneracy { antecedent: Itemset, consequent: Itemset },

    #[error( "mining cancelled before level {level}" )]
    Cancelled { level: usize },

    #[error( "deadline exceeded before level {level} after {elapsed_ms}ms" )]
    DeadlineExceeded { level: usize, elapsed_ms: u128 },

    #[error( transparent )]
    Io( #[from] std::io::Error ),

    #[error( "cannot parse line {line}: {message}" )]
    Parse { line: usize, message: String },

    #[error( transparent )]
    Json( #[from] serde_json::Error ),
}

pub type Result<T> = std::result::Result<T, MineError>;
