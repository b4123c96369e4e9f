use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScoringError {
    #[error("insufficient history: have {have} bars, need {need}")]
    InsufficientHistory { have: usize, need: usize },

    #[error("missing fundamental field: {0}")]
    MissingFundamentalField(&'static str),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Collaborator failure passed through unchanged; the batch loop
    /// wraps it per symbol so one bad symbol cannot abort the run.
    #[error(transparent)]
    Provider(#[from] anyhow::Error),
}

impl ScoringError {
    /// A recoverable error skips the current symbol; anything else
    /// indicates a misconfigured caller and should abort the run.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, ScoringError::InvalidConfig(_))
    }
}
