use thiserror::Error;

#[derive(Error, Debug)]
pub enum RosterError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Exception list is full: at most {max} names allowed")]
    TooManyExceptions { max: usize },

    #[error("Roster is empty: a header and at least one valid row are required")]
    EmptyRoster,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type RosterResult<T> = Result<T, RosterError>;
