use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing input file: {0}")]
    MissingInput(String),
}

pub type Result<T> = std::result::Result<T, Error>;
