use thiserror::Error;

/// Result type for hypergraph cut operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while reading or validating a hypergraph.
#[derive(Error, Debug)]
pub enum Error {
    /// Input text is malformed or inconsistent
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Edge endpoint outside `1..=vertices`
    #[error("Invalid vertex {vertex} in edge {edge} (expected 1..={vertices})")]
    InvalidVertex {
        vertex: usize,
        edge: usize,
        vertices: usize,
    },

    /// Instance too large for exhaustive enumeration
    #[error("Input too large: {0}")]
    InputTooLarge(String),

    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
