//! Boundary-facing error type. Internal engine logic (move generation,
//! search, hashing) never returns `Result` — per the UCI command loop's
//! contract, malformed input is logged and ignored rather than
//! propagated. `EngineError` only covers the two places that parse
//! data from outside the process: FEN strings and opening book files.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid FEN string: {0}")]
    InvalidFen(String),

    #[error("failed to read opening book {path}: {source}")]
    BookIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("opening book {0} has a truncated or malformed record")]
    BookFormat(String),
}
