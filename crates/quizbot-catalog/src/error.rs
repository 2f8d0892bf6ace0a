//! Catalog error types.

use std::path::PathBuf;

use thiserror::Error;

/// Which kind of block a parse error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// A block opened by a question marker.
    Question,
    /// A block opened by an answer marker.
    Answer,
}

impl std::fmt::Display for BlockKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Question => f.write_str("question"),
            Self::Answer => f.write_str("answer"),
        }
    }
}

/// Errors raised while loading a quiz catalog. All of them are fatal at
/// startup.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The source file could not be read.
    #[error("failed to read quiz source {path}: {source}")]
    Io {
        /// Path of the source file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The requested text encoding label is not recognised.
    #[error("unknown text encoding: {0}")]
    UnknownEncoding(String),

    /// The source bytes are not valid in the configured encoding.
    #[error("quiz source is not valid {encoding}")]
    Encoding {
        /// Name of the encoding that rejected the input.
        encoding: &'static str,
    },

    /// Input ended before the blank line closing a block.
    #[error("unterminated {kind} block starting at line {line}")]
    UnterminatedBlock {
        /// Kind of the unterminated block.
        kind: BlockKind,
        /// 1-based line number of the block marker.
        line: usize,
    },

    /// An answer block appeared before any question block.
    #[error("answer block at line {line} has no preceding question")]
    AnswerWithoutQuestion {
        /// 1-based line number of the answer marker.
        line: usize,
    },

    /// The source contained no complete question/answer pair.
    #[error("quiz source contains no question/answer pairs")]
    Empty,
}
