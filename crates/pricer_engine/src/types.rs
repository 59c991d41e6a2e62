use std::fmt;
use std::sync::Arc;

use pricer_core::{Card, Phase, SearchOutcome, SourceId};

use crate::ResultStore;

/// Everything the engine reports, as a value that can cross a channel.
#[derive(Debug, Clone)]
pub enum SearchEvent {
    SearchStarted {
        card_count: usize,
    },
    CardSearchStarted {
        card: Card,
        source: SourceId,
    },
    CardSearchEnded {
        card: Card,
        outcome: SearchOutcome,
        source: SourceId,
    },
    SourceTaskEnded {
        source: SourceId,
        store: Arc<ResultStore>,
    },
    SourceTaskFailed {
        source: SourceId,
        error: SourceError,
    },
    SearchFinished {
        cancelled: bool,
    },
}

/// A failed fetch or parse inside one source adapter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct SourceError {
    pub kind: FailureKind,
    pub message: String,
}

impl SourceError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    RedirectLimitExceeded,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    UnsupportedContentType { content_type: String },
    Decode,
    Parse,
    Network,
    /// The adapter panicked while handling a card.
    Internal,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::UnsupportedContentType { content_type } => {
                write!(f, "unsupported content type {content_type}")
            }
            FailureKind::Decode => write!(f, "decode error"),
            FailureKind::Parse => write!(f, "parse error"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Internal => write!(f, "internal error"),
        }
    }
}

/// A call the engine cannot honour in its current state. Nothing changes
/// when one is returned.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("cannot {operation} while {phase}")]
    WrongPhase {
        operation: &'static str,
        phase: Phase,
    },
    #[error("source '{0}' is not registered with the engine")]
    UnknownSource(SourceId),
    #[error("failed to build the search runtime: {0}")]
    Runtime(#[from] std::io::Error),
}
