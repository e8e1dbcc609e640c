use thiserror::Error;

use crate::codec::Rule;

// Clone, since a failed shared load is handed to every waiter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaxomergeError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Invalid term: {0}")]
    InvalidTerm(String),
    #[error("Invalid statement: {0}")]
    InvalidStatement(String),
    #[error("Parse error: {message}")]
    Parse { message: String, line: Option<usize>, col: Option<usize> },
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Commit failed: {0}")]
    Commit(String),
    #[error("Unsupported field: {0}")]
    UnsupportedField(String),
    #[error("Unresolved conflicts: {missing:?}")]
    UnresolvedConflicts { missing: Vec<usize> },
    #[error("Remote changed while resolving conflicts: {0}")]
    RemoteChanged(String),
    #[error("Load error: {0}")]
    Load(String),
}

pub type Result<T> = std::result::Result<T, TaxomergeError>;

// Helper conversions
impl From<std::io::Error> for TaxomergeError {
    fn from(e: std::io::Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(e.to_string()),
            _ => Self::Transport(e.to_string()),
        }
    }
}

impl From<config::ConfigError> for TaxomergeError {
    fn from(e: config::ConfigError) -> Self {
        Self::Config(e.to_string())
    }
}

impl From<pest::error::Error<Rule>> for TaxomergeError {
    fn from(e: pest::error::Error<Rule>) -> Self {
        let (line, col) = match e.line_col {
            pest::error::LineColLocation::Pos((l, c)) => (l, c),
            pest::error::LineColLocation::Span((l, c), _) => (l, c),
        };
        Self::Parse {
            message: e.variant.message().into_owned(),
            line: Some(line),
            col: Some(col),
        }
    }
}
