//! Error types for sqlweave

use thiserror::Error;

use crate::statement::StatementKind;

/// Result type alias for sqlweave operations
pub type WeaveResult<T> = Result<T, WeaveError>;

/// Errors raised while compiling or executing a statement.
///
/// Compilation errors are contract violations: the statement was assembled in a way that can
/// never produce valid SQL, so the build is aborted and nothing partial is returned.
#[derive(Debug, Error)]
pub enum WeaveError {
    /// The statement never declared an operation.
    #[error("statement has no operation (call select/insert/update/... before building)")]
    UnsetKind,

    /// A table-bearing statement has no table reference.
    #[error("{kind:?} statement has no table")]
    MissingTable { kind: StatementKind },

    /// The number of markers in a template does not match its argument list.
    #[error("template `{template}` has {markers} marker(s) but {args} argument(s)")]
    PlaceholderMismatch {
        template: String,
        markers: usize,
        args: usize,
    },

    /// A marker-free template was given arguments it cannot interpret.
    #[error("ambiguous condition `{template}` with {args} argument(s)")]
    AmbiguousCondition { template: String, args: usize },

    /// A sequence argument was empty.
    #[error("empty sequence bound in `{template}`")]
    EmptySequence { template: String },

    /// UPDATE/PATCH (or ON DUPLICATE KEY UPDATE) has nothing to assign.
    #[error("{kind:?} statement has no column to assign")]
    EmptyAssignments { kind: StatementKind },

    /// Identifier text that cannot be quoted.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// Execution option outside the supported set.
    #[error("unknown query option: {0}")]
    UnknownOption(String),

    /// A table definition that cannot be rendered as DDL.
    #[error("invalid table definition: {0}")]
    Schema(String),

    /// Configuration could not be parsed.
    #[error("configuration error: {0}")]
    Config(String),

    /// The execution collaborator reported a failure.
    #[error("execution error: {0}")]
    Execution(String),

    /// Row not found
    #[error("not found: {0}")]
    NotFound(String),

    /// Query timeout error
    #[error("query timeout after {0:?}")]
    Timeout(std::time::Duration),
}

impl WeaveError {
    /// Create a placeholder mismatch error.
    pub fn mismatch(template: impl Into<String>, markers: usize, args: usize) -> Self {
        Self::PlaceholderMismatch {
            template: template.into(),
            markers,
            args,
        }
    }

    /// Create an ambiguous condition error.
    pub fn ambiguous(template: impl Into<String>, args: usize) -> Self {
        Self::AmbiguousCondition {
            template: template.into(),
            args,
        }
    }

    /// Create an invalid identifier error
    pub fn invalid_ident(message: impl Into<String>) -> Self {
        Self::InvalidIdentifier(message.into())
    }

    /// Create a table definition error
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema(message.into())
    }

    /// Create an execution error
    pub fn execution(message: impl Into<String>) -> Self {
        Self::Execution(message.into())
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Check if this error was raised while compiling a statement.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            Self::UnsetKind
                | Self::MissingTable { .. }
                | Self::PlaceholderMismatch { .. }
                | Self::AmbiguousCondition { .. }
                | Self::EmptySequence { .. }
                | Self::EmptyAssignments { .. }
                | Self::InvalidIdentifier(_)
                | Self::UnknownOption(_)
        )
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if this is a timeout error
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}

impl From<toml::de::Error> for WeaveError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}
