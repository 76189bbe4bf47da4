use crate::fill::Kind;

/// Failure of a single converter while turning default text into a value.
///
/// Returned by every converter. The silent code path (`Registry::apply`)
/// discards it; `apply_with_report` and `apply_strict` surface it.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConvertError {
    #[error("cannot parse {input:?} as {kind}: {reason}")]
    Parse {
        kind: &'static str,
        input: String,
        reason: String,
    },

    #[error("value {value} does not fit in {target}")]
    OutOfRange { value: String, target: &'static str },

    #[error("`{target}` cannot be assigned from a {kind:?} value")]
    Unsupported { target: &'static str, kind: Kind },

    #[error("expected a `{expected}` field, found `{actual}`")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("{0}")]
    Custom(String),
}

impl ConvertError {
    pub fn parse(kind: &'static str, input: &str, reason: impl ToString) -> Self {
        Self::Parse {
            kind,
            input: input.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn out_of_range(value: impl ToString, target: &'static str) -> Self {
        Self::OutOfRange {
            value: value.to_string(),
            target,
        }
    }

    pub fn unsupported<T: ?Sized>(kind: Kind) -> Self {
        Self::Unsupported {
            target: std::any::type_name::<T>(),
            kind,
        }
    }

    pub fn custom(msg: impl Into<String>) -> Self {
        Self::Custom(msg.into())
    }
}

/// Condition reported by the strict entry point and by option loading.
#[derive(Debug, thiserror::Error)]
pub enum FillError {
    #[error("{path}: no converter registered for `{type_name}`")]
    Unregistered {
        path: String,
        type_name: &'static str,
    },

    #[error("{path}: {source}")]
    Convert {
        path: String,
        #[source]
        source: ConvertError,
    },

    #[error("{path}: nested deeper than {max_depth} levels, not descended")]
    DepthExceeded { path: String, max_depth: usize },

    #[error("config error: {0}")]
    Config(String),
}

impl FillError {
    /// Prefix a configuration error with context. Other variants already
    /// carry a field path and are returned unchanged.
    pub fn with_context(self, ctx: impl std::fmt::Display) -> Self {
        match self {
            FillError::Config(msg) => FillError::Config(format!("{ctx}: {msg}")),
            other => other,
        }
    }
}
