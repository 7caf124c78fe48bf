//! Error taxonomy and the soft-error policy.
//!
//! Tree-invariant violations and failed lookups are "soft": a host can opt into
//! having them silently ignored through [`ErrorPolicy`]. Geometry and value
//! errors always surface.

use crate::style::parser::ParseError;

/// Errors raised by the UI core.
#[derive(Debug, thiserror::Error)]
pub enum UiError {
    // ── Invalid state ────────────────────────────────────────────────
    #[error("entity already has a parent")]
    AlreadyParented,
    #[error("entity is not a child of the given parent")]
    NotAChild,
    #[error("background entity must not have a parent")]
    BackgroundHasParent,
    #[error("entity does not exist in this tree")]
    UnknownEntity,
    #[error("the root entity cannot be detached or destroyed")]
    CannotRemoveRoot,
    #[error("attaching would make an entity its own ancestor")]
    WouldCreateCycle,

    // ── Not found ────────────────────────────────────────────────────
    #[error("{what} not found: {key}")]
    NotFound { what: &'static str, key: String },

    // ── Invalid value ────────────────────────────────────────────────
    #[error("invalid value: {0}")]
    InvalidValue(String),
    #[error("point ({x}, {y}) is outside the entity")]
    PointOutsideEntity { x: f32, y: f32 },

    // ── Infrastructure ───────────────────────────────────────────────
    #[error("style table parse error: {0}")]
    StyleParse(#[from] ParseError),
    #[error("layout document error: {0}")]
    Document(String),
}

impl UiError {
    /// Build a not-found error.
    pub fn not_found(what: &'static str, key: impl Into<String>) -> Self {
        UiError::NotFound { what, key: key.into() }
    }

    /// Whether this error may be silenced by a lenient [`ErrorPolicy`].
    ///
    /// Invalid-state and not-found errors are soft; invalid values and
    /// infrastructure failures are not.
    pub fn is_soft(&self) -> bool {
        matches!(
            self,
            UiError::AlreadyParented
                | UiError::NotAChild
                | UiError::BackgroundHasParent
                | UiError::UnknownEntity
                | UiError::CannotRemoveRoot
                | UiError::WouldCreateCycle
                | UiError::NotFound { .. }
        )
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, UiError>;

// ---------------------------------------------------------------------------
// ErrorPolicy
// ---------------------------------------------------------------------------

/// How soft errors are reported to the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ErrorPolicy {
    /// When `true`, soft errors become no-op `Ok` returns.
    pub silent_soft_errors: bool,
}

impl ErrorPolicy {
    /// Raise every error.
    pub const STRICT: ErrorPolicy = ErrorPolicy { silent_soft_errors: false };

    /// Swallow soft errors.
    pub const LENIENT: ErrorPolicy = ErrorPolicy { silent_soft_errors: true };

    /// Pass `result` through, converting a soft error into `Ok(())` when lenient.
    pub fn check(self, result: Result<()>) -> Result<()> {
        match result {
            Err(err) if self.silent_soft_errors && err.is_soft() => {
                log::warn!("ignoring soft error: {err}");
                Ok(())
            }
            other => other,
        }
    }

    /// Like [`check`](Self::check) for value-returning lookups: a silenced soft
    /// error yields `Ok(None)`.
    pub fn check_opt<T>(self, result: Result<T>) -> Result<Option<T>> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(err) if self.silent_soft_errors && err.is_soft() => {
                log::warn!("ignoring soft error: {err}");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }
}
