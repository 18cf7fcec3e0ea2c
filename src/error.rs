//! Error taxonomy for generation and rendering
//!
//! Every input in this system is a fixed constant, so there is no
//! user-facing validation surface. Failures fall into three kinds:
//! - `InvariantViolation`: computed arrays disagree with the date sequence
//!   (a programming defect, never recovered from)
//! - `InvalidInput`: a guard for data tables that are expected to be
//!   non-empty constants
//! - `Render`: the plotting backend or image encoder failed

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    /// Computed array lengths disagree with the expected sequence length.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// A constant data table failed a basic sanity check.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The rendering sink could not produce an image.
    #[error("render failure: {0}")]
    Render(String),
}

impl DashboardError {
    pub fn invariant(detail: impl Into<String>) -> Self {
        Self::InvariantViolation(detail.into())
    }

    pub fn invalid_input(detail: impl Into<String>) -> Self {
        Self::InvalidInput(detail.into())
    }

    pub fn render(detail: impl Into<String>) -> Self {
        Self::Render(detail.into())
    }
}
