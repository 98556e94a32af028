//! Domain error model.

use thiserror::Error;

/// Result type used across the engine's domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Deterministic business failures only. Nothing here is retried
/// automatically; the caller decides whether to resubmit after fixing
/// its input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input, empty draft).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A requested entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// A line quantity below zero was requested.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// The requested offer is not among the article's offers.
    #[error("offer {offer} not found on article {article}")]
    OfferNotFound { article: String, offer: String },

    /// An order status change not present in the transition table.
    ///
    /// Never coerced to the nearest valid state; the order is left
    /// untouched and the caller sees the failure.
    #[error("illegal order status transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    /// An article has no supplier offers to order from.
    ///
    /// Diagnostic during planning (the article is skipped, planning
    /// continues); a hard failure only when a caller tries to build a
    /// line for such an article anyway.
    #[error("article {article} has no supplier configured")]
    NoSupplierConfigured { article: String },

    /// A conflicting state change (duplicate id, stale snapshot).
    #[error("conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn offer_not_found(article: impl ToString, offer: impl ToString) -> Self {
        Self::OfferNotFound {
            article: article.to_string(),
            offer: offer.to_string(),
        }
    }

    pub fn invalid_transition(from: impl ToString, to: impl ToString) -> Self {
        Self::InvalidTransition {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    pub fn no_supplier(article: impl ToString) -> Self {
        Self::NoSupplierConfigured {
            article: article.to_string(),
        }
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages_carry_context() {
        let err = DomainError::not_found("article", "abc");
        assert_eq!(err.to_string(), "article not found: abc");

        let err = DomainError::invalid_transition("entregado", "anulado");
        assert_eq!(
            err.to_string(),
            "illegal order status transition: entregado -> anulado"
        );
    }

    #[test]
    fn invalid_quantity_keeps_the_offending_value() {
        let err = DomainError::InvalidQuantity(-3);
        assert_eq!(err.to_string(), "invalid quantity: -3");
    }
}
