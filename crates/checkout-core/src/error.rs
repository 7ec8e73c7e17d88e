//! Error Types

use thiserror::Error;

use crate::script::Phase;

/// Result type alias for widget rendering
pub type Result<T> = std::result::Result<T, WidgetError>;

/// Widget rendering errors
#[derive(Error, Debug)]
pub enum WidgetError {
    /// A card-data field carries an attribute that would submit raw card data
    #[error("Do not use '{attribute}' attribute for {field} input")]
    ForbiddenAttribute { field: String, attribute: String },

    /// Any other invalid widget configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// A script fragment references a DOM id no renderer registered
    #[error("Script in {phase} phase references DOM id '{id}' that was never rendered")]
    DanglingReference { id: String, phase: Phase },

    /// Two renderers put the same DOM id on one page
    #[error("DOM id '{id}' is rendered more than once on the page")]
    DuplicateId { id: String },

    /// A DOM-bound fragment was scheduled before the DOM exists
    #[error("Script bound to DOM id '{id}' cannot run in {phase} phase")]
    PhaseOrder { id: String, phase: Phase },
}

impl WidgetError {
    /// Whether the error comes from caller configuration rather than wiring
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            WidgetError::ForbiddenAttribute { .. } | WidgetError::Config(_) | WidgetError::DuplicateId { .. }
        )
    }

    /// Convert to a message safe to show on a page
    pub fn user_message(&self) -> &str {
        match self {
            WidgetError::ForbiddenAttribute { .. } => {
                "Card inputs must not carry a name attribute."
            }
            WidgetError::Config(_) => "Payment form configuration error.",
            WidgetError::DuplicateId { .. } => "Payment form renders the same element twice.",
            WidgetError::DanglingReference { .. } | WidgetError::PhaseOrder { .. } => {
                "Payment form scripts are misconfigured."
            }
        }
    }
}
