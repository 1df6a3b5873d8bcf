//! Error types for browser setup
//!
//! The simulation itself cannot fail; these cover the DOM lookups done once
//! at startup.

use thiserror::Error;

/// Failure while wiring the field to the page
#[derive(Error, Debug)]
pub enum SetupError {
    #[error("No global window")]
    NoWindow,

    #[error("No document on window")]
    NoDocument,

    #[error("Canvas element #{0} not found")]
    CanvasNotFound(String),

    #[error("Element #{0} is not a canvas")]
    NotACanvas(String),

    #[error("2D canvas context unavailable")]
    NoContext,

    #[error("Could not create sprite image: {0}")]
    Image(String),

    #[error("Failed to register {0} listener")]
    Listener(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_element() {
        let err = SetupError::CanvasNotFound("waffleCanvas".into());
        assert_eq!(err.to_string(), "Canvas element #waffleCanvas not found");

        let err = SetupError::Listener("resize");
        assert_eq!(err.to_string(), "Failed to register resize listener");
    }
}
