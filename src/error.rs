//! Cross-component error classification.
//!
//! Every component keeps its own `thiserror` enum; each one maps its variants
//! onto [`ErrorClass`] so the session can decide between aborting the turn
//! and falling back.

use std::fmt;

/// Coarse category of a failure.
///
/// | Class         | Session behaviour                                      |
/// |---------------|--------------------------------------------------------|
/// | Input         | Turn ends, message shown inline                        |
/// | Service       | Fallback where one exists, otherwise turn ends         |
/// | Configuration | Reported once at start-up, permanently downgrades      |
/// | Data          | Turn ends, message shown inline                        |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    Input,
    Service,
    Configuration,
    Data,
}

impl ErrorClass {
    /// Whether the failure ends the current turn outright.
    pub fn ends_turn(self) -> bool {
        matches!(self, ErrorClass::Input | ErrorClass::Data)
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorClass::Input => "input",
            ErrorClass::Service => "service",
            ErrorClass::Configuration => "configuration",
            ErrorClass::Data => "data",
        };
        f.write_str(s)
    }
}
