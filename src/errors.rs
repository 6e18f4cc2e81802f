use std::error::Error;
use std::fmt::{Display, Formatter};

/// A sensor configuration value which would make the projection pipeline divide by zero, index
/// outside of the palette, or step through an angular range forever.
#[derive(Debug, Clone, PartialEq)]
pub enum InvalidConfig {
    NonPositive { field: &'static str, value: f64 },
    Negative { field: &'static str, value: f64 },
    NotFinite { field: &'static str },
    NoGradientSteps,
}

impl Display for InvalidConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidConfig::NonPositive { field, value } => {
                write!(f, "{} must be greater than zero, got {}", field, value)
            }
            InvalidConfig::Negative { field, value } => {
                write!(f, "{} must not be negative, got {}", field, value)
            }
            InvalidConfig::NotFinite { field } => write!(f, "{} must be a finite number", field),
            InvalidConfig::NoGradientSteps => write!(f, "gradient_steps must be at least 1"),
        }
    }
}

impl Error for InvalidConfig {}
