use std::fmt::{Debug, Display};

/// Typed failures surfaced by texture resources.
///
/// These travel inside `anyhow::Error`; use `downcast_ref::<XrdsTextureError>()`
/// to tell them apart.
pub enum XrdsTextureError {
    /// The driver reported an error after an allocation sequence.
    ResourceCreation { message: String },
    InvalidOperation(String),
    InvalidArgument(String),
    UnsupportedFeature(String),
}

impl XrdsTextureError {
    pub fn resource_creation(message: impl Into<String>) -> Self {
        Self::ResourceCreation {
            message: message.into(),
        }
    }

    pub fn is_resource_creation(&self) -> bool {
        matches!(self, Self::ResourceCreation { .. })
    }

    pub fn is_invalid_operation(&self) -> bool {
        matches!(self, Self::InvalidOperation(_))
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    pub fn is_unsupported_feature(&self) -> bool {
        matches!(self, Self::UnsupportedFeature(_))
    }
}

impl Debug for XrdsTextureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            XrdsTextureError::ResourceCreation { message } => {
                write!(f, "ResourceCreation: {}", message)
            }
            XrdsTextureError::InvalidOperation(message) => {
                write!(f, "InvalidOperation: {}", message)
            }
            XrdsTextureError::InvalidArgument(message) => {
                write!(f, "InvalidArgument: {}", message)
            }
            XrdsTextureError::UnsupportedFeature(message) => {
                write!(f, "UnsupportedFeature: {}", message)
            }
        }
    }
}

impl Display for XrdsTextureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            XrdsTextureError::ResourceCreation { message } => write!(f, "{}", message),
            XrdsTextureError::InvalidOperation(message)
            | XrdsTextureError::InvalidArgument(message)
            | XrdsTextureError::UnsupportedFeature(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for XrdsTextureError {}

/// Returns the typed error carried by `err`, if any.
pub fn texture_error(err: &anyhow::Error) -> Option<&XrdsTextureError> {
    err.downcast_ref::<XrdsTextureError>()
}
