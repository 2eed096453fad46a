use thiserror::Error;

pub type ProjResult<T> = Result<T, ProjError>;

#[derive(Debug, Error)]
pub enum ProjError {
    #[error("Label does not contain a [{group}] group")]
    MissingGroup { group: String },

    #[error("Missing required mapping keyword: {keyword}")]
    MissingKeyword { keyword: String },

    #[error("Invalid value for keyword [{keyword}]: {message}")]
    InvalidKeyword { keyword: String, message: String },

    #[error("Unsupported projection: {name}")]
    UnsupportedProjection { name: String },

    #[error("Invalid coordinate: {message}")]
    InvalidCoordinate { message: String },

    #[error("Unable to convert longitude. Domain [{domain}] is not 180 or 360")]
    InvalidDomain { domain: i32 },

    #[error("Invalid parameter: {message}")]
    InvalidParameter { message: String },

    #[error("Convergence failure: {message}")]
    ConvergenceFailure { message: String },

    #[error("Projection failed. Invalid label group [Mapping]: {source}")]
    InvalidMappingGroup {
        #[source]
        source: Box<ProjError>,
    },
}

impl ProjError {
    pub fn missing_group(group: impl Into<String>) -> Self {
        Self::MissingGroup {
            group: group.into(),
        }
    }

    pub fn missing_keyword(keyword: impl Into<String>) -> Self {
        Self::MissingKeyword {
            keyword: keyword.into(),
        }
    }

    pub fn invalid_keyword(keyword: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidKeyword {
            keyword: keyword.into(),
            message: message.into(),
        }
    }

    pub fn unsupported_projection(name: impl Into<String>) -> Self {
        Self::UnsupportedProjection { name: name.into() }
    }

    pub fn invalid_coordinate(message: impl Into<String>) -> Self {
        Self::InvalidCoordinate {
            message: message.into(),
        }
    }

    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            message: message.into(),
        }
    }

    pub fn convergence_failure(message: impl Into<String>) -> Self {
        Self::ConvergenceFailure {
            message: message.into(),
        }
    }

    /// Wraps a construction error in the mapping-group umbrella so callers
    /// see one "Projection failed" chain with the specific keyword diagnosis
    /// underneath. Already-wrapped errors pass through unchanged.
    pub fn into_mapping_failure(self) -> Self {
        match self {
            already @ Self::InvalidMappingGroup { .. } => already,
            other => Self::InvalidMappingGroup {
                source: Box::new(other),
            },
        }
    }
}
