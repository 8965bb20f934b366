use thiserror::Error;

#[derive(Error, Debug)]
pub enum MoonError {
    #[error("texture catalog is not valid JSON: {0}")]
    CatalogParse(#[from] serde_json::Error),

    #[error("texture catalog contains no entries")]
    EmptyCatalog,

    #[error("unrecognized date '{0}' (expected RFC 3339, 'YYYY-MM-DD HH:MM[:SS]' or 'YYYY-MM-DD')")]
    InvalidDate(String),

    #[error("{name} = {value} is outside [{min}, {max}]")]
    CoordinateOutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("latitude and longitude must be given together")]
    IncompleteLocation,
}

pub type Result<T> = std::result::Result<T, MoonError>;
