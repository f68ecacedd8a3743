use thiserror::Error;

#[derive(Error, Debug)]
pub enum GuardError {
    #[error(
        "Document size ({:.2} KB) exceeds the document store limit of 1 MB. Please use smaller images.",
        kilobytes(.size)
    )]
    DocumentTooLarge { size: usize },

    #[error("Missing required fields: {0}")]
    MissingFields(String),

    #[error("At most 2 photos are allowed, got {0}")]
    TooManyPhotos(usize),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn kilobytes(size: &usize) -> f64 {
    *size as f64 / 1024.0
}
