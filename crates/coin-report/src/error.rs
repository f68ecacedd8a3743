use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Invalid photo payload: {0}")]
    Photo(#[from] coin_intake::IntakeError),

    #[error("Failed to decode photo: {0}")]
    PhotoDecode(#[from] image::ImageError),

    #[error("Failed to compress photo stream: {0}")]
    Compression(#[from] std::io::Error),

    #[error("PDF operation failed: {0}")]
    OperationError(String),
}
