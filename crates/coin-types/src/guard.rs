//! Submission guard
//!
//! Checks a candidate record before it is written: required fields, photo
//! count, and the serialized size ceiling the document store enforces.

use serde::Serialize;

use crate::error::GuardError;
use crate::record::{CoinDocument, CoinDraft, MAX_PHOTOS};

/// Per-document size ceiling of the backing store, in bytes
pub const MAX_DOCUMENT_BYTES: usize = 1_048_576;

/// UTF-8 byte length of the compact JSON encoding of `doc`
pub fn document_size<T: Serialize>(doc: &T) -> Result<usize, GuardError> {
    Ok(serde_json::to_vec(doc)?.len())
}

/// Reject documents whose serialized size exceeds [`MAX_DOCUMENT_BYTES`].
///
/// Returns the measured size on success.
pub fn check_document_size(doc: &CoinDocument) -> Result<usize, GuardError> {
    let size = document_size(doc)?;
    if size > MAX_DOCUMENT_BYTES {
        return Err(GuardError::DocumentTooLarge { size });
    }
    Ok(size)
}

/// Validate the form fields of a draft
pub fn validate_draft(draft: &CoinDraft) -> Result<(), GuardError> {
    let missing: Vec<&str> = draft
        .required_fields()
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();

    if !missing.is_empty() {
        return Err(GuardError::MissingFields(missing.join(", ")));
    }

    if draft.photos.len() > MAX_PHOTOS {
        return Err(GuardError::TooManyPhotos(draft.photos.len()));
    }

    Ok(())
}
