use super::staging::PROCESSED_PREFIX;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::ValidationError;

/// Longest key whose processed file name still fits a 255-byte file name.
pub const MAX_OBJECT_KEY_LEN: usize = 255 - PROCESSED_PREFIX.len();

/// Identifies the raw object a single pipeline run processes.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct JobDescriptor {
    pub object_key: String,
}

impl JobDescriptor {
    pub fn new(object_key: impl Into<String>) -> Self {
        Self {
            object_key: object_key.into(),
        }
    }
}

/// Object keys double as staging file names, so they must be a single,
/// non-empty path component short enough to carry the processed prefix.
pub fn validate_object_key(key: &str) -> Result<(), ValidationError> {
    let reason = if key.is_empty() {
        "Object name must not be empty"
    } else if key.len() > MAX_OBJECT_KEY_LEN {
        "Object name is too long"
    } else if key == "." || key == ".." {
        "Object name must not be a relative directory reference"
    } else if key.contains(['/', '\\', '\0']) {
        "Object name must not contain path separators"
    } else {
        return Ok(());
    };

    Err(ValidationError::new("object_key").with_message(Cow::Borrowed(reason)))
}
