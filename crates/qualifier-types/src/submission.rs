//! Wire types for the final submission exchange.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Body of the submission request: a single-field JSON object.
///
/// The field name is part of the external contract and comes from
/// configuration (`finalQuery` by default).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionPayload {
    pub field: String,
    pub query: String,
}

impl SubmissionPayload {
    pub fn new(field: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            query: query.into(),
        }
    }
}

impl Serialize for SubmissionPayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.field, &self.query)?;
        map.end()
    }
}
