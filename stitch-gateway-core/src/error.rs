use crate::prelude::graphql::*;
use displaydoc::Display;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error types for execution.
///
/// Note that these are not actually returned to the client, but are instead converted to JSON for
/// [`struct@Error`].
#[derive(Error, Display, Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
#[ignore_extra_doc_attributes]
pub enum FetchError {
    /// No service owns the top level field '{field}'.
    ValidationNoServiceForField {
        /// The field without an owning service.
        field: String,
    },

    /// Query references unknown service '{service}'.
    ValidationUnknownServiceError {
        /// The service that was unknown.
        service: String,
    },

    /// Service '{service}' response was malformed: {reason}
    SubrequestMalformedResponse {
        /// The service that responded with the malformed response.
        service: String,

        /// The reason the response is considered malformed.
        reason: String,
    },

    /// Fetch failed from '{service}': {reason}
    ///
    /// Note that this relates to a transport error and not a GraphQL error.
    SubrequestHttpError {
        /// The service that failed.
        service: String,

        /// The reason the fetch failed.
        reason: String,
    },

    /// Field '{field}' was not found in the overall schema.
    ExecutionFieldNotFound {
        /// The field that is not found.
        field: String,
    },

    /// Hydration of field '{field}' is unsupported: {reason}
    ExecutionUnsupportedHydrationArgument {
        /// The hydrated field.
        field: String,

        /// Why the argument cannot be bound.
        reason: String,
    },

    /// No transformation recorded for field '{field}'.
    ///
    /// The query transform and result rewrite stages guarantee a 1:1
    /// correspondence between placeholder nodes and transformation records,
    /// so hitting this is an internal consistency error.
    ExecutionMissingTransformation {
        /// The field whose record is missing.
        field: String,
    },

    /// Invalid content: {reason}
    ExecutionInvalidContent { reason: String },
}

impl FetchError {
    /// Convert the fetch error to a GraphQL error.
    pub fn to_graphql_error(&self, path: Option<Path>) -> Error {
        Error {
            message: self.to_string(),
            locations: Default::default(),
            path,
            extensions: serde_json_bytes::to_value(self)
                .ok()
                .and_then(|v| v.as_object().cloned())
                .unwrap_or_default(),
        }
    }
}

/// Any error.
#[derive(Error, Clone, Debug, Eq, PartialEq, Serialize, Deserialize, Default)]
#[error("{message}")]
#[serde(rename_all = "camelCase")]
pub struct Error {
    /// The error message.
    pub message: String,

    /// The locations of the error from the originating request.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<Location>,

    /// The path of the error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Path>,

    /// The optional graphql extensions.
    #[serde(default, skip_serializing_if = "Object::is_empty")]
    pub extensions: Object,
}

/// A location in the request that triggered a graphql error.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// The line number.
    pub line: i32,

    /// The column number.
    pub column: i32,
}
