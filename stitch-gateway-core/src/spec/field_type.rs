use serde::{Deserialize, Serialize};
use std::fmt;

/// The declared type of a field in the overall schema.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum FieldType {
    /// A non null type: `T!`
    NonNull(Box<FieldType>),

    /// A list type: `[T]`
    List(Box<FieldType>),

    /// A named type: `T`
    Named(String),
}

impl FieldType {
    pub fn named(name: impl Into<String>) -> FieldType {
        FieldType::Named(name.into())
    }

    pub fn list(inner: FieldType) -> FieldType {
        FieldType::List(Box::new(inner))
    }

    pub fn non_null(inner: FieldType) -> FieldType {
        FieldType::NonNull(Box::new(inner))
    }

    /// The name of the type once all list and non null wrappers are removed.
    pub fn inner_type_name(&self) -> &str {
        match self {
            FieldType::NonNull(inner) | FieldType::List(inner) => inner.inner_type_name(),
            FieldType::Named(name) => name.as_str(),
        }
    }

    pub fn is_list(&self) -> bool {
        match self {
            FieldType::NonNull(inner) => inner.is_list(),
            FieldType::List(_) => true,
            FieldType::Named(_) => false,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FieldType::NonNull(inner) => write!(f, "{}!", inner),
            FieldType::List(inner) => write!(f, "[{}]", inner),
            FieldType::Named(name) => write!(f, "{}", name),
        }
    }
}
