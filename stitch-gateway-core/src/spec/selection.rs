use crate::prelude::graphql::*;
use crate::transform::TransformId;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;
use typed_builder::TypedBuilder;

/// A selection inside a field's selection set.
///
/// These are handed in by the parsing collaborator, already validated against
/// the overall schema.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", tag = "kind")]
pub enum Selection {
    /// A field selection.
    Field(Field),

    /// An inline fragment selection.
    InlineFragment(InlineFragment),

    /// A named fragment spread.
    FragmentSpread(FragmentSpread),
}

/// A requested field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
#[builder(field_defaults(setter(into)))]
pub struct Field {
    /// An optional alias for the field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub alias: Option<String>,

    /// The name of the field.
    pub name: String,

    /// The arguments of the field.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[builder(default)]
    pub arguments: Vec<Argument>,

    /// The selections for the field.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[builder(default)]
    pub selection_set: Vec<Selection>,

    // Stable identity linking a rewritten field to its transformation
    // record. Set by the query transformer, never by callers.
    #[serde(skip)]
    #[builder(default, setter(skip))]
    pub(crate) transform_id: Option<TransformId>,

    // Declared overall type, resolved by the query transformer.
    #[serde(skip)]
    #[builder(default, setter(skip))]
    pub(crate) field_type: Option<FieldType>,
}

impl Field {
    /// The key under which this field appears in a response.
    pub fn response_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(self.name.as_str())
    }
}

/// An inline fragment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineFragment {
    /// The optional fragment type condition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_condition: Option<String>,

    /// The selections of the fragment.
    pub selection_set: Vec<Selection>,
}

/// A named fragment spread.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FragmentSpread {
    /// The name of the spread fragment.
    pub name: String,
}

/// An argument of a [`Field`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Argument {
    /// The argument name.
    pub name: String,

    /// The argument value.
    pub value: ArgumentValue,
}

impl Argument {
    pub fn new(name: impl Into<String>, value: ArgumentValue) -> Argument {
        Argument {
            name: name.into(),
            value,
        }
    }
}

/// The value bound to an [`Argument`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", tag = "kind")]
pub enum ArgumentValue {
    /// A reference to an operation variable: `$name`
    Variable {
        /// The variable name, without the leading `$`.
        name: String,
    },

    /// An inline literal value.
    Literal {
        /// The literal, as JSON.
        value: Value,
    },
}

impl ArgumentValue {
    pub fn variable(name: impl Into<String>) -> ArgumentValue {
        ArgumentValue::Variable { name: name.into() }
    }

    pub fn literal(value: impl Into<Value>) -> ArgumentValue {
        ArgumentValue::Literal {
            value: value.into(),
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Selection::Field(field) => write!(f, "{}", field),
            Selection::InlineFragment(fragment) => write!(f, "{}", fragment),
            Selection::FragmentSpread(spread) => write!(f, "...{}", spread.name),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(alias) = &self.alias {
            write!(f, "{}: ", alias)?;
        }
        write!(f, "{}", self.name)?;
        if !self.arguments.is_empty() {
            write!(f, "({})", self.arguments.iter().join(", "))?;
        }
        if !self.selection_set.is_empty() {
            write!(f, " {{ {} }}", self.selection_set.iter().join(" "))?;
        }
        Ok(())
    }
}

impl fmt::Display for InlineFragment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.type_condition {
            Some(condition) => write!(f, "... on {}", condition)?,
            None => write!(f, "...")?,
        }
        write!(f, " {{ {} }}", self.selection_set.iter().join(" "))
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.value)
    }
}

impl fmt::Display for ArgumentValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ArgumentValue::Variable { name } => write!(f, "${}", name),
            ArgumentValue::Literal { value } => write_graphql_value(f, value),
        }
    }
}

// GraphQL literals differ from JSON only in that object keys are bare.
fn write_graphql_value(f: &mut fmt::Formatter, value: &Value) -> fmt::Result {
    match value {
        Value::Null => write!(f, "null"),
        Value::Bool(b) => write!(f, "{}", b),
        Value::Number(n) => write!(f, "{}", n),
        Value::String(s) => write!(
            f,
            "{}",
            serde_json::to_string(s.as_str())
                .expect("a string always serializes to JSON; qed")
        ),
        Value::Array(values) => {
            write!(f, "[")?;
            for (i, value) in values.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write_graphql_value(f, value)?;
            }
            write!(f, "]")
        }
        Value::Object(object) => {
            write!(f, "{{")?;
            for (i, (key, value)) in object.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}: ", key.as_str())?;
                write_graphql_value(f, value)?;
            }
            write!(f, "}}")
        }
    }
}
