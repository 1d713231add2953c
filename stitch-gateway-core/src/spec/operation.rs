use crate::prelude::graphql::*;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;
use typed_builder::TypedBuilder;

/// The GraphQL operation kind.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OperationKind {
    Query,
    Mutation,
    Subscription,
}

impl Default for OperationKind {
    fn default() -> Self {
        OperationKind::Query
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            OperationKind::Query => write!(f, "query"),
            OperationKind::Mutation => write!(f, "mutation"),
            OperationKind::Subscription => write!(f, "subscription"),
        }
    }
}

/// A variable declared by an operation.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
#[builder(field_defaults(setter(into)))]
pub struct VariableDefinition {
    /// The variable name, without the leading `$`.
    pub name: String,

    /// The declared type, in GraphQL syntax (for example `ID!`).
    #[serde(rename = "type")]
    pub ty: String,
}

impl fmt::Display for VariableDefinition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "${}: {}", self.name, self.ty)
    }
}

/// A parsed and validated operation, as handed in by the parsing collaborator.
///
/// Top level selections are plain fields: fragment spreads at the root are
/// expanded by the parsing layer before stitching starts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
#[builder(field_defaults(setter(into)))]
pub struct Operation {
    /// The operation kind.
    #[serde(default)]
    #[builder(default)]
    pub kind: OperationKind,

    /// The optional operation name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub name: Option<String>,

    /// The variables declared by the operation.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[builder(default)]
    pub variable_definitions: Vec<VariableDefinition>,

    /// The top level fields.
    pub selection_set: Vec<Field>,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(name) = &self.name {
            write!(f, " {}", name)?;
        }
        if !self.variable_definitions.is_empty() {
            write!(f, "({})", self.variable_definitions.iter().join(", "))?;
        }
        write!(f, " {{ {} }}", self.selection_set.iter().join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operation_display() {
        let operation = Operation::builder()
            .kind(OperationKind::Query)
            .name(Some("TopProducts".to_string()))
            .variable_definitions(vec![VariableDefinition::builder()
                .name("first")
                .ty("Int")
                .build()])
            .selection_set(vec![Field::builder()
                .name("topProducts")
                .arguments(vec![Argument::new(
                    "first",
                    ArgumentValue::variable("first"),
                )])
                .selection_set(vec![Selection::Field(
                    Field::builder().name("name").build(),
                )])
                .build()])
            .build();
        assert_eq!(
            operation.to_string(),
            "query TopProducts($first: Int) { topProducts(first: $first) { name } }"
        );
    }

    #[test]
    fn anonymous_query_display() {
        let operation = Operation::builder()
            .selection_set(vec![Field::builder().name("me").build()])
            .build();
        assert_eq!(operation.to_string(), "query { me }");
    }
}
