mod transformation;

pub use transformation::*;

use crate::prelude::graphql::*;
use indexmap::IndexMap;
use std::collections::HashSet;

/// Output of transforming one batch of fields for one service call.
#[derive(Debug, Default)]
pub(crate) struct QueryTransformationResult {
    /// The fields as they will be sent to the service.
    pub(crate) transformed_fields: Vec<Field>,

    /// Maps each rewritten field back to the client's request.
    pub(crate) transformations: IndexMap<TransformId, FieldTransformation>,

    /// The variable names actually referenced by the transformed query.
    pub(crate) referenced_variables: HashSet<String>,

    /// The fragment definitions actually used, already transformed.
    pub(crate) transformed_fragments: Fragments,
}

/// Rewrites fields requested against the overall schema into the shape one
/// service expects, recording how to map the results back.
///
/// Identical input fields and schema state always produce an identical
/// transformed query and mapping, transform ids included.
pub(crate) struct QueryTransformer<'a> {
    schema: &'a Schema,
    fragments: &'a Fragments,
    next_id: u64,
}

#[derive(Debug, Default)]
struct TransformAccumulator {
    transformations: IndexMap<TransformId, FieldTransformation>,
    variables: HashSet<String>,
    fragments: Fragments,
}

impl<'a> QueryTransformer<'a> {
    pub(crate) fn new(schema: &'a Schema, fragments: &'a Fragments) -> Self {
        QueryTransformer {
            schema,
            fragments,
            next_id: 0,
        }
    }

    /// Transform a batch of top level fields for the service that owns them.
    #[tracing::instrument(skip_all, level = "debug", name = "transform_query")]
    pub(crate) fn transform_top_level_fields(
        &mut self,
        fields: &[Field],
        parent_type: &str,
    ) -> Result<QueryTransformationResult, FetchError> {
        let mut acc = TransformAccumulator::default();
        let transformed_fields = fields
            .iter()
            .map(|field| self.transform_field(field, parent_type, &mut acc))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(QueryTransformationResult {
            transformed_fields,
            transformations: acc.transformations,
            referenced_variables: acc.variables,
            transformed_fragments: acc.fragments,
        })
    }

    /// Transform the selection set of a synthetic hydration field.
    ///
    /// The field itself already names the target service's top level field
    /// and carries a literal argument, so only its children are resolved
    /// against the overall schema.
    #[tracing::instrument(skip_all, level = "debug", name = "transform_hydration_query")]
    pub(crate) fn transform_selection_set_in_field(
        &mut self,
        mut field: Field,
        type_name: &str,
    ) -> Result<QueryTransformationResult, FetchError> {
        let mut acc = TransformAccumulator::default();
        self.collect_argument_variables(&field.arguments, &mut acc);
        field.selection_set =
            self.transform_selection_set(&field.selection_set, type_name, &mut acc)?;
        Ok(QueryTransformationResult {
            transformed_fields: vec![field],
            transformations: acc.transformations,
            referenced_variables: acc.variables,
            transformed_fragments: acc.fragments,
        })
    }

    fn next_transform_id(&mut self) -> TransformId {
        let id = TransformId(self.next_id);
        self.next_id += 1;
        id
    }

    fn transform_field(
        &mut self,
        field: &Field,
        parent_type: &str,
        acc: &mut TransformAccumulator,
    ) -> Result<Field, FetchError> {
        let definition = self
            .schema
            .field_definition(parent_type, &field.name)
            .ok_or_else(|| FetchError::ExecutionFieldNotFound {
                field: format!("{}.{}", parent_type, field.name),
            })?;

        self.collect_argument_variables(&field.arguments, acc);

        if let Some(hydration) = &definition.hydration {
            // The field is replaced by a leaf query for the value feeding the
            // dependent call; the alias keeps sibling placeholders distinct.
            let id = self.next_transform_id();
            acc.transformations.insert(
                id,
                FieldTransformation::Hydration(HydrationTransformation {
                    original_field: field.clone(),
                    hydration: hydration.clone(),
                    field_type: definition.field_type.clone(),
                }),
            );
            let mut placeholder = Field::builder()
                .alias(Some(format!("hydration__{}__{}", field.response_key(), id)))
                .name(hydration.argument.source_field.clone())
                .build();
            placeholder.transform_id = Some(id);
            return Ok(placeholder);
        }

        let mut transformed = field.clone();
        transformed.field_type = Some(definition.field_type.clone());
        if let Some(underlying_name) = &definition.underlying_name {
            if *underlying_name != field.name {
                let id = self.next_transform_id();
                acc.transformations.insert(
                    id,
                    FieldTransformation::Rename(RenameTransformation {
                        original_field: field.clone(),
                    }),
                );
                transformed.name = underlying_name.clone();
                transformed.transform_id = Some(id);
            }
        }
        transformed.selection_set = self.transform_selection_set(
            &field.selection_set,
            definition.field_type.inner_type_name(),
            acc,
        )?;
        Ok(transformed)
    }

    fn transform_selection_set(
        &mut self,
        selections: &[Selection],
        parent_type: &str,
        acc: &mut TransformAccumulator,
    ) -> Result<Vec<Selection>, FetchError> {
        selections
            .iter()
            .map(|selection| match selection {
                Selection::Field(field) => Ok(Selection::Field(self.transform_field(
                    field,
                    parent_type,
                    acc,
                )?)),
                Selection::InlineFragment(fragment) => {
                    let inner_parent = fragment.type_condition.as_deref().unwrap_or(parent_type);
                    Ok(Selection::InlineFragment(InlineFragment {
                        type_condition: fragment.type_condition.clone(),
                        selection_set: self.transform_selection_set(
                            &fragment.selection_set,
                            inner_parent,
                            acc,
                        )?,
                    }))
                }
                Selection::FragmentSpread(spread) => {
                    self.transform_fragment(&spread.name, acc)?;
                    Ok(Selection::FragmentSpread(spread.clone()))
                }
            })
            .collect()
    }

    fn transform_fragment(
        &mut self,
        name: &str,
        acc: &mut TransformAccumulator,
    ) -> Result<(), FetchError> {
        if acc.fragments.contains(name) {
            return Ok(());
        }
        let definition =
            self.fragments
                .get(name)
                .ok_or_else(|| FetchError::ExecutionInvalidContent {
                    reason: format!("query spreads unknown fragment '{}'", name),
                })?;
        let selection_set = self.transform_selection_set(
            &definition.selection_set,
            &definition.type_condition,
            acc,
        )?;
        acc.fragments.insert(FragmentDefinition {
            name: definition.name.clone(),
            type_condition: definition.type_condition.clone(),
            selection_set,
        });
        Ok(())
    }

    fn collect_argument_variables(&self, arguments: &[Argument], acc: &mut TransformAccumulator) {
        for argument in arguments {
            if let ArgumentValue::Variable { name } = &argument.value {
                acc.variables.insert(name.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_schema() -> Schema {
        Schema::new("Query")
            .with_type(
                ObjectType::new("Query")
                    .with_field(
                        FieldDefinition::new("issue", FieldType::named("Issue"))
                            .with_underlying_name("issueById"),
                    )
                    .with_field(FieldDefinition::new(
                        "issues",
                        FieldType::list(FieldType::named("Issue")),
                    )),
            )
            .with_type(
                ObjectType::new("Issue")
                    .with_field(FieldDefinition::new("id", FieldType::named("ID")))
                    .with_field(
                        FieldDefinition::new("title", FieldType::named("String"))
                            .with_underlying_name("summary"),
                    )
                    .with_field(
                        FieldDefinition::new("author", FieldType::named("User")).with_hydration(
                            HydrationDefinition::builder()
                                .service_name("users")
                                .top_level_field("userById")
                                .argument(
                                    RemoteArgument::builder()
                                        .name("id")
                                        .source_field("authorId")
                                        .build(),
                                )
                                .build(),
                        ),
                    ),
            )
            .with_type(
                ObjectType::new("User")
                    .with_field(FieldDefinition::new("name", FieldType::named("String"))),
            )
    }

    fn field(json: serde_json::Value) -> Field {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn rename_keeps_client_alias_and_records_original() {
        let schema = test_schema();
        let fragments = Fragments::new();
        let mut transformer = QueryTransformer::new(&schema, &fragments);
        let requested = field(serde_json::json!({
            "alias": "myIssue",
            "name": "issue",
            "selectionSet": [
                { "kind": "Field", "name": "id" },
                { "kind": "Field", "name": "title" },
            ],
        }));

        let result = transformer
            .transform_top_level_fields(&[requested], "Query")
            .unwrap();

        let top = &result.transformed_fields[0];
        assert_eq!(top.name, "issueById");
        assert_eq!(top.alias.as_deref(), Some("myIssue"));
        assert_eq!(
            top.to_string(),
            "myIssue: issueById { id summary }"
        );
        // two renames recorded: the top level field and the title field
        assert_eq!(result.transformations.len(), 2);
        let originals: Vec<&str> = result
            .transformations
            .values()
            .map(|t| t.original_field().name.as_str())
            .collect();
        assert_eq!(originals, vec!["issue", "title"]);
    }

    #[test]
    fn hydration_replaces_field_with_source_leaf() {
        let schema = test_schema();
        let fragments = Fragments::new();
        let mut transformer = QueryTransformer::new(&schema, &fragments);
        let requested = field(serde_json::json!({
            "name": "issues",
            "selectionSet": [
                { "kind": "Field", "name": "author", "selectionSet": [
                    { "kind": "Field", "name": "name" },
                ]},
            ],
        }));

        let result = transformer
            .transform_top_level_fields(&[requested], "Query")
            .unwrap();

        assert_eq!(
            result.transformed_fields[0].to_string(),
            "issues { hydration__author__0: authorId }"
        );
        let transformation = result.transformations.values().next().unwrap();
        match transformation {
            FieldTransformation::Hydration(hydration) => {
                assert_eq!(hydration.hydration.service_name, "users");
                assert_eq!(hydration.hydration.top_level_field, "userById");
                assert_eq!(hydration.original_field.name, "author");
            }
            _ => panic!("expected a hydration transformation"),
        }
    }

    #[test]
    fn variables_and_fragments_are_filtered_to_what_is_reached() {
        let schema = test_schema();
        let fragments = Fragments::from(vec![
            FragmentDefinition {
                name: "issueFields".to_string(),
                type_condition: "Issue".to_string(),
                selection_set: vec![Selection::Field(Field::builder().name("title").build())],
            },
            FragmentDefinition {
                name: "unusedFields".to_string(),
                type_condition: "Issue".to_string(),
                selection_set: vec![Selection::Field(Field::builder().name("id").build())],
            },
        ]);
        let mut transformer = QueryTransformer::new(&schema, &fragments);
        let requested = field(serde_json::json!({
            "name": "issue",
            "arguments": [
                { "name": "id", "value": { "kind": "Variable", "name": "issueId" } },
            ],
            "selectionSet": [
                { "kind": "FragmentSpread", "name": "issueFields" },
            ],
        }));

        let result = transformer
            .transform_top_level_fields(&[requested], "Query")
            .unwrap();

        assert_eq!(
            result.referenced_variables,
            std::iter::once("issueId".to_string()).collect()
        );
        assert!(result.transformed_fragments.contains("issueFields"));
        assert!(!result.transformed_fragments.contains("unusedFields"));
        // the fragment's own selections are transformed for the service
        let fragment = result.transformed_fragments.get("issueFields").unwrap();
        assert_eq!(
            fragment.to_string(),
            "fragment issueFields on Issue { summary }"
        );
    }

    #[test]
    fn transformation_is_deterministic() {
        let schema = test_schema();
        let fragments = Fragments::new();
        let requested = vec![field(serde_json::json!({
            "name": "issues",
            "selectionSet": [
                { "kind": "Field", "name": "title" },
                { "kind": "Field", "name": "author" },
            ],
        }))];

        let first = QueryTransformer::new(&schema, &fragments)
            .transform_top_level_fields(&requested, "Query")
            .unwrap();
        let second = QueryTransformer::new(&schema, &fragments)
            .transform_top_level_fields(&requested, "Query")
            .unwrap();

        assert_eq!(first.transformed_fields, second.transformed_fields);
        assert_eq!(
            first.transformations.keys().collect::<Vec<_>>(),
            second.transformations.keys().collect::<Vec<_>>()
        );
    }

    #[test]
    fn unknown_field_is_rejected() {
        let schema = test_schema();
        let fragments = Fragments::new();
        let mut transformer = QueryTransformer::new(&schema, &fragments);
        let requested = field(serde_json::json!({ "name": "nope" }));
        let err = transformer
            .transform_top_level_fields(&[requested], "Query")
            .unwrap_err();
        assert!(matches!(
            err,
            FetchError::ExecutionFieldNotFound { field } if field == "Query.nope"
        ));
    }
}
