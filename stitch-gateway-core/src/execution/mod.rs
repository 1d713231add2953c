mod fetch;
mod hydration;
mod overall_result;
mod patch;
mod result_builder;
mod result_node;

pub use result_node::*;

use crate::prelude::graphql::*;
use futures::future;
use indexmap::IndexMap;
use std::sync::Arc;
use tracing::Instrument;
use typed_builder::TypedBuilder;

/// One parsed and validated client request, ready to stitch.
#[derive(Clone, Debug, TypedBuilder)]
#[builder(field_defaults(setter(into)))]
pub struct StitchingRequest {
    /// The client operation, written against the overall schema.
    pub operation: Operation,

    /// The client variables.
    #[builder(default)]
    pub variables: Arc<Object>,

    /// The fragment definitions of the client document.
    #[builder(default)]
    pub fragments: Fragments,

    /// The caller context, forwarded to every service execution.
    #[builder(default)]
    pub context: Context,
}

// Everything one request's pipeline stages need to reach: the overall
// schema, the registry, and the client supplied variables and fragments.
pub(crate) struct ExecutionContext<'a> {
    pub(crate) schema: &'a Schema,
    pub(crate) registry: &'a ServiceRegistry,
    pub(crate) variables: &'a Object,
    pub(crate) variable_definitions: &'a [VariableDefinition],
    pub(crate) fragments: &'a Fragments,
    pub(crate) operation_kind: OperationKind,
    pub(crate) operation_name: Option<String>,
    pub(crate) context: &'a Context,
}

/// The execution core of the gateway: fans a client operation out across the
/// services that own its fields and reassembles their partial results into
/// one tree shaped like the overall schema.
#[derive(Debug)]
pub struct Stitcher {
    schema: Schema,
    field_owners: FieldOwners,
    registry: ServiceRegistry,
}

impl Stitcher {
    pub fn new(schema: Schema, field_owners: FieldOwners, registry: ServiceRegistry) -> Stitcher {
        Stitcher {
            schema,
            field_owners,
            registry,
        }
    }

    /// Execute one stitched request and return the final result tree.
    ///
    /// Recoverable field errors travel inside the tree as error markers;
    /// configuration errors and whole service failures fail the returned
    /// future instead.
    pub async fn execute(
        &self,
        request: StitchingRequest,
    ) -> Result<Arc<ResultNode>, FetchError> {
        let result = self.execute_inner(&request).await;
        if let Err(err) = &result {
            // observe-and-forward: report to the sink, propagate unchanged
            tracing::error!(%err, "stitched execution failed");
        }
        result
    }

    async fn execute_inner(
        &self,
        request: &StitchingRequest,
    ) -> Result<Arc<ResultNode>, FetchError> {
        let groups = self.route_top_level_fields(&request.operation)?;
        let parent_type = self
            .schema
            .root_type(request.operation.kind)
            .ok_or_else(|| FetchError::ExecutionInvalidContent {
                reason: format!(
                    "the schema does not define a root type for {} operations",
                    request.operation.kind
                ),
            })?
            .to_string();

        let ctx = ExecutionContext {
            schema: &self.schema,
            registry: &self.registry,
            variables: &request.variables,
            variable_definitions: &request.operation.variable_definitions,
            fragments: &request.fragments,
            operation_kind: request.operation.kind,
            operation_name: request.operation.name.clone(),
            context: &request.context,
        };

        // one transformer for the whole batch keeps transform ids unique
        // across service groups
        let mut transformer = QueryTransformer::new(&self.schema, &request.fragments);
        let mut transformations: IndexMap<TransformId, FieldTransformation> = IndexMap::new();
        let mut calls = Vec::new();
        for (service_name, fields) in &groups {
            let service = self.registry.get(service_name).ok_or_else(|| {
                FetchError::ValidationUnknownServiceError {
                    service: service_name.clone(),
                }
            })?;
            let transform_result = transformer.transform_top_level_fields(fields, &parent_type)?;
            for (id, transformation) in &transform_result.transformations {
                transformations.insert(*id, transformation.clone());
            }
            calls.push((service, transform_result));
        }

        let trees = future::try_join_all(
            calls
                .iter()
                .map(|(service, transform_result)| {
                    fetch::call_service(&ctx, service, transform_result)
                }),
        )
        .instrument(tracing::info_span!("fetch_all", services = calls.len()))
        .await?;

        let root = merge_trees(trees);
        hydration::resolve_all_hydration_inputs(&ctx, root, &transformations).await
    }

    /// Assign every top level field to the service that owns it, grouped in
    /// service discovery order.
    pub(crate) fn route_top_level_fields(
        &self,
        operation: &Operation,
    ) -> Result<IndexMap<String, Vec<Field>>, FetchError> {
        let mut groups: IndexMap<String, Vec<Field>> = IndexMap::new();
        for field in &operation.selection_set {
            let service = self.field_owners.owner_of(&field.name).ok_or_else(|| {
                FetchError::ValidationNoServiceForField {
                    field: field.name.clone(),
                }
            })?;
            groups
                .entry(service.to_string())
                .or_insert_with(Vec::new)
                .push(field.clone());
        }
        Ok(groups)
    }
}

/// Combine the per service trees into one root by concatenating their top
/// level children.
///
/// Children end up grouped by the order in which their owning service was
/// first encountered during routing, not in the client's original field
/// order. This is deliberate, documented behavior. A service whose whole
/// response failed contributes its error root as a child instead.
pub(crate) fn merge_trees(trees: Vec<Arc<ResultNode>>) -> Arc<ResultNode> {
    let mut children = Vec::new();
    for tree in trees {
        if tree.children().is_empty() && matches!(tree.value(), ResultValue::Error(_)) {
            children.push(tree);
        } else {
            children.extend(tree.children().iter().cloned());
        }
    }
    Arc::new(ResultNode::root(children))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockBackendService;
    use crate::MockServiceExecution;
    use serde_json_bytes::json as bjson;

    fn schema() -> Schema {
        Schema::new("Query").with_type(
            ObjectType::new("Query")
                .with_field(FieldDefinition::new("a", FieldType::named("String")))
                .with_field(FieldDefinition::new("b", FieldType::named("String")))
                .with_field(FieldDefinition::new("c", FieldType::named("String"))),
        )
    }

    fn owners() -> FieldOwners {
        [("a", "x"), ("b", "y"), ("c", "x")].into_iter().collect()
    }

    fn operation(fields: &[&str]) -> Operation {
        Operation::builder()
            .selection_set(
                fields
                    .iter()
                    .map(|name| Field::builder().name(name.to_string()).build())
                    .collect::<Vec<_>>(),
            )
            .build()
    }

    #[test]
    fn routing_groups_fields_by_service_in_discovery_order() {
        let stitcher = Stitcher::new(schema(), owners(), ServiceRegistry::new());
        let groups = stitcher
            .route_top_level_fields(&operation(&["a", "b", "c"]))
            .unwrap();

        assert_eq!(groups.keys().collect::<Vec<_>>(), vec!["x", "y"]);
        assert_eq!(
            groups["x"].iter().map(|f| f.name.as_str()).collect::<Vec<_>>(),
            vec!["a", "c"]
        );
        assert_eq!(
            groups["y"].iter().map(|f| f.name.as_str()).collect::<Vec<_>>(),
            vec!["b"]
        );
        // routing is complete: the union of the groups is the field set
        assert_eq!(groups.values().map(Vec::len).sum::<usize>(), 3);
    }

    #[tokio::test]
    async fn unrouted_field_fails_before_any_dispatch() {
        let mut mock = MockServiceExecution::new();
        mock.expect_execute().times(0);
        let mut registry = ServiceRegistry::new();
        registry.insert("x", Arc::new(mock));

        let stitcher = Stitcher::new(schema(), [("a", "x")].into_iter().collect(), registry);
        let err = stitcher
            .execute(
                StitchingRequest::builder()
                    .operation(operation(&["a", "b"]))
                    .build(),
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            FetchError::ValidationNoServiceForField { field } if field == "b"
        ));
    }

    #[tokio::test]
    async fn merged_children_group_by_service() {
        let x = MockBackendService::new()
            .with_default_response(Response::builder().data(bjson!({ "a": 1, "c": 3 })).build());
        let y = MockBackendService::new()
            .with_default_response(Response::builder().data(bjson!({ "b": 2 })).build());
        let mut registry = ServiceRegistry::new();
        registry.insert("x", Arc::new(x));
        registry.insert("y", Arc::new(y));

        let stitcher = Stitcher::new(schema(), owners(), registry);
        let root = stitcher
            .execute(
                StitchingRequest::builder()
                    .operation(operation(&["a", "b", "c"]))
                    .build(),
            )
            .await
            .unwrap();

        let keys: Vec<_> = root
            .children()
            .iter()
            .filter_map(|child| child.response_key())
            .collect();
        assert_eq!(keys, vec!["a", "c", "b"]);
    }
}
