//! One service call end-to-end: build execution parameters, invoke the
//! service, normalize the raw response, rewrite it back onto overall schema
//! field identity.

use super::overall_result::convert_to_overall;
use super::result_builder::result_to_result_node;
use super::ExecutionContext;
use crate::prelude::graphql::*;
use std::sync::Arc;
use tracing::Instrument;

pub(crate) async fn call_service(
    ctx: &ExecutionContext<'_>,
    service: &Service,
    transform_result: &QueryTransformationResult,
) -> Result<Arc<ResultNode>, FetchError> {
    let parameters = build_parameters(ctx, transform_result);

    let response = service
        .execution()
        .execute(parameters)
        .instrument(tracing::info_span!("fetch", service = service.name()))
        .await
        .map_err(|err| {
            // observe-and-forward: the sink sees the failure, the caller
            // still gets it unchanged
            tracing::error!(service = service.name(), %err, "service execution failed");
            err
        })?;

    let service_tree = result_to_result_node(
        response,
        &transform_result.transformed_fields,
        &transform_result.transformed_fragments,
        ctx.schema.root_type(ctx.operation_kind),
    );
    convert_to_overall(&service_tree, &transform_result.transformations)
}

fn build_parameters(
    ctx: &ExecutionContext<'_>,
    transform_result: &QueryTransformationResult,
) -> ServiceExecutionParameters {
    // only pass down variables that are referenced in the transformed query
    let mut variables = Object::default();
    for (name, value) in ctx.variables.iter() {
        if transform_result.referenced_variables.contains(name.as_str()) {
            variables.insert(name.clone(), value.clone());
        }
    }
    let variable_definitions = ctx
        .variable_definitions
        .iter()
        .filter(|definition| {
            transform_result
                .referenced_variables
                .contains(&definition.name)
        })
        .cloned()
        .collect();

    let operation = Operation {
        kind: ctx.operation_kind,
        name: ctx.operation_name.clone(),
        variable_definitions,
        selection_set: transform_result.transformed_fields.clone(),
    };

    ServiceExecutionParameters::builder()
        .operation(operation)
        .variables(Arc::new(variables))
        .fragments(transform_result.transformed_fragments.clone())
        .context(ctx.context.clone())
        .build()
}
