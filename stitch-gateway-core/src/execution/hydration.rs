//! Resolves hydration placeholders left in a result tree by the result
//! rewriter.
//!
//! Each round scans the current snapshot for placeholder leaves, resolves
//! every one of them concurrently through a dependent service call, and
//! grafts the results back in one batch patch. A dependent call's own result
//! is drained of placeholders before it is grafted, so chained hydrations
//! resolve to any depth. Rounds are strictly sequential: the next scan only
//! runs on the patched tree. No depth or cycle guard is enforced here;
//! callers needing one wrap the engine.

use super::patch;
use super::{fetch, ExecutionContext};
use crate::prelude::graphql::*;
use futures::future::{self, BoxFuture};
use indexmap::IndexMap;
use std::sync::Arc;
use tracing::Instrument;

pub(crate) fn resolve_all_hydration_inputs<'a>(
    ctx: &'a ExecutionContext<'a>,
    root: Arc<ResultNode>,
    transformations: &'a IndexMap<TransformId, FieldTransformation>,
) -> BoxFuture<'a, Result<Arc<ResultNode>, FetchError>> {
    Box::pin(async move {
        let mut root = root;
        loop {
            let inputs = patch::collect_nodes(&root, |node: &ResultNode| node.is_hydration_input());
            if inputs.is_empty() {
                return Ok(root);
            }

            let span = tracing::info_span!("hydration_round", placeholders = inputs.len());
            let resolved = future::try_join_all(inputs.into_iter().map(|(path, node)| async move {
                let subtree = resolve_hydration_input(ctx, &node, transformations).await?;
                Ok::<_, FetchError>((path, subtree))
            }))
            .instrument(span)
            .await
            .map_err(|err| {
                tracing::error!(%err, "hydration round failed");
                err
            })?;

            root = patch::patch_tree(&root, resolved);
        }
    })
}

async fn resolve_hydration_input(
    ctx: &ExecutionContext<'_>,
    node: &ResultNode,
    transformations: &IndexMap<TransformId, FieldTransformation>,
) -> Result<Arc<ResultNode>, FetchError> {
    let field = node
        .field()
        .ok_or_else(|| FetchError::ExecutionInvalidContent {
            reason: "hydration placeholder without a field".to_string(),
        })?;
    let transformation = match field
        .transform_id
        .and_then(|id| transformations.get(&id))
    {
        Some(FieldTransformation::Hydration(hydration)) => hydration,
        _ => {
            return Err(FetchError::ExecutionMissingTransformation {
                field: field.name.clone(),
            })
        }
    };
    let value = match node.value() {
        ResultValue::HydrationInput(value) => value,
        _ => {
            return Err(FetchError::ExecutionInvalidContent {
                reason: "hydration input node no longer holds a raw value".to_string(),
            })
        }
    };

    let original_field = &transformation.original_field;
    let replacement_step_info = || StepInfo {
        parent_type: node.step_info().parent_type.clone(),
        path: match node.step_info().path.parent() {
            Some(parent) => parent.join(original_field.response_key()),
            None => Path::from(original_field.response_key()),
        },
    };

    // a null input means there is nothing to look up on the other side
    if value.is_null() {
        return Ok(Arc::new(ResultNode::new(
            Arc::new(original_field.clone()),
            ResultValue::Completed(Value::Null),
            vec![],
            replacement_step_info(),
        )));
    }

    let argument_value = coerce_argument_value(value, original_field)?;
    let top_level_field = Field::builder()
        .name(transformation.hydration.top_level_field.clone())
        .arguments(vec![Argument::new(
            transformation.hydration.argument.name.clone(),
            ArgumentValue::literal(Value::String(ByteString::from(argument_value))),
        )])
        .selection_set(original_field.selection_set.clone())
        .build();

    let mut transformer = QueryTransformer::new(ctx.schema, ctx.fragments);
    let transform_result = transformer.transform_selection_set_in_field(
        top_level_field,
        transformation.field_type.inner_type_name(),
    )?;

    let service = ctx
        .registry
        .get(&transformation.hydration.service_name)
        .ok_or_else(|| FetchError::ValidationUnknownServiceError {
            service: transformation.hydration.service_name.clone(),
        })?;

    let tree = fetch::call_service(ctx, service, &transform_result).await?;
    let top_node = match tree.children().first() {
        Some(top_node) => Arc::clone(top_node),
        None => {
            // the dependent call failed as a whole; the error marker takes
            // the hydrated field's place
            if let ResultValue::Error(error) = tree.value() {
                return Ok(Arc::new(ResultNode::new(
                    Arc::new(original_field.clone()),
                    ResultValue::Error(error.clone()),
                    vec![],
                    replacement_step_info(),
                )));
            }
            return Err(FetchError::SubrequestMalformedResponse {
                service: transformation.hydration.service_name.clone(),
                reason: "hydration response contained no top level field".to_string(),
            });
        }
    };
    let renamed = Arc::new(top_node.with_field(Arc::new(original_field.clone())));

    // the dependent call's result may itself contain hydrated fields
    resolve_all_hydration_inputs(ctx, renamed, &transform_result.transformations).await
}

// TODO: generalize beyond the single string argument hydration declares
// today; see the argument shape discussion in DESIGN.md
fn coerce_argument_value(value: &Value, original_field: &Field) -> Result<String, FetchError> {
    match value {
        Value::String(s) => Ok(s.as_str().to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null | Value::Object(_) | Value::Array(_) => {
            Err(FetchError::ExecutionUnsupportedHydrationArgument {
                field: original_field.name.clone(),
                reason: "only single valued, string coercible argument values are supported"
                    .to_string(),
            })
        }
    }
}
