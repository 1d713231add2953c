//! Maps a per-service result tree back onto overall schema field identity.
//!
//! Renamed fields are restored to the name and alias the client requested;
//! hydrated fields become placeholder nodes carrying their resolved raw
//! value, to be consumed later by the hydration engine. Paths are recomputed
//! as keys change.

use crate::prelude::graphql::*;
use indexmap::IndexMap;
use std::sync::Arc;

#[tracing::instrument(skip_all, level = "debug", name = "rewrite_result")]
pub(crate) fn convert_to_overall(
    node: &Arc<ResultNode>,
    transformations: &IndexMap<TransformId, FieldTransformation>,
) -> Result<Arc<ResultNode>, FetchError> {
    convert_node(node, transformations, &Path::empty(), None)
}

fn convert_node(
    node: &Arc<ResultNode>,
    transformations: &IndexMap<TransformId, FieldTransformation>,
    parent_path: &Path,
    list_index: Option<usize>,
) -> Result<Arc<ResultNode>, FetchError> {
    let (new_field, new_value) = match node.field() {
        None => (None, node.value().clone()),
        Some(field) => match field.transform_id {
            None => (node.field_arc(), node.value().clone()),
            Some(id) => {
                let transformation = transformations.get(&id).ok_or_else(|| {
                    failfast_error!("no transformation recorded for field '{}'", field.name);
                    FetchError::ExecutionMissingTransformation {
                        field: field.name.clone(),
                    }
                })?;
                match transformation {
                    FieldTransformation::Rename(rename) => (
                        Some(Arc::new(rename.original_field.clone())),
                        node.value().clone(),
                    ),
                    FieldTransformation::Hydration(hydration) => match node.value() {
                        // the error marker stands; there is no value to
                        // hydrate with
                        ResultValue::Error(error) => (
                            Some(Arc::new(hydration.original_field.clone())),
                            ResultValue::Error(error.clone()),
                        ),
                        // keep the placeholder field: the hydration engine
                        // locates the transformation through its id
                        _ => (node.field_arc(), ResultValue::HydrationInput(node.to_data())),
                    },
                }
            }
        },
    };

    let path = match (&new_field, list_index) {
        (_, Some(index)) => parent_path.join(index),
        (Some(field), None) => parent_path.join(field.response_key()),
        (None, None) => parent_path.clone(),
    };

    let children = match &new_value {
        ResultValue::Completed(_) | ResultValue::Error(_) | ResultValue::HydrationInput(_) => {
            Vec::new()
        }
        ResultValue::Object | ResultValue::List => {
            let child_index_in_list = matches!(node.value(), ResultValue::List);
            node.children()
                .iter()
                .enumerate()
                .map(|(index, child)| {
                    convert_node(
                        child,
                        transformations,
                        &path,
                        child_index_in_list.then(|| index),
                    )
                })
                .collect::<Result<Vec<_>, _>>()?
        }
    };

    let step_info = StepInfo {
        parent_type: node.step_info().parent_type.clone(),
        path,
    };
    Ok(Arc::new(match new_field {
        Some(field) => ResultNode::new(field, new_value, children, step_info),
        None => match new_value {
            ResultValue::Error(error) => ResultNode::root_error(error),
            _ => ResultNode::root(children),
        },
    }))
}
