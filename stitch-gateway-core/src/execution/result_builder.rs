//! Converts a raw service response into a [`ResultNode`] tree by zipping it
//! against the transformed query's field structure. Pure and synchronous.

use crate::prelude::graphql::*;
use std::sync::Arc;

/// Build the normalized tree for one service response.
///
/// `fields` and `fragments` are the transformed query shape the service
/// answered; `root_type` is the overall root type for the operation kind.
#[tracing::instrument(skip_all, level = "debug", name = "build_result")]
pub(crate) fn result_to_result_node(
    response: Response,
    fields: &[Field],
    fragments: &Fragments,
    root_type: Option<&str>,
) -> Arc<ResultNode> {
    let Response { data, errors, .. } = response;

    if data.is_null() {
        if let Some(error) = errors.first() {
            return Arc::new(ResultNode::root_error(error.clone()));
        }
    }

    let empty = Object::default();
    let data = match data.as_object() {
        Some(object) => object,
        None => {
            if !data.is_null() {
                failfast_debug!("service returned non object data");
            }
            &empty
        }
    };

    let children = fields
        .iter()
        .map(|field| {
            let key = field.response_key();
            build_field(
                &Arc::new(field.clone()),
                root_type,
                data.get(key),
                Path::from(key),
                &errors,
                fragments,
            )
        })
        .collect();
    Arc::new(ResultNode::root(children))
}

fn build_field(
    field: &Arc<Field>,
    parent_type: Option<&str>,
    value: Option<&Value>,
    path: Path,
    errors: &[Error],
    fragments: &Fragments,
) -> Arc<ResultNode> {
    let step_info = StepInfo {
        parent_type: parent_type.map(|t| t.to_string()),
        path: path.clone(),
    };

    // an error reported at this position wins over whatever data came back;
    // error nodes carry no children
    if let Some(error) = errors.iter().find(|error| error.path.as_ref() == Some(&path)) {
        return Arc::new(ResultNode::new(
            Arc::clone(field),
            ResultValue::Error(error.clone()),
            vec![],
            step_info,
        ));
    }

    match value {
        Some(Value::Array(items)) => {
            let children = items
                .iter()
                .enumerate()
                .map(|(index, item)| {
                    build_field(
                        field,
                        parent_type,
                        Some(item),
                        path.join(index),
                        errors,
                        fragments,
                    )
                })
                .collect();
            Arc::new(ResultNode::new(
                Arc::clone(field),
                ResultValue::List,
                children,
                step_info,
            ))
        }
        Some(Value::Object(object)) if !field.selection_set.is_empty() => {
            let inner_type = field
                .field_type
                .as_ref()
                .map(|field_type| field_type.inner_type_name());
            let children = resolve_fields(&field.selection_set, fragments, object)
                .into_iter()
                .map(|child| {
                    let key = child.response_key().to_string();
                    build_field(
                        &Arc::new(child),
                        inner_type,
                        object.get(key.as_str()),
                        path.join(key.as_str()),
                        errors,
                        fragments,
                    )
                })
                .collect();
            Arc::new(ResultNode::new(
                Arc::clone(field),
                ResultValue::Object,
                children,
                step_info,
            ))
        }
        Some(value) => Arc::new(ResultNode::new(
            Arc::clone(field),
            ResultValue::Completed(value.clone()),
            vec![],
            step_info,
        )),
        None => Arc::new(ResultNode::new(
            Arc::clone(field),
            ResultValue::Completed(Value::Null),
            vec![],
            step_info,
        )),
    }
}

/// Expand fragment spreads and inline fragments into the flat field list an
/// object value is zipped against. Fragment derived fields are only included
/// when the response actually carries their key; same keyed duplicates keep
/// their first occurrence.
fn resolve_fields(selections: &[Selection], fragments: &Fragments, object: &Object) -> Vec<Field> {
    let mut fields = Vec::new();
    let mut seen = std::collections::HashSet::new();
    resolve_fields_into(selections, fragments, object, false, &mut seen, &mut fields);
    fields
}

fn resolve_fields_into(
    selections: &[Selection],
    fragments: &Fragments,
    object: &Object,
    from_fragment: bool,
    seen: &mut std::collections::HashSet<String>,
    fields: &mut Vec<Field>,
) {
    for selection in selections {
        match selection {
            Selection::Field(field) => {
                let key = field.response_key();
                if from_fragment && object.get(key).is_none() {
                    continue;
                }
                if seen.insert(key.to_string()) {
                    fields.push(field.clone());
                }
            }
            Selection::InlineFragment(fragment) => {
                resolve_fields_into(
                    &fragment.selection_set,
                    fragments,
                    object,
                    true,
                    seen,
                    fields,
                );
            }
            Selection::FragmentSpread(spread) => {
                if let Some(definition) = fragments.get(&spread.name) {
                    resolve_fields_into(
                        &definition.selection_set,
                        fragments,
                        object,
                        true,
                        seen,
                        fields,
                    );
                } else {
                    failfast_debug!("response zipped against unknown fragment '{}'", spread.name);
                }
            }
        }
    }
}
