use crate::prelude::graphql::*;
use itertools::Itertools;
use std::sync::Arc;
use typed_builder::TypedBuilder;

/// Everything one service needs to execute its slice of a stitched request:
/// the transformed operation, the variables and fragments it actually
/// references, and the caller context.
#[derive(Clone, Debug, TypedBuilder)]
#[builder(field_defaults(setter(into)))]
pub struct ServiceExecutionParameters {
    /// The transformed operation to execute.
    pub operation: Operation,

    /// The client variables referenced by the transformed operation.
    /// Variables the operation does not reference are filtered out before
    /// dispatch: a service must never receive an unknown variable.
    #[builder(default)]
    pub variables: Arc<Object>,

    /// The fragment definitions used by the transformed operation, already
    /// rewritten for this service's schema. Unused fragments are filtered
    /// out before dispatch.
    #[builder(default)]
    pub fragments: Fragments,

    /// The caller context for this request.
    #[builder(default)]
    pub context: Context,
}

impl ServiceExecutionParameters {
    /// Print the transformed operation and its fragments as a query document.
    pub fn query_string(&self) -> String {
        if self.fragments.is_empty() {
            self.operation.to_string()
        } else {
            std::iter::once(self.operation.to_string())
                .chain(self.fragments.iter().map(|fragment| fragment.to_string()))
                .join(" ")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_string_includes_used_fragments() {
        let parameters = ServiceExecutionParameters::builder()
            .operation(
                Operation::builder()
                    .selection_set(vec![Field::builder()
                        .name("topProducts")
                        .selection_set(vec![Selection::FragmentSpread(FragmentSpread {
                            name: "productFields".to_string(),
                        })])
                        .build()])
                    .build(),
            )
            .fragments(Fragments::from(vec![FragmentDefinition {
                name: "productFields".to_string(),
                type_condition: "Product".to_string(),
                selection_set: vec![Selection::Field(Field::builder().name("name").build())],
            }]))
            .build();
        assert_eq!(
            parameters.query_string(),
            "query { topProducts { ...productFields } } \
             fragment productFields on Product { name }"
        );
    }
}
