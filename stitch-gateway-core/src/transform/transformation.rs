use crate::prelude::graphql::*;
use std::fmt;

/// Stable identity linking a field in a transformed query to the record
/// describing how to map its result back to the overall schema.
///
/// Result nodes are matched to their transformation through this id rather
/// than through pointer identity, so copying or re-serializing fields never
/// breaks the correspondence. Ids are generated deterministically, in walk
/// order, and are scoped to the transformer that produced them.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct TransformId(pub(crate) u64);

impl fmt::Display for TransformId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How one field of a transformed query maps back to the client's request.
#[derive(Clone, Debug)]
pub(crate) enum FieldTransformation {
    /// Same data under a different name in the underlying schema.
    Rename(RenameTransformation),

    /// The field is a placeholder; its true value comes from a dependent
    /// call to another service.
    Hydration(HydrationTransformation),
}

impl FieldTransformation {
    pub(crate) fn original_field(&self) -> &Field {
        match self {
            FieldTransformation::Rename(rename) => &rename.original_field,
            FieldTransformation::Hydration(hydration) => &hydration.original_field,
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct RenameTransformation {
    /// The field as the client requested it.
    pub(crate) original_field: Field,
}

#[derive(Clone, Debug)]
pub(crate) struct HydrationTransformation {
    /// The field as the client requested it.
    pub(crate) original_field: Field,

    /// The hydration declaration from the overall schema.
    pub(crate) hydration: HydrationDefinition,

    /// The declared output type of the original field, used to resolve the
    /// dependent call's selection set.
    pub(crate) field_type: FieldType,
}
