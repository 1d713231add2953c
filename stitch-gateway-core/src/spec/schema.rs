use crate::prelude::graphql::*;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// The overall schema, as produced by the composition collaborator.
///
/// Composition itself is out of scope here: this is plain data describing the
/// unified type system, the per-field stitching metadata (underlying names and
/// hydration declarations), and nothing else.
#[derive(Clone, Debug, Default)]
pub struct Schema {
    object_types: IndexMap<String, ObjectType>,
    query_type: String,
    mutation_type: Option<String>,
    subscription_type: Option<String>,
}

impl Schema {
    pub fn new(query_type: impl Into<String>) -> Schema {
        Schema {
            query_type: query_type.into(),
            ..Default::default()
        }
    }

    pub fn with_type(mut self, object_type: ObjectType) -> Schema {
        self.object_types
            .insert(object_type.name.clone(), object_type);
        self
    }

    pub fn with_mutation_type(mut self, name: impl Into<String>) -> Schema {
        self.mutation_type = Some(name.into());
        self
    }

    pub fn with_subscription_type(mut self, name: impl Into<String>) -> Schema {
        self.subscription_type = Some(name.into());
        self
    }

    pub fn object_type(&self, name: impl AsRef<str>) -> Option<&ObjectType> {
        self.object_types.get(name.as_ref())
    }

    /// The root type name for the given operation kind.
    pub fn root_type(&self, kind: OperationKind) -> Option<&str> {
        match kind {
            OperationKind::Query => Some(self.query_type.as_str()),
            OperationKind::Mutation => self.mutation_type.as_deref(),
            OperationKind::Subscription => self.subscription_type.as_deref(),
        }
    }

    pub(crate) fn field_definition(
        &self,
        parent_type: &str,
        field_name: &str,
    ) -> Option<&FieldDefinition> {
        self.object_type(parent_type)
            .and_then(|object_type| object_type.field(field_name))
    }
}

/// An object type of the overall schema.
#[derive(Clone, Debug, Default)]
pub struct ObjectType {
    pub name: String,
    fields: IndexMap<String, FieldDefinition>,
}

impl ObjectType {
    pub fn new(name: impl Into<String>) -> ObjectType {
        ObjectType {
            name: name.into(),
            fields: Default::default(),
        }
    }

    pub fn with_field(mut self, field: FieldDefinition) -> ObjectType {
        self.fields.insert(field.name.clone(), field);
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.get(name)
    }
}

/// A field of the overall schema, with its stitching metadata.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDefinition {
    /// The overall field name.
    pub name: String,

    /// The declared output type.
    pub field_type: FieldType,

    /// The name the owning service knows this field by, when it differs from
    /// the overall name.
    pub underlying_name: Option<String>,

    /// Set when the field's value comes from a dependent call to another
    /// service rather than from the owning service itself.
    pub hydration: Option<HydrationDefinition>,
}

impl FieldDefinition {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> FieldDefinition {
        FieldDefinition {
            name: name.into(),
            field_type,
            underlying_name: None,
            hydration: None,
        }
    }

    pub fn with_underlying_name(mut self, name: impl Into<String>) -> FieldDefinition {
        self.underlying_name = Some(name.into());
        self
    }

    pub fn with_hydration(mut self, hydration: HydrationDefinition) -> FieldDefinition {
        self.hydration = Some(hydration);
        self
    }
}

/// Declares how a hydrated field obtains its value: which service to call,
/// which of its top level fields, and how the argument is populated.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
#[builder(field_defaults(setter(into)))]
pub struct HydrationDefinition {
    /// The service answering the dependent call.
    pub service_name: String,

    /// The top level field to request on that service.
    pub top_level_field: String,

    /// The argument binding for the dependent call.
    pub argument: RemoteArgument,
}

/// The argument of a hydration call and the underlying field its value is
/// read from.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
#[builder(field_defaults(setter(into)))]
pub struct RemoteArgument {
    /// The argument name on the target top level field.
    pub name: String,

    /// The underlying field queried in place of the hydrated field; its
    /// resolved value becomes the argument value.
    pub source_field: String,
}

/// Maps each top level field of the overall schema to the service that owns
/// it. Built by the composition collaborator; a missing entry is a
/// configuration error surfaced at routing time.
#[derive(Clone, Debug, Default)]
pub struct FieldOwners {
    owners: IndexMap<String, String>,
}

impl FieldOwners {
    pub fn new() -> FieldOwners {
        FieldOwners::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, service: impl Into<String>) {
        self.owners.insert(field.into(), service.into());
    }

    pub fn owner_of(&self, field: &str) -> Option<&str> {
        self.owners.get(field).map(|s| s.as_str())
    }
}

impl<F: Into<String>, S: Into<String>> FromIterator<(F, S)> for FieldOwners {
    fn from_iter<I: IntoIterator<Item = (F, S)>>(iter: I) -> Self {
        let mut owners = FieldOwners::new();
        for (field, service) in iter {
            owners.insert(field, service);
        }
        owners
    }
}
