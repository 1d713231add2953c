use crate::prelude::graphql::*;
use indexmap::IndexMap;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A named fragment definition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FragmentDefinition {
    /// The fragment name.
    pub name: String,

    /// The type the fragment applies to.
    pub type_condition: String,

    /// The selections of the fragment.
    pub selection_set: Vec<Selection>,
}

impl fmt::Display for FragmentDefinition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "fragment {} on {} {{ {} }}",
            self.name,
            self.type_condition,
            self.selection_set.iter().join(" ")
        )
    }
}

/// Fragment definitions, keyed by name in insertion order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fragments {
    map: IndexMap<String, FragmentDefinition>,
}

impl Fragments {
    pub fn new() -> Fragments {
        Fragments::default()
    }

    pub fn get(&self, name: impl AsRef<str>) -> Option<&FragmentDefinition> {
        self.map.get(name.as_ref())
    }

    pub fn insert(&mut self, fragment: FragmentDefinition) {
        self.map.insert(fragment.name.clone(), fragment);
    }

    pub fn contains(&self, name: impl AsRef<str>) -> bool {
        self.map.contains_key(name.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = &FragmentDefinition> {
        self.map.values()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl From<Vec<FragmentDefinition>> for Fragments {
    fn from(fragments: Vec<FragmentDefinition>) -> Self {
        let mut result = Fragments::new();
        for fragment in fragments {
            result.insert(fragment);
        }
        result
    }
}
