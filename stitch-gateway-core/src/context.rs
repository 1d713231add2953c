//! Provide a [`Context`] that travels with one stitched execution.
//!
//! The caller hands a [`Context`] to [`crate::Stitcher::execute`] and the same
//! context is passed, opaquely, to every service execution triggered by that
//! request (top-level and hydration calls alike). It contains a DashMap which
//! allows additional data to be passed back and forth along the request
//! invocation pipeline.

use crate::prelude::graphql::*;
use dashmap::DashMap;
use serde::Serialize;
use std::sync::Arc;

/// Boxed error returned by context accessors.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Holds [`Context`] entries.
pub type Entries = Arc<DashMap<String, Value>>;

/// Caller context for one stitched request.
#[derive(Clone, Debug, Default)]
pub struct Context {
    // Allows adding custom entries to the context.
    entries: Entries,
}

impl Context {
    pub fn new() -> Self {
        Context {
            entries: Default::default(),
        }
    }

    pub fn get<K, V>(&self, key: K) -> Result<Option<V>, BoxError>
    where
        K: Into<String>,
        V: for<'de> serde::Deserialize<'de>,
    {
        self.entries
            .get(&key.into())
            .map(|v| serde_json_bytes::from_value(v.value().clone()))
            .transpose()
            .map_err(|e| e.into())
    }

    pub fn insert<K, V>(&self, key: K, value: V) -> Result<Option<V>, BoxError>
    where
        K: Into<String>,
        V: for<'de> serde::Deserialize<'de> + Serialize,
    {
        match serde_json_bytes::to_value(value) {
            Ok(value) => self
                .entries
                .insert(key.into(), value)
                .map(serde_json_bytes::from_value)
                .transpose()
                .map_err(|e| e.into()),
            Err(e) => Err(e.into()),
        }
    }
}
