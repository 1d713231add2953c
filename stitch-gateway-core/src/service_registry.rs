use crate::prelude::graphql::*;
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// A backend service: a stable name plus its execution entry point.
#[derive(Clone)]
pub struct Service {
    name: String,
    execution: Arc<dyn ServiceExecution>,
}

impl Service {
    pub fn new(name: impl Into<String>, execution: Arc<dyn ServiceExecution>) -> Service {
        Service {
            name: name.into(),
            execution,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn execution(&self) -> &dyn ServiceExecution {
        self.execution.as_ref()
    }
}

impl fmt::Debug for Service {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("Service").field(&self.name).finish()
    }
}

/// Maintains the set of known services, keyed by name in registration order.
#[derive(Clone, Default)]
pub struct ServiceRegistry {
    services: IndexMap<String, Service>,
}

impl fmt::Debug for ServiceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut debug = f.debug_tuple("ServiceRegistry");
        for name in self.services.keys() {
            debug.field(name);
        }
        debug.finish()
    }
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self {
            services: Default::default(),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, execution: Arc<dyn ServiceExecution>) {
        let name = name.into();
        self.services
            .insert(name.clone(), Service::new(name, execution));
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    pub fn contains(&self, name: impl AsRef<str>) -> bool {
        self.services.contains_key(name.as_ref())
    }

    pub fn get(&self, name: impl AsRef<str>) -> Option<&Service> {
        self.services.get(name.as_ref())
    }
}
