use std::collections::{BTreeMap, BTreeSet};

use leia_models::LeiaMessage;

/// Tag prefix naming a backend directly, as in `BACKEND::audit`.
pub const BACKEND_TAG_PREFIX: &str = "BACKEND::";

/// Computes the backends a message should be delivered to.
pub trait NameResolver: Send + Sync {
    fn eligible_backends(&self, message: &LeiaMessage) -> BTreeSet<String>;
}

/// Resolves backends from message tags.
///
/// A `BACKEND::<name>` tag selects `<name>`. A backend bound to a set of tags
/// is selected when the message carries any of them.
#[derive(Debug, Clone, Default)]
pub struct TagBasedNameResolver {
    bindings: BTreeMap<String, BTreeSet<String>>,
}

impl TagBasedNameResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_binding<I, S>(mut self, backend: impl Into<String>, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.bindings
            .entry(backend.into())
            .or_default()
            .extend(tags.into_iter().map(Into::into));
        self
    }
}

impl NameResolver for TagBasedNameResolver {
    fn eligible_backends(&self, message: &LeiaMessage) -> BTreeSet<String> {
        let mut backends: BTreeSet<String> = message
            .tags
            .iter()
            .filter_map(|tag| tag.strip_prefix(BACKEND_TAG_PREFIX))
            .filter(|name| !name.is_empty())
            .map(str::to_owned)
            .collect();
        for (backend, tags) in &self.bindings {
            if !tags.is_disjoint(&message.tags) {
                backends.insert(backend.clone());
            }
        }
        backends
    }
}
