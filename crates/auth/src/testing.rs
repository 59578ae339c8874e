use std::collections::HashMap;

use crate::{CredentialStore, Principal};

/// Fixed principal set for unit tests.
#[derive(Debug, Default)]
pub(crate) struct MapStore {
    principals: HashMap<String, Principal>,
}

impl MapStore {
    pub(crate) fn with(principals: impl IntoIterator<Item = Principal>) -> Self {
        Self {
            principals: principals
                .into_iter()
                .map(|p| (p.identifier.clone(), p))
                .collect(),
        }
    }
}

impl CredentialStore for MapStore {
    fn find_by_identifier(&self, identifier: &str) -> Option<Principal> {
        self.principals.get(identifier).cloned()
    }
}
