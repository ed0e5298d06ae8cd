use lineage_types::TypeFingerprint;
use serde::{Deserialize, Serialize};

use crate::metadata::TypeMetadata;

/// Point-in-time summary of one registered type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeSummary {
    pub name: String,
    pub fingerprint: TypeFingerprint,
    /// The type followed by its composable ancestors.
    pub lineage: Vec<String>,
    pub registrations: u64,
    /// Behaviors whose resolution has been memoized.
    pub resolved_behaviors: Vec<String>,
}

impl TypeSummary {
    pub fn capture(metadata: &TypeMetadata) -> Self {
        let key = metadata.key();
        Self {
            name: key.name().to_string(),
            fingerprint: key.fingerprint(),
            lineage: metadata
                .lineage()
                .iter()
                .map(|k| k.name().to_string())
                .collect(),
            registrations: metadata.registrations(),
            resolved_behaviors: metadata
                .resolved_behaviors()
                .iter()
                .map(|id| id.name().to_string())
                .collect(),
        }
    }
}

/// Serializable view of a registry, sorted by type name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    pub types: Vec<TypeSummary>,
}

impl RegistrySnapshot {
    pub(crate) fn from_metadata<'a>(metadata: impl Iterator<Item = &'a TypeMetadata>) -> Self {
        let mut types: Vec<TypeSummary> = metadata.map(TypeSummary::capture).collect();
        types.sort_by(|a, b| a.name.cmp(&b.name));
        Self { types }
    }

    /// Summary of the type with the given full name.
    pub fn get(&self, name: &str) -> Option<&TypeSummary> {
        self.types.iter().find(|summary| summary.name == name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
