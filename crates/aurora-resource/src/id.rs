//! Logical resource identity

use aurora_formats::ResourceType;
use std::fmt;

/// Case-insensitive (name, type) key identifying one logical game resource.
///
/// The name is lower-cased at construction so equality and hashing are
/// case-insensitive without per-comparison work. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceId {
    name: String,
    res_type: ResourceType,
}

impl ResourceId {
    pub fn new(name: &str, res_type: ResourceType) -> Self {
        Self {
            name: name.to_lowercase(),
            res_type,
        }
    }

    /// The lower-cased resource name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn res_type(&self) -> ResourceType {
        self.res_type
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.name, self.res_type.extension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    fn hash_of(id: &ResourceId) -> u64 {
        let mut hasher = DefaultHasher::new();
        id.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn name_comparison_is_case_insensitive() {
        let a = ResourceId::new("C_Bandit01", ResourceType::Utc);
        let b = ResourceId::new("c_bandit01", ResourceType::Utc);
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn type_participates_in_identity() {
        let a = ResourceId::new("m01aa", ResourceType::Are);
        let b = ResourceId::new("m01aa", ResourceType::Git);
        assert_ne!(a, b);
    }

    #[test]
    fn display_uses_extension() {
        let id = ResourceId::new("Appearance", ResourceType::TwoDa);
        assert_eq!(id.to_string(), "appearance.2da");
    }
}
