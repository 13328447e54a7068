//! Registry of served record types and their CRUD routes

use axum::Router;
use std::collections::BTreeMap;

/// Describes how to build the routes of one record type
pub trait EntityDescriptor: Send + Sync {
    /// The record type name (singular, e.g., "vet_visit")
    fn entity_type(&self) -> &str;

    /// The collection segment (e.g., "vet_visits")
    fn plural(&self) -> &str;

    /// Build the CRUD routes for this record type
    ///
    /// Should return a Router with routes like:
    /// - GET/POST /{plural}
    /// - GET/PUT/PATCH/DELETE /{plural}/{id}
    fn build_routes(&self) -> Router;
}

/// Registry for all record types of the API
///
/// Descriptors are keyed by entity type, so iteration order is stable.
#[derive(Default)]
pub struct EntityRegistry {
    descriptors: BTreeMap<String, Box<dyn EntityDescriptor>>,
}

impl EntityRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            descriptors: BTreeMap::new(),
        }
    }

    /// Register a descriptor, replacing any previous one for the same type
    pub fn register(&mut self, descriptor: Box<dyn EntityDescriptor>) {
        let entity_type = descriptor.entity_type().to_string();
        self.descriptors.insert(entity_type, descriptor);
    }

    /// Merge the routes of every registered record type
    pub fn build_routes(&self) -> Router {
        let mut router = Router::new();

        for descriptor in self.descriptors.values() {
            router = router.merge(descriptor.build_routes());
        }

        router
    }

    /// Get all registered entity types
    pub fn entity_types(&self) -> Vec<&str> {
        self.descriptors.keys().map(|s| s.as_str()).collect()
    }

    /// Collection segments of every registered record type
    pub fn plurals(&self) -> Vec<&str> {
        self.descriptors.values().map(|d| d.plural()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;

    struct MockDescriptor {
        entity_type: String,
        plural: String,
    }

    impl MockDescriptor {
        fn new(entity_type: &str, plural: &str) -> Self {
            Self {
                entity_type: entity_type.to_string(),
                plural: plural.to_string(),
            }
        }
    }

    impl EntityDescriptor for MockDescriptor {
        fn entity_type(&self) -> &str {
            &self.entity_type
        }

        fn plural(&self) -> &str {
            &self.plural
        }

        fn build_routes(&self) -> Router {
            Router::new().route(&format!("/{}", self.plural), get(|| async { "[]" }))
        }
    }

    #[test]
    fn test_new_registry_is_empty() {
        let registry = EntityRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.entity_types().is_empty());
    }

    #[test]
    fn test_register_multiple_entities() {
        let mut registry = EntityRegistry::new();
        registry.register(Box::new(MockDescriptor::new("vet", "vets")));
        registry.register(Box::new(MockDescriptor::new("allergy", "allergies")));
        assert_eq!(registry.entity_types(), vec!["allergy", "vet"]);
        assert_eq!(registry.plurals(), vec!["allergies", "vets"]);
    }

    #[test]
    fn test_register_duplicate_replaces() {
        let mut registry = EntityRegistry::new();
        registry.register(Box::new(MockDescriptor::new("vet", "vets")));
        registry.register(Box::new(MockDescriptor::new("vet", "veterinarians")));
        assert_eq!(registry.entity_types().len(), 1);
        assert_eq!(registry.plurals(), vec!["veterinarians"]);
    }

    #[test]
    fn test_build_routes_with_entities() {
        let mut registry = EntityRegistry::new();
        registry.register(Box::new(MockDescriptor::new("vet", "vets")));
        registry.register(Box::new(MockDescriptor::new("allergy", "allergies")));
        let _router = registry.build_routes();
    }
}
