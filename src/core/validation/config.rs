//! Per-operation validation configuration
//!
//! An [`EntityValidationConfig`] lists the writable fields of a record type,
//! whether each one must be present, and the filters and validators applied
//! to it. The same config drives create, full update and partial update;
//! only the presence rules change with the [`Operation`].

use crate::core::entity::EntityKind;
use crate::core::error::FieldValidationError;
use crate::core::validation::validators;
use axum::http::Method;
use indexmap::IndexMap;
use serde_json::{Map, Value};

/// Boxed field validator: `(field, value) -> Result<(), message>`
pub type Validator = Box<dyn Fn(&str, &Value) -> Result<(), String> + Send + Sync>;

/// Boxed field filter applied before validation
pub type Filter = Box<dyn Fn(&str, Value) -> anyhow::Result<Value> + Send + Sync>;

/// Write operation a payload is validated for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// POST
    Create,
    /// PUT
    Update,
    /// PATCH
    PartialUpdate,
}

impl Operation {
    pub fn from_method(method: &Method) -> Self {
        match *method {
            Method::PUT => Operation::Update,
            Method::PATCH => Operation::PartialUpdate,
            _ => Operation::Create,
        }
    }
}

/// Whether a field may be NULL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Required,
    Optional,
}

/// Rules attached to one wire field
pub struct FieldRules {
    presence: Presence,
    relation: bool,
    filters: Vec<Filter>,
    validators: Vec<Validator>,
}

impl FieldRules {
    fn new(presence: Presence, relation: bool) -> Self {
        Self {
            presence,
            relation,
            filters: Vec::new(),
            validators: Vec::new(),
        }
    }

    /// Add a filter run before the validators
    pub fn filter<F>(&mut self, filter: F) -> &mut Self
    where
        F: Fn(&str, Value) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.filters.push(Box::new(filter));
        self
    }

    /// Add a validator; the first failing one reports the field's error
    pub fn check<V>(&mut self, validator: V) -> &mut Self
    where
        V: Fn(&str, &Value) -> Result<(), String> + Send + Sync + 'static,
    {
        self.validators.push(Box::new(validator));
        self
    }

    /// Whether a payload for `operation` must contain this field
    fn must_be_supplied(&self, operation: Operation) -> bool {
        match operation {
            Operation::Create => self.presence == Presence::Required,
            Operation::Update => self.relation,
            Operation::PartialUpdate => false,
        }
    }
}

/// Validation rules of one record type for one operation
pub struct EntityValidationConfig {
    pub entity_type: EntityKind,
    operation: Operation,
    fields: IndexMap<String, FieldRules>,
}

impl EntityValidationConfig {
    pub fn new(entity_type: EntityKind, operation: Operation) -> Self {
        Self {
            entity_type,
            operation,
            fields: IndexMap::new(),
        }
    }

    /// Declare a scalar field
    pub fn scalar(&mut self, field: &str, presence: Presence) -> &mut FieldRules {
        self.declare(field.to_string(), presence, false)
    }

    /// Declare a foreign key; the wire name is `{field}_id`
    pub fn relation(&mut self, field: &str, presence: Presence) -> &mut FieldRules {
        let rules = self.declare(format!("{}_id", field), presence, true);
        rules.check(validators::foreign_key());
        rules
    }

    fn declare(&mut self, key: String, presence: Presence, relation: bool) -> &mut FieldRules {
        let rules = self
            .fields
            .entry(key)
            .or_insert_with(|| FieldRules::new(presence, relation));
        rules.presence = presence;
        rules.relation = relation;
        rules
    }

    /// Filter and validate a payload.
    ///
    /// Unknown keys are dropped. Every failing field is reported.
    pub fn validate_and_filter(&self, payload: Value) -> Result<Value, Vec<FieldValidationError>> {
        let Value::Object(mut input) = payload else {
            return Err(vec![FieldValidationError::new(
                "non_field_errors",
                "Invalid data. Expected a dictionary.",
            )]);
        };

        let mut output = Map::new();
        let mut errors = Vec::new();

        for (field, rules) in &self.fields {
            let Some(mut value) = input.remove(field) else {
                if rules.must_be_supplied(self.operation) {
                    errors.push(FieldValidationError::new(field, "This field is required."));
                }
                continue;
            };

            if value.is_null() {
                if rules.presence == Presence::Required {
                    errors.push(FieldValidationError::new(field, "This field may not be null."));
                } else {
                    output.insert(field.clone(), Value::Null);
                }
                continue;
            }

            let mut failed = false;
            for filter in &rules.filters {
                match filter(field, value) {
                    Ok(filtered) => value = filtered,
                    Err(e) => {
                        errors.push(FieldValidationError::new(field, e.to_string()));
                        failed = true;
                        value = Value::Null;
                        break;
                    }
                }
            }
            if failed {
                continue;
            }

            if let Some(message) = rules.validators.iter().find_map(|v| v(field, &value).err()) {
                errors.push(FieldValidationError::new(field, message));
                continue;
            }

            output.insert(field.clone(), value);
        }

        if errors.is_empty() {
            Ok(Value::Object(output))
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::validation::filters::trim;
    use crate::core::validation::validators::{alpha, max_length, text};
    use serde_json::json;

    fn breed_config(operation: Operation) -> EntityValidationConfig {
        let mut config = EntityValidationConfig::new(EntityKind::Breed, operation);
        config
            .scalar("name", Presence::Required)
            .filter(trim())
            .check(text())
            .check(alpha())
            .check(max_length(200));
        config.relation("pet_type", Presence::Optional);
        config
    }

    #[test]
    fn test_create_requires_required_scalars_only() {
        let errors = breed_config(Operation::Create)
            .validate_and_filter(json!({}))
            .unwrap_err();
        assert_eq!(errors, vec![FieldValidationError::new("name", "This field is required.")]);
    }

    #[test]
    fn test_update_requires_every_relation() {
        let errors = breed_config(Operation::Update)
            .validate_and_filter(json!({ "name": "Beagle" }))
            .unwrap_err();
        assert_eq!(errors[0].field, "pet_type_id");

        let ok = breed_config(Operation::Update)
            .validate_and_filter(json!({ "pet_type_id": null }))
            .unwrap();
        assert_eq!(ok, json!({ "pet_type_id": null }));
    }

    #[test]
    fn test_partial_update_requires_nothing() {
        let ok = breed_config(Operation::PartialUpdate)
            .validate_and_filter(json!({}))
            .unwrap();
        assert_eq!(ok, json!({}));
    }

    #[test]
    fn test_filters_run_before_validators_and_unknown_keys_are_dropped() {
        let ok = breed_config(Operation::Create)
            .validate_and_filter(json!({ "name": "  Beagle ", "extra": 1 }))
            .unwrap();
        assert_eq!(ok, json!({ "name": "Beagle" }));
    }

    #[test]
    fn test_all_failing_fields_are_reported() {
        let errors = breed_config(Operation::Create)
            .validate_and_filter(json!({ "name": "B3agle", "pet_type_id": "x" }))
            .unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_null_for_required_field() {
        let errors = breed_config(Operation::PartialUpdate)
            .validate_and_filter(json!({ "name": null }))
            .unwrap_err();
        assert_eq!(errors[0].message, "This field may not be null.");
    }

    #[test]
    fn test_non_object_payload() {
        let errors = breed_config(Operation::Create)
            .validate_and_filter(json!([1, 2]))
            .unwrap_err();
        assert_eq!(errors[0].field, "non_field_errors");
    }

    #[test]
    fn test_operation_from_method() {
        assert_eq!(Operation::from_method(&Method::POST), Operation::Create);
        assert_eq!(Operation::from_method(&Method::PUT), Operation::Update);
        assert_eq!(Operation::from_method(&Method::PATCH), Operation::PartialUpdate);
    }
}
