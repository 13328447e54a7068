//! Static table of served resources
//!
//! Each record type is paired with its serializer here; the server builds
//! all CRUD routes from this list at start-up.

use crate::core::entity::{Entity, EntityKind};
use crate::resources::handlers::AppState;
use crate::serializers::{
    AllergySerializer, BreedSerializer, GroomingAppointmentSerializer, IllnessSerializer,
    OwnerSerializer, PetGroomerSerializer, PetSalonSerializer, PetSerializer, PetTypeSerializer,
    ProcedureSerializer, Serializer, SurgerySerializer, TreatmentSerializer, VaccineSerializer,
    VetClinicSerializer, VetSerializer, VetVisitSerializer, WeighInSerializer,
};
use crate::server::entity_registry::{EntityDescriptor, EntityRegistry};
use crate::server::router::build_resource_routes;
use axum::Router;
use std::marker::PhantomData;

/// Routes of one record type, served through serializer `S`
pub struct ResourceDescriptor<S> {
    state: AppState,
    _serializer: PhantomData<fn() -> S>,
}

impl<S: Serializer> ResourceDescriptor<S> {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            _serializer: PhantomData,
        }
    }

    pub fn kind(&self) -> EntityKind {
        <S::Model as Entity>::KIND
    }
}

impl<S: Serializer> EntityDescriptor for ResourceDescriptor<S> {
    fn entity_type(&self) -> &str {
        self.kind().singular()
    }

    fn plural(&self) -> &str {
        self.kind().plural()
    }

    fn build_routes(&self) -> Router {
        build_resource_routes::<S>(self.state.clone())
    }
}

fn register<S: Serializer>(registry: &mut EntityRegistry, state: &AppState) {
    registry.register(Box::new(ResourceDescriptor::<S>::new(state.clone())));
}

/// Register every record type of the API
pub fn register_resources(registry: &mut EntityRegistry, state: &AppState) {
    register::<PetTypeSerializer>(registry, state);
    register::<BreedSerializer>(registry, state);
    register::<PetSerializer>(registry, state);
    register::<OwnerSerializer>(registry, state);
    register::<VetClinicSerializer>(registry, state);
    register::<VetSerializer>(registry, state);
    register::<AllergySerializer>(registry, state);
    register::<WeighInSerializer>(registry, state);
    register::<SurgerySerializer>(registry, state);
    register::<ProcedureSerializer>(registry, state);
    register::<VetVisitSerializer>(registry, state);
    register::<VaccineSerializer>(registry, state);
    register::<IllnessSerializer>(registry, state);
    register::<TreatmentSerializer>(registry, state);
    register::<PetSalonSerializer>(registry, state);
    register::<PetGroomerSerializer>(registry, state);
    register::<GroomingAppointmentSerializer>(registry, state);
}
