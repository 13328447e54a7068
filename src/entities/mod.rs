//! Record types stored by the API
//!
//! Each record is declared with [`impl_record!`](crate::impl_record), which
//! also wires its foreign keys, delete policies and uniqueness constraint.

pub mod macros;

pub mod clinics;
pub mod grooming;
pub mod medical;
pub mod pets;
pub mod taxonomy;

pub use clinics::{Vet, VetClinic};
pub use grooming::{GroomingAppointment, PetGroomer, PetSalon};
pub use medical::{
    Allergy, Illness, Procedure, Surgery, Treatment, Vaccine, VetVisit, WeighIn,
};
pub use pets::{Owner, Pet};
pub use taxonomy::{Breed, PetType};
