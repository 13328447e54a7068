//! Salons, groomers and grooming appointments

use crate::core::field::Gender;
use crate::{impl_named, impl_record};
use chrono::{DateTime, Utc};

impl_record!(
    PetSalon, pet_salons,
    fields: {
        name: String,
        address: String,
        email: Option<String>,
        phone: String,
    },
    belongs_to: {},
    references: {},
    unique: { iexact: [name, address], exact: [] }
        => "A pet salon with the same name and address already exists.",
);

impl_record!(
    PetGroomer, pet_groomers,
    fields: {
        name: String,
        gender: Gender,
        email: Option<String>,
        phone: Option<String>,
    },
    belongs_to: {},
    references: { pet_salon: PetSalon => SetNull },
    unique: { iexact: [name], exact: [pet_salon] }
        => "A pet groomer with the same name and pet salon already exists.",
);

impl_record!(
    GroomingAppointment, grooming_appointments,
    fields: {
        grooming_type: String,
        notes: Option<String>,
        date: DateTime<Utc>,
    },
    belongs_to: { pet: Pet },
    references: {
        pet_groomer: PetGroomer => SetNull,
        pet_salon: PetSalon => SetNull,
    },
    unique: { iexact: [], exact: [pet, date, pet_groomer] }
        => "A grooming appointment for this pet, date and groomer already exists.",
);

impl_named!(PetSalon, PetGroomer);
