//! Vet clinics and the vets working at them

use crate::core::field::Gender;
use crate::{impl_named, impl_record};

impl_record!(
    VetClinic, vet_clinics,
    fields: {
        name: String,
        address: String,
        email: String,
        phone: String,
    },
    belongs_to: {},
    references: {},
    unique: { iexact: [name, address], exact: [] }
        => "A vet clinic with the same name and address already exists.",
);

impl_record!(
    Vet, vets,
    fields: {
        name: String,
        gender: Gender,
        email: String,
        phone: String,
    },
    belongs_to: {},
    references: { vet_clinic: VetClinic => SetNull },
    unique: { iexact: [name], exact: [vet_clinic] }
        => "A vet with the same name and vet clinic already exists.",
);

impl_named!(VetClinic, Vet);
