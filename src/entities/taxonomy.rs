//! Pet types and breeds

use crate::{impl_named, impl_record};

impl_record!(
    PetType, pet_types,
    fields: {
        name: String,
    },
    belongs_to: {},
    references: {},
    unique: { iexact: [name], exact: [] } => "A pet type with this name already exists.",
);

impl_record!(
    Breed, breeds,
    fields: {
        name: String,
    },
    belongs_to: {},
    references: { pet_type: PetType => Cascade },
    unique: { iexact: [name], exact: [pet_type] }
        => "A breed with this name and pet type already exists.",
);

impl_named!(PetType, Breed);
