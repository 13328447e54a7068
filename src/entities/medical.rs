//! Medical history records attached to a pet

use crate::core::field::Weight;
use crate::{impl_named, impl_record};
use chrono::NaiveDate;

impl_record!(
    Allergy, allergies,
    fields: {
        allergen: String,
        reaction: String,
        date_of_diagnosis: NaiveDate,
    },
    belongs_to: { pet: Pet },
    references: { vet: Vet => SetNull },
    unique: { iexact: [allergen], exact: [pet, date_of_diagnosis] }
        => "An allergy with this allergen and diagnosis date already exists for this pet.",
);

impl_record!(
    WeighIn, weigh_ins,
    fields: {
        date: NaiveDate,
        weight: Weight,
    },
    belongs_to: { pet: Pet },
    references: {},
    unique: { iexact: [], exact: [pet, date, weight] }
        => "A weigh-in with this date and weight already exists for this pet.",
);

impl_record!(
    Surgery, surgeries,
    fields: {
        date: NaiveDate,
        name: String,
        description: String,
    },
    belongs_to: { pet: Pet },
    references: { vet: Vet => SetNull },
    unique: { iexact: [name], exact: [pet, date] }
        => "A surgery with this name and date already exists for this pet.",
);

impl_record!(
    Procedure, procedures,
    fields: {
        date: NaiveDate,
        name: String,
        description: String,
    },
    belongs_to: { pet: Pet },
    references: { vet: Vet => SetNull },
    unique: { iexact: [name], exact: [pet, date] }
        => "A procedure with this name and date already exists for this pet.",
);

impl_record!(
    VetVisit, vet_visits,
    fields: {
        date: NaiveDate,
        reason: String,
        outcome: String,
    },
    belongs_to: { pet: Pet },
    references: { vet: Vet => SetNull },
    unique: { iexact: [], exact: [pet, date, vet] }
        => "A vet visit for this pet, date and vet already exists.",
);

impl_record!(
    Vaccine, vaccines,
    fields: {
        name: String,
        lab_name: String,
        lot: i64,
        expiration_date: NaiveDate,
        application_date: NaiveDate,
        next_due_date: Option<NaiveDate>,
    },
    belongs_to: { pet: Pet },
    references: { vet: Vet => SetNull },
    unique: { iexact: [], exact: [lot] } => "A vaccine with this lot number already exists.",
);

impl_record!(
    Illness, illnesses,
    fields: {
        name: String,
        description: String,
        date_of_diagnosis: NaiveDate,
        recovery_date: Option<NaiveDate>,
    },
    belongs_to: { pet: Pet },
    references: { vet: Vet => SetNull },
    unique: { iexact: [name], exact: [pet, date_of_diagnosis] }
        => "An illness with this name and diagnosis date already exists for this pet.",
);

impl_record!(
    Treatment, treatments,
    fields: {
        name: String,
        description: String,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
    },
    belongs_to: {},
    references: {
        illness: Illness => SetNull,
        vet: Vet => SetNull,
    },
    unique: { iexact: [name], exact: [illness, start_date] }
        => "A treatment with this name and start date already exists for this illness.",
);

impl_named!(Illness);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::{Entity, EntityKind};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    #[test]
    fn test_vaccine_key_is_lot_only() {
        let vaccine = Vaccine {
            id: 1,
            pet: 1,
            vet: None,
            name: "Rabies".into(),
            lab_name: "Acme".into(),
            lot: 123,
            expiration_date: day(30),
            application_date: day(1),
            next_due_date: None,
        };
        assert_eq!(vaccine.unique_key(), Some(vec![Some("123".into())]));
    }

    #[test]
    fn test_weigh_in_key_uses_rendered_weight() {
        let weigh_in = WeighIn {
            id: 1,
            pet: 2,
            date: day(3),
            weight: Weight::parse("4.5").unwrap(),
        };
        assert_eq!(
            weigh_in.unique_key(),
            Some(vec![
                Some("2".into()),
                Some("2024-05-03".into()),
                Some("4.50".into())
            ])
        );
    }

    #[test]
    fn test_treatment_relations() {
        let kinds: Vec<_> = Treatment::relations().iter().map(|r| r.target).collect();
        assert_eq!(kinds, vec![EntityKind::Illness, EntityKind::Vet]);
        assert_eq!(Treatment::KIND.plural(), "treatments");
    }
}
