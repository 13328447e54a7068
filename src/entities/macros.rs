//! Macros for reducing boilerplate when defining entities
//!
//! Every record type shares the same shape: an integer primary key, a set
//! of foreign keys with delete policies, scalar fields and an optional
//! uniqueness constraint. [`impl_record!`] generates the struct and its
//! [`Entity`](crate::core::entity::Entity) implementation from that
//! description.

/// Declare a record type and implement `Entity` for it
///
/// The struct name must match an [`EntityKind`](crate::core::entity::EntityKind)
/// variant, and the table name must match a field of
/// [`Tables`](crate::storage::Tables).
///
/// - `belongs_to` fields are required references deleted with their target
/// - `references` fields are optional and carry their own delete policy
/// - `unique` lists the constraint components; `iexact` ones are compared
///   case-insensitively
///
/// # Example
///
/// ```rust,ignore
/// impl_record!(
///     Surgery, surgeries,
///     fields: {
///         date: NaiveDate,
///         name: String,
///         description: String,
///     },
///     belongs_to: { pet: Pet },
///     references: { vet: Vet => SetNull },
///     unique: { iexact: [name], exact: [pet, date] }
///         => "A surgery with this name, pet and date already exists.",
/// );
/// ```
#[macro_export]
macro_rules! impl_record {
    (
        $type:ident, $table:ident,
        fields: {
            $( $(#[$meta:meta])* $field:ident : $field_ty:ty ),* $(,)?
        },
        belongs_to: { $( $parent:ident : $parent_kind:ident ),* $(,)? },
        references: { $( $reference:ident : $ref_kind:ident => $policy:ident ),* $(,)? }
        $(, unique: {
            iexact: [ $( $ci:ident ),* $(,)? ],
            exact: [ $( $ex:ident ),* $(,)? ] $(,)?
        } => $message:expr )?
        $(,)?
    ) => {
        #[derive(Debug, Clone, PartialEq, ::serde::Serialize, ::serde::Deserialize)]
        pub struct $type {
            pub id: $crate::core::entity::EntityId,
            $( pub $parent: $crate::core::entity::EntityId, )*
            $( pub $reference: Option<$crate::core::entity::EntityId>, )*
            $( $(#[$meta])* pub $field: $field_ty, )*
        }

        impl $crate::core::entity::Entity for $type {
            const KIND: $crate::core::entity::EntityKind = $crate::core::entity::EntityKind::$type;

            fn id(&self) -> $crate::core::entity::EntityId {
                self.id
            }

            fn set_id(&mut self, id: $crate::core::entity::EntityId) {
                self.id = id;
            }

            fn relations() -> &'static [$crate::core::entity::Relation] {
                #[allow(unused_imports)]
                use $crate::core::entity::{EntityKind, OnDelete, Relation};
                const RELATIONS: &[Relation] = &[
                    $(
                        Relation {
                            field: stringify!($parent),
                            target: EntityKind::$parent_kind,
                            on_delete: OnDelete::Cascade,
                            required: true,
                        },
                    )*
                    $(
                        Relation {
                            field: stringify!($reference),
                            target: EntityKind::$ref_kind,
                            on_delete: OnDelete::$policy,
                            required: false,
                        },
                    )*
                ];
                RELATIONS
            }

            fn foreign_key(&self, field: &str) -> Option<$crate::core::entity::EntityId> {
                let _ = field;
                $(
                    if field == stringify!($parent) {
                        return Some(self.$parent);
                    }
                )*
                $(
                    if field == stringify!($reference) {
                        return self.$reference;
                    }
                )*
                None
            }

            fn clear_foreign_key(&mut self, field: &str) {
                let _ = field;
                $(
                    if field == stringify!($reference) {
                        self.$reference = None;
                    }
                )*
            }

            fn unique_key(&self) -> Option<$crate::core::entity::UniqueKey> {
                #[allow(unused_imports)]
                use $crate::core::entity::KeyPart;
                let key: $crate::core::entity::UniqueKey = vec![
                    $(
                        $( self.$ci.key_part().map(|part| part.to_lowercase()), )*
                        $( self.$ex.key_part(), )*
                    )?
                ];
                if key.is_empty() { None } else { Some(key) }
            }

            fn duplicate_message() -> &'static str {
                let message: Option<&'static str> = None $( .or(Some($message)) )?;
                message.unwrap_or("A record with these values already exists.")
            }

            fn table(tables: &$crate::storage::Tables) -> &$crate::storage::Table<Self> {
                &tables.$table
            }

            fn table_mut(tables: &mut $crate::storage::Tables) -> &mut $crate::storage::Table<Self> {
                &mut tables.$table
            }
        }
    };
}

/// Implement `Named` for a record type with a `name` field
#[macro_export]
macro_rules! impl_named {
    ($( $type:ident ),* $(,)?) => {
        $(
            impl $crate::core::entity::Named for $type {
                fn name(&self) -> &str {
                    &self.name
                }
            }
        )*
    };
}
