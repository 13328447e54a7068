//! Route builder for record resources

use crate::core::entity::{Entity, EntityKind};
use crate::core::validation::extractor::PET_PATH_PARAM;
use crate::resources::handlers::{
    AppState, create, create_nested, destroy, destroy_nested, list, list_nested, retrieve,
    retrieve_nested, update, update_nested,
};
use crate::serializers::Serializer;
use axum::{Router, routing::get};

/// Path of a record's collection (e.g., "/vaccines")
pub fn collection_path(kind: EntityKind) -> String {
    format!("/{}", kind.plural())
}

/// Path of a single record (e.g., "/vaccines/{id}")
///
/// Pets use `{pet_id}` so their item route shares its segment with the
/// nested `/pets/{pet_id}/...` routes.
pub fn item_path(kind: EntityKind) -> String {
    let param = if kind == EntityKind::Pet {
        PET_PATH_PARAM
    } else {
        "id"
    };
    format!("/{}/{{{}}}", kind.plural(), param)
}

/// Build the CRUD routes of one record type
///
/// - GET/POST `/{plural}` and `/{plural}/`
/// - GET/PUT/PATCH/DELETE `/{plural}/{id}` and `/{plural}/{id}/`
/// - the same under `/pets/{pet_id}/` for pet-scoped record types
pub fn build_resource_routes<S: Serializer>(state: AppState) -> Router {
    let kind = <S::Model as Entity>::KIND;
    let collection = collection_path(kind);
    let item = item_path(kind);

    let mut router = Router::new();
    for path in [collection.clone(), format!("{}/", collection)] {
        router = router.route(&path, get(list::<S>).post(create::<S>));
    }
    for path in [item.clone(), format!("{}/", item)] {
        router = router.route(
            &path,
            get(retrieve::<S>)
                .put(update::<S>)
                .patch(update::<S>)
                .delete(destroy::<S>),
        );
    }

    if kind.is_pet_scoped() {
        let nested = format!("/pets/{{{}}}/{}", PET_PATH_PARAM, kind.plural());
        let nested_item = format!("{}/{{id}}", nested);
        for path in [nested.clone(), format!("{}/", nested)] {
            router = router.route(&path, get(list_nested::<S>).post(create_nested::<S>));
        }
        for path in [nested_item.clone(), format!("{}/", nested_item)] {
            router = router.route(
                &path,
                get(retrieve_nested::<S>)
                    .put(update_nested::<S>)
                    .patch(update_nested::<S>)
                    .delete(destroy_nested::<S>),
            );
        }
    }

    router.with_state(state)
}
