//! Applies the changes submitted from the edit spend form.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;

use crate::{
    Error, endpoints,
    item::{
        ItemState, ItemUpdate,
        edit_page::edit_item_form,
        form::{ItemForm, ItemFormDefaults},
        parse_item_id, update_item,
    },
    session::FlashRedirect,
};

pub const UPDATE_ERROR_MSG: &str = "Error updating item in the database.";
pub const UPDATE_SUCCESS_MSG: &str = "Item updated successfully.";
pub const NAME_REQUIRED_MSG: &str = "Item name is required";

/// Replace the contents of the item `item_id`.
///
/// An empty name is answered with `400 Bad Request` and the form re-rendered
/// with an error message, leaving the item as it was. An ID that is not a
/// number is treated like a missing item.
pub async fn patch_item_endpoint(
    State(state): State<ItemState>,
    Path(raw_item_id): Path<String>,
    Form(form): Form<ItemForm>,
) -> Response {
    let Some(item_id) = parse_item_id(&raw_item_id) else {
        tracing::warn!("Update of item {raw_item_id:?} matched no rows.");
        return FlashRedirect::hx(endpoints::SHOW_ALL)
            .success(UPDATE_SUCCESS_MSG)
            .into_response();
    };

    let update = ItemUpdate::from(form.clone());

    let result = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)
        .and_then(|connection| update_item(item_id, &update, &connection));

    match result {
        Ok(rows_affected) => {
            if rows_affected == 0 {
                tracing::warn!("Update of item {item_id} matched no rows.");
            }

            FlashRedirect::hx(endpoints::SHOW_ALL)
                .success(UPDATE_SUCCESS_MSG)
                .into_response()
        }
        Err(Error::EmptyField(_)) => {
            let defaults = ItemFormDefaults {
                name_error: Some(NAME_REQUIRED_MSG),
                ..ItemFormDefaults::from(&form)
            };

            (StatusCode::BAD_REQUEST, edit_item_form(item_id, &defaults)).into_response()
        }
        Err(error) => {
            tracing::error!("Could not update item {item_id}: {error}");
            FlashRedirect::hx(endpoints::INTERNAL_ERROR_VIEW)
                .error(UPDATE_ERROR_MSG)
                .into_response()
        }
    }
}
