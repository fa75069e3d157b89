//! Deletes a recorded spend.

use axum::extract::{Path, State};

use crate::{
    Error, endpoints,
    item::{ItemState, delete_item, parse_item_id},
    session::FlashRedirect,
};

pub const DELETE_ERROR_MSG: &str = "Error deleting item from database.";
pub const DELETE_SUCCESS_MSG: &str = "Item deleted successfully.";

/// Delete the item `item_id` and send the client back to the list of spends.
///
/// An ID that is not a number deletes nothing.
pub async fn delete_item_endpoint(
    State(state): State<ItemState>,
    Path(raw_item_id): Path<String>,
) -> FlashRedirect {
    let Some(item_id) = parse_item_id(&raw_item_id) else {
        tracing::debug!("Deleted item {raw_item_id:?}, 0 rows affected.");
        return FlashRedirect::hx(endpoints::SHOW_ALL).success(DELETE_SUCCESS_MSG);
    };

    let result = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)
        .and_then(|connection| delete_item(item_id, &connection));

    match result {
        Ok(rows_affected) => {
            tracing::debug!("Deleted item {item_id}, {rows_affected} rows affected.");
            FlashRedirect::hx(endpoints::SHOW_ALL).success(DELETE_SUCCESS_MSG)
        }
        Err(error) => {
            tracing::error!("Could not delete item {item_id}: {error}");
            FlashRedirect::hx(endpoints::INTERNAL_ERROR_VIEW).error(DELETE_ERROR_MSG)
        }
    }
}
