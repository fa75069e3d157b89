//! Spend item management.
//!
//! This module contains everything related to the spends users record:
//! - The `Item` model and the database functions for storing, querying and summing items
//! - View handlers for listing, adding, editing and deleting items
//! - The monthly spend calculator

mod calculate_spends_page;
mod core;
mod create_endpoint;
mod create_page;
mod delete_endpoint;
mod edit_endpoint;
mod edit_page;
mod form;
mod list_page;

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::AppState;

pub use calculate_spends_page::{get_calculate_spends_page, post_calculate_spends};
pub use core::{
    Item, ItemId, ItemUpdate, NewItem, add_item, count_items, create_item_table, delete_item,
    get_item, list_items_by_user, parse_item_id, parse_year_month, sum_by_month, update_item,
};
pub use create_endpoint::post_add_spend;
pub use create_page::get_add_spend_page;
pub use delete_endpoint::delete_item_endpoint;
pub use edit_endpoint::patch_item_endpoint;
pub use edit_page::get_edit_item_page;
pub use list_page::get_show_all_page;

/// The message flashed when items could not be read from the database.
pub const FETCH_ERROR_MSG: &str = "Error fetching data.";

/// The state needed by the item pages and endpoints.
#[derive(Debug, Clone)]
pub struct ItemState {
    /// The database connection for managing items.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ItemState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}
