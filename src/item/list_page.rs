//! The page listing every spend the logged in user has recorded.

use axum::{
    Extension,
    extract::State,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    Error,
    auth::UserID,
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_DELETE_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, flash_messages, format_currency,
    },
    item::{FETCH_ERROR_MSG, Item, ItemState, list_items_by_user},
    navigation::NavBar,
    session::{Flash, FlashRedirect, Session},
};

/// Render the list of the user's spends.
///
/// Served on both `/showAll` and `/dashboard`.
pub async fn get_show_all_page(
    State(state): State<ItemState>,
    Extension(user_id): Extension<UserID>,
    Extension(session): Extension<Session>,
) -> Response {
    let items = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)
        .and_then(|connection| list_items_by_user(&user_id, &connection));

    match items {
        Ok(items) => show_all_view(&items, &session.flashes).into_response(),
        Err(error) => {
            tracing::error!("Could not list items for {user_id}: {error}");
            FlashRedirect::to(endpoints::INTERNAL_ERROR_VIEW)
                .error(FETCH_ERROR_MSG)
                .into_response()
        }
    }
}

fn item_row(item: &Item) -> Markup {
    let edit_url = format_endpoint(endpoints::EDIT_ITEM_VIEW, item.id);
    let delete_url = format_endpoint(endpoints::ITEM, item.id);
    let confirm_message = format!("Are you sure you want to delete '{}'?", item.name);

    html!(
        tr class=(TABLE_ROW_STYLE) data-item-id=(item.id)
        {
            td class=(TABLE_CELL_STYLE) { (item.name) }
            td class=(TABLE_CELL_STYLE) { (format_currency(item.price)) }
            td class=(TABLE_CELL_STYLE) { (item.payment_mode) }
            td class=(TABLE_CELL_STYLE) { (item.date) }
            td class=(TABLE_CELL_STYLE)
            {
                div class="flex gap-4"
                {
                    a href=(edit_url) class=(LINK_STYLE) { "Edit" }

                    button
                        hx-delete=(delete_url)
                        hx-confirm=(confirm_message)
                        class=(BUTTON_DELETE_STYLE)
                    {
                        "Delete"
                    }
                }
            }
        }
    )
}

fn show_all_view(items: &[Item], flashes: &[Flash]) -> Markup {
    let nav_bar = NavBar::new(endpoints::SHOW_ALL).into_html();
    let total: f64 = items.iter().map(|item| item.price).sum();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-5xl"
            {
                (flash_messages(flashes))

                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Your Spends" }

                    a href=(endpoints::ADD_SPEND) class=(LINK_STYLE) { "Add Spend" }
                }

                table class="w-full text-sm text-left rtl:text-right
                    text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Item" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Price" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Payment Mode" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                        }
                    }

                    tbody
                    {
                        @for item in items {
                            (item_row(item))
                        }

                        @if items.is_empty() {
                            tr
                            {
                                td
                                    colspan="5"
                                    class="px-6 py-4 text-center
                                        text-gray-500 dark:text-gray-400"
                                {
                                    "No spends recorded yet. "
                                    a href=(endpoints::ADD_SPEND) class=(LINK_STYLE)
                                    {
                                        "Add your first spend"
                                    }
                                }
                            }
                        }
                    }

                    @if !items.is_empty() {
                        tfoot
                        {
                            tr class="font-semibold text-gray-900 dark:text-white"
                            {
                                th scope="row" class=(TABLE_CELL_STYLE) { "Total" }
                                td id="total" class=(TABLE_CELL_STYLE) { (format_currency(total)) }
                                td colspan="3" {}
                            }
                        }
                    }
                }
            }
        }
    );

    base("Your Spends", &content)
}
