//! The monthly spend calculator.

use axum::{
    Extension, Form,
    extract::State,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde::Deserialize;
use time::Month;

use crate::{
    Error,
    auth::UserID,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
        flash_messages, format_currency,
    },
    item::{FETCH_ERROR_MSG, ItemState, parse_year_month, sum_by_month},
    navigation::NavBar,
    session::{Flash, FlashRedirect, Session},
};

pub const INVALID_YEAR_MONTH_MSG: &str = "Invalid year or month.";

/// The total for one month, shown below the form after it is submitted.
struct MonthlyTotal {
    year: i32,
    month: Month,
    total: f64,
}

pub async fn get_calculate_spends_page(Extension(session): Extension<Session>) -> Response {
    calculate_spends_view(&session.flashes, None).into_response()
}

#[derive(Debug, Deserialize)]
pub struct CalculateSpendsForm {
    pub year: String,
    pub month: String,
}

/// Sum the logged in user's spends for the submitted year and month.
pub async fn post_calculate_spends(
    State(state): State<ItemState>,
    Extension(user_id): Extension<UserID>,
    Extension(session): Extension<Session>,
    Form(form): Form<CalculateSpendsForm>,
) -> Response {
    let (year, month) = match parse_year_month(&form.year, &form.month) {
        Ok(year_month) => year_month,
        Err(error) => {
            tracing::debug!("Rejected monthly sum request: {error}");
            return FlashRedirect::to(endpoints::CALCULATE_SPENDS)
                .error(INVALID_YEAR_MONTH_MSG)
                .into_response();
        }
    };

    let total = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)
        .and_then(|connection| sum_by_month(&user_id, year, month, &connection));

    match total {
        Ok(total) => {
            let result = MonthlyTotal { year, month, total };
            calculate_spends_view(&session.flashes, Some(&result)).into_response()
        }
        Err(error) => {
            tracing::error!("Could not sum items for {user_id}: {error}");
            FlashRedirect::to(endpoints::INTERNAL_ERROR_VIEW)
                .error(FETCH_ERROR_MSG)
                .into_response()
        }
    }
}

fn calculate_spends_view(flashes: &[Flash], result: Option<&MonthlyTotal>) -> Markup {
    let nav_bar = NavBar::new(endpoints::CALCULATE_SPENDS).into_html();
    let year_value = result.map(|result| result.year.to_string());
    let month_value = result.map(|result| (result.month as u8).to_string());

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            (flash_messages(flashes))

            form
                method="post"
                action=(endpoints::CALCULATE_SPENDS)
                class="w-full space-y-4 md:space-y-6"
            {
                h1 class="text-xl font-bold" { "Calculate Spends" }

                div
                {
                    label for="year" class=(FORM_LABEL_STYLE) { "Year" }

                    input
                        type="number"
                        name="year"
                        id="year"
                        min="0"
                        max="9999"
                        placeholder="2024"
                        value=[year_value]
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="month" class=(FORM_LABEL_STYLE) { "Month" }

                    input
                        type="number"
                        name="month"
                        id="month"
                        min="1"
                        max="12"
                        placeholder="5"
                        value=[month_value]
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                button type="submit" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
                {
                    "Calculate"
                }
            }

            @if let Some(result) = result {
                p id="monthly-total" class="mt-6 text-lg"
                {
                    "Total spent in "
                    (format!("{:04}-{:02}", result.year, result.month as u8))
                    ": "
                    span class="font-bold" { (format_currency(result.total)) }
                }
            }
        }
    };

    base("Calculate Spends", &content)
}
