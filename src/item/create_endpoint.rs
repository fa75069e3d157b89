//! Records a new spend submitted from the add spend form.

use axum::{Extension, extract::State};
use axum_extra::extract::{Form, FormRejection};

use crate::{
    Error,
    auth::UserID,
    endpoints,
    item::{ItemState, NewItem, add_item, form::ItemForm},
    session::FlashRedirect,
};

pub const ADD_ERROR_MSG: &str = "Could not add the spend. Please try again.";

/// Store a spend for the logged in user and show the updated list.
///
/// A form that cannot be parsed, e.g. a non-numeric price, sends the client
/// back to the form with an error message instead of a bare 4xx response.
pub async fn post_add_spend(
    State(state): State<ItemState>,
    Extension(user_id): Extension<UserID>,
    form: Result<Form<ItemForm>, FormRejection>,
) -> FlashRedirect {
    let Form(form) = match form {
        Ok(form) => form,
        Err(rejection) => {
            tracing::debug!("Rejected add spend form: {rejection}");
            return FlashRedirect::to(endpoints::ADD_SPEND).error(ADD_ERROR_MSG);
        }
    };

    let new_item = NewItem {
        user_id,
        name: form.name,
        price: form.price,
        payment_mode: form.payment_mode,
        date: form.date,
    };

    let result = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)
        .and_then(|connection| add_item(&new_item, &connection));

    match result {
        Ok(item) => {
            tracing::debug!("User {} added item {}.", item.user_id, item.id);
            FlashRedirect::to(endpoints::SHOW_ALL)
        }
        Err(error) => {
            tracing::error!("Could not add item for {}: {error}", new_item.user_id);
            FlashRedirect::to(endpoints::ADD_SPEND).error(ADD_ERROR_MSG)
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        Extension, Router,
        extract::{Request, State},
        middleware::{self, Next},
        response::{IntoResponse, Response},
        routing::post,
    };
    use axum_extra::extract::Form;
    use axum_test::TestServer;
    use time::macros::date;

    use crate::{
        auth::UserID,
        endpoints,
        item::{ItemState, form::ItemForm, list_items_by_user, post_add_spend},
        test_utils::{assert_redirect, get_session_update, get_test_app_state},
    };

    fn get_state() -> ItemState {
        ItemState {
            db_connection: get_test_app_state().db_connection,
        }
    }

    #[tokio::test]
    async fn add_spend_stores_item_and_redirects() {
        let state = get_state();
        let form = ItemForm {
            name: "Coffee".to_owned(),
            price: 4.5,
            payment_mode: "Cash".to_owned(),
            date: date!(2024 - 05 - 02),
        };

        let response = post_add_spend(
            State(state.clone()),
            Extension(UserID::new("alice")),
            Ok(Form(form)),
        )
        .await
        .into_response();

        assert_redirect(&response, endpoints::SHOW_ALL);
        assert!(get_session_update(&response).is_none());
        let items =
            list_items_by_user(&UserID::new("alice"), &state.db_connection.lock().unwrap())
                .unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Coffee");
        assert_eq!(items[0].price, 4.5);
        assert_eq!(items[0].payment_mode, "Cash");
        assert_eq!(items[0].date, date!(2024 - 05 - 02));
    }

    async fn stub_auth(mut request: Request, next: Next) -> Response {
        request.extensions_mut().insert(UserID::new("alice"));
        next.run(request).await
    }

    #[tokio::test]
    async fn add_spend_parses_form_fields() {
        let state = get_state();
        let app = Router::new()
            .route(endpoints::ADD_SPEND, post(post_add_spend))
            .layer(middleware::from_fn(stub_auth))
            .with_state(state.clone());
        let server = TestServer::new(app);

        let response = server
            .post(endpoints::ADD_SPEND)
            .form(&[
                ("nameOfItem", "Bus fare"),
                ("price", "3.20"),
                ("paymentMode", "Card"),
                ("date", "2024-05-03"),
            ])
            .await;

        response.assert_status_see_other();
        assert_eq!(response.header("location"), endpoints::SHOW_ALL);
        let items =
            list_items_by_user(&UserID::new("alice"), &state.db_connection.lock().unwrap())
                .unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Bus fare");
        assert_eq!(items[0].price, 3.2);
        assert_eq!(items[0].date, date!(2024 - 05 - 03));
    }

    #[tokio::test]
    async fn add_spend_with_invalid_price_redirects_to_form() {
        let state = get_state();
        let app = Router::new()
            .route(endpoints::ADD_SPEND, post(post_add_spend))
            .layer(middleware::from_fn(stub_auth))
            .with_state(state.clone());
        let server = TestServer::new(app);

        let response = server
            .post(endpoints::ADD_SPEND)
            .form(&[
                ("nameOfItem", "Bus fare"),
                ("price", "three dollars"),
                ("paymentMode", "Card"),
                ("date", "2024-05-03"),
            ])
            .await;

        response.assert_status_see_other();
        assert_eq!(response.header("location"), endpoints::ADD_SPEND);
        let items =
            list_items_by_user(&UserID::new("alice"), &state.db_connection.lock().unwrap())
                .unwrap();
        assert!(items.is_empty());
    }
}
