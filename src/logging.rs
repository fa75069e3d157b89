//! Middleware for logging requests and responses.

use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::{HeaderMap, StatusCode, header::CONTENT_TYPE},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Bodies longer than this many bytes are truncated at the `info` level.
const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Form fields whose values never appear in the logs.
const REDACTED_FIELDS: [&str; 1] = ["password"];

const REDACTED_VALUE: &str = "********";

/// Logged in place of a form body that could not be parsed.
const UNPARSEABLE_FORM: &str = "<unparseable form>";

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is
/// truncated and the full body is logged at the `debug` level.
/// Passwords in submitted forms are replaced with asterisks.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body = match read_body(body).await {
        Ok(body) => body,
        Err(error) => {
            tracing::error!("Could not read request body: {error}");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    let body_text = String::from_utf8_lossy(&body);
    let display_text = if is_form(&parts.headers) {
        redact_fields(&body_text, &REDACTED_FIELDS)
    } else {
        body_text.into_owned()
    };
    log_body(
        &format!("Received request: {} {}", parts.method, parts.uri),
        &display_text,
    );

    let response = next.run(Request::from_parts(parts, Body::from(body))).await;

    let (parts, body) = response.into_parts();
    let body = match read_body(body).await {
        Ok(body) => body,
        Err(error) => {
            tracing::error!("Could not read response body: {error}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    log_body(
        &format!("Sending response: {} {:?}", parts.status, parts.headers),
        &String::from_utf8_lossy(&body),
    );

    Response::from_parts(parts, Body::from(body))
}

async fn read_body(body: Body) -> Result<Bytes, axum::Error> {
    axum::body::to_bytes(body, usize::MAX).await
}

fn is_form(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|content_type| content_type.to_str().ok())
        .is_some_and(|content_type| content_type.starts_with("application/x-www-form-urlencoded"))
}

/// Replace the value of each of `fields` in the URL encoded `form_text`.
///
/// Keys are compared after decoding, so an encoded field name is still redacted.
fn redact_fields(form_text: &str, fields: &[&str]) -> String {
    let pairs: Vec<(String, String)> = match serde_urlencoded::from_str(form_text) {
        Ok(pairs) => pairs,
        Err(error) => {
            tracing::debug!("Could not parse form body for logging: {error}");
            return UNPARSEABLE_FORM.to_owned();
        }
    };

    let redacted: Vec<(String, String)> = pairs
        .into_iter()
        .map(|(key, value)| {
            if fields.contains(&key.as_str()) {
                (key, REDACTED_VALUE.to_owned())
            } else {
                (key, value)
            }
        })
        .collect();

    serde_urlencoded::to_string(&redacted).unwrap_or_else(|error| {
        tracing::debug!("Could not encode redacted form body: {error}");
        UNPARSEABLE_FORM.to_owned()
    })
}

fn log_body(message: &str, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        let mut end = LOG_BODY_LENGTH_LIMIT;
        while !body.is_char_boundary(end) {
            end -= 1;
        }

        tracing::info!("{message}\nbody: {}...", &body[..end]);
        tracing::debug!("Full body: {body:?}");
    } else {
        tracing::info!("{message}\nbody: {body:?}");
    }
}

#[cfg(test)]
mod tests {
    use axum::{Router, http::StatusCode, middleware, routing::post};
    use axum_test::TestServer;
    use serde::{Deserialize, Serialize};

    use super::{logging_middleware, redact_fields};

    #[test]
    fn redacts_password_only() {
        let got = redact_fields("userId=alice&password=hunter2&username=Alice", &["password"]);

        assert_eq!(got, "userId=alice&password=********&username=Alice");
    }

    #[test]
    fn leaves_field_with_password_prefix() {
        let got = redact_fields("passwordHint=cat&password=", &["password"]);

        assert_eq!(got, "passwordHint=cat&password=********");
    }

    #[test]
    fn redacts_percent_encoded_field_name() {
        let got = redact_fields("userId=alice&pass%77ord=secret", &["password"]);

        assert!(!got.contains("secret"), "got {got:?}");
        assert_eq!(got, "userId=alice&password=********");
    }

    #[test]
    fn redacts_every_repeated_field() {
        let got = redact_fields("password=one&password=two", &["password"]);

        assert_eq!(got, "password=********&password=********");
    }

    #[derive(Serialize, Deserialize)]
    struct EchoForm {
        password: String,
    }

    #[tokio::test]
    async fn request_body_reaches_handler() {
        let app = Router::new()
            .route(
                "/echo",
                post(|axum::Form(form): axum::Form<EchoForm>| async move { form.password }),
            )
            .layer(middleware::from_fn(logging_middleware));
        let server = TestServer::new(app);

        let response = server
            .post("/echo")
            .form(&EchoForm {
                password: "hunter2".to_owned(),
            })
            .await;

        response.assert_status(StatusCode::OK);
        response.assert_text("hunter2");
    }
}
