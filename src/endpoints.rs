//! The endpoint URIs.
//!
//! For endpoints that take a parameter, e.g., '/item/{item_id}', use [format_endpoint].

/// The root route which redirects to the home page or shows the sign-up page.
pub const ROOT: &str = "/";
/// The route for registering a new user.
pub const SIGN_UP: &str = "/signup";
/// The route for logging in.
pub const LOG_IN: &str = "/login";
/// The landing page for logged in users.
pub const HOME: &str = "/home";
/// The page listing all of the user's spends.
pub const SHOW_ALL: &str = "/showAll";
/// An alias of [SHOW_ALL].
pub const DASHBOARD: &str = "/dashboard";
/// The page for summing spends by month.
pub const CALCULATE_SPENDS: &str = "/calculateSpends";
/// The page for recording a new spend.
pub const ADD_SPEND: &str = "/addSpend";
/// The page for editing a spend.
pub const EDIT_ITEM_VIEW: &str = "/item/{item_id}/edit";
/// The route to update or delete a single spend.
pub const ITEM: &str = "/item/{item_id}";
/// The route for logging out the current user.
pub const LOG_OUT: &str = "/logout";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/item/{item_id}', '{item_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
