//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/users/{user_id}', use [format_endpoint].

/// The route to list and create users.
pub const USERS: &str = "/users";
/// The route to get, update and delete a single user.
pub const USER: &str = "/users/{user_id}";
/// The route to list and create expenses.
pub const EXPENSES: &str = "/expenses";
/// The route to get and delete a single expense.
pub const EXPENSE: &str = "/expenses/{expense_id}";
/// The route to list the expenses of a single user.
pub const USER_EXPENSES: &str = "/expenses/user/{user_id}";
/// The route to get and delete a user's monthly expense report.
pub const USER_REPORT: &str = "/expenses/user/{user_id}/report";
/// The route for checking whether the server can reach its database.
pub const HEALTH: &str = "/health";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/users/{user_id}', '{user_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: impl std::fmt::Display) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|end| param_start + end + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
