//! Application router configuration.

use axum::{
    Router,
    response::{IntoResponse, Response},
    routing::get,
};

use crate::{
    AppState, Error, endpoints,
    expense::{
        create_expense_endpoint, delete_expense_endpoint, delete_report_endpoint,
        get_expense_endpoint, get_expenses_by_user_endpoint, get_expenses_endpoint,
        get_report_endpoint,
    },
    health::get_health,
    stores::{ExpenseStore, UserStore},
    user::{
        create_user_endpoint, delete_user_endpoint, get_user_endpoint, get_users_endpoint,
        update_user_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router<U, E>(state: AppState<U, E>) -> Router
where
    U: UserStore + Clone + Send + Sync + 'static,
    E: ExpenseStore + Clone + Send + Sync + 'static,
{
    Router::new()
        .route(
            endpoints::USERS,
            get(get_users_endpoint::<U>).post(create_user_endpoint::<U>),
        )
        .route(
            endpoints::USER,
            get(get_user_endpoint::<U>)
                .put(update_user_endpoint::<U>)
                .delete(delete_user_endpoint::<U>),
        )
        .route(
            endpoints::EXPENSES,
            get(get_expenses_endpoint::<E>).post(create_expense_endpoint::<E>),
        )
        .route(
            endpoints::EXPENSE,
            get(get_expense_endpoint::<E>).delete(delete_expense_endpoint::<E>),
        )
        .route(
            endpoints::USER_EXPENSES,
            get(get_expenses_by_user_endpoint::<E>),
        )
        .route(
            endpoints::USER_REPORT,
            get(get_report_endpoint::<U, E>).delete(delete_report_endpoint::<U, E>),
        )
        .route(endpoints::HEALTH, get(get_health))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// Respond to requests for unknown routes with a JSON error.
async fn get_404_not_found() -> Response {
    Error::NotFound.into_response()
}
