//! Endpoint for creating users.

use axum::{
    extract::State,
    http::{StatusCode, header::LOCATION},
    response::IntoResponse,
};

use crate::{
    Error,
    app_state::UserState,
    endpoints::{self, format_endpoint},
    extract::Json,
    stores::UserStore,
    user::{UserDetails, UserForm},
};

/// Create a user and respond with its details and location.
pub async fn create_user_endpoint<U>(
    State(state): State<UserState<U>>,
    Json(form): Json<UserForm>,
) -> Result<impl IntoResponse, Error>
where
    U: UserStore,
{
    let user = state.user_store.create(form)?;
    tracing::info!("Created user {}", user.id);

    let location = format_endpoint(endpoints::USER, user.id);

    Ok((
        StatusCode::CREATED,
        [(LOCATION, location)],
        Json(UserDetails::from(&user)),
    ))
}
