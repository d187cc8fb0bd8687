//! Endpoints for listing users and getting a single user.

use axum::extract::State;

use crate::{
    Error,
    app_state::UserState,
    extract::{Json, Path},
    stores::UserStore,
    user::{UserDetails, UserId, UserSummary},
};

/// List all users.
pub async fn get_users_endpoint<U>(
    State(state): State<UserState<U>>,
) -> Result<Json<Vec<UserSummary>>, Error>
where
    U: UserStore,
{
    let users = state.user_store.get_all()?;

    Ok(Json(users.iter().map(UserSummary::from).collect()))
}

/// Get the details of the user `user_id`.
pub async fn get_user_endpoint<U>(
    State(state): State<UserState<U>>,
    Path(user_id): Path<UserId>,
) -> Result<Json<UserDetails>, Error>
where
    U: UserStore,
{
    let user = state.user_store.get(user_id)?;

    Ok(Json(UserDetails::from(&user)))
}
