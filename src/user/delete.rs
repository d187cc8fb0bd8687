//! Endpoint for deleting users.

use axum::{extract::State, http::StatusCode};

use crate::{
    Error,
    app_state::UserState,
    extract::Path,
    stores::UserStore,
    user::UserId,
};

/// Delete the user `user_id`.
///
/// Users that still have expenses cannot be deleted. Deactivate them instead.
pub async fn delete_user_endpoint<U>(
    State(state): State<UserState<U>>,
    Path(user_id): Path<UserId>,
) -> Result<StatusCode, Error>
where
    U: UserStore,
{
    state.user_store.delete(user_id)?;
    tracing::info!("Deleted user {user_id}");

    Ok(StatusCode::NO_CONTENT)
}
