//! Endpoint for updating users.

use axum::extract::State;

use crate::{
    Error,
    app_state::UserState,
    extract::{Json, Path},
    stores::UserStore,
    user::{UserDetails, UserForm, UserId},
};

/// Replace the details of the user `user_id`.
///
/// Changing the quota does not affect expenses that were already accepted.
pub async fn update_user_endpoint<U>(
    State(state): State<UserState<U>>,
    Path(user_id): Path<UserId>,
    Json(form): Json<UserForm>,
) -> Result<Json<UserDetails>, Error>
where
    U: UserStore,
{
    let user = state.user_store.update(user_id, form)?;
    tracing::info!("Updated user {user_id}");

    Ok(Json(UserDetails::from(&user)))
}
