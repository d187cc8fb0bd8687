//! The health check endpoint.

use axum::{extract::State, http::StatusCode};

use crate::{Error, app_state::HealthState, stores::sqlite::lock};

/// Check that the database answers a trivial query.
pub async fn get_health(State(state): State<HealthState>) -> (StatusCode, &'static str) {
    match ping_database(&state) {
        Ok(()) => (StatusCode::OK, "Healthy"),
        Err(error) => {
            tracing::error!("Health check failed: {error}");
            (StatusCode::SERVICE_UNAVAILABLE, "Unhealthy")
        }
    }
}

fn ping_database(state: &HealthState) -> Result<(), Error> {
    let connection = lock(&state.db_connection)?;
    connection.query_row("SELECT 1", [], |_| Ok(()))?;

    Ok(())
}
