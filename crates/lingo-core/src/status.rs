use sea_orm::prelude::Expr;
use sea_orm::sea_query::Query;
use sea_orm::{ConnectionTrait, DatabaseConnection};
use std::error::Error;
use std::time::Duration;
use tokio::time::timeout;
use tracing::instrument;

use crate::llm_config::LlmConfig;
use crate::openai;
use lingo_model::status::{Health, HealthState};

#[instrument(skip_all)]
async fn store_reachable(conn: &DatabaseConnection, duration: Option<Duration>) -> bool {
    let mut query = Query::select();
    query.expr(Expr::current_timestamp());
    timeout(
        duration.unwrap_or_else(|| Duration::from_secs(5)),
        conn.execute(conn.get_database_backend().build(&query)),
    )
    .await
    .inspect_err(|error| tracing::error!(error = error as &dyn Error, "db timeout during health check"))
    .map(|res| {
        res.inspect_err(|error| tracing::error!(error = error as &dyn Error, "db error during health check"))
            .is_ok()
    })
    .unwrap_or(false)
}

/// Composite liveness: the store and the inference endpoint are both
/// probed with short deadlines.
#[instrument(skip_all)]
pub async fn health(conn: &DatabaseConnection, llm_config: &LlmConfig) -> Health {
    let (store_ok, llm_result) = tokio::join!(store_reachable(conn, None), openai::ping(llm_config));
    let llm_ok = llm_result.is_ok();

    let (status, message) = match (store_ok, llm_ok) {
        (true, true) => (
            HealthState::Healthy,
            format!("store and model '{}' are available", llm_config.model()),
        ),
        (true, false) => (HealthState::Unhealthy, "language model is unreachable".to_owned()),
        (false, true) => (HealthState::Unhealthy, "store is unreachable".to_owned()),
        (false, false) => (
            HealthState::Unhealthy,
            "store and language model are unreachable".to_owned(),
        ),
    };
    Health { status, message }
}
