use sea_orm::{ConnectionTrait, DbErr};

/// Applies the embedded schema. Used by the server at startup and by the
/// integration tests against `sqlite::memory:`.
pub async fn setup_schema<C: ConnectionTrait>(conn: &C) -> Result<(), DbErr> {
    let schema = match conn.get_database_backend() {
        sea_orm::DatabaseBackend::Postgres => include_str!("schema/postgres.sql"),
        sea_orm::DatabaseBackend::Sqlite => include_str!("schema/sqlite.sql"),
        #[allow(clippy::unimplemented)]
        sea_orm::DatabaseBackend::MySql => unimplemented!(),
    };
    tracing::debug!("applying schema");
    conn.execute_unprepared(schema).await?;
    Ok(())
}
