use anyhow::Result;
use axum::serve;
use clap::Parser;
use lingo_core::auth::{AuthConfig, SecurityConfig};
use lingo_core::llm_config::LlmConfig;
use lingo_core::progression::LevelPolicy;
use lingo_db::sea_orm::{ConnectOptions, Database};
use lingo_utils::net::create_listener;
use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use crate::opt::{Commands, Db, Run};

mod app;
mod opt;
mod routes;
#[cfg(test)]
mod tests;
mod user;

const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);
const DEFAULT_PORT: u16 = 8000;

const STORE_TIMEOUT: Duration = Duration::from_secs(10);

async fn run(opt: Run) -> Result<()> {
    lingo_utils::tracing::setup(
        lingo_utils::tracing::TracingConfig::builder()
            .package(env!("CARGO_PKG_NAME"))
            .version(env!("CARGO_PKG_VERSION"))
            .env(opt.env.clone())
            .build(),
    )?;

    let pool_options = build_connect_options(&opt.db, opt.store_uri.clone());
    let pool = Database::connect(pool_options).await?;
    lingo_db::migration::setup_schema(&pool)
        .await
        .inspect_err(|error| tracing::error!(error = error as &dyn std::error::Error, "failed to apply schema"))?;

    let llm_config: LlmConfig = opt.llm.into();
    let policy = LevelPolicy::from(&opt.learning);
    let auth_config = AuthConfig {
        security: SecurityConfig::new(opt.signing_secret),
        session_ttl_days: opt.learning.session_ttl_days,
    };

    let app_config = app::AppConfig::new(
        llm_config,
        auth_config,
        policy,
        opt.learning.default_quiz_questions,
    );

    let app = app::create_app(app_config, opt.origins, pool)?;

    let listener = create_listener((opt.host, opt.port), (DEFAULT_HOST, DEFAULT_PORT)).await?;
    tracing::info!(local_addr = %listener.local_addr()?, "starting app");
    serve::serve(listener, app.into_make_service()).await?;
    Ok(())
}

fn build_connect_options(db_options: &Db, store_uri: url::Url) -> ConnectOptions {
    let mut pool_options = ConnectOptions::new(store_uri);
    if let Some(min_connections) = db_options.db_min_connections {
        pool_options.min_connections(min_connections);
    }
    if let Some(max_connections) = db_options.db_max_connections {
        pool_options.max_connections(max_connections);
    }
    pool_options
        .connect_timeout(STORE_TIMEOUT)
        .acquire_timeout(STORE_TIMEOUT);
    pool_options
}

fn main() -> Result<()> {
    let main = async {
        let opt = opt::Cli::parse();

        match opt.command {
            Commands::Run(o) => run(o).await?,
        }
        Ok(())
    };

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(main)
}
