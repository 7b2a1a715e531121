use axum::routing::get;
use axum::{Extension, Router};
use axum_prometheus::PrometheusMetricLayerBuilder;
use http::{Method, header};
use lingo_core::auth::AuthConfig;
use lingo_core::llm_config::LlmConfig;
use lingo_core::locks::UserLocks;
use lingo_core::progression::LevelPolicy;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;

use crate::routes;

/// Headroom on top of the model deadline for store I/O and serialization.
const REQUEST_DEADLINE_HEADROOM: Duration = Duration::from_secs(30);

#[derive(Debug)]
pub(crate) struct InnerAppConfig {
    llm_config: LlmConfig,
    auth: AuthConfig,
    policy: LevelPolicy,
    default_quiz_questions: u32,
}

#[derive(Clone, Debug)]
pub(crate) struct AppConfig(Arc<InnerAppConfig>);

impl AppConfig {
    pub fn new(llm_config: LlmConfig, auth: AuthConfig, policy: LevelPolicy, default_quiz_questions: u32) -> Self {
        Self(Arc::new(InnerAppConfig {
            llm_config,
            auth,
            policy,
            default_quiz_questions,
        }))
    }

    pub fn llm_config(&self) -> &LlmConfig {
        &self.0.llm_config
    }

    pub fn auth(&self) -> &AuthConfig {
        &self.0.auth
    }

    pub fn policy(&self) -> &LevelPolicy {
        &self.0.policy
    }

    pub fn default_quiz_questions(&self) -> u32 {
        self.0.default_quiz_questions
    }
}

pub(crate) fn create_app(
    app_config: AppConfig,
    origins: Vec<String>,
    pool: DatabaseConnection,
) -> anyhow::Result<Router> {
    let (prometheus_layer, metric_handle) = PrometheusMetricLayerBuilder::new()
        .with_prefix("api")
        .with_default_metrics()
        .build_pair();

    let cors = CorsLayer::new()
        .allow_origin(
            origins
                .iter()
                .map(|origin| origin.parse())
                .collect::<Result<Vec<_>, _>>()?,
        )
        .allow_headers([header::ACCEPT, header::CONTENT_TYPE, header::AUTHORIZATION, header::ORIGIN])
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .max_age(Duration::from_secs(3600));

    let deadline = app_config.llm_config().timeout() + REQUEST_DEADLINE_HEADROOM;

    let app = Router::new()
        .merge(routes::swagger::create_router())
        .nest(
            "/api",
            Router::new()
                .nest("/auth", routes::auth::create_router())
                .merge(routes::quiz::create_router())
                .merge(routes::performance::create_router())
                .merge(routes::chat::create_router())
                .merge(routes::status::create_router())
                .layer(cors),
        )
        .route("/metrics", get(|| async move { metric_handle.render() }))
        .layer(
            // Router layers run bottom to top, ServiceBuilder top to bottom.
            ServiceBuilder::new()
                .layer(prometheus_layer)
                .layer(TimeoutLayer::new(deadline))
                .layer(Extension(app_config))
                .layer(Extension(pool))
                .layer(Extension(UserLocks::new())),
        )
        .with_state(());
    Ok(app)
}
