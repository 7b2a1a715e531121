pub mod analytics;
pub mod auth;
pub mod chat;
pub mod llm_config;
pub mod locks;
pub mod openai;
pub mod progression;
pub mod quiz;
pub mod status;
