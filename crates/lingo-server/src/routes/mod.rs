pub(crate) mod auth;
pub(crate) mod chat;
pub(crate) mod error;
pub(crate) mod performance;
pub(crate) mod quiz;
pub(crate) mod status;
pub(crate) mod swagger;
