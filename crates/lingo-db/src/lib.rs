pub mod migration;
pub mod qa_entry;
pub mod quiz;
pub mod session;
pub mod user;
pub mod util;

pub use sea_orm;
