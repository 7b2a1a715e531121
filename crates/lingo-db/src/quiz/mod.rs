pub mod mutation;
pub mod query;

pub use mutation::{Mutation, NewQuiz, UserStatsUpdate};
pub use query::Query;
