pub mod learning;
pub mod llm;
