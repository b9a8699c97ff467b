pub mod gemini;
pub mod generator;
pub mod parser;
pub mod prompt;
pub mod types;
