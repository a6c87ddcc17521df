pub mod analyzer;
pub mod config;
pub mod input;
pub mod repl;
pub mod session;

// Re-export commonly used types
pub use analyzer::{AnalysisReport, AnalysisRequest, AnalysisType, AnalyzerError, Language};
pub use config::Config;
pub use session::Session;
