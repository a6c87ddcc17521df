use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Response-length bounds exposed to the user (the advanced settings
/// sliders in older builds used the same range).
pub const MIN_MAX_TOKENS: u32 = 100;
pub const MAX_MAX_TOKENS: u32 = 2048;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[value(rename_all = "lower")]
pub enum Language {
    Python,
    Cpp,
    Java,
    JavaScript,
    TypeScript,
    Go,
    Rust,
}

impl Language {
    /// Human-readable name, as interpolated into prompts.
    pub fn name(&self) -> &'static str {
        match self {
            Language::Python => "Python",
            Language::Cpp => "C++",
            Language::Java => "Java",
            Language::JavaScript => "JavaScript",
            Language::TypeScript => "TypeScript",
            Language::Go => "Go",
            Language::Rust => "Rust",
        }
    }

    /// Maps a file extension to a language. `.txt` is accepted as an
    /// upload format but carries no language, so it returns `None`.
    pub fn from_extension(ext: &str) -> Option<Language> {
        match ext {
            "py" => Some(Language::Python),
            "cpp" => Some(Language::Cpp),
            "java" => Some(Language::Java),
            "js" => Some(Language::JavaScript),
            "ts" => Some(Language::TypeScript),
            "go" => Some(Language::Go),
            "rs" => Some(Language::Rust),
            _ => None,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "python" | "py" => Ok(Language::Python),
            "c++" | "cpp" => Ok(Language::Cpp),
            "java" => Ok(Language::Java),
            "javascript" | "js" => Ok(Language::JavaScript),
            "typescript" | "ts" => Ok(Language::TypeScript),
            "go" => Ok(Language::Go),
            "rust" | "rs" => Ok(Language::Rust),
            other => Err(format!(
                "unknown language '{}' (expected one of: python, c++, java, javascript, typescript, go, rust)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[value(rename_all = "lower")]
pub enum AnalysisType {
    Full,
    Security,
    Performance,
}

impl AnalysisType {
    pub fn label(&self) -> &'static str {
        match self {
            AnalysisType::Full => "Full Analysis",
            AnalysisType::Security => "Security Analysis",
            AnalysisType::Performance => "Performance Analysis",
        }
    }
}

impl fmt::Display for AnalysisType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AnalysisType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "full" => Ok(AnalysisType::Full),
            "security" => Ok(AnalysisType::Security),
            "performance" | "perf" => Ok(AnalysisType::Performance),
            other => Err(format!(
                "unknown analysis type '{}' (expected full, security, or performance)",
                other
            )),
        }
    }
}

/// One analysis request, frozen at construction. The numeric
/// parameters are clamped into their valid ranges instead of rejected;
/// the interactive surfaces only ever offer in-range values.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub code: String,
    pub language: Language,
    pub analysis_type: AnalysisType,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl AnalysisRequest {
    pub fn new(
        code: impl Into<String>,
        language: Language,
        analysis_type: AnalysisType,
        temperature: f64,
        max_tokens: u32,
    ) -> Self {
        Self {
            code: code.into(),
            language,
            analysis_type,
            temperature: temperature.clamp(0.0, 1.0),
            max_tokens: max_tokens.clamp(MIN_MAX_TOKENS, MAX_MAX_TOKENS),
        }
    }
}
