use serde::{Deserialize, Serialize};

use super::request::{AnalysisType, Language};

/// The three instruction templates, one per analysis type. They live
/// in the config file so deployments can reword them without a
/// rebuild; `{language}` and `{code}` are the substitution markers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptTemplates {
    pub full: String,
    pub security: String,
    pub performance: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            full: "\
Analyze this {language} code and provide:
1. Any syntax errors or bugs
2. Potential improvements
3. A detailed explanation of the code
4. Suggested fixes
5. Performance considerations

Code:
{code}
"
            .to_string(),
            security: "\
Analyze this {language} code for security vulnerabilities and provide:
1. Potential security risks
2. Common vulnerabilities
3. Security best practices
4. Recommended security improvements

Code:
{code}
"
            .to_string(),
            performance: "\
Analyze this {language} code for performance and provide:
1. Performance bottlenecks
2. Optimization opportunities
3. Memory usage considerations
4. Recommended performance improvements

Code:
{code}
"
            .to_string(),
        }
    }
}

impl PromptTemplates {
    fn template(&self, analysis_type: AnalysisType) -> &str {
        match analysis_type {
            AnalysisType::Full => &self.full,
            AnalysisType::Security => &self.security,
            AnalysisType::Performance => &self.performance,
        }
    }

    /// Renders the prompt for one request. Pure: the same inputs
    /// always produce the same bytes. The language marker is filled
    /// first so marker-looking text inside the code survives verbatim.
    pub fn render(&self, analysis_type: AnalysisType, language: Language, code: &str) -> String {
        self.template(analysis_type)
            .replace("{language}", language.name())
            .replace("{code}", code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn render_embeds_language_and_code_verbatim() {
        let templates = PromptTemplates::default();
        let prompt = templates.render(AnalysisType::Security, Language::Python, "print(1)");
        assert!(prompt.contains("Python"));
        assert!(prompt.contains("print(1)"));
        assert!(prompt.contains("security"));
    }

    #[test]
    fn render_is_deterministic() {
        let templates = PromptTemplates::default();
        let a = templates.render(AnalysisType::Full, Language::Rust, "fn main() {}");
        let b = templates.render(AnalysisType::Full, Language::Rust, "fn main() {}");
        assert_eq!(a, b);
    }

    #[test]
    fn markers_inside_code_are_not_expanded() {
        let templates = PromptTemplates::default();
        let prompt = templates.render(AnalysisType::Full, Language::Go, "x := \"{language}\"");
        assert!(prompt.contains("x := \"{language}\""));
    }
}
