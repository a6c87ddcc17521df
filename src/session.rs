use chrono::{DateTime, Local};
use std::collections::{HashMap, HashSet};

use crate::analyzer::{AnalysisReport, AnalysisType, AnalyzerError, Language};

#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Local>,
    pub language: Language,
    pub analysis_type: AnalysisType,
    pub duration_secs: f64,
}

/// Everything a session remembers: the append-only analysis history,
/// the running estimated-token counter, and the one "current result"
/// slot (last request wins). Nothing here is persisted; the session
/// dies with the process.
#[derive(Debug, Default)]
pub struct Session {
    history: Vec<HistoryEntry>,
    token_count: u64,
    current: Option<Result<AnalysisReport, AnalyzerError>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a finished analysis. Failures land in the history too;
    /// only successes feed the token counter.
    pub fn record(
        &mut self,
        language: Language,
        analysis_type: AnalysisType,
        duration_secs: f64,
        outcome: Result<AnalysisReport, AnalyzerError>,
    ) {
        self.history.push(HistoryEntry {
            timestamp: Local::now(),
            language,
            analysis_type,
            duration_secs,
        });
        if let Ok(report) = &outcome {
            self.token_count += report.estimated_tokens as u64;
        }
        self.current = Some(outcome);
    }

    pub fn current(&self) -> Option<&Result<AnalysisReport, AnalyzerError>> {
        self.current.as_ref()
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn token_count(&self) -> u64 {
        self.token_count
    }

    pub fn analyses_done(&self) -> usize {
        self.history.len()
    }

    pub fn languages_used(&self) -> usize {
        self.history
            .iter()
            .map(|entry| entry.language)
            .collect::<HashSet<_>>()
            .len()
    }

    /// The language with the most analyses this session. Ties break
    /// toward the alphabetically-first name so the answer is stable.
    pub fn most_used_language(&self) -> Option<Language> {
        let mut counts: HashMap<Language, usize> = HashMap::new();
        for entry in &self.history {
            *counts.entry(entry.language).or_default() += 1;
        }
        counts
            .into_iter()
            .max_by(|(a_lang, a_count), (b_lang, b_count)| {
                a_count
                    .cmp(b_count)
                    .then_with(|| b_lang.name().cmp(a_lang.name()))
            })
            .map(|(language, _)| language)
    }

    /// Explicit reset: history, counter, and current slot go together.
    pub fn clear(&mut self) {
        self.history.clear();
        self.token_count = 0;
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(tokens: usize) -> AnalysisReport {
        AnalysisReport {
            text: "looks fine".to_string(),
            estimated_tokens: tokens,
        }
    }

    #[test]
    fn successes_feed_history_and_counter() {
        let mut session = Session::new();
        session.record(Language::Python, AnalysisType::Full, 1.2, Ok(report(150)));
        session.record(Language::Rust, AnalysisType::Security, 0.8, Ok(report(90)));

        assert_eq!(session.analyses_done(), 2);
        assert_eq!(session.languages_used(), 2);
        assert_eq!(session.token_count(), 240);
        assert!(session.current().unwrap().is_ok());
    }

    #[test]
    fn failures_land_in_history_but_not_the_counter() {
        let mut session = Session::new();
        session.record(
            Language::Go,
            AnalysisType::Performance,
            0.1,
            Err(AnalyzerError::Upstream("boom".to_string())),
        );

        assert_eq!(session.analyses_done(), 1);
        assert_eq!(session.token_count(), 0);
        assert!(session.current().unwrap().is_err());
    }

    #[test]
    fn last_result_wins() {
        let mut session = Session::new();
        session.record(Language::Java, AnalysisType::Full, 1.0, Ok(report(10)));
        session.record(
            Language::Java,
            AnalysisType::Full,
            1.0,
            Err(AnalyzerError::Upstream("timeout".to_string())),
        );
        assert!(session.current().unwrap().is_err());
    }

    #[test]
    fn most_used_language_breaks_ties_deterministically() {
        let mut session = Session::new();
        session.record(Language::Rust, AnalysisType::Full, 1.0, Ok(report(1)));
        session.record(Language::Go, AnalysisType::Full, 1.0, Ok(report(1)));
        // One analysis each: Go sorts before Rust.
        assert_eq!(session.most_used_language(), Some(Language::Go));

        session.record(Language::Rust, AnalysisType::Full, 1.0, Ok(report(1)));
        assert_eq!(session.most_used_language(), Some(Language::Rust));
    }

    #[test]
    fn clear_resets_everything_together() {
        let mut session = Session::new();
        session.record(Language::Python, AnalysisType::Full, 1.0, Ok(report(42)));
        session.clear();

        assert_eq!(session.analyses_done(), 0);
        assert_eq!(session.token_count(), 0);
        assert!(session.current().is_none());
        assert_eq!(session.most_used_language(), None);
    }
}
