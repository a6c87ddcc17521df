use std::path::PathBuf;

use crate::analyzer::{AnalysisType, Language, MAX_MAX_TOKENS, MIN_MAX_TOKENS};

/// One line of session input, parsed. Kept free of I/O so the parser
/// is testable on its own.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Analyze(PathBuf),
    SetLanguage(Language),
    SetAnalysis(AnalysisType),
    SetTemperature(f64),
    SetMaxTokens(u32),
    Stats,
    History,
    Clear,
    Help,
    Exit,
    Empty,
}

pub const HELP: &str = "\
Commands:
  analyze <file>        analyze a source file (.py .cpp .java .js .ts .go .rs .txt)
  lang <language>       set the language used for .txt files and overrides
  analysis <type>       full | security | performance
  temp <0.0-1.0>        set the creativity level
  tokens <100-2048>     set the response length cap
  stats                 show session statistics
  history               show the analysis history
  clear                 clear history and counters
  help                  show this help
  exit                  quit";

pub fn parse(line: &str) -> Result<Command, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Command::Empty);
    }

    let (keyword, rest) = match line.split_once(char::is_whitespace) {
        Some((keyword, rest)) => (keyword, rest.trim()),
        None => (line, ""),
    };

    match keyword {
        "analyze" => {
            if rest.is_empty() {
                return Err("usage: analyze <file>".to_string());
            }
            Ok(Command::Analyze(PathBuf::from(rest)))
        }
        "lang" | "language" => rest.parse().map(Command::SetLanguage),
        "analysis" => rest.parse().map(Command::SetAnalysis),
        "temp" | "temperature" => {
            let value: f64 = rest
                .parse()
                .map_err(|_| format!("'{}' is not a number", rest))?;
            if !(0.0..=1.0).contains(&value) {
                return Err("temperature must be between 0.0 and 1.0".to_string());
            }
            Ok(Command::SetTemperature(value))
        }
        "tokens" => {
            let value: u32 = rest
                .parse()
                .map_err(|_| format!("'{}' is not a whole number", rest))?;
            if !(MIN_MAX_TOKENS..=MAX_MAX_TOKENS).contains(&value) {
                return Err(format!(
                    "tokens must be between {} and {}",
                    MIN_MAX_TOKENS, MAX_MAX_TOKENS
                ));
            }
            Ok(Command::SetMaxTokens(value))
        }
        "stats" => Ok(Command::Stats),
        "history" => Ok(Command::History),
        "clear" => Ok(Command::Clear),
        "help" => Ok(Command::Help),
        "exit" | "quit" => Ok(Command::Exit),
        other => Err(format!("unknown command '{}' (try 'help')", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_analyze_with_path() {
        assert_eq!(
            parse("analyze src/main.py"),
            Ok(Command::Analyze(PathBuf::from("src/main.py")))
        );
        assert!(parse("analyze").is_err());
    }

    #[test]
    fn parses_settings_commands() {
        assert_eq!(parse("lang c++"), Ok(Command::SetLanguage(Language::Cpp)));
        assert_eq!(
            parse("analysis security"),
            Ok(Command::SetAnalysis(AnalysisType::Security))
        );
        assert_eq!(parse("temp 0.3"), Ok(Command::SetTemperature(0.3)));
        assert_eq!(parse("tokens 512"), Ok(Command::SetMaxTokens(512)));
    }

    #[test]
    fn rejects_out_of_range_settings() {
        assert!(parse("temp 1.5").is_err());
        assert!(parse("tokens 50").is_err());
        assert!(parse("tokens 4096").is_err());
    }

    #[test]
    fn parses_bare_commands_and_blank_lines() {
        assert_eq!(parse("stats"), Ok(Command::Stats));
        assert_eq!(parse("  clear  "), Ok(Command::Clear));
        assert_eq!(parse(""), Ok(Command::Empty));
        assert_eq!(parse("quit"), Ok(Command::Exit));
    }

    #[test]
    fn unknown_commands_point_at_help() {
        let err = parse("frobnicate").unwrap_err();
        assert!(err.contains("help"));
    }
}
