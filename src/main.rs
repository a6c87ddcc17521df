use anyhow::{bail, Result};
use clap::Parser;
use colored::*;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use revu::analyzer::{self, AnalysisReport, AnalysisRequest, AnalysisType, Language};
use revu::config::Config;
use revu::input;
use revu::repl::{self, Command};
use revu::session::Session;

#[derive(Parser)]
#[command(name = "revu", version, about = "AI-powered code analysis from your terminal")]
struct Cli {
    /// Source file to analyze; starts an interactive session when omitted
    file: Option<PathBuf>,

    /// Language of the code (inferred from the file extension when possible)
    #[arg(short, long)]
    language: Option<Language>,

    /// What to analyze for
    #[arg(short, long, default_value = "full")]
    analysis: AnalysisType,

    /// Creativity level, 0.0 to 1.0
    #[arg(short, long)]
    temperature: Option<f64>,

    /// Response length cap, 100 to 2048
    #[arg(long)]
    max_tokens: Option<u32>,

    /// Model identifier override
    #[arg(long)]
    model: Option<String>,
}

/// Per-session knobs, seeded from config and adjusted by REPL commands.
#[derive(Debug, Clone, Copy)]
struct SessionOptions {
    language: Option<Language>,
    analysis: AnalysisType,
    temperature: f64,
    max_tokens: u32,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let mut config = Config::ensure_config_exists()?;
    if let Some(model) = cli.model {
        config.analyzer.model = model;
    }
    if !config.display.color_output {
        colored::control::set_override(false);
    }

    let options = SessionOptions {
        language: cli.language,
        analysis: cli.analysis,
        temperature: cli.temperature.unwrap_or(config.analyzer.temperature),
        max_tokens: cli.max_tokens.unwrap_or(config.analyzer.max_tokens),
    };

    match cli.file {
        Some(path) => run_once(&path, options, &config).await,
        None => run_session(options, &config).await,
    }
}

async fn run_once(path: &Path, options: SessionOptions, config: &Config) -> Result<()> {
    let source = input::load_source(path)?;
    let Some(language) = options.language.or(source.language) else {
        bail!("Could not infer a language from {:?}; pass --language", path);
    };
    if source.code.trim().is_empty() {
        bail!("{:?} is empty; nothing to analyze", path);
    }

    let request = AnalysisRequest::new(
        source.code,
        language,
        options.analysis,
        options.temperature,
        options.max_tokens,
    );

    println!("{}", "Analyzing your code...".blue());
    let start = Instant::now();
    let outcome = analyzer::analyze(&request, config).await;
    let duration = start.elapsed().as_secs_f64();

    match outcome {
        Ok(report) => {
            print_report(&report, duration, config);
            Ok(())
        }
        Err(e) => {
            eprintln!("{}: {}", "Error".red().bold(), e);
            std::process::exit(1);
        }
    }
}

async fn run_session(mut options: SessionOptions, config: &Config) -> Result<()> {
    let mut session = Session::new();

    println!("{}", "revu - AI Code Analysis".green().bold());
    println!(
        "Model: {} | Analysis: {}",
        config.analyzer.model.blue(),
        options.analysis.to_string().blue()
    );
    println!("Type 'help' for commands, 'exit' to quit\n");

    loop {
        print!("revu> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            break;
        }

        let command = match repl::parse(&line) {
            Ok(command) => command,
            Err(msg) => {
                eprintln!("{}: {}", "Error".red().bold(), msg);
                continue;
            }
        };

        match command {
            Command::Analyze(path) => {
                run_analysis(&path, &options, config, &mut session).await;
            }
            Command::SetLanguage(language) => {
                options.language = Some(language);
                println!("Language set to {}", language.to_string().blue());
            }
            Command::SetAnalysis(analysis) => {
                options.analysis = analysis;
                println!("Analysis type set to {}", analysis.to_string().blue());
            }
            Command::SetTemperature(temperature) => {
                options.temperature = temperature;
                println!("Temperature set to {}", temperature);
            }
            Command::SetMaxTokens(max_tokens) => {
                options.max_tokens = max_tokens;
                println!("Response length cap set to {}", max_tokens);
            }
            Command::Stats => print_stats(&session),
            Command::History => print_history(&session),
            Command::Clear => {
                session.clear();
                println!("History cleared.");
            }
            Command::Help => println!("{}", repl::HELP),
            Command::Exit => break,
            Command::Empty => {}
        }
    }

    Ok(())
}

async fn run_analysis(
    path: &Path,
    options: &SessionOptions,
    config: &Config,
    session: &mut Session,
) {
    let source = match input::load_source(path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            return;
        }
    };

    let Some(language) = options.language.or(source.language) else {
        eprintln!(
            "{}: no language for {:?}; set one with 'lang <language>'",
            "Error".red().bold(),
            path
        );
        return;
    };

    if source.code.trim().is_empty() {
        println!("{}", "Please provide some code to analyze.".yellow());
        return;
    }

    let request = AnalysisRequest::new(
        source.code,
        language,
        options.analysis,
        options.temperature,
        options.max_tokens,
    );

    let prompt = analyzer::compose_prompt(&request, config);
    println!(
        "{}",
        format!(
            "Characters: {} | Estimated prompt tokens: {} | Max: {}",
            request.code.chars().count(),
            analyzer::estimate_tokens(&prompt),
            analyzer::MAX_PROMPT_TOKENS
        )
        .dimmed()
    );

    println!("{}", "Analyzing your code...".blue());
    let start = Instant::now();
    let outcome = analyzer::analyze(&request, config).await;
    let duration = start.elapsed().as_secs_f64();

    match &outcome {
        Ok(report) => print_report(report, duration, config),
        Err(e) => eprintln!("{}: {}", "Error".red().bold(), e),
    }

    session.record(language, options.analysis, duration, outcome);
}

fn print_report(report: &AnalysisReport, duration: f64, config: &Config) {
    println!("\n{}", "Analysis Results".green().bold());
    println!("{}", report.text);
    if config.display.show_duration {
        println!(
            "{}",
            format!(
                "({:.2}s, ~{} prompt tokens)",
                duration, report.estimated_tokens
            )
            .dimmed()
        );
    }
}

fn print_stats(session: &Session) {
    println!("{}", "Session Stats".green().bold());
    println!("  Analyses done:   {}", session.analyses_done());
    println!("  Languages used:  {}", session.languages_used());
    println!("  Estimated tokens: {}", session.token_count());
    if let Some(language) = session.most_used_language() {
        println!("  Most analyzed:   {}", language);
    }
}

fn print_history(session: &Session) {
    if session.history().is_empty() {
        println!("No analyses yet.");
        return;
    }
    for entry in session.history() {
        println!(
            "{}  {:<10}  {:<20}  {:.2}s",
            entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
            entry.language.to_string(),
            entry.analysis_type.to_string(),
            entry.duration_secs
        );
    }
}
