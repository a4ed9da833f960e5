mod analysis;
mod api;
mod cache;
mod config;
mod error;
mod export;
mod fetcher;
mod filter;
mod join;
mod models;
mod pipeline;
mod store;

use anyhow::{Context, Result};
use api::TokenCredentials;
use chrono::NaiveDate;
use clap::builder::FalseyValueParser;
use clap::Parser;
use config::{ConfigBuilder, FileConfig};
use models::Course;
use pipeline::Report;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;
use store::LocalStore;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Snapshot one student's Google Classroom coursework and summarize it by date and state.
#[derive(Parser, Debug)]
#[command(name = "classroom_snapshot", version, about, long_about = None)]
struct Cli {
    /// Student whose coursework is audited
    #[arg(short, long, env = "STUDENT")]
    student: Option<String>,

    /// Fetch from the API even if a snapshot is stored
    #[arg(
        short = 'u',
        long = "update",
        env = "UPDATE",
        value_parser = FalseyValueParser::new()
    )]
    update: bool,

    /// Course ids to leave out (comma separated)
    #[arg(short = 'x', long = "exclude", env = "EXCLUDED_COURSES", value_delimiter = ',')]
    exclude: Vec<String>,

    /// Ignore submissions updated before this date (YYYY-MM-DD)
    #[arg(long, env = "DATE_BEGIN")]
    begin: Option<NaiveDate>,

    /// Ignore submissions updated after this date (YYYY-MM-DD)
    #[arg(long, env = "DATE_UNTIL")]
    until: Option<NaiveDate>,

    /// YAML settings file with excluded_courses, begin and until
    #[arg(short, long, env = "SNAPSHOT_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding per-student snapshots and summaries
    #[arg(long, env = "DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Stored OAuth token file
    #[arg(long, env = "TOKEN_PATH")]
    token_path: Option<PathBuf>,

    /// Access token to use instead of the token file
    #[arg(long, env = "CLASSROOM_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,

    /// Also export both summaries as CSV into this directory
    #[arg(long, value_name = "DIR")]
    csv: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let csv_dir = cli.csv.clone();

    let mut builder = ConfigBuilder {
        student_id: cli.student,
        force_refresh: cli.update,
        excluded_course_ids: cli.exclude,
        begin: cli.begin,
        until: cli.until,
        data_dir: cli.data_dir,
        token_path: cli.token_path,
        access_token: cli.access_token,
    };
    if let Some(path) = &cli.config {
        builder = builder.merge_file(FileConfig::load(path)?);
    }
    if builder.student_id.is_none() {
        builder.student_id = prompt_student().context("Failed to read the student name")?;
    }
    let config = builder.build()?;

    let store = LocalStore::new(&config.data_dir);
    let credentials = TokenCredentials::new(config.access_token.clone(), &config.token_path);

    let report = pipeline::run(&config, &store, &credentials)
        .await
        .with_context(|| format!("Snapshot run for student {} failed", config.student_id))?;
    info!(mode = ?report.mode, student = %config.student_id, "run finished");

    print_courses(&report.courses);
    print_summaries(&report)?;

    if let Some(dir) = csv_dir {
        let dates = export::export_date_summary(&report.per_date, &config.student_id, &dir)?;
        let states = export::export_state_summary(&report.per_state, &config.student_id, &dir)?;
        println!("\nExported {} and {}", dates.display(), states.display());
    }

    Ok(())
}

/// Ask for the student name when running interactively.
fn prompt_student() -> io::Result<Option<String>> {
    let stdin = io::stdin();
    if !stdin.is_terminal() {
        return Ok(None);
    }

    print!("What is the student name? ");
    io::stdout().flush()?;
    let mut name = String::new();
    stdin.lock().read_line(&mut name)?;
    Ok(Some(name))
}

fn print_courses(courses: &[Course]) {
    if courses.is_empty() {
        println!("No courses found.");
        return;
    }
    println!("Courses:");
    for course in courses {
        println!("{} ({})", course.name, course.id);
    }
}

fn print_summaries(report: &Report) -> Result<()> {
    println!("\nSubmissions per date:");
    println!("{}", serde_json::to_string_pretty(&report.per_date)?);
    println!("\nSubmissions per state:");
    println!("{}", serde_json::to_string_pretty(&report.per_state)?);
    Ok(())
}
