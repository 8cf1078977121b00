use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::{ColoredString, Colorize};
use dialoguer::{Confirm, Input, Select};
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use walkdir::WalkDir;

use crate::{
    analysis::{self, extract_keywords},
    cmd::tui::TuiApp,
    config::{Config, ScoringConfig},
    parsers::extract_from_path,
    types::{AtsReport, FileType, KeywordSet},
    utils::{join_keywords, parse_filetype, read_keywords_from_file},
};

#[derive(Parser)]
#[command(name = "atscore")]
#[command(about = "Score resumes against a job description the way an applicant tracking system does")]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to resume file (.pdf, .docx or .txt)
    #[arg(short, long)]
    resume: Option<PathBuf>,

    /// Path to job description text file
    #[arg(short, long)]
    job: Option<PathBuf>,

    /// Enable interactive mode
    #[arg(short, long)]
    interactive: bool,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Output format (text, json, csv)
    #[arg(short, long, default_value = "text")]
    output: String,
}

#[derive(Args, Clone, Default)]
struct JobArgs {
    /// Path to job description text file
    #[arg(short, long, conflicts_with = "job_text")]
    job: Option<PathBuf>,

    /// Job description given inline
    #[arg(long)]
    job_text: Option<String>,

    /// Use the terms in this file (one per line) instead of extracting keywords
    #[arg(short, long)]
    keywords: Option<PathBuf>,

    /// Maximum number of extracted keywords, 0 for no limit
    #[arg(short, long)]
    max_keywords: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Score one resume against a job description
    Score {
        /// Path to resume file
        resume: PathBuf,

        #[command(flatten)]
        job: JobArgs,

        /// Treat the resume as this format instead of trusting its extension
        #[arg(short = 't', long)]
        format_tag: Option<String>,

        /// Output format (text, json, csv)
        ///
        /// The PDF backend prints font warnings ("unknown glyph name",
        /// "missing char") to stdout for some fonts, ahead of the report.
        /// Parse json output from the first line starting with '{'.
        #[arg(short, long, default_value = "text")]
        output: String,
    },

    /// Score every resume in a directory
    Batch {
        /// Directory containing resumes
        #[arg(short, long)]
        directory: PathBuf,

        #[command(flatten)]
        job: JobArgs,

        /// File pattern (e.g., "*.pdf", "*.docx")
        #[arg(short, long, default_value = "*.*")]
        pattern: String,

        /// Recursive search
        #[arg(short, long)]
        recursive: bool,

        /// Output format (text, json, csv)
        #[arg(short, long, default_value = "text")]
        output: String,
    },

    /// Show the keywords extracted from a job description
    Keywords {
        #[command(flatten)]
        job: JobArgs,

        /// Output format (text, json, csv)
        #[arg(short, long, default_value = "text")]
        output: String,
    },

    /// Check that a resume can be read and extracted
    Validate {
        /// Path to resume file
        resume: PathBuf,

        /// Treat the resume as this format instead of trusting its extension
        #[arg(short = 't', long)]
        format_tag: Option<String>,
    },

    /// Show file information
    Info {
        /// Path to resume file
        file: PathBuf,
    },

    /// Interactive scoring mode
    Interactive,

    /// Browse a score report in a terminal interface
    Tui {
        /// Path to resume file
        resume: PathBuf,

        #[command(flatten)]
        job: JobArgs,

        /// Treat the resume as this format instead of trusting its extension
        #[arg(short = 't', long)]
        format_tag: Option<String>,
    },
}

impl JobArgs {
    fn scoring(&self, base: ScoringConfig) -> ScoringConfig {
        match self.max_keywords {
            Some(max) => base.with_max_keywords(max),
            None => base,
        }
    }

    fn job_description(&self) -> Result<String> {
        let text = match (&self.job, &self.job_text) {
            (Some(path), _) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read job description: {}", path.display()))?,
            (None, Some(text)) => text.clone(),
            (None, None) => String::new(),
        };

        if text.trim().is_empty() && self.keywords.is_none() {
            return Err(anyhow::anyhow!(
                "Job description is required: pass --job <file>, --job-text <text> or --keywords <file>"
            ));
        }
        Ok(text)
    }

    fn keyword_set(&self, config: &ScoringConfig) -> Result<KeywordSet> {
        match &self.keywords {
            Some(path) => Ok(KeywordSet::from_terms(read_keywords_from_file(path)?, config)),
            None => Ok(extract_keywords(&self.job_description()?, config)),
        }
    }
}

fn parse_format_tag(tag: Option<&str>) -> Result<Option<FileType>> {
    Ok(tag.map(str::parse::<FileType>).transpose()?)
}

fn colored_score(score: u8) -> ColoredString {
    let text = format!("{}/100", score);
    match score {
        75..=100 => text.green().bold(),
        50..=74 => text.yellow().bold(),
        _ => text.red().bold(),
    }
}

/// One row of a batch run: either a score or the reason the file was skipped.
struct BatchRow {
    file: PathBuf,
    outcome: std::result::Result<(u8, Vec<String>), String>,
}

pub struct CliApp {
    cli: Cli,
}

impl Default for CliApp {
    fn default() -> Self {
        Self::new()
    }
}

impl CliApp {
    pub fn new() -> Self {
        Self { cli: Cli::parse() }
    }

    /// Log level requested on the command line, if any.
    pub fn log_level(&self) -> Option<&'static str> {
        match (self.cli.quiet, self.cli.verbose) {
            (_, 0) if self.cli.quiet => Some("error"),
            (_, 0) => None,
            (_, 1) => Some("debug"),
            _ => Some("trace"),
        }
    }

    pub fn run(self, config: Config) -> Result<()> {
        let quiet = self.cli.quiet;
        let runner = Runner { config, quiet };

        match self.cli.command {
            Some(Commands::Score { resume, job, format_tag, output }) => {
                runner.run_score(&resume, &job, format_tag.as_deref(), &output)
            }
            Some(Commands::Batch { directory, job, pattern, recursive, output }) => {
                runner.run_batch(&directory, &job, &pattern, recursive, &output)
            }
            Some(Commands::Keywords { job, output }) => runner.run_keywords(&job, &output),
            Some(Commands::Validate { resume, format_tag }) => {
                runner.run_validate(&resume, format_tag.as_deref())
            }
            Some(Commands::Info { file }) => runner.run_info(&file),
            Some(Commands::Interactive) => runner.run_interactive(),
            Some(Commands::Tui { resume, job, format_tag }) => {
                runner.run_tui(&resume, &job, format_tag.as_deref())
            }
            None => {
                if self.cli.interactive {
                    runner.run_interactive()
                } else if let (Some(resume), Some(job)) = (&self.cli.resume, &self.cli.job) {
                    let job = JobArgs {
                        job: Some(job.clone()),
                        ..JobArgs::default()
                    };
                    runner.run_score(resume, &job, None, &self.cli.output)
                } else {
                    Runner::show_help();
                    Ok(())
                }
            }
        }
    }
}

struct Runner {
    config: Config,
    quiet: bool,
}

impl Runner {
    fn score_report(
        &self,
        resume: &Path,
        job: &JobArgs,
        format_tag: Option<&str>,
    ) -> Result<AtsReport> {
        let scoring = job.scoring(self.config.scoring);
        let keywords = job.keyword_set(&scoring)?;
        let format = parse_format_tag(format_tag)?;

        let resume_text = extract_from_path(resume, format)
            .with_context(|| format!("Failed to extract text from {}", resume.display()))?;
        Ok(analysis::report(resume_text, keywords, &scoring))
    }

    fn run_score(&self, resume: &Path, job: &JobArgs, format_tag: Option<&str>, output: &str) -> Result<()> {
        if !self.quiet && output == "text" {
            println!("{}", "Score Mode".bold().blue());
            println!("{}", "==========".blue());
        }

        if !resume.exists() {
            return Err(anyhow::anyhow!("Resume file not found: {}", resume.display()));
        }

        let start = Instant::now();
        let report = self.score_report(resume, job, format_tag)?;
        self.display_report(&report, resume, output, start.elapsed())
    }

    fn run_batch(
        &self,
        directory: &Path,
        job: &JobArgs,
        pattern: &str,
        recursive: bool,
        output: &str,
    ) -> Result<()> {
        if !directory.exists() || !directory.is_dir() {
            return Err(anyhow::anyhow!("Directory not found: {}", directory.display()));
        }

        let scoring = job.scoring(self.config.scoring);
        let keywords = job.keyword_set(&scoring)?;
        let files = scan_directory(directory, pattern, recursive)?;

        if !self.quiet && output == "text" {
            println!("{}", "Batch Mode".bold().blue());
            println!("{}", "==========".blue());
            println!("Found {} resumes to score against {} keywords", files.len(), keywords.len());
        }

        let start = Instant::now();
        let progress = if self.quiet || output != "text" {
            ProgressBar::hidden()
        } else {
            ProgressBar::new(files.len() as u64)
        };
        progress.set_style(
            ProgressStyle::default_bar()
                .template("Overall: [{bar:40.cyan/blue}] {pos}/{len} files {msg}")?
                .progress_chars("█▉▊▋▌▍▎▏ "),
        );

        let mut rows: Vec<BatchRow> = files
            .par_iter()
            .map(|file| {
                let outcome = extract_from_path(file, None)
                    .map(|text| {
                        let result = analysis::score_with(&text, &keywords, &scoring);
                        (result.score, result.missing)
                    })
                    .map_err(|e| e.to_string());
                progress.inc(1);
                BatchRow {
                    file: file.clone(),
                    outcome,
                }
            })
            .collect();
        progress.finish_with_message("done");

        // best score first, failures last
        rows.sort_by_key(|row| {
            (
                std::cmp::Reverse(row.outcome.as_ref().map(|(score, _)| *score as i16).unwrap_or(-1)),
                row.file.clone(),
            )
        });

        self.display_batch_results(&rows, output, start.elapsed())
    }

    fn run_keywords(&self, job: &JobArgs, output: &str) -> Result<()> {
        let scoring = job.scoring(self.config.scoring);
        let keywords = job.keyword_set(&scoring)?;

        match output.to_lowercase().as_str() {
            "json" => println!("{}", serde_json::to_string_pretty(&keywords)?),
            "csv" => {
                println!("rank,keyword");
                for (i, keyword) in keywords.iter().enumerate() {
                    println!("{},{}", i + 1, keyword);
                }
            }
            _ => {
                if !self.quiet {
                    println!("{}", format!("{} keywords, most relevant first:", keywords.len()).bold().blue());
                }
                for (i, keyword) in keywords.iter().enumerate() {
                    println!("  {:>2}. {}", i + 1, keyword.cyan());
                }
            }
        }
        Ok(())
    }

    fn run_validate(&self, resume: &Path, format_tag: Option<&str>) -> Result<()> {
        println!("{}", "Validation Mode".bold().blue());
        println!("{}", "===============".blue());

        let outcome = parse_format_tag(format_tag)
            .and_then(|format| Ok(extract_from_path(resume, format)?));

        match outcome {
            Ok(text) => {
                let tokens = analysis::normalize(&text).len();
                println!("Resume file: {}", "✓ Valid".green());
                println!("  {} characters, {} tokens", text.chars().count(), tokens);
                if tokens == 0 {
                    println!(
                        "  {}",
                        "No extractable text. Image-only documents are not OCR'd.".yellow()
                    );
                }
                Ok(())
            }
            Err(e) => {
                println!("Resume file: {}", "✗ Invalid".red());
                Err(e.context(format!("Validation failed for {}", resume.display())))
            }
        }
    }

    fn run_info(&self, file: &Path) -> Result<()> {
        println!("{}", "File Information".bold().blue());
        println!("{}", "================".blue());

        if !file.exists() {
            return Err(anyhow::anyhow!("File not found: {}", file.display()));
        }

        let file_type = parse_filetype(file)?;
        println!("File: {}", file.display());
        println!(
            "Type: {}",
            match file_type {
                FileType::Docx => "DOCX Document".blue(),
                FileType::Pdf => "PDF Document".red(),
                FileType::Txt => "Plain Text".normal(),
            }
        );
        println!("MIME: {}", file_type.mime_type());
        println!("Size: {} bytes", file.metadata()?.len());

        Ok(())
    }

    fn run_interactive(&self) -> Result<()> {
        show_startup_logo();

        println!("{}", "Interactive Mode".bold().blue());
        println!("{}", "================".blue());

        let resume: String = Input::new()
            .with_prompt("Path to resume (.pdf, .docx or .txt)")
            .interact_text()?;
        let resume = PathBuf::from(resume.trim());

        let job = Self::get_job_interactive()?;

        let max_keywords: usize = Input::new()
            .with_prompt("Maximum number of keywords (0 for no limit)")
            .default(self.config.scoring.max_keywords)
            .interact_text()?;
        let job = JobArgs {
            max_keywords: Some(max_keywords),
            ..job
        };

        let start = Instant::now();
        let report = self.score_report(&resume, &job, None)?;
        self.display_report(&report, &resume, "text", start.elapsed())?;

        let browse = Confirm::new()
            .with_prompt("Browse the report in the terminal interface?")
            .default(false)
            .interact()?;
        if browse {
            TuiApp::new(report, resume.display().to_string()).run()?;
        }

        Ok(())
    }

    fn get_job_interactive() -> Result<JobArgs> {
        let options = &[
            "Load job description from file",
            "Type job description",
            "Use keyword list file",
        ];

        let choice = Select::new()
            .with_prompt("Where does the job description come from?")
            .default(0)
            .items(options)
            .interact()?;

        let job = match choice {
            0 => {
                let path: String = Input::new()
                    .with_prompt("Path to job description")
                    .interact_text()?;
                JobArgs {
                    job: Some(PathBuf::from(path.trim())),
                    ..JobArgs::default()
                }
            }
            1 => {
                let text: String = Input::new()
                    .with_prompt("Job description")
                    .interact_text()?;
                JobArgs {
                    job_text: Some(text),
                    ..JobArgs::default()
                }
            }
            2 => {
                let path: String = Input::new()
                    .with_prompt("Path to keyword list")
                    .interact_text()?;
                JobArgs {
                    keywords: Some(PathBuf::from(path.trim())),
                    ..JobArgs::default()
                }
            }
            _ => unreachable!(),
        };
        Ok(job)
    }

    fn run_tui(&self, resume: &Path, job: &JobArgs, format_tag: Option<&str>) -> Result<()> {
        let report = self.score_report(resume, job, format_tag)?;
        TuiApp::new(report, resume.display().to_string()).run()
    }

    fn display_report(&self, report: &AtsReport, resume: &Path, output: &str, duration: Duration) -> Result<()> {
        let result = &report.result;

        match output.to_lowercase().as_str() {
            "json" => {
                println!("{}", serde_json::to_string_pretty(result)?);
                return Ok(());
            }
            "csv" => {
                println!("keyword,found,occurrences");
                for (keyword, detail) in &result.details {
                    println!("{},{},{}", keyword, detail.found, detail.occurrences);
                }
                return Ok(());
            }
            _ => {}
        }

        if self.quiet {
            println!("{}\t{}", result.score, result.missing_joined());
            return Ok(());
        }

        println!("\n{}", "=".repeat(50).blue());
        println!("{}", "ATS SCORE REPORT".blue().bold());
        println!("{}", "=".repeat(50).blue());

        println!("Resume: {}", resume.display());
        println!("Score: {}", colored_score(result.score));
        println!(
            "Keywords matched: {} of {}",
            result.details.len() - result.missing.len(),
            result.details.len()
        );
        println!();

        if result.details.is_empty() {
            println!("{}", "The job description yielded no keywords.".yellow());
        }
        for (keyword, detail) in &result.details {
            if detail.found {
                println!("  {} {} ({}x)", "✓".green(), keyword.green(), detail.occurrences);
            } else {
                println!("  {} {}", "✗".red(), keyword.red());
            }
        }

        if !result.missing.is_empty() {
            println!();
            println!("Missing: {}", result.missing.join(", ").yellow());
        }

        println!("{}", "=".repeat(50).blue());
        println!("{}", format!("Scored in {} ms", duration.as_millis()).italic());

        Ok(())
    }

    fn display_batch_results(&self, rows: &[BatchRow], output: &str, duration: Duration) -> Result<()> {
        match output.to_lowercase().as_str() {
            "json" => {
                let rows_json: Vec<serde_json::Value> = rows
                    .iter()
                    .map(|row| match &row.outcome {
                        Ok((score, missing)) => serde_json::json!({
                            "file": row.file.to_string_lossy(),
                            "score": score,
                            "missing_keywords": missing,
                        }),
                        Err(error) => serde_json::json!({
                            "file": row.file.to_string_lossy(),
                            "error": error,
                        }),
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&rows_json)?);
            }
            "csv" => {
                println!("file,score,missing_keywords");
                for row in rows {
                    match &row.outcome {
                        Ok((score, missing)) => println!(
                            "{},{},\"{}\"",
                            row.file.to_string_lossy(),
                            score,
                            join_keywords(missing)
                        ),
                        Err(_) => println!("{},,", row.file.to_string_lossy()),
                    }
                }
            }
            _ => {
                println!("\n{}", "=".repeat(60).blue());
                println!("{}", "BATCH SCORE RESULTS".blue().bold());
                println!("{}", "=".repeat(60).blue());

                let failed = rows.iter().filter(|row| row.outcome.is_err()).count();
                println!("Summary:");
                println!("  Resumes processed: {}", rows.len());
                println!("  Failed to read: {}", failed);
                println!();

                if rows.is_empty() {
                    println!("{}", "No resumes found.".yellow());
                }
                for (i, row) in rows.iter().enumerate() {
                    match &row.outcome {
                        Ok((score, missing)) => println!(
                            "  {:>3}. {} {} [missing {}]",
                            i + 1,
                            colored_score(*score),
                            row.file.display(),
                            missing.len()
                        ),
                        Err(error) => println!(
                            "  {:>3}. {} {} ({})",
                            i + 1,
                            "error".red(),
                            row.file.display(),
                            error
                        ),
                    }
                }

                println!("{}", "=".repeat(60).blue());
                println!("{}", format!("Batch scoring completed in {} ms", duration.as_millis()).italic());
            }
        }
        Ok(())
    }

    fn show_help() {
        println!("{}", "atscore - ATS Resume Scoring Tool".blue().bold());
        println!();
        println!("Usage:");
        println!("  atscore --resume <resume_file> --job <job_description_file>");
        println!("  atscore --interactive");
        println!("  atscore score <resume_file> --job <job_description_file>");
        println!("  atscore batch --directory <dir> --job <job_description_file>");
        println!("  atscore keywords --job <job_description_file>");
        println!("  atscore validate <resume_file>");
        println!("  atscore info <file>");
        println!("  atscore tui <resume_file> --job <job_description_file>");
        println!();
        println!("Examples:");
        println!("  atscore score resume.pdf --job posting.txt --output json");
        println!("  atscore score resume.docx --job-text \"Senior Rust engineer, Kubernetes\"");
        println!("  atscore batch -d ./applicants -j posting.txt --pattern \"*.pdf\"");
        println!("  atscore keywords -j posting.txt --max-keywords 10");
        println!();
        println!("For more help, run: atscore --help");
    }
}

fn scan_directory(directory: &Path, pattern: &str, recursive: bool) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    if recursive {
        let matcher = glob::Pattern::new(pattern)
            .with_context(|| format!("Invalid file pattern: {}", pattern))?;
        for entry in WalkDir::new(directory)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            if matcher.matches(&entry.file_name().to_string_lossy()) {
                files.push(entry.into_path());
            }
        }
    } else {
        let search_pattern = format!("{}/{}", directory.display(), pattern);
        for path in glob(&search_pattern)?.flatten() {
            if path.is_file() {
                files.push(path);
            }
        }
    }

    // Filter by supported file types
    files.retain(|file| parse_filetype(file).is_ok());
    files.sort();

    Ok(files)
}

fn show_startup_logo() {
    let logo = r#"
    _  _____ ____
   / \|_   _/ ___|  ___ ___  _ __ ___
  / _ \ | | \___ \ / __/ _ \| '__/ _ \
 / ___ \| |  ___) | (_| (_) | | |  __/
/_/   \_\_| |____/ \___\___/|_|  \___|
"#;
    println!("{}", logo);
    println!();
}
