use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Utc;
use clap::{ArgGroup, Parser, Subcommand, ValueEnum};

mod dataset;
mod models;
mod predict;
mod report;

use dataset::Dataset;
use models::{Prediction, ProgramStats};

#[derive(Parser)]
#[command(name = "admission-chance")]
#[command(about = "SNBP/SNBT admission chance predictor for Indonesian universities", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List universities in the stats table
    Universities {
        #[arg(long)]
        data: PathBuf,
    },
    /// List majors offered by one university
    Majors {
        #[arg(long)]
        data: PathBuf,
        #[arg(long)]
        university: String,
    },
    /// Predict admission chances from report-card grades
    #[command(group(
        ArgGroup::new("source")
            .args(["data", "reference"])
            .required(true)
            .multiple(false)
    ))]
    Predict {
        /// Semester grades, comma separated, 0 for semesters not yet entered
        #[arg(long, value_delimiter = ',', required = true)]
        grades: Vec<f64>,
        #[arg(long)]
        data: Option<PathBuf>,
        /// Manual SNBP reference score, used instead of a stats table
        #[arg(long)]
        reference: Option<f64>,
        #[arg(long)]
        university: Option<String>,
        #[arg(long)]
        major: Option<String>,
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Write a markdown report
    #[command(group(
        ArgGroup::new("source")
            .args(["data", "reference"])
            .required(true)
            .multiple(false)
    ))]
    Report {
        #[arg(long, value_delimiter = ',', required = true)]
        grades: Vec<f64>,
        #[arg(long)]
        data: Option<PathBuf>,
        #[arg(long)]
        reference: Option<f64>,
        #[arg(long)]
        university: Option<String>,
        #[arg(long)]
        major: Option<String>,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Universities { data } => {
            let dataset = Dataset::load(&data)?;
            for university in dataset.universities() {
                println!("- {university}");
            }
        }
        Commands::Majors { data, university } => {
            let dataset = Dataset::load(&data)?;
            let majors = dataset.majors(&university);
            if majors.is_empty() {
                println!("No majors found for {university}.");
            } else {
                for major in majors {
                    println!("- {major}");
                }
            }
        }
        Commands::Predict {
            grades,
            data,
            reference,
            university,
            major,
            format,
        } => {
            validate_grades(&grades)?;
            let stats = resolve_stats(data.as_deref(), university.as_deref(), major.as_deref())?;
            let prediction = predict::predict(&grades, stats.as_ref(), reference);

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&prediction)?),
                OutputFormat::Text => print_prediction(
                    &prediction,
                    data.is_some(),
                    university.as_deref(),
                    major.as_deref(),
                ),
            }
        }
        Commands::Report {
            grades,
            data,
            reference,
            university,
            major,
            out,
        } => {
            validate_grades(&grades)?;
            let stats = resolve_stats(data.as_deref(), university.as_deref(), major.as_deref())?;
            if data.is_some() && stats.is_none() {
                println!("University or major not found in the stats table.");
                return Ok(());
            }
            let prediction = predict::predict(&grades, stats.as_ref(), reference);
            let report = report::build_report(
                university.as_deref(),
                major.as_deref(),
                &grades,
                &prediction,
                Utc::now().date_naive(),
            );
            std::fs::write(&out, report)?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}

fn validate_grades(grades: &[f64]) -> anyhow::Result<()> {
    if grades.len() > predict::MAX_SEMESTERS {
        anyhow::bail!(
            "at most {} semester grades are accepted, got {}",
            predict::MAX_SEMESTERS,
            grades.len()
        );
    }
    for (i, grade) in grades.iter().enumerate() {
        if !(0.0..=100.0).contains(grade) {
            anyhow::bail!("semester {} grade {} is outside 0-100", i + 1, grade);
        }
    }
    Ok(())
}

fn resolve_stats(
    data: Option<&Path>,
    university: Option<&str>,
    major: Option<&str>,
) -> anyhow::Result<Option<ProgramStats>> {
    let Some(path) = data else {
        return Ok(None);
    };
    let university = university.context("--university is required with --data")?;
    let major = major.context("--major is required with --data")?;
    let dataset = Dataset::load(path)?;
    Ok(dataset.lookup(university, major).cloned())
}

fn print_prediction(
    prediction: &Prediction,
    table_mode: bool,
    university: Option<&str>,
    major: Option<&str>,
) {
    println!(
        "Average report-card grade: {:.2} across {} filled semesters",
        prediction.average, prediction.filled_semesters
    );

    if table_mode && prediction.snbp.is_none() {
        println!(
            "No stats found for {} / {}.",
            university.unwrap_or("?"),
            major.unwrap_or("?")
        );
        return;
    }

    if let Some(snbp) = &prediction.snbp {
        println!(
            "- SNBP: {:.2}% chance ({} accepted of {} applicants, selectivity {:.2}, reference {:.2})",
            snbp.chance_percent, snbp.accepted, snbp.applicants, snbp.selectivity, snbp.reference
        );
    }
    if let Some(snbt) = &prediction.snbt {
        println!(
            "- SNBT: {:.2}% chance ({} accepted of {} applicants, selectivity {:.2}, reference {:.2})",
            snbt.chance_percent, snbt.accepted, snbt.applicants, snbt.selectivity, snbt.reference
        );
    }
    if let Some(safe_target) = prediction.safe_target {
        println!("Safe target score: {safe_target:.2}");
    }

    match prediction.required_increase {
        Some(increase) if !prediction.targets.is_empty() => {
            println!(
                "Required increase: {:.2}; you are currently in semester {}.",
                increase, prediction.filled_semesters
            );
            println!("Suggested minimum grades:");
            for target in &prediction.targets {
                println!("- Semester {}: {:.2}", target.semester, target.target);
            }
        }
        Some(increase) => {
            println!(
                "All {} semesters are filled; an increase of {increase:.2} can no longer be reached through report-card grades.",
                predict::MAX_SEMESTERS
            );
        }
        None if prediction.reference.is_some() => {
            println!("Congratulations! Your average already meets the reference for this program.");
        }
        None => {}
    }
}
