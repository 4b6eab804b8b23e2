use anyhow::Context;
use chrono::{DateTime, Local, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use reverse_glassdoor::config::{self, Config, OutputFormat};
use reverse_glassdoor::review::{self, JobType, ReviewInput, ReviewOverrides, Role, Trade};
use reverse_glassdoor::export::ExportTarget;
use reverse_glassdoor::{buffered_eprintln, export, output, scoring, tui, verbose_eprintln};

const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 1;
const EXIT_IO: i32 = 2;
const EXIT_CONFIG: i32 = 4;

/// Review fields, from a file and/or individual flags (flags win)
#[derive(Args, Debug, Clone, Default)]
struct ReviewArgs {
    /// Review file (YAML or JSON, by extension)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Worker name
    #[arg(long)]
    worker: Option<String>,

    /// Trade (HVAC, Electrical, Plumbing, General Contractor, Carpentry, Roofing)
    #[arg(long)]
    trade: Option<Trade>,

    /// Role (Tech, Apprentice, Journeyman, Master, Installer, Foreman)
    #[arg(long)]
    role: Option<Role>,

    /// Job date (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Job type (Service Call, Install, Rough-In, Finish, Emergency, Maintenance)
    #[arg(long)]
    job_type: Option<JobType>,

    /// Minutes late: whole minutes or a duration like "1h 5m"
    #[arg(long, allow_hyphen_values = true)]
    late: Option<String>,

    /// Worker did not show up
    #[arg(long)]
    no_show: bool,

    /// A callback was needed
    #[arg(long)]
    callback: bool,

    /// Punchlist items were left open
    #[arg(long)]
    punchlist_open: bool,

    /// Workmanship rating (1-5)
    #[arg(long, allow_hyphen_values = true)]
    workmanship: Option<i32>,

    /// A safety incident occurred
    #[arg(long)]
    incident: bool,

    /// PPE adherence rating (1-5)
    #[arg(long, allow_hyphen_values = true)]
    ppe: Option<i32>,

    /// Professionalism rating (1-5)
    #[arg(long, allow_hyphen_values = true)]
    professionalism: Option<i32>,

    /// Customer rating (1-5, informational only)
    #[arg(long, allow_hyphen_values = true)]
    customer: Option<i32>,

    /// Free-text notes (exported up to 240 characters)
    #[arg(long)]
    notes: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the composite scorecard for a review
    Score {
        #[command(flatten)]
        review: ReviewArgs,

        /// Output format (defaults to the config's output_format)
        #[arg(long)]
        format: Option<OutputFormat>,

        /// Treat out-of-range values as errors instead of warnings
        #[arg(long)]
        strict: bool,
    },
    /// Print or write the JSON export record
    Export {
        #[command(flatten)]
        review: ReviewArgs,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Creation timestamp (RFC 3339), defaults to now
        #[arg(long)]
        now: Option<DateTime<Utc>>,

        /// Treat out-of-range values as errors instead of warnings
        #[arg(long)]
        strict: bool,
    },
    /// Fill in a review interactively with a live score
    Form {
        #[command(flatten)]
        review: ReviewArgs,

        /// Export file path used by the form's export key
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Create a config file interactively
    Init {
        /// Path for the config file
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

#[derive(Parser, Debug)]
#[command(name = "reverse-glassdoor")]
#[command(about = "Score a tradesperson's job and export the scorecard", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/reverse-glassdoor/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Build the review: sample job, config defaults, the review file, then flags.
fn resolve_review(args: ReviewArgs, config: &Config) -> anyhow::Result<ReviewInput> {
    let today = Local::now().date_naive();
    let base = config.base_review(today);
    let base = match &args.file {
        Some(path) => {
            verbose_eprintln!("Loading review from {}", path.display());
            review::load_review(path, base)?
        }
        None => base,
    };

    let minutes_late = args
        .late
        .as_deref()
        .map(review::parse_minutes_late)
        .transpose()?;

    let overrides = ReviewOverrides {
        worker_name: args.worker,
        trade: args.trade,
        role: args.role,
        job_date: args.date,
        job_type: args.job_type,
        minutes_late,
        no_show: args.no_show,
        callback_occurred: args.callback,
        punchlist_open: args.punchlist_open,
        workmanship: args.workmanship,
        safety_incident: args.incident,
        ppe_adherence: args.ppe,
        professionalism: args.professionalism,
        customer_rating: args.customer,
        notes: args.notes,
    };
    Ok(overrides.apply(base))
}

/// Validation report for stderr, and whether the command may go on.
/// Problems are warnings unless `strict`.
fn review_problems(review: &ReviewInput, strict: bool) -> (Option<String>, bool) {
    match scoring::validate_review(review) {
        Ok(()) => (None, true),
        Err(problems) if strict => (
            Some(output::format_review_problems("Review errors", &problems)),
            false,
        ),
        Err(problems) => (
            Some(output::format_review_problems("Review warnings", &problems)),
            true,
        ),
    }
}

/// Print validation problems. Returns false if `strict` and there were any.
fn check_review(review: &ReviewInput, strict: bool) -> bool {
    let (report, proceed) = review_problems(review, strict);
    if let Some(report) = report {
        buffered_eprintln!("{}", report);
    }
    proceed
}

fn load_review_or_exit(args: ReviewArgs, config: &Config) -> ReviewInput {
    match resolve_review(args, config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Input error: {:#}", e);
            std::process::exit(EXIT_INPUT);
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    reverse_glassdoor::diagnostics::set_verbose(cli.verbose);

    // Init doesn't need (and may be creating) the config
    if let Commands::Init { path } = &cli.command {
        let path = path.clone().or_else(|| cli.config.as_ref().map(PathBuf::from));
        if let Err(e) = config::init::run_init_wizard(path) {
            eprintln!("Init error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
        std::process::exit(EXIT_SUCCESS);
    }

    let config_path = cli.config.map(PathBuf::from);
    let config = match config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };
    verbose_eprintln!(
        "Config: format={:?} theme={:?} export_dir={}",
        config.output_format,
        config.theme,
        config
            .export_dir
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(current directory)".to_string())
    );

    match cli.command {
        Commands::Score {
            review,
            format,
            strict,
        } => {
            let review = load_review_or_exit(review, &config);
            if !check_review(&review, strict) {
                std::process::exit(EXIT_INPUT);
            }

            let result = scoring::compute_composite(&review);
            match format.unwrap_or(config.output_format) {
                OutputFormat::Table => {
                    let use_colors = output::should_use_colors();
                    println!("{}", output::format_scorecard(&review, &result, use_colors));
                    if cli.verbose {
                        println!();
                        println!("{}", output::format_breakdown(&result));
                    }
                }
                OutputFormat::Json => match serde_json::to_string_pretty(&result) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Output error: {}", e);
                        std::process::exit(EXIT_IO);
                    }
                },
                OutputFormat::Tsv => println!("{}", output::format_tsv(&review, &result)),
            }
        }
        Commands::Export {
            review,
            out,
            now,
            strict,
        } => {
            let review = load_review_or_exit(review, &config);
            if !check_review(&review, strict) {
                std::process::exit(EXIT_INPUT);
            }

            let result = scoring::compute_composite(&review);
            let record = export::to_export_record(&review, &result, now.unwrap_or_else(Utc::now));

            let written = match &out {
                Some(path) => export::write_export(path, &record).map(|_| {
                    verbose_eprintln!("Wrote export to {}", path.display());
                }),
                None => record
                    .to_json_pretty()
                    .map(|json| println!("{}", json)),
            };
            if let Err(e) = written {
                eprintln!("Export error: {:#}", e);
                std::process::exit(EXIT_IO);
            }
        }
        Commands::Form { review, out } => {
            let review = load_review_or_exit(review, &config);
            let export_target = match out {
                Some(path) => ExportTarget::File(path),
                None => ExportTarget::Directory(config.export_dir.clone().unwrap_or_default()),
            };

            let theme = tui::resolve_theme(config.theme);
            verbose_eprintln!("Form theme: {:?}, export target: {:?}", theme, export_target);

            let app = tui::App::new(review, export_target, tui::ThemeColors::for_theme(theme));
            if let Err(e) = tui::run_tui(app)
                .await
                .context("Interactive form failed")
            {
                eprintln!("Form error: {:#}", e);
                std::process::exit(EXIT_IO);
            }
        }
        Commands::Init { .. } => unreachable!("handled before config load"),
    }

    std::process::exit(EXIT_SUCCESS);
}
