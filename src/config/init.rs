use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;

use crate::config::{get_config_path, Config, OutputFormat, ReviewDefaults, ThemeConfig};
use crate::review::{JobType, Role, Trade};

/// Prompt user with a message and return their trimmed input.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout().flush().context("Failed to flush stdout")?;
    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(input.trim().to_string())
}

/// Prompt user with a message and a default value. Returns default if input is empty.
fn prompt_with_default(message: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}]: ", message, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

/// Prompt user with a yes/no question. Returns bool based on input and default.
fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    let input = prompt(&format!("{} [{}]: ", message, hint))?;
    let input = input.to_lowercase();
    if input.is_empty() {
        Ok(default_yes)
    } else {
        Ok(input == "y" || input == "yes")
    }
}

/// Keep asking until the answer parses. "none" (or empty, when allowed) yields None.
fn prompt_parsed<T>(message: &str, default: &str, choices: &str) -> Result<Option<T>>
where
    T: FromStr<Err = String>,
{
    loop {
        let input = prompt_with_default(&format!("{} ({})", message, choices), default)?;
        if input.eq_ignore_ascii_case("none") {
            return Ok(None);
        }
        match input.parse::<T>() {
            Ok(v) => return Ok(Some(v)),
            Err(e) => println!("  Invalid: {}. Try again.", e),
        }
    }
}

fn choices(labels: impl Iterator<Item = &'static str>) -> String {
    labels.collect::<Vec<_>>().join(", ")
}

fn parse_theme(s: &str) -> Result<ThemeConfig, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "auto" => Ok(ThemeConfig::Auto),
        "dark" => Ok(ThemeConfig::Dark),
        "light" => Ok(ThemeConfig::Light),
        other => Err(format!("unknown theme '{}'", other)),
    }
}

/// Run the interactive init wizard to create a config file.
///
/// If `default_path` is Some, uses that as the config file path.
/// Otherwise, prompts the user with the default config path.
pub fn run_init_wizard(default_path: Option<PathBuf>) -> Result<()> {
    println!();
    println!("Scorecard Configuration");
    println!("=======================");
    println!("Press Enter to accept the value in brackets.");
    println!();

    // 1. Output
    let output_format = prompt_parsed::<OutputFormat>("Output format", "table", "table, json, tsv")?
        .unwrap_or_default();

    let theme = loop {
        let input = prompt_with_default("Form theme (auto, dark, light)", "auto")?;
        match parse_theme(&input) {
            Ok(t) => break t,
            Err(e) => println!("  Invalid: {}. Try again.", e),
        }
    };

    let export_dir = {
        let input = prompt_with_default("Export directory for the form (none = current directory)", "none")?;
        if input.eq_ignore_ascii_case("none") {
            None
        } else {
            Some(PathBuf::from(input))
        }
    };

    // 2. Form defaults
    println!();
    let defaults = if prompt_yes_no("Set default trade, role and job type?", false)? {
        ReviewDefaults {
            trade: prompt_parsed::<Trade>(
                "Default trade",
                "none",
                &choices(Trade::ALL.iter().map(|t| t.label())),
            )?,
            role: prompt_parsed::<Role>(
                "Default role",
                "none",
                &choices(Role::ALL.iter().map(|r| r.label())),
            )?,
            job_type: prompt_parsed::<JobType>(
                "Default job type",
                "none",
                &choices(JobType::ALL.iter().map(|j| j.label())),
            )?,
        }
    } else {
        ReviewDefaults::default()
    };

    // 3. Config path
    let default_config_path = match default_path {
        Some(p) => p,
        None => get_config_path()?,
    };
    println!();
    let path_str = prompt_with_default(
        "Where should the config be saved?",
        &default_config_path.display().to_string(),
    )?;
    let config_path = PathBuf::from(&path_str);

    if config_path.exists() {
        let overwrite = prompt_yes_no(
            &format!(
                "Config already exists at {}. Overwrite?",
                config_path.display()
            ),
            false,
        )?;
        if !overwrite {
            println!("Aborted.");
            return Ok(());
        }
    }

    // 4. Write config
    let config = Config {
        output_format,
        theme,
        export_dir,
        defaults,
    };
    write_config(&config_path, &config)?;

    println!();
    println!("Config written to {}", config_path.display());
    println!("Run `reverse-glassdoor form` to score a job.");

    Ok(())
}

/// Serialize a config as YAML and write it atomically, creating parent directories.
pub fn write_config(path: &std::path::Path, config: &Config) -> Result<()> {
    let yaml = serde_saphyr::to_string(config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(yaml.as_bytes())
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    file.commit()
        .with_context(|| format!("Failed to save config to {}", path.display()))?;

    Ok(())
}
