use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, info};

use speedgate_core::{ReportPlan, StdHost, Verdict, run_report};
use speedgate_types::{ConfigFile, DEFAULT_THRESHOLD, Defaults, Format, Strategy, Threshold};

mod config_loader;

use config_loader::load_config_with_includes;

const DEFAULT_CONFIG_FILE: &str = "speedgate.toml";
const THRESHOLD_ENV: &str = "SPEEDGATE_THRESHOLD";

#[derive(Parser)]
#[command(name = "speedgate")]
#[command(about = "Render PageSpeed Insights results and gate on a performance score", long_about = None)]
struct Cli {
    /// Enable verbose (info-level) logging to stderr.
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// Enable debug-level logging to stderr.
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a saved PSI payload and check it against the threshold.
    Report(ReportArgs),

    /// Print the effective defaults (built-in + config file + environment).
    Defaults(DefaultsArgs),
}

#[derive(Parser, Debug)]
struct ReportArgs {
    /// PSI JSON payload to read ('-' for stdin).
    #[arg(long, value_name = "PATH", default_value = "-")]
    input: PathBuf,

    /// Output format.
    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    /// Strategy label shown in the report.
    #[arg(long, value_enum)]
    strategy: Option<StrategyArg>,

    /// Minimum acceptable performance score (0-100).
    ///
    /// Falls back to SPEEDGATE_THRESHOLD, then the config file, then 70.
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=100))]
    threshold: Option<u32>,

    /// Attach documentation links to opportunity titles.
    #[arg(long, overrides_with = "no_links")]
    links: bool,

    /// Disable documentation links, even if the config enables them.
    #[arg(long, overrides_with = "links")]
    no_links: bool,

    /// Write `<name>_short.json` and `<name>_full.json` (json format only).
    #[arg(long, overrides_with = "no_to_file")]
    to_file: bool,

    /// Do not write report files, even if the config enables them.
    #[arg(long, overrides_with = "to_file")]
    no_to_file: bool,

    /// Directory for files written by --to-file.
    #[arg(long, value_name = "DIR")]
    file_path: Option<PathBuf>,

    /// Path to a config file. If omitted, uses ./speedgate.toml if present.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct DefaultsArgs {
    /// Path to a config file. If omitted, uses ./speedgate.toml if present.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = DefaultsFormat::Toml)]
    format: DefaultsFormat,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DefaultsFormat {
    Toml,
    Json,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
    Cli,
    Json,
}

impl From<FormatArg> for Format {
    fn from(v: FormatArg) -> Self {
        match v {
            FormatArg::Cli => Format::Cli,
            FormatArg::Json => Format::Json,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StrategyArg {
    Mobile,
    Desktop,
}

impl From<StrategyArg> for Strategy {
    fn from(v: StrategyArg) -> Self {
        match v {
            StrategyArg::Mobile => Strategy::Mobile,
            StrategyArg::Desktop => Strategy::Desktop,
        }
    }
}

#[cfg(not(test))]
fn main() -> std::process::ExitCode {
    match run_with_args(std::env::args_os()) {
        Ok(code) => std::process::ExitCode::from(code as u8),
        Err(err) => {
            eprintln!("{err:?}");
            std::process::ExitCode::from(1)
        }
    }
}

fn run_with_args<I, T>(args: I) -> Result<i32>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    // clap exits with 2 on usage errors, which is reserved for a failed gate.
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) => {
            err.print().context("print usage")?;
            return Ok(if err.use_stderr() { 1 } else { 0 });
        }
    };

    init_logging(cli.verbose, cli.debug);

    match cli.command {
        Commands::Report(args) => cmd_report(args),
        Commands::Defaults(args) => {
            cmd_defaults(args)?;
            Ok(0)
        }
    }
}

/// Initialize tracing/logging based on CLI flags.
fn init_logging(verbose: bool, debug: bool) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let level = if debug {
        "debug"
    } else if verbose {
        "info"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    debug!("Logging initialized at level: {}", level);
}

fn cmd_report(args: ReportArgs) -> Result<i32> {
    let defaults = effective_defaults(args.config.clone())?;
    let plan = build_plan(&args, &defaults)?;
    debug!("Report plan: {:?}", plan);

    let text = read_input(&args.input)?;
    let raw: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("parse payload {}", display_input(&args.input)))?;

    let run = run_report(&plan, &raw, &mut StdHost)?;

    match &run.verdict {
        Verdict::Passed => info!("Threshold of {} met with score of {}", run.input.threshold, run.score),
        // Policy outcome: message only, no error chain.
        Verdict::ThresholdFailed(failure) => eprintln!("{failure}"),
    }

    Ok(run.exit_code())
}

fn cmd_defaults(args: DefaultsArgs) -> Result<()> {
    let defaults = effective_defaults(args.config)?;

    match args.format {
        DefaultsFormat::Toml => {
            let s = toml::to_string_pretty(&ConfigFile {
                includes: vec![],
                defaults,
            })
            .context("render toml")?;
            print!("{s}");
        }
        DefaultsFormat::Json => {
            let s = serde_json::to_string_pretty(&defaults).context("render json")?;
            println!("{s}");
        }
    }

    Ok(())
}

/// Built-in defaults, overlaid by the config file, overlaid by the environment.
fn effective_defaults(config: Option<PathBuf>) -> Result<Defaults> {
    let built_in = Defaults {
        threshold: Some(u32::from(DEFAULT_THRESHOLD)),
        format: Some(Format::Cli),
        strategy: Some(Strategy::Mobile),
        links: Some(false),
        to_file: Some(false),
        file_path: None,
    };

    let from_file = load_config(config)?.defaults;
    let from_env = Defaults {
        threshold: threshold_from_env()?,
        ..Defaults::default()
    };

    Ok(built_in.overlay(from_file).overlay(from_env))
}

fn build_plan(args: &ReportArgs, defaults: &Defaults) -> Result<ReportPlan> {
    let threshold = match args.threshold.or(defaults.threshold) {
        Some(value) => Some(Threshold::new(value).context("resolve threshold")?),
        None => None,
    };

    Ok(ReportPlan {
        format: args
            .format
            .map(Format::from)
            .or(defaults.format)
            .unwrap_or(Format::Cli),
        strategy: args
            .strategy
            .map(Strategy::from)
            .or(defaults.strategy)
            .unwrap_or(Strategy::Mobile),
        threshold,
        links: switch(args.links, args.no_links)
            .or(defaults.links)
            .unwrap_or(false),
        to_file: switch(args.to_file, args.no_to_file)
            .or(defaults.to_file)
            .unwrap_or(false),
        file_path: args
            .file_path
            .clone()
            .or_else(|| defaults.file_path.as_ref().map(PathBuf::from)),
        persistence_enabled: true,
    })
}

/// A `--flag`/`--no-flag` pair; `None` when neither was given.
fn switch(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

fn load_config(path: Option<PathBuf>) -> Result<ConfigFile> {
    let user_path = path.or_else(|| {
        let p = PathBuf::from(DEFAULT_CONFIG_FILE);
        if p.exists() { Some(p) } else { None }
    });

    let Some(path) = user_path else {
        debug!("No config file found, using built-in defaults");
        return Ok(ConfigFile::default());
    };

    info!("Loading config from: {}", path.display());
    load_config_with_includes(&path, expand_env_vars)
}

fn threshold_from_env() -> Result<Option<u32>> {
    match std::env::var(THRESHOLD_ENV) {
        Ok(value) if !value.trim().is_empty() => {
            let parsed = value
                .trim()
                .parse::<u32>()
                .with_context(|| format!("{THRESHOLD_ENV} must be an integer, got '{value}'"))?;
            debug!("Threshold {} from {}", parsed, THRESHOLD_ENV);
            Ok(Some(parsed))
        }
        _ => Ok(None),
    }
}

fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("read payload from stdin")?;
        return Ok(buf);
    }

    std::fs::read_to_string(path).with_context(|| format!("read payload {}", path.display()))
}

fn display_input(path: &Path) -> String {
    if path.as_os_str() == "-" {
        "<stdin>".to_string()
    } else {
        path.display().to_string()
    }
}

/// Expand environment variables in config text.
///
/// Supports two syntaxes:
/// - `${VAR}` - expands to the value of VAR, errors if not set
/// - `${VAR:-default}` - expands to the value of VAR, or "default" if not set
fn expand_env_vars(content: &str) -> Result<String> {
    use regex::Regex;

    let re = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
        .expect("env var regex should compile");

    let mut result = String::with_capacity(content.len());
    let mut last_end = 0;

    for cap in re.captures_iter(content) {
        let Some(full_match) = cap.get(0) else {
            continue;
        };
        let var_name = &cap[1];
        let default_value = cap.get(2).map(|m| m.as_str());

        result.push_str(&content[last_end..full_match.start()]);

        match std::env::var(var_name) {
            Ok(value) => result.push_str(&value),
            Err(_) => match default_value {
                Some(default) => result.push_str(default),
                None => bail!(
                    "Environment variable '{}' is not set and no default provided",
                    var_name
                ),
            },
        }

        last_end = full_match.end();
    }

    result.push_str(&content[last_end..]);
    Ok(result)
}
