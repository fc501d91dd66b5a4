//! CLI entry point for `attachguard`.

use std::path::{Path, PathBuf};

use clap::{Args, CommandFactory, Parser, Subcommand};

use attachguard::config::{self, Config};
use attachguard::model::attachment::AttachmentRecord;
use attachguard::model::decision::EvaluationResult;
use attachguard::platform::snapshot::DeviceSnapshot;
use attachguard::platform::{NetworkClass, Platform};
use attachguard::{parser, policy};

#[derive(Parser)]
#[command(
    name = "attachguard",
    version,
    about = "Check whether an email attachment may be viewed or saved"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate an attachment described on the command line
    Check {
        /// Attachment filename
        #[arg(long)]
        name: String,
        /// Declared MIME type (inferred from the name when omitted)
        #[arg(long, default_value = "")]
        content_type: String,
        /// Size in bytes
        #[arg(long, default_value_t = 0)]
        size: u64,
        /// Attachment id
        #[arg(long, default_value_t = 0)]
        id: u64,
        #[command(flatten)]
        device: DeviceArgs,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Evaluate one attachment of an .eml file
    Inspect {
        path: PathBuf,
        /// Attachment number within the message, starting at 0
        #[arg(short, long, default_value_t = 0)]
        part: usize,
        #[command(flatten)]
        device: DeviceArgs,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the effective configuration
    Config {
        /// Write it to the configuration file instead
        #[arg(long)]
        write: bool,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
    /// Generate a man page
    Manpage,
}

/// Device state to evaluate against. Flags override values from `--device`.
#[derive(Args)]
struct DeviceArgs {
    /// TOML device snapshot (network, view_handlers, sideload_allowed, content_uris)
    #[arg(long, value_name = "FILE")]
    device: Option<PathBuf>,
    /// Active network: none, metered, unmetered [default: unmetered]
    #[arg(long)]
    network: Option<NetworkClass>,
    /// Number of installed apps able to view the attachment [default: 1]
    #[arg(long)]
    viewers: Option<usize>,
    /// Device allows installing apps from unknown sources [default: false]
    #[arg(long, value_name = "BOOL")]
    sideload: Option<bool>,
}

impl DeviceArgs {
    fn snapshot(&self) -> anyhow::Result<DeviceSnapshot> {
        let base = match self.device {
            Some(ref path) => DeviceSnapshot::load(path)?,
            None => DeviceSnapshot {
                network: NetworkClass::Unmetered,
                view_handlers: 1,
                ..DeviceSnapshot::default()
            },
        };
        Ok(base.with_overrides(self.network, self.viewers, self.sideload))
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration; a broken file is reported once logging is up
    let (config, config_error) = match config::load_config() {
        Ok(cfg) => (cfg, None),
        Err(e) => (Config::default(), Some(e)),
    };

    // Configure logging: stderr + optional log file
    let log_level = match cli.verbose {
        0 => config.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    setup_logging(log_level, &config);
    if let Some(e) = config_error {
        tracing::warn!(error = %e, "Failed to load config, using defaults");
    }

    match cli.command {
        Commands::Check {
            name,
            content_type,
            size,
            id,
            device,
            json,
        } => {
            let record = AttachmentRecord::new(name, content_type, size, id);
            cmd_evaluate(&record, &device, &config, json)
        }
        Commands::Inspect {
            path,
            part,
            device,
            json,
        } => cmd_inspect(&path, part, &device, &config, json),
        Commands::Config { write } => cmd_config(&config, write),
        Commands::Completions { shell } => cmd_completions(shell),
        Commands::Manpage => cmd_manpage(),
    }
}

/// Set up tracing with stderr output and optional file logging.
fn setup_logging(level: &str, config: &Config) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    // Try to set up file logging
    let log_path = config::log_file_path(config);
    let log_dir = config::cache_dir(config);
    let log_name = log_path.file_name().unwrap_or_default();
    if std::fs::create_dir_all(&log_dir).is_ok() {
        let file_appender = tracing_appender::rolling::never(&log_dir, log_name);
        let file_layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(file_appender);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .with(file_layer)
            .init();
    } else {
        // Fall back to stderr only
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .init();
    }
}

/// Evaluate a single attachment and print the verdict.
fn cmd_evaluate(
    record: &AttachmentRecord,
    device: &DeviceArgs,
    config: &Config,
    json: bool,
) -> anyhow::Result<()> {
    let snapshot = device.snapshot()?;
    let platform = Platform::from_device(&snapshot);
    let result = policy::evaluate(record, &config.policy, &platform);

    if json {
        print_result_json(record, &result, &snapshot)?;
    } else {
        print_result_table(record, &result, &snapshot);
    }
    Ok(())
}

/// Evaluate one attachment of an `.eml` file.
fn cmd_inspect(
    path: &Path,
    part: usize,
    device: &DeviceArgs,
    config: &Config,
    json: bool,
) -> anyhow::Result<()> {
    if !path.exists() {
        anyhow::bail!("File not found: {}", path.display());
    }
    let record = parser::eml::read_attachment(path, part)?;
    cmd_evaluate(&record, device, config, json)
}

/// Print or save the effective configuration.
fn cmd_config(config: &Config, write: bool) -> anyhow::Result<()> {
    if write {
        let path = config::save_config(config)?;
        println!("  Wrote configuration to {}", path.display());
    } else {
        print!("{}", toml::to_string_pretty(config)?);
    }
    Ok(())
}

/// Generate shell completions and print to stdout.
fn cmd_completions(shell: clap_complete::Shell) -> anyhow::Result<()> {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "attachguard", &mut std::io::stdout());
    Ok(())
}

/// Generate a man page and print to stdout.
fn cmd_manpage() -> anyhow::Result<()> {
    let cmd = Cli::command();
    let man = clap_mangen::Man::new(cmd);
    let mut buf = Vec::new();
    man.render(&mut buf)?;
    std::io::Write::write_all(&mut std::io::stdout(), &buf)?;
    Ok(())
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

/// Print the verdict as a human-readable table.
fn print_result_table(
    record: &AttachmentRecord,
    result: &EvaluationResult,
    device: &DeviceSnapshot,
) {
    use humansize::{format_size, BINARY};

    println!();
    println!("  {:<20} {}", "Attachment", record.name);
    println!("  {:<20} {}", "Content type", result.effective_content_type);
    println!("  {:<20} {}", "Size", format_size(record.size, BINARY));
    println!("  {:<20} {}", "Network", device.network);
    println!();
    println!("  {:<20} {}", "View", yes_no(result.allow_view));
    println!("  {:<20} {}", "Save", yes_no(result.allow_save));
    println!(
        "  {:<20} {}",
        "Download",
        yes_no(result.eligible_for_download())
    );
    println!();
}

/// Print the verdict as JSON.
fn print_result_json(
    record: &AttachmentRecord,
    result: &EvaluationResult,
    device: &DeviceSnapshot,
) -> anyhow::Result<()> {
    let output = serde_json::json!({
        "attachment": record,
        "device": {
            "network": device.network,
            "view_handlers": device.view_handlers,
            "sideload_allowed": device.sideload_allowed,
        },
        "allow_view": result.allow_view,
        "allow_save": result.allow_save,
        "eligible_for_download": result.eligible_for_download(),
        "content_type": result.effective_content_type,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
