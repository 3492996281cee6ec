use std::path::Path;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use ferrofetch::{FetchConfig, banner, config, facts, plugins, profiles, system};

/// ferrofetch - system information at a glance, extensible via plugins
#[derive(Parser)]
#[command(name = "ferrofetch", version, about)]
struct Cli {
    /// Show minimal output (hostname, user, CPU, RAM)
    #[arg(long)]
    minimal: bool,

    /// Ignore the config file and use defaults
    #[arg(long)]
    skip_config: bool,

    /// Do not run plugins
    #[arg(long, env = "FERROFETCH_NO_PLUGINS")]
    no_plugins: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Show the banner only
    Banner,
    /// Show the login shell version
    Shell,
    /// Show the desktop environment
    Desktop,
    /// Show the public IP address
    PublicIp,
    /// Show the kernel version
    Kernel,
    /// Show a random fun fact
    FunFact,
    /// List discovered plugins
    Plugins,
    /// Open the config file in $EDITOR
    EditConfig,
    /// Run with a named profile
    Profile {
        /// Profile name
        name: String,
    },
    /// Create a new profile and open it in $EDITOR
    CreateProfile {
        /// Profile name
        name: String,
    },
    /// Edit a profile in $EDITOR
    EditProfile {
        /// Profile name
        name: String,
    },
    /// Delete a profile
    RmProfile {
        /// Profile name
        name: String,
    },
    /// List profiles
    LsProfiles,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "warn,ferrofetch=warn",
        1 => "info,ferrofetch=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config_dir = config::config_dir();
    let cfg = if cli.skip_config {
        FetchConfig::default()
    } else {
        FetchConfig::load(&config::config_file(&config_dir))
    };

    if let Some(cmd) = cli.command {
        return match cmd {
            Command::Banner => cmd_banner(&cfg),
            Command::Shell => {
                println!("Shell: {}", system::shell_version());
                Ok(())
            }
            Command::Desktop => {
                println!("Desktop Environment: {}", system::desktop_environment());
                Ok(())
            }
            Command::PublicIp => {
                println!("Public IP: {}", system::public_ip().await);
                Ok(())
            }
            Command::Kernel => {
                println!("Kernel: {}", system::kernel());
                Ok(())
            }
            Command::FunFact => {
                println!("{}", facts::random_fact());
                Ok(())
            }
            Command::Plugins => cmd_list_plugins(&config_dir),
            Command::EditConfig => cmd_edit_config(&config_dir),
            Command::Profile { name } => cmd_profile(&config_dir, &name, cli.no_plugins).await,
            Command::CreateProfile { name } => cmd_create_profile(&config_dir, &name),
            Command::EditProfile { name } => {
                open_editor(&profiles::existing(&config_dir, &name)?)
            }
            Command::RmProfile { name } => {
                profiles::remove(&config_dir, &name)?;
                println!("Profile deleted successfully.");
                Ok(())
            }
            Command::LsProfiles => cmd_ls_profiles(&config_dir),
        };
    }

    if cli.minimal {
        print_minimal();
        return Ok(());
    }

    print_report(&cfg).await;

    if !cli.no_plugins && cfg.flag("allow_plugins") {
        run_plugin_pass(&config_dir, &cfg).await?;
    }

    Ok(())
}

/// Print the minimal four-line report
fn print_minimal() {
    line("Hostname", &system::host_name());
    line("User", &system::user_name());
    line("CPU", system::cpu_arch());
    line("RAM", &system::total_ram());
}

/// Print the full telemetry report, honoring display flags
async fn print_report(cfg: &FetchConfig) {
    let distro = system::distro_name();

    if cfg.flag("ascii_art") {
        print_banner(cfg, distro.as_deref());
    }
    if cfg.flag("show_distro") {
        line("Distro", distro.as_deref().unwrap_or("Unknown"));
    }
    line("Hostname", &system::host_name());
    line("User", &system::user_name());
    if cfg.flag("show_kernel") {
        line("Kernel", &system::kernel());
    }
    if cfg.flag("show_de") {
        line("Desktop Environment", &system::desktop_environment());
    }
    if cfg.flag("show_packages") {
        match system::package_count() {
            Some(count) => line("Packages", &count.to_string()),
            None => line("Packages", "Unknown"),
        }
    }
    if cfg.flag("fun_facts") {
        line("Fun Fact", facts::random_fact());
    }
    if cfg.flag("show_version") {
        line("Version", ferrofetch::VERSION);
    }
    if cfg.flag("show_ip") {
        line("Public IP", &system::public_ip().await);
    }
    if cfg.flag("show_shell") {
        line("Shell", &system::shell_version());
    }
    if cfg.flag("show_battery") {
        match system::battery() {
            Some(charge) => line("Battery", &charge),
            None => line("Battery", "Battery info not available"),
        }
    }
    line("CPU", system::cpu_arch());
    line("RAM", &system::total_ram());
}

/// One labeled report line
fn line(label: &str, value: &str) {
    println!("{} {value}", format!("{label}:").cyan().bold());
}

/// Resolve the banner text: config override, then distro, then the program name
fn banner_text<'a>(cfg: &'a FetchConfig, distro: Option<&'a str>) -> &'a str {
    cfg.banner_text().or(distro).unwrap_or("ferrofetch")
}

/// Render and print the banner; rendering failures only lose the banner
fn print_banner(cfg: &FetchConfig, distro: Option<&str>) {
    let text = banner_text(cfg, distro);
    match banner::render(text) {
        Ok(art) => println!("{art}"),
        Err(e) => tracing::warn!(error = %e, "failed to render banner"),
    }
}

/// The supervised plugin pass: guard, discover, run, summarize
async fn run_plugin_pass(config_dir: &Path, cfg: &FetchConfig) -> anyhow::Result<()> {
    let host = plugins::host_version()?;

    plugins::engage(config_dir, cfg.flag("enable_plugin_guard")).await?;

    let descriptors = plugins::discover(&plugins::plugins_dir(config_dir));
    if descriptors.is_empty() {
        tracing::debug!("no plugins discovered");
        return Ok(());
    }

    let reports = plugins::run_all(&descriptors, cfg, &host, cfg.plugin_timeout()).await;

    let failed = reports
        .iter()
        .filter(|r| matches!(r.outcome, ferrofetch::ExecutionOutcome::Failed(_)))
        .count();
    let skipped = reports
        .iter()
        .filter(|r| matches!(r.outcome, ferrofetch::ExecutionOutcome::Skipped(_)))
        .count();
    if failed > 0 || skipped > 0 {
        tracing::warn!(
            total = reports.len(),
            failed,
            skipped,
            "plugin pass finished with problems"
        );
    }

    Ok(())
}

/// Print the banner and nothing else
fn cmd_banner(cfg: &FetchConfig) -> anyhow::Result<()> {
    let distro = system::distro_name();
    let art = banner::render(banner_text(cfg, distro.as_deref()))?;
    println!("{art}");
    Ok(())
}

/// List discovered plugins (works without the guard ever engaging)
fn cmd_list_plugins(config_dir: &Path) -> anyhow::Result<()> {
    let dir = plugins::plugins_dir(config_dir);
    let descriptors = plugins::discover(&dir);

    if descriptors.is_empty() {
        println!("No plugins found in {}", dir.display());
        return Ok(());
    }

    println!("Available plugins:");
    for entry in plugins::listing(&descriptors) {
        println!("  {entry}");
    }
    Ok(())
}

/// Open the main config file in the user's editor, creating it if needed
fn cmd_edit_config(config_dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(config_dir)?;
    let path = config::config_file(config_dir);
    open_editor(&path)
}

/// Run the full report under a named profile
async fn cmd_profile(config_dir: &Path, name: &str, no_plugins: bool) -> anyhow::Result<()> {
    let cfg = profiles::load(config_dir, name)?;
    print_report(&cfg).await;

    if !no_plugins && cfg.flag("allow_plugins") {
        run_plugin_pass(config_dir, &cfg).await?;
    }
    Ok(())
}

/// Create a profile and drop into the editor
fn cmd_create_profile(config_dir: &Path, name: &str) -> anyhow::Result<()> {
    let path = profiles::create(config_dir, name)?;
    open_editor(&path)?;
    println!("Profile '{}' has been created.", name.trim());
    Ok(())
}

/// List profile names
fn cmd_ls_profiles(config_dir: &Path) -> anyhow::Result<()> {
    let names = profiles::list(config_dir);
    if names.is_empty() {
        println!("No profiles found.");
    } else {
        for name in names {
            println!("{name}");
        }
    }
    Ok(())
}

/// Open a file in $EDITOR (falling back to nano)
fn open_editor(path: &Path) -> anyhow::Result<()> {
    let editor = std::env::var("EDITOR")
        .or_else(|_| std::env::var("VISUAL"))
        .unwrap_or_else(|_| "nano".to_string());

    let status = std::process::Command::new(&editor).arg(path).status()?;
    if !status.success() {
        anyhow::bail!("{editor} exited with {status}");
    }
    Ok(())
}
