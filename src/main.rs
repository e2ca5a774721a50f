use anyhow::Context;
use clap::{Parser, Subcommand};
use is_terminal::IsTerminal;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

mod carousel;
mod config;
mod content;
mod ui;

use config::Config;
use content::Portfolio;
use ui::theme::Theme;
use ui::UiOptions;

const DEFAULT_PRINT_WIDTH: u16 = 100;

#[derive(Parser)]
#[command(
    name = "portfolio",
    version,
    about = "A personal portfolio page in your terminal",
    long_about = "Renders a personal portfolio page (hero, skills, experience carousel, projects, certifications) as an interactive terminal page, or prints it once as plain text."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file (defaults to $PORTFOLIO_CONFIG or the XDG config dir)
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// TOML content file replacing the built-in page
    #[arg(long, global = true)]
    content: Option<PathBuf>,

    /// Start with the light theme
    #[arg(long, global = true)]
    light: bool,

    /// Jump instead of easing carousel nudges
    #[arg(long, global = true)]
    no_smooth: bool,

    /// Verbose output (written to the log file)
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Log file used with --verbose (defaults to portfolio-tui.log in the temp dir)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive page (default)
    View,
    /// Print the whole page once as plain text
    Print {
        /// Page width in columns
        #[arg(long, short, default_value_t = DEFAULT_PRINT_WIDTH)]
        width: u16,
    },
    /// Show the resolved config file path and effective settings
    Config {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        if let Err(e) = init_tracing(cli.log_file.as_deref()) {
            eprintln!("Unable to open log file: {e}");
        }
    }

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_effective_config(&cli)?;

    match cli.command {
        Some(Commands::Config { json }) => show_config(&cli, &config, json),
        Some(Commands::Print { width }) => {
            let portfolio = load_portfolio(&cli, &config)?;
            print_page(&portfolio, &config, width)
        }
        None | Some(Commands::View) => {
            let portfolio = load_portfolio(&cli, &config)?;
            if !std::io::stdout().is_terminal() {
                debug!("stdout is not a terminal, printing instead");
                let width = std::env::var("COLUMNS")
                    .ok()
                    .and_then(|c| c.parse().ok())
                    .unwrap_or(DEFAULT_PRINT_WIDTH);
                return print_page(&portfolio, &config, width);
            }
            view(portfolio, &config).await
        }
    }
}

/// Run the interactive page in a background task and follow its messages.
async fn view(portfolio: Portfolio, config: &Config) -> anyhow::Result<()> {
    use tokio::sync::mpsc;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let options = UiOptions::from(config);
    let mut ui_task = tokio::spawn(async move { ui::run(portfolio, options, tx).await });

    loop {
        tokio::select! {
            // Handle UI messages
            msg = rx.recv() => {
                match msg {
                    Some(ui::AppMessage::ActiveIndexChanged { index }) => {
                        debug!(index, "Active experience changed");
                    }
                    Some(ui::AppMessage::ThemeChanged { theme }) => {
                        debug!(?theme, "Theme changed");
                    }
                    None => {
                        // Channel closed, UI task finished
                        break;
                    }
                }
            }
            // Wait for UI task to complete
            ui_result = &mut ui_task => {
                return ui_result.context("UI task failed")?;
            }
        }
    }

    ui_task.await.context("UI task failed")?
}

fn print_page(portfolio: &Portfolio, config: &Config, width: u16) -> anyhow::Result<()> {
    if width < 20 {
        anyhow::bail!("Page width must be at least 20 columns");
    }
    let text = ui::render_page_text(portfolio, &UiOptions::from(config), width)?;
    print!("{text}");
    Ok(())
}

fn show_config(cli: &Cli, config: &Config, json: bool) -> anyhow::Result<()> {
    let path = config::config_file_path(cli.config.as_deref())?;
    let resolved = config.resolved();
    if json {
        let value = serde_json::json!({
            "path": path.display().to_string(),
            "settings": resolved,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("Config file: {}", path.display());
        println!();
        print!("{}", toml::to_string_pretty(&resolved)?);
    }
    Ok(())
}

/// Config file merged with command-line overrides.
fn load_effective_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = config::load_config(cli.config.as_deref())?;
    if cli.light {
        config.theme = Some(Theme::Light);
    }
    if cli.no_smooth {
        config.smooth_scroll = Some(false);
    }
    if let Some(content) = &cli.content {
        config.content = Some(content.display().to_string());
    }
    Ok(config)
}

fn load_portfolio(cli: &Cli, config: &Config) -> anyhow::Result<Portfolio> {
    let explicit = cli.content.as_deref();
    match explicit.or(config.content.as_deref().map(Path::new)) {
        Some(path) => {
            info!(path = %path.display(), "Using content file");
            Ok(Portfolio::load(path)?)
        }
        None => Ok(Portfolio::builtin()),
    }
}

fn init_tracing(log_file: Option<&Path>) -> std::io::Result<()> {
    let path = log_file
        .map(Path::to_path_buf)
        .unwrap_or_else(|| std::env::temp_dir().join("portfolio-tui.log"));
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)?;

    // Initialise tracing subscriber in verbose mode
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(std::sync::Mutex::new(file))
        .init();
    Ok(())
}
