use anyhow::{anyhow, bail, Result};
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use xpboard::client::ApiClient;
use xpboard::config::Config;
use xpboard::dashboard::{load_dashboard, DashboardView};
use xpboard::interactive::{self, open_store, system_theme};
use xpboard::logging;
use xpboard::prompt::{prompt, prompt_password};
use xpboard::report;
use xpboard::session::Session;
use xpboard::storage::StoreScope;
use xpboard::theme::{Theme, ThemeState};
use xpboard::utils::mask_token;

#[derive(Parser)]
#[command(name = "xpboard")]
#[command(about = "Terminal dashboard for your XP, projects and results", long_about = None)]
#[command(version, long_version = concat!(env!("CARGO_PKG_VERSION"), " (built ", env!("BUILD_DATE"), ")"))]
struct Cli {
    /// Backend base URL, overriding the config file and XPBOARD_API_BASE
    #[arg(long, global = true)]
    api_base: Option<String>,

    /// Verbose output
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive dashboard (default)
    Dashboard,
    /// Sign in and remember the session
    Login {
        /// Username or email; prompted for when omitted
        #[arg(short = 'i', long)]
        identity: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Print the dashboard as text
    Summary {
        /// Number of projects to list (default: from config)
        #[arg(short = 't', long)]
        top: Option<usize>,

        /// Number of recent results to list (default: from config)
        #[arg(short = 'r', long)]
        recent: Option<usize>,
    },
    /// Write the charts as SVG files
    Export {
        /// Output directory (default: current directory)
        #[arg(short = 'o', long)]
        out: Option<PathBuf>,
    },
    /// Show or change the color theme (light, dark or toggle)
    Theme { value: Option<String> },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(_) => (),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let command = cli.command.unwrap_or(Commands::Dashboard);

    // The dashboard owns the terminal, so its logs go to a file
    if matches!(command, Commands::Dashboard) {
        if let Err(e) = logging::init_with_file("xpboard.log", cli.verbose) {
            eprintln!("Warning: file logging unavailable: {}", e);
        }
    } else {
        logging::init(cli.verbose);
    }

    let config = Config::load()?.with_env_override(cli.api_base);
    tracing::debug!(api_base = %config.api_base, "Loaded configuration");

    match command {
        Commands::Dashboard => {
            let export_dir = std::env::current_dir()?;
            interactive::run_interactive(config, export_dir).await
        }
        Commands::Login { identity } => login(&config, identity).await,
        Commands::Logout => {
            let mut session = Session::restore(open_store(StoreScope::Session));
            if !session.is_authenticated() {
                println!("Not signed in.");
                return Ok(());
            }
            session.logout()?;
            println!("Signed out.");
            Ok(())
        }
        Commands::Summary { top, recent } => {
            let view = fetch_view(&config).await?;
            let top = top.unwrap_or(config.top_projects);
            let recent = recent.unwrap_or(config.recent_results);

            let stdout = io::stdout();
            let mut out = stdout.lock();
            report::write_summary(&mut out, &view, top, recent)?;
            out.flush()?;
            Ok(())
        }
        Commands::Export { out } => {
            let dir = match out {
                Some(dir) => dir,
                None => std::env::current_dir()?,
            };
            let view = fetch_view(&config).await?;
            let theme = ThemeState::load(open_store(StoreScope::Durable), system_theme()).theme();

            for path in report::export_svgs(&view, theme, &dir)? {
                println!("Wrote {}", path.display());
            }
            Ok(())
        }
        Commands::Theme { value } => set_theme(value.as_deref()),
    }
}

async fn login(config: &Config, identity: Option<String>) -> Result<()> {
    let identity = match identity {
        Some(identity) => identity,
        None => prompt("Username or email")?,
    };
    let Some(password) = prompt_password("Password")? else {
        bail!("Login cancelled");
    };

    let client = ApiClient::new(config.normalized_api_base()?);
    let mut session = Session::restore(open_store(StoreScope::Session));
    session.login(&client, &identity, &password).await?;

    if let Some(token) = session.token() {
        tracing::debug!(token = %mask_token(token), "Session stored");
    }
    println!("Signed in as {}.", identity.trim());
    Ok(())
}

/// Fetch everything the text commands need, failing on the first fetch error
async fn fetch_view(config: &Config) -> Result<DashboardView> {
    let session = Session::restore(open_store(StoreScope::Session));
    let Some(token) = session.token() else {
        bail!("Not signed in. Run `xpboard login` first.");
    };

    let client = ApiClient::new(config.normalized_api_base()?);
    let resources = load_dashboard(&client, token, config).await;
    if let Some(err) = resources.first_error() {
        return Err(anyhow!("Failed to load dashboard: {}", err));
    }
    Ok(DashboardView::build(&resources, config))
}

fn set_theme(value: Option<&str>) -> Result<()> {
    let mut state = ThemeState::load(open_store(StoreScope::Durable), system_theme());

    let theme = match value.map(str::trim) {
        None => state.theme(),
        Some(v) if v.eq_ignore_ascii_case("toggle") => state.toggle()?,
        Some(v) => {
            let theme: Theme = v.parse()?;
            state.set(theme)?;
            theme
        }
    };
    println!("Theme: {}", theme);
    Ok(())
}
