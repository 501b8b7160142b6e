use anyhow::Result;
use clap::{Parser, Subcommand};
use cli::{logging, prompt, report};
use fga_core::clock::SystemClock;
use fga_core::config::{self, AppConfig};
use fga_core::driver::{self, RunOptions};
use fga_core::selection::Selection;
use fga_core::{builder, client};
use std::io;
use std::path::PathBuf;
use tracing::warn;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let cfg = config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Add {
            app_api_key_info_json,
            user_auth_info_json,
            request_set_json_dir,
        } => {
            run_add(
                cfg,
                app_api_key_info_json,
                user_auth_info_json,
                request_set_json_dir,
            )
            .await
        }
        Commands::Build {
            app_api_key_info_json,
            user_auth_info_json,
            request_set_json_dir,
        } => {
            run_build(
                cfg,
                app_api_key_info_json,
                user_auth_info_json,
                request_set_json_dir,
            )
            .await
        }
    }
}

#[derive(Parser)]
#[command(name = "fga")]
#[command(about = "Add Flickr photos to group pools, one attempt per day", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(short, long)]
    config: Option<String>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Work through every request set in a directory
    Add {
        /// JSON file with app API auth info
        app_api_key_info_json: PathBuf,
        /// JSON file with user auth info
        user_auth_info_json: PathBuf,
        /// Directory of JSON files with picture->group add requests
        request_set_json_dir: PathBuf,
    },
    /// Interactively pick groups for one photo and write a request set
    Build {
        /// JSON file with app API auth info
        app_api_key_info_json: PathBuf,
        /// JSON file with user auth info
        user_auth_info_json: PathBuf,
        /// Directory where request set JSON files should be stored
        request_set_json_dir: PathBuf,
    },
}

async fn run_add(
    cfg: AppConfig,
    app_key: PathBuf,
    user_auth: PathBuf,
    request_dir: PathBuf,
) -> Result<()> {
    let flickr = client::connect(&cfg, &app_key, &user_auth)?;
    let options = RunOptions {
        on_membership_error: cfg.run.on_membership_error,
    };
    let stats = driver::run_directory(&flickr, &request_dir, &SystemClock, &options).await?;
    println!("{}", report::render_stats(&stats)?);
    Ok(())
}

async fn run_build(
    cfg: AppConfig,
    app_key: PathBuf,
    user_auth: PathBuf,
    output_dir: PathBuf,
) -> Result<()> {
    builder::ensure_output_dir(&output_dir)?;
    let flickr = client::connect(&cfg, &app_key, &user_auth)?;
    let catalog = builder::fetch_catalog(&flickr).await?;
    if catalog.is_empty() {
        warn!("No groups available to post to");
    }

    let mut input = io::stdin().lock();
    let mut out = io::stdout();
    let photo_id = prompt::ask_photo_id(&mut input, &mut out)?;
    let mut selection = Selection::new(catalog);
    prompt::choose_groups(&mut selection, &photo_id, &mut input, &mut out)?;

    let file = selection.into_request_set(&photo_id);
    println!("{}", storage::to_pretty_string(&file)?);
    builder::save_request_set(&output_dir, &file)?;
    Ok(())
}
