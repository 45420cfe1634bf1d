use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;
use std::path::PathBuf;

use vitrine::core::config::{self, CliOverrides};
use vitrine::core::extract::{build_level3_data, build_nav_tree};
use vitrine::core::state::{App, SurfacePreference};
use vitrine::core::store::NavStore;
use vitrine::tui;

#[derive(Parser)]
#[command(name = "vitrine", about = "Storefront navigation preview")]
struct Args {
    /// Authored navigation document (markdown)
    nav: Option<PathBuf>,

    /// Directory of third-level content fragments
    #[arg(long)]
    fragments: Option<PathBuf>,

    /// Pin the surface instead of following the viewport width
    #[arg(short, long, value_enum)]
    surface: Option<SurfacePreference>,

    /// Pin the first dropdown open for visual QA
    #[arg(long)]
    show_dropdown: bool,

    /// Debug mode (implies --show-dropdown)
    #[arg(long)]
    debug: bool,

    /// Print the linked navigation tree as JSON and exit
    #[arg(long)]
    dump: bool,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();

    // Initialize file logger - writes to vitrine.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create("vitrine.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    log::info!("Vitrine starting up");

    let file_config = config::load_config().unwrap_or_else(|e| {
        log::warn!("Config load failed ({e}), using defaults");
        Default::default()
    });
    let resolved = config::resolve(
        &file_config,
        &CliOverrides {
            nav_path: args.nav,
            fragments_dir: args.fragments,
            surface: args.surface,
        },
    );

    if args.dump {
        return dump_tree(&resolved);
    }

    let mut app = App::new(resolved.site_name.clone());
    app.surface_preference = resolved.surface;
    app.debug_pin_dropdown = args.show_dropdown || args.debug;

    tui::run(&resolved, app)
}

/// Synchronous pipeline for collaborators/QA: extract, link, print JSON.
fn dump_tree(config: &config::ResolvedConfig) -> std::io::Result<()> {
    let markup = std::fs::read_to_string(&config.nav_path)?;
    let mut store = NavStore::new();
    store.set_tree(build_nav_tree(&markup));

    if let Ok(entries) = std::fs::read_dir(&config.fragments_dir) {
        let mut paths: Vec<PathBuf> = entries
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|ext| ext == "md"))
            .collect();
        paths.sort();
        for path in paths {
            match std::fs::read_to_string(&path) {
                Ok(fragment) => {
                    if let Some(data) = build_level3_data(&fragment) {
                        store.add_level3(data);
                        store.link();
                    }
                }
                Err(e) => log::warn!("skipping fragment {}: {e}", path.display()),
            }
        }
    }

    match store.tree() {
        Some(tree) => {
            let json = serde_json::to_string_pretty(&*tree)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
            println!("{json}");
        }
        None => println!("null"),
    }
    Ok(())
}
