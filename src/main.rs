use clap::Parser;
use modpanel::core::config;
use modpanel::fixture::{EventSpec, load_fixture};
use modpanel::panel::{Panel, Settled};
use modpanel::transport::HttpTransport;
use simplelog::{ConfigBuilder, WriteLogger};
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "modpanel", about = "Drive a moderation panel page against a forum server")]
struct Args {
    /// Page fixture (TOML) to load
    #[arg(short, long)]
    page: PathBuf,

    /// Forum base URL (overrides config and MODPANEL_BASE_URL)
    #[arg(short, long)]
    base_url: Option<String>,

    /// Event to fire, as KIND:SELECTOR[=VALUE]; repeatable, fired in order
    #[arg(short, long = "event")]
    events: Vec<EventSpec>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    let file_config = config::load_config().unwrap_or_else(|e| {
        eprintln!("{e}; using defaults");
        config::PanelConfig::default()
    });
    let resolved = config::resolve(&file_config, args.base_url.as_deref());

    // Initialize file logger - writes to modpanel.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("modpanel.log") {
        let _ = WriteLogger::init(resolved.log_level, log_config, log_file);
    }

    log::info!("modpanel starting against {}", resolved.base_url);

    let state = load_fixture(&args.page)?.with_confirm_label(&resolved.confirm_label);
    let transport = Arc::new(HttpTransport::new(Some(resolved.base_url.clone())));
    let mut panel = Panel::moderation(state, &resolved.action_prefix, transport)?;

    for spec in &args.events {
        let event = spec.resolve(panel.state_mut())?;
        for settled in panel.fire(event).await {
            match settled {
                Settled::Transitioned { path, transition } => println!("{path}: {transition:?}"),
                Settled::Rejected { path, status } => println!("{path}: rejected ({status})"),
                Settled::Failed { path, error } => println!("{path}: {error}"),
            }
        }
    }

    let location = &panel.state().location;
    println!("location: {}", location.path);
    println!("reloads: {}", location.reloads);
    for path in &location.navigations {
        println!("navigated: {path}");
    }
    Ok(())
}
