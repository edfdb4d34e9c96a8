/// Headless crisis map.
///
/// Loads configuration, pulls the current reports and volunteers from the
/// reporting backend, places them on an in-memory map and prints the
/// rendered lists with a short summary.
///
/// Usage: crisis_map [config.toml]

use std::env;
use std::error::Error;

use crisis_map::client::{HttpBackend, NominatimGeocoder};
use crisis_map::config::{Config, DEFAULT_CONFIG_PATH};
use crisis_map::logging::{self, Component};
use crisis_map::map::MemoryMap;
use crisis_map::notify::ConsoleNotifier;
use crisis_map::render::HtmlLists;
use crisis_map::CrisisMap;

fn main() -> Result<(), Box<dyn Error>> {
    let config_path = env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = Config::load(&config_path)?;

    logging::init_logger(
        config.log_level(),
        config.logging.file.as_deref(),
        config.logging.console_timestamps,
    );
    logging::info(
        Component::System,
        None,
        &format!("backend {} / geocoder {}", config.backend.base_url, config.geocoder.base_url),
    );

    let geocoder = NominatimGeocoder::new(&config.geocoder)?;
    let backend = HttpBackend::new(&config.backend)?;
    let map = MemoryMap::new(config.map.initial_center(), config.map.initial_zoom);

    let mut app = CrisisMap::new(
        &config,
        Box::new(geocoder),
        Box::new(backend),
        map,
        HtmlLists::default(),
        ConsoleNotifier,
    );
    app.start();

    println!("\n── Reports ─────────────────────────────────────────────");
    println!("{}", app.display().reports);
    println!("\n── Volunteers ──────────────────────────────────────────");
    println!("{}", app.display().volunteers);

    let (center, zoom) = app.markers().map().view();
    println!("\n═══════════════════════════════════════════════════════");
    println!("Reports:    {} synced, {} pending", app.reports().synced().len(), app.reports().pending().len());
    println!("Volunteers: {}", app.volunteers().len());
    println!("Markers:    {}", app.markers().len());
    println!("Viewport:   ({:.4}, {:.4}) zoom {}", center.latitude, center.longitude, zoom);
    println!("═══════════════════════════════════════════════════════");

    Ok(())
}
