mod bootstrap;

use anyhow::Result;
use tally_core::settings::Settings;
use tally_ui::app::App;

fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::ensure_directories()?;
    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_deref())?;

    tracing::info!("tally v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Tool: {}, Theme: {}, Trend window: {}, Cloud dimensions: {}",
        settings.tool,
        settings.theme,
        settings.trend_window,
        settings.dimensions
    );
    if let Some(seed) = settings.seed {
        tracing::info!("Random sources seeded with {}", seed);
    }

    // The loop exits on 'q' / Ctrl+C inside the TUI and restores the terminal.
    App::from_settings(&settings)?.run()?;

    tracing::info!("tally exiting");
    Ok(())
}
