use std::sync::Arc;

use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::info;

use crate::app::Controller;
use crate::artwork::EmbeddedArtwork;
use crate::audio::RodioOutput;
use crate::skin::Skin;

mod event_loop;
mod logging;
mod settings;
mod startup;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, config_warning) = settings::load_settings();
    let log_path = logging::init(&settings.logging);
    settings::report(config_warning);
    if let Some(path) = &log_path {
        info!(log = %path.display(), "skinamp starting");
    }

    let mut skin = Skin::from_settings(&settings.skin);
    let mut controller = Controller::new(RodioOutput::open_default(), Arc::new(EmbeddedArtwork));
    startup::apply_playback_defaults(&mut controller, &settings);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(&mut terminal, &mut controller, &mut skin);

    controller.stop();
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("skinamp closed");
    run_result
}
