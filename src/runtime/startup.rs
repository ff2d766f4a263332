use std::env;
use std::path::PathBuf;

use crate::app::Controller;
use crate::audio::SessionFactory;
use crate::config;

/// Folder to load: first CLI argument, then `library.default_dir`, then the
/// current directory.
pub fn initial_dir(settings: &config::Settings) -> PathBuf {
    env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| settings.library.default_dir.clone())
        .or_else(|| env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

pub fn apply_playback_defaults<F: SessionFactory>(
    controller: &mut Controller<F>,
    settings: &config::Settings,
) {
    controller.set_loop(settings.playback.loop_enabled);

    let dir = initial_dir(settings);
    // A refused load is logged and shown in the panel; the player still starts.
    let _ = controller.load_folder(&dir, &settings.library, settings.playback.autoplay);
}
