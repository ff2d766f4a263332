mod app;
mod artwork;
mod audio;
mod config;
mod error;
mod library;
mod runtime;
mod skin;
mod ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
