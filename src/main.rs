mod app;
mod config;
mod library;
mod playback;
mod progress;
mod runtime;
mod storage;
mod ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
