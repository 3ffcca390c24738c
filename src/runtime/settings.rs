use crate::config;

/// Load settings, falling back to defaults. Logging is not up yet, so
/// problems go to stderr before the terminal switches screens.
pub fn load_settings() -> config::Settings {
    match config::Settings::load() {
        Ok(s) => {
            if let Err(msg) = s.validate() {
                eprintln!("lectern: invalid config, using defaults: {msg}");
                config::Settings::default()
            } else {
                s
            }
        }
        Err(e) => {
            // Config is optional; failures should not prevent the app from starting.
            eprintln!("lectern: failed to load config, using defaults: {e}");
            config::Settings::default()
        }
    }
}
