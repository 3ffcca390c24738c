//! Application module: exposes the app model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model`; folder selection and the playback
//! session are implemented on it in `app::folder` and `app::session`.

mod folder;
mod model;
mod session;

pub use model::*;

#[cfg(test)]
mod tests;
