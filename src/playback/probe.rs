//! Duration discovery for a media source.

use std::path::PathBuf;

use lofty::prelude::AudioFile;
use thiserror::Error;

use crate::library::MediaSource;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("cannot read media properties of {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: lofty::error::LoftyError,
    },

    #[error("duration of {0} is unknown")]
    UnknownDuration(String),
}

/// Resolve the duration of `source` in seconds.
///
/// Local files are probed from their container; a usable `hint` is the
/// fallback. Remote sources rely on the hint alone.
pub fn probe_duration(source: &MediaSource, hint: Option<f64>) -> Result<f64, ProbeError> {
    let hint = hint.filter(|d| d.is_finite() && *d > 0.0);

    match source {
        MediaSource::Url(url) => hint.ok_or_else(|| ProbeError::UnknownDuration(url.clone())),
        MediaSource::File(path) => match lofty::read_from_path(path) {
            Ok(tagged) => {
                let duration = tagged.properties().duration().as_secs_f64();
                if duration > 0.0 {
                    Ok(duration)
                } else {
                    hint.ok_or_else(|| ProbeError::UnknownDuration(path.display().to_string()))
                }
            }
            Err(source) => match hint {
                Some(d) => Ok(d),
                None => Err(ProbeError::Unreadable {
                    path: path.clone(),
                    source,
                }),
            },
        },
    }
}
