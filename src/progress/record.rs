use serde::{Deserialize, Deserializer, Serialize};

/// Watch percentage at which a lecture counts as completed.
pub const COMPLETION_THRESHOLD: f64 = 95.0;

/// Persisted watch state for one lecture.
///
/// Serialized with camelCase keys (`currentTime`, `watchPercentage`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProgressRecord {
    #[serde(deserialize_with = "lenient_seconds")]
    pub current_time: f64,
    #[serde(deserialize_with = "lenient_seconds")]
    pub duration: f64,
    pub completed: bool,
    #[serde(deserialize_with = "lenient_seconds")]
    pub watch_percentage: f64,
}

// Older blobs may carry `null` where a non-finite number was written.
fn lenient_seconds<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<f64>::deserialize(deserializer)?;
    Ok(value.filter(|v| v.is_finite() && *v >= 0.0).unwrap_or(0.0))
}

/// Coarse state used for list status icons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LectureStatus {
    NotStarted,
    InProgress,
    Completed,
}

impl ProgressRecord {
    /// Zero-state record for a lecture of (possibly unknown) `duration`.
    pub fn new(duration: f64) -> Self {
        Self {
            duration: duration.max(0.0),
            ..Self::default()
        }
    }

    /// The record after playback reached `current_time` of `duration`.
    ///
    /// Returns `None` when the duration is not usable yet. Completion only
    /// ever turns on here; seeking backwards never clears it.
    pub fn with_position(self, current_time: f64, duration: f64) -> Option<Self> {
        if !(duration.is_finite() && duration > 0.0) {
            return None;
        }
        let current_time = if current_time.is_finite() {
            current_time.max(0.0)
        } else {
            0.0
        };
        let watch_percentage = (100.0 * current_time / duration).clamp(0.0, 100.0);

        Some(Self {
            current_time,
            watch_percentage,
            completed: self.completed || watch_percentage >= COMPLETION_THRESHOLD,
            ..self
        })
    }

    /// The record after playback ran to the natural end. Position rewinds so
    /// the next viewing starts from the top.
    pub fn finished(self) -> Self {
        Self {
            current_time: 0.0,
            completed: true,
            watch_percentage: 100.0,
            ..self
        }
    }

    /// Where to resume: the stored position while partially watched, else 0.
    pub fn resume_time(&self) -> f64 {
        if !self.completed && self.current_time > 0.0 && self.current_time < self.duration {
            self.current_time
        } else {
            0.0
        }
    }

    pub fn status(&self) -> LectureStatus {
        if self.completed {
            LectureStatus::Completed
        } else if self.watch_percentage > 0.0 {
            LectureStatus::InProgress
        } else {
            LectureStatus::NotStarted
        }
    }
}
