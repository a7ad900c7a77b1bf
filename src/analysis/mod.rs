//! Level measurement and silence classification

/// Silence classification of frame windows
pub mod classify;
/// Per-track content statistics
pub mod content;
/// RMS and peak level measurement
pub mod energy;

pub use classify::is_silent;
pub use content::{ContentReport, SilenceClass};
pub use energy::{buffer_rms, peak_level, rms_energy, to_dbfs};
