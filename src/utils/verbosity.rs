use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

// -----------------------------------------------------------------------------
// Verbosity
// -----------------------------------------------------------------------------

/// The output verbosity level.
///
/// Displayed in lowercase, as expected by `RUST_LOG`.
///
/// ```rust
/// use hgtmap::Verbosity;
/// assert_eq!(Verbosity::default().to_string(), "info");
/// assert_eq!(Verbosity::Trace.to_string(), "trace");
/// ```
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Serialize, ValueEnum)]
pub enum Verbosity {
    #[default]
    Info,
    Warn,
    Error,
    /// Also log each gene hit and each matrix written.
    Debug,
    Trace,
}

impl Display for Verbosity {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let lowercase = format!("{:?}", self).to_lowercase();
        write!(f, "{lowercase}")
    }
}
