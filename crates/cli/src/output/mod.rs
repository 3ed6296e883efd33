//! Output handling: formatter and shared output settings

mod formatter;

pub use formatter::Formatter;

/// How command output should be rendered
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputConfig {
    /// Emit strict JSON instead of human-readable text
    pub json: bool,
    /// Disable colors
    pub no_color: bool,
    /// Suppress everything except errors
    pub quiet: bool,
}
