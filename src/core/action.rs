//! Side effects the app asks the binary to carry out

/// Returned by key and command handlers; the app itself stays free of I/O
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// No action needed
    None,

    /// Copy text to the system clipboard
    Copy(String),

    /// Write the filtered listing set to a CSV file
    Export,

    /// Show notification in status bar
    Notify(String, NotifyLevel),

    /// Request quit
    Quit,
}

/// Notification levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyLevel {
    Info,
    Warn,
    Error,
}
