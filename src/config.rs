use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Pawdesk";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get the application data directory
/// ~/Pawdesk/ on all platforms (user-visible by design)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("Pawdesk")
}

/// Get the path of the embedded record store
pub fn database_path() -> PathBuf {
    app_data_dir().join("pawdesk.db")
}

/// Default tracing filter when RUST_LOG is unset
pub fn default_log_filter() -> &'static str {
    "info,pawdesk=debug"
}
