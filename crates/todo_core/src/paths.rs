use std::path::PathBuf;

/// App data directory (~/.todo)
pub fn todo_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(".todo")
}
