use std::path::{Path, PathBuf};

/// Installs the global `tracing` subscriber, filtered by `RUST_LOG`.
pub fn subscriber() {
    tracing_subscriber::FmtSubscriber::builder()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
}

/// Loads the `.env` file of the current directory, if there is one.
///
/// Variables already set in the environment take precedence.
pub fn load_dotenv() {
    if let Ok(cwd) = std::env::current_dir() {
        load_dotenv_in(&cwd);
    }
}

fn load_dotenv_in(dir: &Path) -> Option<PathBuf> {
    let path = dir.join(".env");
    if !path.is_file() {
        return None;
    }
    match dotenvy::from_path(&path) {
        Ok(()) => {
            debug!(path = %path.display(), "loaded .env");
            Some(path)
        }
        Err(err) => {
            warn!(path = %path.display(), %err, "failed to load .env");
            None
        }
    }
}
