use std::path::Path;
use tower_http::services::{ServeDir, ServeFile};

/// Serves the built UI from disk.
///
/// Unknown paths fall back to `index.html` so the client can handle them.
pub fn spa_service(dist_dir: &Path) -> ServeDir<ServeFile> {
    ServeDir::new(dist_dir).fallback(ServeFile::new(dist_dir.join("index.html")))
}
