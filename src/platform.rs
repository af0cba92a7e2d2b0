/// Platform base-path resolution
///
/// Every `load` call concatenates a process-wide base path with a relative
/// resource path. On desktop targets the base path is the directory holding
/// the running executable; on wasm it is empty (resources resolve relative to
/// the page URL). The returned string carries no trailing separator, so
/// relative paths supply their own.
use std::env;

/// Resolve the platform base path for music resources.
///
/// Never fails: when the executable path cannot be determined the local data
/// directory is used, and as a last resort the current directory (`"."`).
#[cfg(not(target_arch = "wasm32"))]
pub fn resolve_base_path() -> String {
    if let Ok(exe) = env::current_exe() {
        if let Some(dir) = exe.parent() {
            return dir.to_string_lossy().into_owned();
        }
    }

    if let Some(dir) = dirs::data_local_dir() {
        tracing::warn!(
            "Could not determine executable directory, using data dir: {}",
            dir.display()
        );
        return dir.to_string_lossy().into_owned();
    }

    tracing::warn!("Could not resolve a base path, falling back to \".\"");
    ".".to_string()
}

#[cfg(target_arch = "wasm32")]
pub fn resolve_base_path() -> String {
    // Resource fetches already resolve against the page location.
    String::new()
}
