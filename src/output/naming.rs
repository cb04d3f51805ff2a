use std::path::{Path, PathBuf};

/// Picks a report path that does not exist yet
///
/// Tries `<dir>/<base>.<ext>` first, then `<base>_1.<ext>`, `<base>_2.<ext>`
/// and so on until a free name is found. Existing reports are never
/// overwritten.
///
/// # Example
///
/// ```no_run
/// use pagemap::output::unique_output_path;
/// use std::path::Path;
///
/// let path = unique_output_path(Path::new("."), "basic_sitemap_output", "csv");
/// println!("Writing {}", path.display());
/// ```
pub fn unique_output_path(dir: &Path, base_name: &str, extension: &str) -> PathBuf {
    let candidate = dir.join(format!("{}.{}", base_name, extension));
    if !candidate.exists() {
        return candidate;
    }

    (1u64..)
        .map(|i| dir.join(format!("{}_{}.{}", base_name, i, extension)))
        .find(|path| !path.exists())
        .unwrap_or(candidate)
}
