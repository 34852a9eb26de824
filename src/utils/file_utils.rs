use std::path::{Path, PathBuf};
use std::fs;
use anyhow::{Result, Context, bail};
use log::{debug, trace};
use walkdir::WalkDir;

/// Extensions of files treated as timetable text when walking a directory
pub const TIMETABLE_EXTENSIONS: [&str; 2] = ["csv", "txt"];

/// Whether a path looks like a timetable export
pub fn is_timetable_file(path: impl AsRef<Path>) -> bool {
    path.as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            TIMETABLE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

/// Walk a directory for timetable files, in file-name order
fn timetable_files_in(dir: &Path) -> Vec<PathBuf> {
    debug!("Collecting timetable files from {}", dir.display());

    let files = WalkDir::new(dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && is_timetable_file(e.path()))
        .inspect(|e| trace!("Found timetable: {}", e.path().display()))
        .map(|e| e.into_path())
        .collect::<Vec<_>>();

    debug!("Collected {} timetable files from {}", files.len(), dir.display());
    files
}

/// Expand a list of input paths: files are kept as given, directories are
/// walked for timetable files.
pub fn collect_inputs(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut inputs = Vec::new();

    for path in paths {
        if path.is_dir() {
            inputs.extend(timetable_files_in(path));
        } else if path.is_file() {
            inputs.push(path.clone());
        } else {
            bail!("Input path does not exist: {}", path.display());
        }
    }

    Ok(inputs)
}

/// Read a text file, dropping a leading UTF-8 byte-order mark that
/// spreadsheet exports often carry
pub fn read_text(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file {}", path.display()))?;

    Ok(match content.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => content,
    })
}
