use std::path::PathBuf;
use tempfile::TempDir;

/// Create a data file of `size` bytes in a fresh temporary directory.
///
/// The directory is removed when the returned `TempDir` is dropped, so
/// callers must keep it alive for as long as they use the path.
pub(crate) fn create_data_file(size: usize) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("data.dat");
    std::fs::write(&path, vec![b'.'; size]).unwrap();
    (temp_dir, path)
}

/// Write a command file next to the data file and return its path.
pub(crate) fn write_command_file(temp_dir: &TempDir, lines: &[&str]) -> PathBuf {
    let path = temp_dir.path().join("commands.txt");
    let mut content = lines.join("\n");
    content.push('\n');
    std::fs::write(&path, content).unwrap();
    path
}
