use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use implgen_core::SourceFile;
use walkdir::WalkDir;

/// Build output and VCS directories never hold hand-written sources
const SKIPPED_DIRS: &[&str] = &["bin", "obj", ".git", ".vs", "node_modules"];

/// A hand-written C# file: `.cs`, and not one of our own generated units
pub fn is_source_file(path: &Path, output_extension: &str) -> bool {
    let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    file_name.ends_with(".cs") && !file_name.ends_with(output_extension)
}

/// Expand files and directories into a sorted, deduplicated list of sources
pub fn find_source_files(paths: &[PathBuf], output_extension: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            files.push(path.clone());
            continue;
        }
        if !path.is_dir() {
            bail!("No such file or directory: {}", path.display());
        }

        for entry in WalkDir::new(path)
            .follow_links(true)
            .into_iter()
            .filter_entry(|e| {
                e.depth() == 0
                    || !e.file_type().is_dir()
                    || e
                        .file_name()
                        .to_str()
                        .is_none_or(|name| !SKIPPED_DIRS.contains(&name))
            })
            .filter_map(|e| e.ok())
        {
            if entry.file_type().is_file() && is_source_file(entry.path(), output_extension) {
                files.push(entry.path().to_path_buf());
            }
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}

pub fn read_sources(files: &[PathBuf]) -> Result<Vec<SourceFile>> {
    files
        .iter()
        .map(|path| {
            SourceFile::read(path).with_context(|| format!("Failed to read {}", path.display()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_is_source_file() {
        assert!(is_source_file(Path::new("src/Widget.cs"), ".g.cs"));
        assert!(!is_source_file(Path::new("Generated/Demo.Widget.g.cs"), ".g.cs"));
        assert!(!is_source_file(Path::new("README.md"), ".g.cs"));
    }

    #[test]
    fn test_find_source_files_skips_build_output() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("Models")).unwrap();
        fs::create_dir_all(root.join("obj/Debug")).unwrap();
        fs::write(root.join("Widget.cs"), "class Widget {}").unwrap();
        fs::write(root.join("Models/Customer.cs"), "class Customer {}").unwrap();
        fs::write(root.join("Models/Demo.Widget.g.cs"), "").unwrap();
        fs::write(root.join("obj/Debug/AssemblyInfo.cs"), "").unwrap();

        let files = find_source_files(&[root.to_path_buf()], ".g.cs").unwrap();
        assert_eq!(
            files,
            vec![root.join("Models/Customer.cs"), root.join("Widget.cs")]
        );
    }

    #[test]
    fn test_missing_path_is_an_error() {
        let temp = TempDir::new().unwrap();
        assert!(find_source_files(&[temp.path().join("missing")], ".g.cs").is_err());
    }
}
