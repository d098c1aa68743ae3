//! Environment assembly stage.
//!
//! Turns the downloaded embeddable interpreter zip into a working
//! environment directory: full reset of the target, extraction, path
//! configuration, pip bootstrap script, and the native shared libraries the
//! embeddable build ships without.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use regex::Regex;

use crate::config::BuildPaths;
use crate::util::archive::extract_zip;
use crate::util::fs::{copy_dir_files, existing, remove_dir_all_if_exists, write_string};

/// Run the whole assembly stage against the resolved layout.
pub fn assemble_env(paths: &BuildPaths) -> Result<()> {
    let python_zip = find_python_embed_zip(&paths.resources_dir)?;
    let get_pip = existing(paths.resources_dir.join("get-pip.py"))?;
    if !paths.runtime_libs_dir.exists() {
        // The embeddable build ships without libuv and friends; an
        // environment missing them fails much later and much less clearly.
        bail!(
            "runtime library directory not found: {}",
            paths.runtime_libs_dir.display()
        );
    }

    // Full reset, never an incremental merge: stale packages or path
    // configuration from a prior run must not survive.
    remove_dir_all_if_exists(&paths.env_dir)?;

    tracing::info!(
        "extracting {} into {}",
        python_zip.display(),
        paths.env_dir.display()
    );
    extract_zip(&python_zip, &paths.env_dir)?;

    let version = patch_pth_file(&paths.env_dir)?;
    tracing::info!("patched module search path for python{}", version);

    fs::copy(&get_pip, paths.env_dir.join("get-pip.py"))
        .with_context(|| format!("failed to copy {}", get_pip.display()))?;

    patch_runtime_libs(paths)?;

    Ok(())
}

/// The embeddable interpreter archive inside the resources directory.
fn find_python_embed_zip(resources_dir: &Path) -> Result<PathBuf> {
    let entries = fs::read_dir(resources_dir)
        .with_context(|| format!("failed to read directory: {}", resources_dir.display()))?;

    for entry in entries {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with("python-") && name.ends_with(".zip") {
            return Ok(entry.path());
        }
    }

    bail!(
        "no embeddable python zip found in {} (run `envpack fetch` first)",
        resources_dir.display()
    )
}

/// Locate the version-bearing `python<NNN>._pth` file in the extracted tree
/// and overwrite it with the fixed search-path template. Returns the
/// detected version digits.
pub fn patch_pth_file(env_dir: &Path) -> Result<String> {
    let entries = fs::read_dir(env_dir)
        .with_context(|| format!("failed to read directory: {}", env_dir.display()))?;

    for entry in entries {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if let Some(version) = parse_pth_version(&name) {
            write_string(&entry.path(), &pth_template(version))?;
            return Ok(version.to_string());
        }
    }

    // The version cannot be assumed; without the file the interpreter has
    // no standard library and every later stage would fail obscurely.
    bail!(
        "could not find a python*._pth file in {}",
        env_dir.display()
    )
}

/// Extract the version digits from a `python<NNN>._pth` file name.
pub fn parse_pth_version(file_name: &str) -> Option<&str> {
    let re = Regex::new(r"^python(\d+)\._pth$").unwrap();
    re.captures(file_name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Search-path template written over the stock `._pth` file: the bundled
/// stdlib archive, the environment itself, and the sibling service
/// directory, with site enabled so pip-installed packages are importable.
fn pth_template(version: &str) -> String {
    format!(
        "python{}.zip\n.\n../service\n\n# Uncomment to run site.main() automatically\nimport site\n",
        version
    )
}

/// Copy native shared libraries from the reference location into the
/// environment root. The embeddable build ships without libuv and friends.
fn patch_runtime_libs(paths: &BuildPaths) -> Result<()> {
    let copied = copy_dir_files(&paths.runtime_libs_dir, &paths.env_dir)?;
    tracing::info!(
        "copied {} native libraries into {}",
        copied.len(),
        paths.env_dir.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;

    use crate::config::Platform;

    fn write_embed_zip(path: &Path) {
        let file = fs::File::create(path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        let options = SimpleFileOptions::default();

        writer.start_file("python312._pth", options).unwrap();
        writer.write_all(b"python312.zip\n.\n").unwrap();
        writer.start_file("python.exe", options).unwrap();
        writer.finish().unwrap();
    }

    fn fetched_layout(root: &Path) -> BuildPaths {
        let paths = BuildPaths::resolve(root, Platform::Arc);
        fs::create_dir_all(&paths.resources_dir).unwrap();
        write_embed_zip(&paths.resources_dir.join("python-3.12.10-embed-amd64.zip"));
        fs::write(paths.resources_dir.join("get-pip.py"), "# bootstrap").unwrap();
        paths
    }

    #[test]
    fn test_parse_pth_version() {
        assert_eq!(parse_pth_version("python312._pth"), Some("312"));
        assert_eq!(parse_pth_version("python311._pth"), Some("311"));
    }

    #[test]
    fn test_parse_pth_version_rejects_malformed_names() {
        assert_eq!(parse_pth_version("python._pth"), None);
        assert_eq!(parse_pth_version("python312.pth"), None);
        assert_eq!(parse_pth_version("python3.12._pth"), None);
        assert_eq!(parse_pth_version("notpython312._pth"), None);
        assert_eq!(parse_pth_version("python312._pth.bak"), None);
    }

    #[test]
    fn test_patch_pth_file_writes_template() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("python312._pth"), "python312.zip\n").unwrap();
        fs::write(tmp.path().join("python.exe"), "").unwrap();

        let version = patch_pth_file(tmp.path()).unwrap();
        assert_eq!(version, "312");

        // Exactly the fixed template, nothing stale around it.
        let content = fs::read_to_string(tmp.path().join("python312._pth")).unwrap();
        assert_eq!(
            content,
            "python312.zip\n.\n../service\n\n# Uncomment to run site.main() automatically\nimport site\n"
        );
    }

    #[test]
    fn test_assemble_fails_without_runtime_libs_dir() {
        let tmp = TempDir::new().unwrap();
        let paths = fetched_layout(tmp.path());

        let err = assemble_env(&paths).unwrap_err();
        assert!(err
            .to_string()
            .contains("runtime library directory not found"));
        assert!(err.to_string().contains("runtime-libs"));
        // Preconditions run before the reset, so nothing was assembled.
        assert!(!paths.env_dir.exists());
    }

    #[test]
    fn test_assemble_produces_patched_environment() {
        let tmp = TempDir::new().unwrap();
        let paths = fetched_layout(tmp.path());
        fs::create_dir_all(&paths.runtime_libs_dir).unwrap();
        fs::write(paths.runtime_libs_dir.join("uv.dll"), "lib").unwrap();

        assemble_env(&paths).unwrap();

        assert!(paths.env_dir.join("python.exe").exists());
        assert!(paths.env_dir.join("get-pip.py").exists());
        assert!(paths.env_dir.join("uv.dll").exists());
        let content = fs::read_to_string(paths.env_dir.join("python312._pth")).unwrap();
        assert_eq!(
            content,
            "python312.zip\n.\n../service\n\n# Uncomment to run site.main() automatically\nimport site\n"
        );
    }

    #[test]
    fn test_patch_pth_file_fails_without_pth() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("python.exe"), "").unwrap();

        let err = patch_pth_file(tmp.path()).unwrap_err();
        assert!(err.to_string().contains("python*._pth"));
    }

    #[test]
    fn test_find_python_embed_zip_names_missing_dir_contents() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("get-pip.py"), "").unwrap();

        let err = find_python_embed_zip(tmp.path()).unwrap_err();
        assert!(err.to_string().contains("no embeddable python zip"));
    }
}
