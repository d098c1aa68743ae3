//! Dependency install stage.
//!
//! Copies the assembled environment into the offline output directory,
//! then runs the bundled interpreter there: first the pip bootstrap script,
//! then one `pip install -r` per requirements manifest in fixed order. The
//! assembled environment itself stays pristine. Output streams through
//! verbatim; the first non-zero exit aborts the stage and no later manifest
//! is attempted.

use anyhow::{bail, Result};

use crate::config::{python_binary_name, BuildPaths};
use crate::util::fs::{copy_dir_all, existing, remove_dir_all_if_exists};
use crate::util::ProcessBuilder;

/// Run the whole install stage against the resolved layout.
pub fn install_dependencies(paths: &BuildPaths) -> Result<()> {
    let python = paths.python_executable();
    if !python.exists() {
        bail!(
            "python executable not found: {} (run `envpack assemble` first)",
            python.display()
        );
    }

    existing(paths.env_dir.join("get-pip.py"))?;

    // Every manifest must exist up front; failing midway through an install
    // sequence leaves a half-provisioned environment for no good reason.
    let manifests = paths
        .requirements_manifests()
        .into_iter()
        .map(existing)
        .collect::<Result<Vec<_>>>()?;

    // Install into a fresh copy so the assembled environment stays a clean
    // starting point for other platforms.
    remove_dir_all_if_exists(&paths.offline_env_dir)?;
    tracing::info!(
        "copying {} to {}",
        paths.env_dir.display(),
        paths.offline_env_dir.display()
    );
    copy_dir_all(&paths.env_dir, &paths.offline_env_dir)?;

    let get_pip = paths.offline_env_dir.join("get-pip.py");
    tracing::info!("installing pip into {}", paths.offline_env_dir.display());
    python_command(paths).arg(&get_pip).status_and_check()?;

    for manifest in manifests {
        tracing::info!("installing python dependencies from {}", manifest.display());
        python_command(paths)
            .args(["-m", "pip", "install", "-r"])
            .arg(&manifest)
            .status_and_check()?;
    }

    Ok(())
}

/// Interpreter invocation rooted in the offline environment copy, isolated
/// from any system-wide Python installation. The cwd matters: relative
/// paths inside manifests resolve against it.
fn python_command(paths: &BuildPaths) -> ProcessBuilder {
    ProcessBuilder::new(paths.offline_env_dir.join(python_binary_name()))
        .cwd(&paths.offline_env_dir)
        .env_remove("PYTHONPATH")
        .env_remove("PYTHONHOME")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Platform;
    use tempfile::TempDir;

    #[test]
    fn test_install_fails_before_any_command_without_interpreter() {
        let tmp = TempDir::new().unwrap();
        let paths = BuildPaths::resolve(tmp.path(), Platform::Arc);
        std::fs::create_dir_all(&paths.env_dir).unwrap();

        let err = install_dependencies(&paths).unwrap_err();
        assert!(err.to_string().contains("python executable not found"));
    }

    #[test]
    fn test_install_requires_every_manifest_up_front() {
        let tmp = TempDir::new().unwrap();
        let paths = BuildPaths::resolve(tmp.path(), Platform::Arc);
        std::fs::create_dir_all(&paths.env_dir).unwrap();
        std::fs::write(paths.python_executable(), "").unwrap();
        std::fs::write(paths.env_dir.join("get-pip.py"), "").unwrap();

        // service/requirements-arc.txt is absent, so the stage fails before
        // the interpreter would ever be invoked.
        let err = install_dependencies(&paths).unwrap_err();
        assert!(err.to_string().contains("requirements-arc.txt"));
        // Nothing was copied either: preconditions come first.
        assert!(!paths.offline_env_dir.exists());
    }
}
