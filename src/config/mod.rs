//! Build configuration: target platform selection and the resolved
//! directory/URL layout shared by every pipeline stage.
//!
//! `BuildPaths::resolve` is a pure function of the working directory and the
//! platform; it touches no filesystem state, so stages can be tested in
//! isolation against fabricated paths.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

/// Environment variable consulted for the target platform.
pub const PLATFORM_ENV: &str = "ENVPACK_PLATFORM";

/// Subdirectory of the repository the build commands are commonly invoked
/// from. When the working directory ends with this name, the repository
/// root is its parent.
const KNOWN_SUBDIR: &str = "webui";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unsupported platform `{0}`; expected one of: arc, ultra, ultra2")]
    UnsupportedPlatform(String),
}

/// Hardware generation the packaged environment targets.
///
/// The set is closed: each platform has its own requirements manifest in
/// the service directory and its own archive name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Arc,
    Ultra,
    Ultra2,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Arc, Platform::Ultra, Platform::Ultra2];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Arc => "arc",
            Platform::Ultra => "ultra",
            Platform::Ultra2 => "ultra2",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "arc" => Ok(Platform::Arc),
            "ultra" => Ok(Platform::Ultra),
            "ultra2" => Ok(Platform::Ultra2),
            other => Err(ConfigError::UnsupportedPlatform(other.to_string())),
        }
    }
}

/// Fixed remote artifacts consumed by the fetch stage.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceSet {
    /// Redistributable embeddable CPython build.
    pub python_embed_url: String,
    /// pip bootstrap script, run with the bundled interpreter.
    pub get_pip_url: String,
    /// Standalone 7-Zip binary. Only fetched on Windows hosts; elsewhere a
    /// system `7z` is expected on PATH.
    pub seven_zip_url: Option<String>,
    /// uv release archive (zip on Windows, tar.gz elsewhere).
    pub uv_archive_url: String,
}

impl ResourceSet {
    pub fn for_host() -> ResourceSet {
        ResourceSet::for_windows_host(cfg!(windows))
    }

    pub fn for_windows_host(windows: bool) -> ResourceSet {
        let uv_archive_url = if windows {
            "https://github.com/astral-sh/uv/releases/latest/download/uv-x86_64-pc-windows-msvc.zip"
        } else {
            "https://github.com/astral-sh/uv/releases/latest/download/uv-x86_64-unknown-linux-gnu.tar.gz"
        };

        ResourceSet {
            python_embed_url:
                "https://raw.githubusercontent.com/adang1345/PythonWindows/master/3.12.10/python-3.12.10-embed-amd64.zip"
                    .to_string(),
            get_pip_url: "https://bootstrap.pypa.io/get-pip.py".to_string(),
            seven_zip_url: windows.then(|| "https://www.7-zip.org/a/7zr.exe".to_string()),
            uv_archive_url: uv_archive_url.to_string(),
        }
    }

    /// All URLs the fetch stage downloads, in no particular order.
    pub fn download_urls(&self) -> Vec<&str> {
        let mut urls = vec![
            self.python_embed_url.as_str(),
            self.get_pip_url.as_str(),
            self.uv_archive_url.as_str(),
        ];
        if let Some(ref url) = self.seven_zip_url {
            urls.push(url.as_str());
        }
        urls
    }
}

/// Backend repositories cloned into the resources directory.
pub const COMFY_UI_REPO: &str = "https://github.com/comfyanonymous/ComfyUI.git";
pub const COMFY_UI_GGUF_REPO: &str = "https://github.com/city96/ComfyUI-GGUF.git";

/// Every directory and file location the pipeline reads or writes,
/// anchored at the repository root.
#[derive(Debug, Clone, Serialize)]
pub struct BuildPaths {
    pub platform: Platform,
    pub repo_root: PathBuf,
    /// Downloaded artifacts and relocated tool binaries.
    pub resources_dir: PathBuf,
    /// Python backend sources holding the requirements manifests.
    pub service_dir: PathBuf,
    /// The assembled embeddable interpreter environment.
    pub env_dir: PathBuf,
    /// Copy of the environment the manifests are installed into, keeping
    /// the assembled environment pristine.
    pub offline_env_dir: PathBuf,
    /// Reference location for native shared libraries the embeddable build
    /// lacks (libuv and friends).
    pub runtime_libs_dir: PathBuf,
    /// ComfyUI backend checkout.
    pub comfy_ui_dir: PathBuf,
    /// Final compressed environment.
    pub archive_path: PathBuf,
    /// Remote artifacts for the fetch stage.
    pub resources: ResourceSet,
}

impl BuildPaths {
    /// Resolve the full layout from a working directory and platform.
    pub fn resolve(cwd: &Path, platform: Platform) -> BuildPaths {
        let repo_root = repo_root_from(cwd);
        let resources_dir = repo_root.join("resources");
        let comfy_ui_dir = resources_dir.join("ComfyUI");
        let archive_path =
            resources_dir.join(format!("prototype-python-env-{}.7z", platform));

        BuildPaths {
            platform,
            service_dir: repo_root.join("service"),
            env_dir: repo_root.join("python-env"),
            offline_env_dir: repo_root
                .join("offline")
                .join(platform.as_str())
                .join("prototype-python-env"),
            runtime_libs_dir: resources_dir.join("runtime-libs"),
            comfy_ui_dir,
            archive_path,
            resources_dir,
            repo_root,
            resources: ResourceSet::for_host(),
        }
    }

    /// Requirements manifests in install order. Order matters: later
    /// manifests may pin over or depend on packages from earlier ones.
    pub fn requirements_manifests(&self) -> Vec<PathBuf> {
        vec![
            self.service_dir
                .join(format!("requirements-{}.txt", self.platform)),
            self.service_dir.join("requirements.txt"),
            self.comfy_ui_dir.join("requirements.txt"),
            self.comfy_ui_dir
                .join("custom_nodes")
                .join("ComfyUI-GGUF")
                .join("requirements.txt"),
        ]
    }

    /// The bundled interpreter binary inside the assembled environment.
    pub fn python_executable(&self) -> PathBuf {
        self.env_dir.join(python_binary_name())
    }
}

/// Name of the interpreter binary for the current host.
pub fn python_binary_name() -> &'static str {
    if cfg!(windows) {
        "python.exe"
    } else {
        "python"
    }
}

/// Name of the uv binary for the current host.
pub fn uv_binary_name() -> &'static str {
    if cfg!(windows) {
        "uv.exe"
    } else {
        "uv"
    }
}

fn repo_root_from(cwd: &Path) -> PathBuf {
    let in_known_subdir = cwd
        .file_name()
        .map(|name| name.to_string_lossy().eq_ignore_ascii_case(KNOWN_SUBDIR))
        .unwrap_or(false);

    if in_known_subdir {
        match cwd.parent() {
            Some(parent) => parent.to_path_buf(),
            None => cwd.to_path_buf(),
        }
    } else {
        cwd.to_path_buf()
    }
}
