//! Loading the engine from a dynamic library
//!
//! A bare name (`hermes_ffi_test`) is expanded with the platform naming
//! conventions (`lib{name}.so`, `lib{name}.dylib`, `{name}.dll`) and looked
//! up in [`search_order`]. A file name that already carries a library
//! extension (`libm.so.6`) is looked up as is, and handed to the platform
//! loader unchanged when no search path holds it. A path is used directly.

use crate::engine::SymbolSource;
use crate::error::{FfiError, FfiResult};
use hermes_config::EngineConfig;
use libloading::{Library, Symbol};
use std::path::{Path, PathBuf};

/// Library loading errors
#[derive(Debug, Clone, PartialEq)]
pub enum LoadError {
    /// No configured engine library
    NotConfigured,
    /// Library file not found in search paths
    LibraryNotFound { name: String, searched: Vec<PathBuf> },
    /// The platform loader rejected the file
    LoadFailed { path: PathBuf, reason: String },
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::NotConfigured => write!(f, "No engine library configured"),
            LoadError::LibraryNotFound { name, searched } => write!(
                f,
                "Library not found: {} (searched {} directories)",
                name,
                searched.len()
            ),
            LoadError::LoadFailed { path, reason } => {
                write!(f, "Failed to load library {}: {}", path.display(), reason)
            }
        }
    }
}

impl std::error::Error for LoadError {}

/// An engine living in a dynamic library
///
/// # Safety
///
/// Loading a dynamic library runs its initialization code in this process.
/// The library must be trusted and must export the engine symbols with the
/// signatures declared in [`crate::engine`].
pub struct EngineLibrary {
    path: PathBuf,
    library: Library,
}

impl EngineLibrary {
    /// Load the library named in `config`
    pub fn open(config: &EngineConfig) -> Result<Self, LoadError> {
        let name = config.library.as_deref().ok_or(LoadError::NotConfigured)?;
        Self::open_in(name, &search_order(config))
    }

    /// Load a library by name or path, looking in `search_paths` in order
    pub fn open_in(name: &str, search_paths: &[PathBuf]) -> Result<Self, LoadError> {
        let path = resolve_library_path(name, search_paths).ok_or_else(|| {
            LoadError::LibraryNotFound {
                name: name.to_string(),
                searched: search_paths.to_vec(),
            }
        })?;

        let library = unsafe { Library::new(&path) }.map_err(|e| LoadError::LoadFailed {
            path: path.clone(),
            reason: e.to_string(),
        })?;

        tracing::info!(path = %path.display(), "loaded engine library");
        Ok(Self { path, library })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SymbolSource for EngineLibrary {
    fn resolve(&self, name: &str) -> FfiResult<*const ()> {
        let symbol: Symbol<'_, *const ()> = unsafe { self.library.get(name.as_bytes()) }
            .map_err(|_| FfiError::SymbolNotFound(name.to_string()))?;
        Ok(*symbol)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(target_os = "linux")]
const SYSTEM_LIBRARY_DIRS: &[&str] = &["/usr/local/lib", "/usr/lib", "/lib", "/usr/lib64", "/lib64"];

#[cfg(target_os = "macos")]
const SYSTEM_LIBRARY_DIRS: &[&str] = &["/usr/local/lib", "/opt/homebrew/lib", "/usr/lib"];

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
const SYSTEM_LIBRARY_DIRS: &[&str] = &[];

/// Where an engine library is looked for, in order
///
/// 1. the configured search paths
/// 2. the directory of the running executable, where build tools place
///    libraries built alongside it
/// 3. the current directory
/// 4. the system library directories (on Windows, `%SystemRoot%\System32`)
pub fn search_order(config: &EngineConfig) -> Vec<PathBuf> {
    let mut paths = config.search_paths.clone();

    let beside_executable = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf));
    paths.extend(beside_executable);
    paths.extend(std::env::current_dir().ok());

    paths.extend(SYSTEM_LIBRARY_DIRS.iter().map(PathBuf::from));
    #[cfg(target_os = "windows")]
    paths.extend(std::env::var_os("SystemRoot").map(|root| PathBuf::from(root).join("System32")));

    paths.dedup();
    paths
}

/// Candidate file names for a library name, in priority order
fn candidate_file_names(name: &str) -> Vec<String> {
    let extensions: &[&str] = if cfg!(target_os = "windows") {
        &["dll"]
    } else if cfg!(target_os = "macos") {
        &["dylib", "so"]
    } else {
        &["so"]
    };

    // Windows rarely uses the "lib" prefix but try it
    let prefixes: &[&str] = if cfg!(target_os = "windows") {
        &["", "lib"]
    } else {
        &["lib", ""]
    };

    let mut names = Vec::new();
    for prefix in prefixes {
        for ext in extensions {
            names.push(format!("{}{}.{}", prefix, name, ext));
        }
    }
    names
}

fn resolve_library_path(name: &str, search_paths: &[PathBuf]) -> Option<PathBuf> {
    let path = Path::new(name);
    if path.components().count() > 1 || path.is_absolute() {
        return path.exists().then(|| path.to_path_buf());
    }

    let is_file_name = has_library_extension(name);
    let candidates = if is_file_name {
        vec![name.to_string()]
    } else {
        candidate_file_names(name)
    };
    search_paths
        .iter()
        .flat_map(|dir| candidates.iter().map(move |file| dir.join(file)))
        .find(|full_path| full_path.exists())
        .or_else(|| is_file_name.then(|| PathBuf::from(name)))
}

/// `libm.so.6`, `libSystem.B.dylib`, `engine.dll`
fn has_library_extension(name: &str) -> bool {
    name.ends_with(".so")
        || name.contains(".so.")
        || name.ends_with(".dylib")
        || name.ends_with(".dll")
}
