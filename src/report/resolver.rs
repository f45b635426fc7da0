//! Locating source files named in a profile.
//!
//! Profiles name files by import path (`example.com/m/pkg/file.go`), by
//! path relative to the module, or by absolute path. [`FsResolver`] tries,
//! in order:
//!
//! 1. the name as an existing absolute path
//! 2. the name relative to the working directory
//! 3. the name under the module root, when it starts with the module path
//!    declared by the nearest `go.mod`
//! 4. `<entry>/src/<name>` for each `GOPATH` entry

use crate::config::directory_ancestors;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const GO_MOD: &str = "go.mod";
const MAX_MODULE_SEARCH_DEPTH: usize = 32;

/// Maps profile file names to readable paths.
pub trait SourceResolver {
    /// Locate `name` on disk.
    fn resolve(&self, name: &str) -> io::Result<PathBuf>;

    /// Read the bytes of a resolved path.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }
}

/// Module declared by a `go.mod` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoModule {
    pub path: String,
    pub root: PathBuf,
}

impl GoModule {
    /// Find the nearest `go.mod` at or above `start`.
    pub fn discover(start: &Path) -> Option<Self> {
        directory_ancestors(start.to_path_buf(), MAX_MODULE_SEARCH_DEPTH).find_map(|dir| {
            let contents = fs::read_to_string(dir.join(GO_MOD)).ok()?;
            let path = parse_module_path(&contents)?;
            log::debug!("Found module {} at {}", path, dir.display());
            Some(Self { path, root: dir })
        })
    }

    /// Path of `name` inside this module, if `name` is under the module path.
    fn locate(&self, name: &str) -> Option<PathBuf> {
        let rest = name.strip_prefix(&self.path)?.strip_prefix('/')?;
        Some(self.root.join(rest))
    }
}

/// Extract the module path from `go.mod` contents.
pub fn parse_module_path(contents: &str) -> Option<String> {
    contents.lines().find_map(|line| {
        let line = line.split("//").next().unwrap_or("").trim();
        let rest = line.strip_prefix("module")?;
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        let path = rest.trim().trim_matches('"').trim_matches('`');
        (!path.is_empty()).then(|| path.to_string())
    })
}

/// Resolver over the real file system.
#[derive(Debug, Clone)]
pub struct FsResolver {
    work_dir: PathBuf,
    module: Option<GoModule>,
    gopath: Vec<PathBuf>,
}

impl FsResolver {
    pub fn new(work_dir: PathBuf, module: Option<GoModule>, gopath: Vec<PathBuf>) -> Self {
        Self {
            work_dir,
            module,
            gopath,
        }
    }

    /// Build a resolver for `work_dir`, reading `go.mod` and `GOPATH`.
    pub fn discover(work_dir: &Path) -> Self {
        Self::new(
            work_dir.to_path_buf(),
            GoModule::discover(work_dir),
            gopath_from_env(),
        )
    }

    pub fn module(&self) -> Option<&GoModule> {
        self.module.as_ref()
    }

    fn candidates(&self, name: &str) -> Vec<PathBuf> {
        let given = Path::new(name);
        let mut candidates = Vec::new();
        if given.is_absolute() {
            candidates.push(given.to_path_buf());
        } else {
            candidates.push(self.work_dir.join(given));
        }
        if let Some(found) = self.module.as_ref().and_then(|m| m.locate(name)) {
            candidates.push(found);
        }
        candidates.extend(self.gopath.iter().map(|entry| entry.join("src").join(name)));
        candidates
    }
}

impl SourceResolver for FsResolver {
    fn resolve(&self, name: &str) -> io::Result<PathBuf> {
        self.candidates(name)
            .into_iter()
            .find(|candidate| candidate.is_file())
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("no such file in working tree, module or GOPATH: {name}"),
                )
            })
    }
}

/// `GOPATH` entries, falling back to `$HOME/go` like the go tool.
pub fn gopath_from_env() -> Vec<PathBuf> {
    match std::env::var_os("GOPATH") {
        Some(value) if !value.is_empty() => std::env::split_paths(&value).collect(),
        _ => std::env::var_os("HOME")
            .map(|home| vec![PathBuf::from(home).join("go")])
            .unwrap_or_default(),
    }
}
