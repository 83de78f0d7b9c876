//! Locating an Xcode project's files and backing them up.
//!
//! The project is chosen, in order, from an explicit path, the
//! `PBXDEPS_PROJECT` environment variable, or the only `*.xcodeproj` bundle
//! in the working directory.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info};

use crate::consts::PROJECT_ENV;
use crate::lock::{LockError, ResolvedFile};

/// Manifest file inside an `.xcodeproj` bundle.
pub const MANIFEST_FILE: &str = "project.pbxproj";

/// Lock file location inside an `.xcodeproj` bundle.
pub const RESOLVED_PATH: [&str; 4] = ["project.xcworkspace", "xcshareddata", "swiftpm", "Package.resolved"];

/// Timestamp format of backup file suffixes.
pub const BACKUP_TIMESTAMP: &str = "%Y%m%d%H%M%S";

#[derive(Debug, Error)]
pub enum ProjectError {
  #[error("no .xcodeproj found in {0}")]
  NoProject(PathBuf),

  #[error("more than one .xcodeproj in {dir}, pick one with --project or {PROJECT_ENV}: {}", display_paths(.candidates))]
  Ambiguous { dir: PathBuf, candidates: Vec<PathBuf> },

  #[error("{0} is not an .xcodeproj directory")]
  NotAProject(PathBuf),

  #[error("{0} not found")]
  MissingManifest(PathBuf),

  #[error(transparent)]
  Lock(#[from] LockError),

  #[error("failed to access {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

fn display_paths(paths: &[PathBuf]) -> String {
  paths.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(", ")
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> ProjectError + '_ {
  move |source| ProjectError::Io {
    path: path.to_path_buf(),
    source,
  }
}

/// The files of one Xcode project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPaths {
  pub xcodeproj: PathBuf,
  pub manifest: PathBuf,
  pub resolved: PathBuf,
}

impl ProjectPaths {
  /// Paths inside `xcodeproj`, without checking that they exist.
  pub fn new(xcodeproj: impl Into<PathBuf>) -> Self {
    let xcodeproj = xcodeproj.into();
    let manifest = xcodeproj.join(MANIFEST_FILE);
    let resolved = RESOLVED_PATH.iter().fold(xcodeproj.clone(), |path, part| path.join(part));
    Self {
      xcodeproj,
      manifest,
      resolved,
    }
  }

  pub fn read_manifest(&self) -> Result<String, ProjectError> {
    fs::read_to_string(&self.manifest).map_err(io_error(&self.manifest))
  }

  /// Replace the manifest and the lock file.
  ///
  /// Both files are fully written to temporary files beside their targets
  /// before either target is replaced, so a failing serialization or write
  /// leaves the project as it was.
  pub fn write(&self, manifest: &str, lock: &ResolvedFile) -> Result<(), ProjectError> {
    let lock = lock.to_json()?;
    let staged_lock = stage(&self.resolved, &lock)?;
    let staged_manifest = stage(&self.manifest, manifest)?;

    staged_lock
      .persist(&self.resolved)
      .map_err(|e| io_error(&self.resolved)(e.error))?;
    staged_manifest
      .persist(&self.manifest)
      .map_err(|e| io_error(&self.manifest)(e.error))?;
    debug!(manifest = ?self.manifest, resolved = ?self.resolved, "wrote project files");
    Ok(())
  }
}

/// A temporary file in `target`'s directory holding `content`.
fn stage(target: &Path, content: &str) -> Result<NamedTempFile, ProjectError> {
  let dir = target.parent().unwrap_or_else(|| Path::new("."));
  fs::create_dir_all(dir).map_err(io_error(dir))?;
  let mut file = NamedTempFile::new_in(dir).map_err(io_error(dir))?;
  file.write_all(content.as_bytes()).map_err(io_error(target))?;
  Ok(file)
}

/// Find the project to work on.
///
/// Relative paths are resolved against `cwd`.
pub fn discover(explicit: Option<&Path>, cwd: &Path) -> Result<ProjectPaths, ProjectError> {
  let chosen = match explicit {
    Some(path) => cwd.join(path),
    None => match std::env::var_os(PROJECT_ENV).filter(|v| !v.is_empty()) {
      Some(path) => {
        debug!(env = PROJECT_ENV, path = ?path, "project from environment");
        cwd.join(path)
      }
      None => only_xcodeproj(cwd)?,
    },
  };

  if !chosen.is_dir() || chosen.extension().is_none_or(|ext| ext != "xcodeproj") {
    return Err(ProjectError::NotAProject(chosen));
  }
  let xcodeproj = dunce::canonicalize(&chosen).map_err(io_error(&chosen))?;
  let paths = ProjectPaths::new(xcodeproj);
  if !paths.manifest.is_file() {
    return Err(ProjectError::MissingManifest(paths.manifest));
  }

  debug!(project = ?paths.xcodeproj, "using project");
  Ok(paths)
}

fn only_xcodeproj(dir: &Path) -> Result<PathBuf, ProjectError> {
  let mut candidates: Vec<PathBuf> = fs::read_dir(dir)
    .map_err(io_error(dir))?
    .filter_map(Result::ok)
    .map(|entry| entry.path())
    .filter(|path| path.is_dir() && path.extension().is_some_and(|ext| ext == "xcodeproj"))
    .collect();
  candidates.sort();

  match candidates.len() {
    0 => Err(ProjectError::NoProject(dir.to_path_buf())),
    1 => Ok(candidates.remove(0)),
    _ => Err(ProjectError::Ambiguous {
      dir: dir.to_path_buf(),
      candidates,
    }),
  }
}

/// Copies made by [`backup`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupSet {
  pub dir: PathBuf,
  pub timestamp: String,
  pub files: Vec<PathBuf>,
}

/// Copy the manifest, and the lock file if there is one, into `dir`.
///
/// Copies are named `<file>.<timestamp>`. The directory gets a `.gitignore`
/// ignoring everything in it.
pub fn backup(paths: &ProjectPaths, dir: &Path) -> Result<BackupSet, ProjectError> {
  fs::create_dir_all(dir).map_err(io_error(dir))?;

  let gitignore = dir.join(".gitignore");
  if !gitignore.exists() {
    fs::write(&gitignore, "*\n").map_err(io_error(&gitignore))?;
  }

  let timestamp = Local::now().format(BACKUP_TIMESTAMP).to_string();
  let mut files = Vec::new();
  for source in [&paths.manifest, &paths.resolved] {
    if !source.is_file() {
      debug!(path = ?source, "nothing to back up");
      continue;
    }
    let name = source.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    let target = unused_path(dir, &format!("{}.{}", name, timestamp));
    fs::copy(source, &target).map_err(io_error(source))?;
    files.push(target);
  }

  info!(dir = ?dir, %timestamp, count = files.len(), "created backups");
  Ok(BackupSet {
    dir: dir.to_path_buf(),
    timestamp,
    files,
  })
}

/// `dir/name`, or `dir/name-N` if that already exists.
fn unused_path(dir: &Path, name: &str) -> PathBuf {
  let mut path = dir.join(name);
  let mut n = 1;
  while path.exists() {
    path = dir.join(format!("{}-{}", name, n));
    n += 1;
  }
  path
}
