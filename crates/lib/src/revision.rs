//! Looking up the revision a requirement points at.
//!
//! The lock file wants a commit hash for every pin. Finding one means asking
//! the remote, which is slow and may fail; any failure falls back to
//! [`PLACEHOLDER_REVISION`], which Xcode replaces on its next resolution.

use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::dependency::DependencyDescriptor;
use crate::lock::PLACEHOLDER_REVISION;

/// Default bound on one remote lookup.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Resolves a version or branch of a repository to a revision.
pub trait RevisionResolver {
  /// The revision `reference` points at in `url`, or [`PLACEHOLDER_REVISION`].
  fn resolve(&self, url: &str, reference: &str) -> String;
}

/// Never looks anything up.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaceholderResolver;

impl RevisionResolver for PlaceholderResolver {
  fn resolve(&self, _url: &str, _reference: &str) -> String {
    PLACEHOLDER_REVISION.to_string()
  }
}

/// Why a lookup fell back to the placeholder.
#[derive(Debug, Error)]
pub enum RevisionError {
  #[error("failed to start {program}: {source}")]
  Spawn {
    program: String,
    #[source]
    source: io::Error,
  },

  #[error("timed out after {0:?}")]
  Timeout(Duration),

  #[error("git ls-remote exited with code {0:?}")]
  Failed(Option<i32>),

  #[error("no ref matched")]
  NoMatch,
}

/// Looks revisions up with `git ls-remote`.
#[derive(Debug, Clone)]
pub struct GitRevisionResolver {
  program: PathBuf,
  timeout: Duration,
}

impl Default for GitRevisionResolver {
  fn default() -> Self {
    Self::new(DEFAULT_TIMEOUT)
  }
}

impl GitRevisionResolver {
  pub fn new(timeout: Duration) -> Self {
    Self {
      program: PathBuf::from("git"),
      timeout,
    }
  }

  /// Run `program` instead of `git`.
  pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
    self.program = program.into();
    self
  }

  /// Look `reference` up, reporting why it failed.
  pub fn lookup(&self, url: &str, reference: &str) -> Result<String, RevisionError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
      .enable_all()
      .build()
      .map_err(|source| RevisionError::Spawn {
        program: "async runtime".to_string(),
        source,
      })?;
    runtime.block_on(self.ls_remote(url, reference))
  }

  async fn ls_remote(&self, url: &str, reference: &str) -> Result<String, RevisionError> {
    let refs = ls_remote_refs(reference);
    debug!(url, ?refs, "querying remote refs");

    let mut command = Command::new(&self.program);
    command
      .arg("ls-remote")
      .arg(url)
      .args(&refs)
      .env("GIT_TERMINAL_PROMPT", "0")
      .kill_on_drop(true);

    let output = match tokio::time::timeout(self.timeout, command.output()).await {
      Ok(output) => output.map_err(|source| RevisionError::Spawn {
        program: self.program.display().to_string(),
        source,
      })?,
      Err(_) => return Err(RevisionError::Timeout(self.timeout)),
    };

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      if !stderr.is_empty() {
        debug!(stderr = %stderr, "git ls-remote stderr");
      }
      return Err(RevisionError::Failed(output.status.code()));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    parse_ls_remote(&stdout, &refs).ok_or(RevisionError::NoMatch)
  }
}

impl RevisionResolver for GitRevisionResolver {
  fn resolve(&self, url: &str, reference: &str) -> String {
    match self.lookup(url, reference) {
      Ok(revision) => revision,
      Err(e) => {
        warn!(url, reference, error = %e, "could not resolve revision, writing placeholder");
        PLACEHOLDER_REVISION.to_string()
      }
    }
  }
}

/// Refs to ask for, in order of preference.
///
/// A leading `v` is stripped before the tag forms are built, so `1.2.0` and
/// `v1.2.0` both try `refs/tags/1.2.0` and `refs/tags/v1.2.0`.
pub fn ls_remote_refs(reference: &str) -> Vec<String> {
  let version = reference.strip_prefix('v').unwrap_or(reference);
  vec![
    format!("refs/tags/{}", version),
    format!("refs/tags/v{}", version),
    format!("refs/heads/{}", reference),
  ]
}

/// The hash of the most preferred ref in `git ls-remote` output.
///
/// For annotated tags the peeled `^{}` line names the commit and wins over
/// the tag object.
pub fn parse_ls_remote(output: &str, refs: &[String]) -> Option<String> {
  let lines: Vec<(&str, &str)> = output
    .lines()
    .filter_map(|line| line.split_once(char::is_whitespace))
    .map(|(hash, name)| (hash.trim(), name.trim()))
    .collect();

  refs.iter().find_map(|wanted| {
    let peeled = format!("{}^{{}}", wanted);
    lines
      .iter()
      .find(|(_, name)| *name == peeled)
      .or_else(|| lines.iter().find(|(_, name)| name == wanted))
      .map(|(hash, _)| hash.to_string())
  })
}

/// Resolve every descriptor whose requirement is not already a revision.
///
/// Placeholder results are left out, so the map only holds real revisions,
/// keyed by descriptor name.
pub fn resolve_all(descriptors: &[DependencyDescriptor], resolver: &dyn RevisionResolver) -> BTreeMap<String, String> {
  descriptors
    .iter()
    .filter_map(|d| {
      let reference = d.requirement.lookup_reference()?;
      let revision = resolver.resolve(&d.url, reference);
      (revision != PLACEHOLDER_REVISION).then(|| (d.name.clone(), revision))
    })
    .collect()
}
