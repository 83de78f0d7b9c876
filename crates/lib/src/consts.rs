/// Application name, used for the binary and environment variable prefixes.
pub const APP_NAME: &str = "pbxdeps";

/// Descriptor file read by `pbxdeps add` when none is given.
pub const DEFAULT_DEPENDENCY_FILE: &str = "dependencies.json";

/// Environment variable overriding the `.xcodeproj` to operate on.
pub const PROJECT_ENV: &str = "PBXDEPS_PROJECT";

/// Directory (relative to the working directory) receiving timestamped backups.
pub const BACKUP_DIR: &str = "backups";
