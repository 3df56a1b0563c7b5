//! ---
//! tdg_section: "01-core-functionality"
//! tdg_subsection: "module"
//! tdg_type: "source"
//! tdg_scope: "code"
//! tdg_description: "Build and version metadata for CLI surfaces."
//! tdg_version: "v0.1.0"
//! tdg_owner: "tbd"
//! ---
use serde::Serialize;

/// Version metadata captured at compile time.
#[derive(Debug, Clone, Serialize)]
pub struct VersionInfo {
    /// Workspace semantic version.
    pub semver: String,
    /// Git commit hash, supplied through `TDG_GIT_SHA` by release builds.
    pub git_sha: String,
    /// Cargo profile used during compilation.
    pub profile: String,
}

impl VersionInfo {
    #[must_use]
    pub fn current() -> Self {
        Self {
            semver: env!("CARGO_PKG_VERSION").to_owned(),
            git_sha: option_env!("TDG_GIT_SHA").unwrap_or("UNKNOWN").to_owned(),
            profile: if cfg!(debug_assertions) {
                "debug".to_owned()
            } else {
                "release".to_owned()
            },
        }
    }

    /// Extended string suitable for `--version` flags.
    #[must_use]
    pub fn extended(&self) -> String {
        format!(
            "tdg-gen {} (git {}, {} build)",
            self.semver, self.git_sha, self.profile
        )
    }
}
