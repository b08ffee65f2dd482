use std::fmt;

/// What `build.rs` recorded about the binary: package version, commit and target.
#[derive(Debug, Clone, Copy)]
pub struct BuildInfo {
    pub version: &'static str,
    /// Short commit hash, suffixed with `-dirty` when the tree had local changes.
    pub commit: &'static str,
    pub built_at: &'static str,
    pub target: &'static str,
    pub profile: &'static str,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            commit: option_env!("SUBTRACK_COMMIT").unwrap_or("unknown"),
            built_at: option_env!("SUBTRACK_BUILT_AT").unwrap_or("unknown"),
            target: option_env!("SUBTRACK_TARGET").unwrap_or("unknown"),
            profile: option_env!("SUBTRACK_PROFILE").unwrap_or("unknown"),
        }
    }
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, {} {}, built {})",
            self.version, self.commit, self.target, self.profile, self.built_at
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_line_summary_leads_with_the_version() {
        let info = BuildInfo::current();
        let line = info.to_string();
        assert!(line.starts_with(env!("CARGO_PKG_VERSION")));
        assert!(line.contains(info.commit));
    }
}
