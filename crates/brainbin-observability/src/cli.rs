//! CLI argument parsing for per-crate debug flags
//!
//! Supports flags like `--debug-brainbin-serialization` and `--debug-all`, plus the
//! `BRAINBIN_DEBUG` environment variable.

use std::collections::HashMap;
use std::env;

use crate::KNOWN_CRATES;

/// Per-crate debug switches
///
/// # Example
/// ```rust
/// use brainbin_observability::CrateDebugFlags;
///
/// let flags = CrateDebugFlags::from_args(vec!["--debug-brainbin-config".to_string()]);
/// assert!(flags.is_enabled("brainbin-config"));
/// assert_eq!(flags.to_filter_string("warn"), "brainbin_config=debug,warn");
/// ```
#[derive(Debug, Clone, Default)]
pub struct CrateDebugFlags {
    pub enabled_crates: HashMap<String, bool>,
}

impl CrateDebugFlags {
    /// Parse debug flags from command-line arguments
    ///
    /// Looks for arguments matching `--debug-{crate-name}` pattern.
    /// Also supports `--debug-all` to enable all crates.
    pub fn from_args<I>(args: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut flags = CrateDebugFlags::default();

        for arg in args {
            if arg == "--debug-all" {
                flags.enable_all();
                continue;
            }

            if let Some(crate_name) = arg.strip_prefix("--debug-") {
                flags.enable(crate_name);
            }
        }

        flags
    }

    /// Enable debug output for one crate. Underscores are accepted in place of hyphens.
    pub fn enable(&mut self, crate_name: &str) {
        self.enabled_crates
            .insert(crate_name.trim().replace('_', "-"), true);
    }

    pub fn enable_all(&mut self) {
        for crate_name in KNOWN_CRATES {
            self.enable(crate_name);
        }
    }

    /// Check if debug is enabled for a specific crate
    pub fn is_enabled(&self, crate_name: &str) -> bool {
        self.enabled_crates.contains_key(&crate_name.replace('_', "-"))
    }

    /// Check if debug is enabled for any crate
    pub fn any_enabled(&self) -> bool {
        !self.enabled_crates.is_empty()
    }

    /// Names in the list that are not in [`KNOWN_CRATES`]; they still filter, but are likely typos.
    pub fn unknown_crates(&self) -> Vec<&str> {
        let mut unknown: Vec<&str> = self
            .enabled_crates
            .keys()
            .map(String::as_str)
            .filter(|name| !KNOWN_CRATES.contains(name))
            .collect();
        unknown.sort_unstable();
        unknown
    }

    /// Returns `tracing::Level::DEBUG` if enabled, `tracing::Level::INFO` otherwise.
    pub fn log_level(&self, crate_name: &str) -> tracing::Level {
        if self.is_enabled(crate_name) {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// Create an `EnvFilter` directive string from the debug flags
    ///
    /// Crate names are mapped to their tracing targets (hyphens become underscores), and
    /// `default_level` applies to everything else.
    /// Format: `"brainbin_config=debug,brainbin_serialization=debug,info"`.
    pub fn to_filter_string(&self, default_level: &str) -> String {
        let mut targets: Vec<String> = self
            .enabled_crates
            .keys()
            .map(|crate_name| format!("{}=debug", crate_name.replace('-', "_")))
            .collect();
        targets.sort();
        targets.push(default_level.to_lowercase());
        targets.join(",")
    }
}

/// Debug flags from the process arguments and the `BRAINBIN_DEBUG` environment variable
///
/// Environment variable format: comma-separated crate names, e.g.
/// `"brainbin-serialization,brainbin-config"`, or `all`.
pub fn parse_debug_flags() -> CrateDebugFlags {
    let mut flags = CrateDebugFlags::from_args(env::args());
    if let Ok(env_var) = env::var("BRAINBIN_DEBUG") {
        apply_debug_env(&mut flags, &env_var);
    }
    flags
}

fn apply_debug_env(flags: &mut CrateDebugFlags, env_var: &str) {
    if env_var.trim() == "all" {
        flags.enable_all();
        return;
    }
    for crate_name in env_var.split(',') {
        if !crate_name.trim().is_empty() {
            flags.enable(crate_name);
        }
    }
}

/// Generate help text for debug flags
pub fn debug_flags_help() -> String {
    format!(
        r#"Debug Flags:
  --debug-all                    Enable debug logging for all crates
  --debug-{{crate-name}}           Enable debug logging for a specific crate
  --debug {{crate-name}}           Same, as a separate argument

Available crates:
  {}

Environment Variable:
  BRAINBIN_DEBUG={{crate-name}}[,{{crate-name}}]  Enable debug for crates (comma-separated)
  BRAINBIN_DEBUG=all                               Enable debug for all crates
"#,
        KNOWN_CRATES.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_crate_flag() {
        let flags = CrateDebugFlags::from_args(vec!["--debug-brainbin-config".to_string()]);
        assert!(flags.is_enabled("brainbin-config"));
        assert!(flags.is_enabled("brainbin_config"));
        assert!(!flags.is_enabled("brainbin-serialization"));
    }

    #[test]
    fn test_debug_all() {
        let flags = CrateDebugFlags::from_args(vec!["--debug-all".to_string()]);
        for crate_name in KNOWN_CRATES {
            assert!(flags.is_enabled(crate_name), "{} should be enabled", crate_name);
        }
        assert!(flags.unknown_crates().is_empty());
    }

    #[test]
    fn test_filter_string() {
        let flags = CrateDebugFlags::from_args(vec![
            "--debug-brainbin-serialization".to_string(),
            "--debug-brainbin".to_string(),
        ]);
        assert_eq!(
            flags.to_filter_string("INFO"),
            "brainbin=debug,brainbin_serialization=debug,info"
        );
        assert_eq!(CrateDebugFlags::default().to_filter_string("warn"), "warn");
    }

    #[test]
    fn test_log_level() {
        let flags = CrateDebugFlags::from_args(vec!["--debug-brainbin".to_string()]);
        assert_eq!(flags.log_level("brainbin"), tracing::Level::DEBUG);
        assert_eq!(flags.log_level("brainbin-config"), tracing::Level::INFO);
    }

    #[test]
    fn test_env_list_and_unknown_names() {
        let mut flags = CrateDebugFlags::default();
        apply_debug_env(&mut flags, "brainbin-structures, brainbin-typo,");
        assert!(flags.is_enabled("brainbin-structures"));
        assert_eq!(flags.unknown_crates(), vec!["brainbin-typo"]);

        let mut all = CrateDebugFlags::default();
        apply_debug_env(&mut all, "all");
        assert_eq!(all.enabled_crates.len(), KNOWN_CRATES.len());
    }
}
