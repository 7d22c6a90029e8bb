//! Configuration loading with include resolution.
//!
//! `speedgate.toml` may list `includes`; each included file is loaded first and
//! the including file's `[defaults]` are overlaid on top, field by field.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::debug;

use speedgate_types::{ConfigFile, Defaults};

/// Maximum depth for include resolution to prevent excessive nesting.
const MAX_INCLUDE_DEPTH: usize = 10;

/// Load a configuration file with include resolution.
///
/// `expand_env` is applied to the raw text of every file before parsing.
/// Returns the merged defaults; the result has no `includes` left.
pub fn load_config_with_includes<F>(path: &Path, expand_env: F) -> Result<ConfigFile>
where
    F: Fn(&str) -> Result<String> + Copy,
{
    let mut stack = HashSet::new();
    let defaults = load_defaults_recursive(path, expand_env, &mut stack, 0)?;
    Ok(ConfigFile {
        includes: vec![],
        defaults,
    })
}

fn load_defaults_recursive<F>(
    path: &Path,
    expand_env: F,
    stack: &mut HashSet<PathBuf>,
    depth: usize,
) -> Result<Defaults>
where
    F: Fn(&str) -> Result<String> + Copy,
{
    if depth > MAX_INCLUDE_DEPTH {
        bail!(
            "Include depth exceeded maximum of {} levels at '{}'",
            MAX_INCLUDE_DEPTH,
            path.display()
        );
    }

    let canonical = path
        .canonicalize()
        .with_context(|| format!("canonicalize path '{}'", path.display()))?;

    if !stack.insert(canonical.clone()) {
        bail!("Circular include detected: '{}'", path.display());
    }

    debug!("Loading config from '{}' (depth {})", path.display(), depth);

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read config '{}'", path.display()))?;
    let expanded = expand_env(&text)?;
    let config: ConfigFile =
        toml::from_str(&expanded).with_context(|| format!("parse config '{}'", path.display()))?;

    let base_dir = path.parent().unwrap_or(Path::new("."));
    let mut merged = Defaults::default();

    for include_path in &config.includes {
        let full_path = base_dir.join(include_path);
        debug!(
            "Resolving include '{}' relative to '{}'",
            include_path,
            base_dir.display()
        );

        if !full_path.exists() {
            bail!(
                "Included config file not found: '{}' (resolved from '{}')",
                full_path.display(),
                include_path
            );
        }

        let included = load_defaults_recursive(&full_path, expand_env, stack, depth + 1)?;
        merged = merged.overlay(included);
    }

    // Only ancestors count as a cycle; the same file may be included twice.
    stack.remove(&canonical);

    Ok(merged.overlay(config.defaults))
}
