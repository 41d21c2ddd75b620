//! Secret placeholder resolution
//!
//! Exported connections never carry literal secrets; sensitive fields hold
//! `${VAR}` placeholders instead. At import time those placeholders are
//! resolved against an environment accessor. The accessor is an explicit
//! value (not a read of process-wide globals) so orchestrators stay testable
//! without environment monkey-patching.

use crate::error::{Error, Result};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Matches `${VAR_NAME}` placeholders
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$\{(\w+)\}").unwrap());

/// Environment accessor used to resolve `${VAR}` placeholders
#[derive(Debug, Clone, Default)]
pub struct EnvVars {
    overrides: HashMap<String, String>,
    use_process_env: bool,
}

impl EnvVars {
    /// Resolve against the real process environment
    pub fn process() -> Self {
        Self {
            overrides: HashMap::new(),
            use_process_env: true,
        }
    }

    /// Resolve against a fixed map only (used in tests)
    pub fn from_map(vars: HashMap<String, String>) -> Self {
        Self {
            overrides: vars,
            use_process_env: false,
        }
    }

    /// Resolve against nothing (every placeholder is unresolved)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Add or override a single variable
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.overrides.insert(name.into(), value.into());
        self
    }

    /// Look up a variable, overrides first
    pub fn get(&self, name: &str) -> Option<String> {
        if let Some(value) = self.overrides.get(name) {
            return Some(value.clone());
        }
        if self.use_process_env {
            return std::env::var(name).ok();
        }
        None
    }
}

/// Resolve every `${VAR}` placeholder in `value`
///
/// Returns the fully substituted string, or an error naming every variable
/// that could not be resolved. An unresolved placeholder must never be sent
/// to the server as literal text.
pub fn resolve_placeholders(value: &str, env: &EnvVars) -> Result<String> {
    let mut unresolved: Vec<String> = Vec::new();
    let resolved = PLACEHOLDER.replace_all(value, |caps: &regex::Captures<'_>| {
        let name = &caps[1];
        match env.get(name) {
            Some(var) => var,
            None => {
                unresolved.push(name.to_string());
                caps[0].to_string()
            }
        }
    });

    if unresolved.is_empty() {
        Ok(resolved.into_owned())
    } else {
        Err(Error::unresolved_variables(&unresolved))
    }
}
