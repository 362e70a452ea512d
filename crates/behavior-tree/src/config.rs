//! Tree loading and execution configuration.

use std::env;
use std::str::FromStr;

/// Default limit on links between the root and any node.
pub const DEFAULT_MAX_DEPTH: usize = 1024;

/// Settings shared by the builder and the executor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeConfig {
    /// Label attached to log spans, usually the name of the driven agent.
    pub agent: String,
    /// Fail loading when a record is not reachable from the root instead of
    /// skipping it with a warning.
    pub reject_unreachable: bool,
    /// Deepest chain of links accepted when loading. Building, ticking and
    /// dropping a tree recurse once per level.
    pub max_depth: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            agent: "agent".to_string(),
            reject_unreachable: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl TreeConfig {
    pub fn new(agent: impl Into<String>) -> Self {
        Self {
            agent: agent.into(),
            ..Self::default()
        }
    }

    pub fn reject_unreachable(mut self, reject: bool) -> Self {
        self.reject_unreachable = reject;
        self
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `BT_AGENT` - Agent label for logs (default: "agent")
    /// - `BT_REJECT_UNREACHABLE` - Treat unreachable records as errors (default: false)
    /// - `BT_MAX_DEPTH` - Deepest accepted chain of links (default: 1024)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(agent) = env::var("BT_AGENT").ok().filter(|a| !a.trim().is_empty()) {
            config.agent = agent;
        }
        if let Some(reject) = read_env_bool("BT_REJECT_UNREACHABLE") {
            config.reject_unreachable = reject;
        }
        if let Some(depth) = read_env::<usize>("BT_MAX_DEPTH") {
            config.max_depth = depth.max(1);
        }

        config
    }
}

fn read_env<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok()?.trim().parse().ok()
}

fn read_env_bool(key: &str) -> Option<bool> {
    parse_bool(&env::var(key).ok()?)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
