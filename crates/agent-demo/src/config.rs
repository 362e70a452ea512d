//! Demo configuration: environment first, command-line flags on top.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use behavior_tree::TreeConfig;
use clap::Parser;

/// Drive a sample agent with a behavior tree loaded from JSON.
#[derive(Debug, Parser)]
#[command(name = "agent-demo", version, about)]
pub struct Cli {
    /// Tree description to load
    #[arg(short, long)]
    pub tree: Option<PathBuf>,

    /// Number of frames to run (0 runs until interrupted)
    #[arg(short, long)]
    pub frames: Option<u64>,

    /// Milliseconds between frames
    #[arg(long)]
    pub frame_ms: Option<u64>,

    /// Milliseconds the Wait action sleeps, twice
    #[arg(long)]
    pub wait_ms: Option<u64>,

    /// Also write logs to a file under this directory
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Write logs to the default log directory
    #[arg(long)]
    pub log_file: bool,

    /// Fail loading when a node is not reachable from the root
    #[arg(long)]
    pub strict: bool,
}

#[derive(Clone, Debug)]
pub struct DemoConfig {
    pub tree_path: PathBuf,
    pub frames: u64,
    pub frame_interval: Duration,
    pub wait: Duration,
    pub log_dir: Option<PathBuf>,
    pub tree: TreeConfig,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            tree_path: PathBuf::from("crates/agent-demo/trees/patrol.json"),
            frames: 120,
            frame_interval: Duration::from_millis(50),
            wait: Duration::from_millis(250),
            log_dir: None,
            tree: TreeConfig::new("demo-agent"),
        }
    }
}

impl DemoConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `DEMO_TREE` - Tree description path (default: "crates/agent-demo/trees/patrol.json")
    /// - `DEMO_FRAMES` - Frames to run, 0 for unbounded (default: 120)
    /// - `DEMO_FRAME_MS` - Frame interval in milliseconds (default: 50)
    /// - `DEMO_WAIT_MS` - Wait action sleep in milliseconds (default: 250)
    /// - `DEMO_LOG_DIR` - Log file directory (default: none)
    /// - `BT_AGENT`, `BT_REJECT_UNREACHABLE`, `BT_MAX_DEPTH` - see [`TreeConfig::from_env`]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        let tree = TreeConfig::from_env();
        if env::var_os("BT_AGENT").is_some() {
            config.tree.agent = tree.agent;
        }
        config.tree.reject_unreachable = tree.reject_unreachable;
        config.tree.max_depth = tree.max_depth;

        if let Some(path) = env::var_os("DEMO_TREE") {
            config.tree_path = PathBuf::from(path);
        }
        if let Some(frames) = read_env::<u64>("DEMO_FRAMES") {
            config.frames = frames;
        }
        if let Some(ms) = read_env::<u64>("DEMO_FRAME_MS") {
            config.frame_interval = Duration::from_millis(ms.max(1));
        }
        if let Some(ms) = read_env::<u64>("DEMO_WAIT_MS") {
            config.wait = Duration::from_millis(ms);
        }
        if let Some(dir) = env::var_os("DEMO_LOG_DIR") {
            config.log_dir = Some(PathBuf::from(dir));
        }

        config
    }

    /// Applies command-line flags over this configuration.
    pub fn with_cli(mut self, cli: Cli) -> Self {
        if let Some(path) = cli.tree {
            self.tree_path = path;
        }
        if let Some(frames) = cli.frames {
            self.frames = frames;
        }
        if let Some(ms) = cli.frame_ms {
            self.frame_interval = Duration::from_millis(ms.max(1));
        }
        if let Some(ms) = cli.wait_ms {
            self.wait = Duration::from_millis(ms);
        }
        if let Some(dir) = cli.log_dir {
            self.log_dir = Some(dir);
        } else if cli.log_file && self.log_dir.is_none() {
            self.log_dir = Some(default_log_dir());
        }
        if cli.strict {
            self.tree.reject_unreachable = true;
        }
        self
    }
}

/// Platform cache directory for demo logs.
///
/// - macOS: `~/Library/Caches/agent-demo/logs`
/// - Linux: `~/.cache/agent-demo/logs` (or `$XDG_CACHE_HOME/agent-demo/logs`)
/// - Windows: `%LOCALAPPDATA%\agent-demo\cache\logs`
/// - Fallback: `/tmp/agent-demo/logs`
pub fn default_log_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "agent-demo")
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("/tmp/agent-demo"))
        .join("logs")
}

fn read_env<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok()?.trim().parse().ok()
}
