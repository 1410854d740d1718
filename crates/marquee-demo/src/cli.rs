#![forbid(unsafe_code)]

//! Command-line argument parsing for the demo.
//!
//! Parses args manually. Supports environment variable overrides via the
//! `MARQUEE_DEMO_*` prefix; explicit flags win over the environment.

use std::env;
use std::path::PathBuf;
use std::process;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP_TEXT: &str = "\
Marquee Demo: headless presentation-layer run

USAGE:
    marquee-demo [OPTIONS]

OPTIONS:
    --frames=N        Number of frames to run (default: 600)
    --fps=N           Frame rate of the fixed-step clock (default: 60)
    --config=PATH     JSON stage configuration
    --route=PATH      Starting route (default: /)
    --login=NAME      Sign in as NAME before the first frame
    --json            Print every frame snapshot as a JSON line
    --help, -h        Show this help message
    --version, -V     Show version

ENVIRONMENT VARIABLES:
    MARQUEE_DEMO_FRAMES       Override --frames
    MARQUEE_DEMO_FPS          Override --fps
    MARQUEE_DEMO_CONFIG       Override --config
    MARQUEE_DEMO_ROUTE        Override --route
    MARQUEE_DEMO_LOGIN        Override --login
    MARQUEE_*                 Stage overrides (see StageConfig)
    RUST_LOG                  Log filter (default: info)";

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq)]
pub struct Opts {
    /// Frames to run.
    pub frames: usize,
    /// Frames per second.
    pub fps: u32,
    /// Optional configuration file.
    pub config: Option<PathBuf>,
    /// Starting route.
    pub route: String,
    /// Sign-in name.
    pub login: Option<String>,
    /// Emit JSON lines.
    pub json: bool,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            frames: 600,
            fps: 60,
            config: None,
            route: "/".into(),
            login: None,
            json: false,
        }
    }
}

/// Result of parsing.
#[derive(Debug, Clone, PartialEq)]
pub enum Parsed {
    /// Run with these options.
    Run(Opts),
    /// `--help` was given.
    Help,
    /// `--version` was given.
    Version,
}

impl Opts {
    /// Parse process arguments and environment, exiting on `--help`,
    /// `--version`, or bad input.
    pub fn parse() -> Self {
        let args: Vec<String> = env::args().skip(1).collect();
        match Self::parse_from(&args, |key| env::var(key).ok()) {
            Ok(Parsed::Run(opts)) => opts,
            Ok(Parsed::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Ok(Parsed::Version) => {
                println!("marquee-demo {VERSION}");
                process::exit(0);
            }
            Err(msg) => {
                eprintln!("{msg}");
                eprintln!("Run with --help for usage information.");
                process::exit(1);
            }
        }
    }

    /// Parse `args` with `get` as the environment.
    pub fn parse_from<F>(args: &[String], mut get: F) -> Result<Parsed, String>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut opts = Self::default();

        // Environment first, flags override.
        if let Some(val) = get("MARQUEE_DEMO_FRAMES")
            && let Ok(n) = val.parse()
        {
            opts.frames = n;
        }
        if let Some(val) = get("MARQUEE_DEMO_FPS")
            && let Ok(n) = val.parse()
        {
            opts.fps = n;
        }
        if let Some(val) = get("MARQUEE_DEMO_CONFIG") {
            opts.config = Some(PathBuf::from(val));
        }
        if let Some(val) = get("MARQUEE_DEMO_ROUTE") {
            opts.route = val;
        }
        if let Some(val) = get("MARQUEE_DEMO_LOGIN") {
            opts.login = Some(val);
        }

        for arg in args {
            match arg.as_str() {
                "--help" | "-h" => return Ok(Parsed::Help),
                "--version" | "-V" => return Ok(Parsed::Version),
                "--json" => opts.json = true,
                other => {
                    if let Some(val) = other.strip_prefix("--frames=") {
                        opts.frames = val
                            .parse()
                            .map_err(|_| format!("Invalid --frames value: {val}"))?;
                    } else if let Some(val) = other.strip_prefix("--fps=") {
                        opts.fps = val
                            .parse()
                            .map_err(|_| format!("Invalid --fps value: {val}"))?;
                    } else if let Some(val) = other.strip_prefix("--config=") {
                        opts.config = Some(PathBuf::from(val));
                    } else if let Some(val) = other.strip_prefix("--route=") {
                        opts.route = val.to_string();
                    } else if let Some(val) = other.strip_prefix("--login=") {
                        opts.login = Some(val.to_string());
                    } else {
                        return Err(format!("Unknown argument: {other}"));
                    }
                }
            }
        }

        if opts.fps == 0 {
            return Err("--fps must be at least 1".into());
        }
        if !opts.route.starts_with('/') {
            return Err(format!("Invalid --route value: {}", opts.route));
        }
        Ok(Parsed::Run(opts))
    }
}
