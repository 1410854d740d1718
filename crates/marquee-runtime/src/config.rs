#![forbid(unsafe_code)]

//! Stage configuration.
//!
//! A [`StageConfig`] is read from JSON (every field optional, missing fields
//! take the built-in defaults), then optionally overridden from environment
//! variables, then validated. Durations are whole milliseconds.
//!
//! # Environment overrides
//!
//! | Variable | Field |
//! |----------|-------|
//! | `MARQUEE_BOOT_INTRO_MS` | `boot.intro_ms` |
//! | `MARQUEE_BOOT_TIMEOUT_MS` | `boot.safety_timeout_ms` (`off` clears it) |
//! | `MARQUEE_DRIVE_SCALE` | `drive.scale_factor` |
//! | `MARQUEE_LANDING_PATH` | `routes.landing_path` |
//!
//! # Example
//!
//! ```json
//! {
//!   "boot": { "intro_ms": 1200 },
//!   "routes": { "protected": ["/nexus"] }
//! }
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::boot_gate::{BootGate, DEFAULT_INTRO_DURATION, TimedIntro};
use crate::drive_signal::{DEFAULT_SCALE_FACTOR, DriveSignal, PointerTracker};
use crate::route::{LANDING_PATH, RouteTable};
use crate::scroll::DampingProfile;

/// Name of the built-in [`DampingProfile::HEAVY`] profile.
pub const HEAVY_PROFILE: &str = "heavy";
/// Name of the built-in [`DampingProfile::ULTRA_FRICTION`] profile.
pub const ULTRA_FRICTION_PROFILE: &str = "ultra_friction";

/// Errors raised while loading or validating configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// Reading the config file failed.
    Io(std::io::Error),
    /// The document is not valid JSON for [`StageConfig`].
    Parse(serde_json::Error),
    /// A value is out of range or refers to something undefined.
    Invalid {
        /// Dotted field path.
        field: String,
        /// What is wrong with it.
        message: String,
    },
}

impl ConfigError {
    fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Parse(e) => write!(f, "parse error: {e}"),
            Self::Invalid { field, message } => write!(f, "invalid {field}: {message}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::Invalid { .. } => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}

/// Serialized form of a [`DampingProfile`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProfileConfig {
    /// Per-frame smoothing fraction.
    pub lerp: f32,
    /// Programmatic scroll duration in milliseconds.
    pub duration_ms: u64,
    /// Wheel delta scale.
    pub wheel_multiplier: f32,
}

impl From<DampingProfile> for ProfileConfig {
    fn from(p: DampingProfile) -> Self {
        Self {
            lerp: p.lerp,
            duration_ms: p.duration.as_millis() as u64,
            wheel_multiplier: p.wheel_multiplier,
        }
    }
}

impl From<ProfileConfig> for DampingProfile {
    fn from(p: ProfileConfig) -> Self {
        Self {
            lerp: p.lerp,
            duration: Duration::from_millis(p.duration_ms),
            wheel_multiplier: p.wheel_multiplier,
        }
    }
}

impl Default for ProfileConfig {
    fn default() -> Self {
        DampingProfile::HEAVY.into()
    }
}

/// Boot gate settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BootConfig {
    /// Length of the default timed intro.
    pub intro_ms: u64,
    /// Force the reveal after this long. Off when absent.
    pub safety_timeout_ms: Option<u64>,
}

impl Default for BootConfig {
    fn default() -> Self {
        Self {
            intro_ms: DEFAULT_INTRO_DURATION.as_millis() as u64,
            safety_timeout_ms: None,
        }
    }
}

/// One prefix-to-profile rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteRuleConfig {
    /// Path prefix.
    pub prefix: String,
    /// Profile name.
    pub profile: String,
}

/// Route table settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RouteConfig {
    /// Profile used when no rule matches.
    pub default_profile: String,
    /// Per-prefix profiles.
    pub rules: Vec<RouteRuleConfig>,
    /// Prefixes that require authentication.
    pub protected: Vec<String>,
    /// Redirect target for unauthenticated viewers.
    pub landing_path: String,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            default_profile: HEAVY_PROFILE.to_string(),
            rules: vec![RouteRuleConfig {
                prefix: "/archive".to_string(),
                profile: ULTRA_FRICTION_PROFILE.to_string(),
            }],
            protected: vec!["/nexus".to_string()],
            landing_path: LANDING_PATH.to_string(),
        }
    }
}

/// Drive signal settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DriveConfig {
    /// Velocity to radians-per-frame multiplier.
    pub scale_factor: f32,
    /// Base rotation speed of each scene object, radians per second.
    pub base_speeds: Vec<f32>,
    /// Fraction of pointer velocity kept after one second.
    pub pointer_decay: f32,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            scale_factor: DEFAULT_SCALE_FACTOR,
            base_speeds: vec![0.1, 0.15, 0.05],
            pointer_decay: 0.05,
        }
    }
}

/// Everything needed to build a [`Stage`](crate::stage::Stage).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StageConfig {
    /// Boot gate.
    pub boot: BootConfig,
    /// Named damping profiles. Built-in names are always present.
    pub profiles: BTreeMap<String, ProfileConfig>,
    /// Route table.
    pub routes: RouteConfig,
    /// Drive signal.
    pub drive: DriveConfig,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            boot: BootConfig::default(),
            profiles: builtin_profiles(),
            routes: RouteConfig::default(),
            drive: DriveConfig::default(),
        }
    }
}

fn builtin_profiles() -> BTreeMap<String, ProfileConfig> {
    BTreeMap::from([
        (HEAVY_PROFILE.to_string(), DampingProfile::HEAVY.into()),
        (ULTRA_FRICTION_PROFILE.to_string(), DampingProfile::ULTRA_FRICTION.into()),
    ])
}

impl StageConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_json::from_str(json)?;
        for (name, profile) in builtin_profiles() {
            config.profiles.entry(name).or_insert(profile);
        }
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        debug!(path = %path.display(), "stage config loaded");
        Ok(config)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Apply overrides using `get` to look variables up.
    pub fn apply_env_with<F>(&mut self, mut get: F) -> Result<(), ConfigError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        if let Some(value) = get("MARQUEE_BOOT_INTRO_MS") {
            self.boot.intro_ms = parse_env("MARQUEE_BOOT_INTRO_MS", &value)?;
        }
        if let Some(value) = get("MARQUEE_BOOT_TIMEOUT_MS") {
            self.boot.safety_timeout_ms = match value.trim() {
                "" | "off" | "none" => None,
                other => Some(parse_env("MARQUEE_BOOT_TIMEOUT_MS", other)?),
            };
        }
        if let Some(value) = get("MARQUEE_DRIVE_SCALE") {
            self.drive.scale_factor = parse_env("MARQUEE_DRIVE_SCALE", &value)?;
        }
        if let Some(value) = get("MARQUEE_LANDING_PATH") {
            self.routes.landing_path = value;
        }
        self.validate()
    }

    /// Check every constraint, reporting the first violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, profile) in &self.profiles {
            let field = |f: &str| format!("profiles.{name}.{f}");
            if !(profile.lerp > 0.0 && profile.lerp <= 1.0) {
                return Err(ConfigError::invalid(field("lerp"), "must be in (0, 1]"));
            }
            if !(profile.wheel_multiplier.is_finite() && profile.wheel_multiplier > 0.0) {
                return Err(ConfigError::invalid(
                    field("wheel_multiplier"),
                    "must be positive and finite",
                ));
            }
            if profile.duration_ms == 0 {
                return Err(ConfigError::invalid(field("duration_ms"), "must be positive"));
            }
        }
        self.require_profile("routes.default_profile", &self.routes.default_profile)?;
        for (i, rule) in self.routes.rules.iter().enumerate() {
            self.require_profile(&format!("routes.rules[{i}].profile"), &rule.profile)?;
            if !rule.prefix.starts_with('/') {
                return Err(ConfigError::invalid(
                    format!("routes.rules[{i}].prefix"),
                    "must start with '/'",
                ));
            }
        }
        for (i, prefix) in self.routes.protected.iter().enumerate() {
            if !prefix.starts_with('/') {
                return Err(ConfigError::invalid(
                    format!("routes.protected[{i}]"),
                    "must start with '/'",
                ));
            }
        }
        if !self.routes.landing_path.starts_with('/') {
            return Err(ConfigError::invalid("routes.landing_path", "must start with '/'"));
        }
        let landing = &self.routes.landing_path;
        if self
            .routes
            .protected
            .iter()
            .any(|p| crate::route::path_has_prefix(landing, p))
        {
            return Err(ConfigError::invalid(
                "routes.landing_path",
                "must not lie inside a protected prefix",
            ));
        }
        if !self.drive.scale_factor.is_finite() {
            return Err(ConfigError::invalid("drive.scale_factor", "must be finite"));
        }
        if self.drive.base_speeds.iter().any(|s| !s.is_finite()) {
            return Err(ConfigError::invalid("drive.base_speeds", "must be finite"));
        }
        if !(0.0..=1.0).contains(&self.drive.pointer_decay) {
            return Err(ConfigError::invalid("drive.pointer_decay", "must be in [0, 1]"));
        }
        Ok(())
    }

    fn require_profile(&self, field: &str, name: &str) -> Result<(), ConfigError> {
        if self.profiles.contains_key(name) {
            Ok(())
        } else {
            Err(ConfigError::invalid(field, format!("unknown profile '{name}'")))
        }
    }

    /// Look up a named profile.
    pub fn profile(&self, name: &str) -> Option<DampingProfile> {
        self.profiles.get(name).copied().map(DampingProfile::from)
    }

    /// Build the route table.
    pub fn route_table(&self) -> Result<RouteTable, ConfigError> {
        let default = self
            .profile(&self.routes.default_profile)
            .ok_or_else(|| ConfigError::invalid("routes.default_profile", "unknown profile"))?;
        let mut table = RouteTable::new(default).with_landing_path(&self.routes.landing_path);
        for rule in &self.routes.rules {
            let profile = self.profile(&rule.profile).ok_or_else(|| {
                ConfigError::invalid("routes.rules", format!("unknown profile '{}'", rule.profile))
            })?;
            table = table.with_profile(&rule.prefix, profile);
        }
        for prefix in &self.routes.protected {
            table = table.protect(prefix);
        }
        Ok(table)
    }

    /// Build a boot gate with the default timed intro.
    pub fn boot_gate(&self) -> BootGate {
        BootGate::new(TimedIntro::new(Duration::from_millis(self.boot.intro_ms)))
            .with_safety_timeout(self.boot.safety_timeout_ms.map(Duration::from_millis))
    }

    /// Build the drive signal.
    pub fn drive_signal(&self) -> DriveSignal {
        DriveSignal::new(self.drive.scale_factor, &self.drive.base_speeds)
    }

    /// Build the pointer tracker.
    pub fn pointer_tracker(&self) -> PointerTracker {
        PointerTracker::new(self.drive.pointer_decay)
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::invalid(key, format!("cannot parse '{value}'")))
}
