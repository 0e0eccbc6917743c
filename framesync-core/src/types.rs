//! Domain types for the Framesync registry and run outcomes.
//!
//! All path fields use `PathBuf`; never `&str` or `String` for filesystem paths.
//! Registry types are serializable/deserializable via serde + serde_yaml.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed identifier for a configured picture source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceId(pub String);

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for SourceId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SourceId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// How a run compares remote and local content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Compare file counts; transfer when they differ.
    #[default]
    Quick,
    /// Content-equality check before and after the transfer.
    Detailed,
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunMode::Quick => write!(f, "quick"),
            RunMode::Detailed => write!(f, "detailed"),
        }
    }
}

/// The single result token recorded for a run.
///
/// Exactly one of these is appended to the outcome log per invocation; the
/// circuit breaker reads streaks of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RunToken {
    /// Counts matched, nothing done, run skipped, or restart suppressed.
    Ok,
    /// Sync ran, verification passed, viewer restart succeeded.
    Restart,
    /// Any other failure.
    Error,
}

impl fmt::Display for RunToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunToken::Ok => write!(f, "OK"),
            RunToken::Restart => write!(f, "RESTART"),
            RunToken::Error => write!(f, "ERROR"),
        }
    }
}

impl FromStr for RunToken {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OK" => Ok(RunToken::Ok),
            "RESTART" => Ok(RunToken::Restart),
            "ERROR" => Ok(RunToken::Error),
            other => Err(format!("unknown result token '{other}'")),
        }
    }
}

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// Remote/local file counts observed during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    pub remote: usize,
    pub local: usize,
}

impl Counts {
    pub fn matched(&self) -> bool {
        self.remote == self.local
    }
}

impl fmt::Display for Counts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "remote={} local={}", self.remote, self.local)
    }
}

/// One configured picture source: a cloud remote paired with a local mirror.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDescriptor {
    pub id: SourceId,
    /// Human label shown by `framesync source list` and the status view.
    pub label: String,
    /// Absolute path of the local mirror directory.
    pub local_path: PathBuf,
    /// Remote endpoint in the transfer tool's syntax (e.g. `kfr_frame:frame`).
    pub remote: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// Root of the `sources.yaml` registry. Order is significant: the first
/// enabled entry is the fallback when the active pointer cannot be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SourceRegistry {
    pub version: u32,
    #[serde(default)]
    pub sources: Vec<SourceDescriptor>,
}

impl SourceRegistry {
    /// Look up a source by id.
    pub fn get(&self, id: &SourceId) -> Option<&SourceDescriptor> {
        self.sources.iter().find(|s| &s.id == id)
    }

    /// First enabled source in registry order, if any.
    pub fn first_enabled(&self) -> Option<&SourceDescriptor> {
        self.sources.iter().find(|s| s.enabled)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn source_id_display() {
        assert_eq!(SourceId::from("kfr").to_string(), "kfr");
    }

    #[rstest]
    #[case(RunToken::Ok, "OK")]
    #[case(RunToken::Restart, "RESTART")]
    #[case(RunToken::Error, "ERROR")]
    fn token_display_roundtrips(#[case] token: RunToken, #[case] text: &str) {
        assert_eq!(token.to_string(), text);
        assert_eq!(text.parse::<RunToken>().unwrap(), token);
    }

    #[test]
    fn token_parse_rejects_unknown() {
        assert!("WARN".parse::<RunToken>().is_err());
    }

    #[test]
    fn mode_display() {
        assert_eq!(RunMode::Quick.to_string(), "quick");
        assert_eq!(RunMode::Detailed.to_string(), "detailed");
    }

    #[test]
    fn registry_lookup_and_fallback() {
        let reg = SourceRegistry {
            version: 1,
            sources: vec![
                SourceDescriptor {
                    id: SourceId::from("gdt"),
                    label: "Google Drive".into(),
                    local_path: PathBuf::from("/data/frame"),
                    remote: "gdt_frame:frame".into(),
                    enabled: false,
                },
                SourceDescriptor {
                    id: SourceId::from("kfr"),
                    label: "Koofr".into(),
                    local_path: PathBuf::from("/data/frame"),
                    remote: "kfr_frame:frame".into(),
                    enabled: true,
                },
            ],
        };
        assert_eq!(reg.get(&SourceId::from("gdt")).unwrap().label, "Google Drive");
        assert!(reg.get(&SourceId::from("nope")).is_none());
        assert_eq!(reg.first_enabled().unwrap().id, SourceId::from("kfr"));
    }

    #[test]
    fn registry_serde_roundtrip() {
        let reg = SourceRegistry {
            version: 1,
            sources: vec![SourceDescriptor {
                id: SourceId::from("kfr"),
                label: "Koofr (kfr_frame)".into(),
                local_path: PathBuf::from("/home/pi/Pictures/frame"),
                remote: "kfr_frame:frame".into(),
                enabled: true,
            }],
        };
        let yaml = serde_yaml::to_string(&reg).expect("serialize");
        let back: SourceRegistry = serde_yaml::from_str(&yaml).expect("deserialize");
        assert_eq!(reg, back);
    }

    #[test]
    fn enabled_defaults_to_true() {
        let yaml = "version: 1\nsources:\n  - id: kfr\n    label: Koofr\n    local_path: /data/frame\n    remote: \"kfr:frame\"\n";
        let reg: SourceRegistry = serde_yaml::from_str(yaml).expect("deserialize");
        assert!(reg.sources[0].enabled);
    }
}
