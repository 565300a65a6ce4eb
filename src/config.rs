use anyhow::{Context, Result};
use dotenv::dotenv;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tokio::fs;

use crate::animation::{DEFAULT_FRAME_INTERVAL, DEFAULT_SPIN_DURATION};
use crate::planner::{PointerAlignment, SpinPlanner, DEFAULT_EXTRA_REVOLUTIONS};
use crate::segment::{default_segments, Segment, SegmentList};

/// Runtime settings for the wheel host, read from the environment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WheelConfig {
    pub spin_duration_ms: u64,
    pub frame_ms: u64,
    pub extra_revolutions: u32,
    pub alignment: PointerAlignment,
    pub seed: Option<u64>,
    pub segments_file: Option<PathBuf>,
}

impl Default for WheelConfig {
    fn default() -> Self {
        WheelConfig {
            spin_duration_ms: DEFAULT_SPIN_DURATION.as_millis() as u64,
            frame_ms: DEFAULT_FRAME_INTERVAL.as_millis() as u64,
            extra_revolutions: DEFAULT_EXTRA_REVOLUTIONS,
            alignment: PointerAlignment::TrailingEdge,
            seed: None,
            segments_file: None,
        }
    }
}

impl FromStr for PointerAlignment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trailing-edge" | "edge" => Ok(PointerAlignment::TrailingEdge),
            "center" | "centre" => Ok(PointerAlignment::Center),
            other => anyhow::bail!("unknown pointer alignment '{other}'"),
        }
    }
}

impl WheelConfig {
    /// Loads `.env` if present, then reads `WHEEL_*` variables.
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = WheelConfig::default();
        Ok(WheelConfig {
            spin_duration_ms: parse_var(&lookup, "WHEEL_SPIN_DURATION_MS")?
                .unwrap_or(defaults.spin_duration_ms),
            frame_ms: parse_var(&lookup, "WHEEL_FRAME_MS")?.unwrap_or(defaults.frame_ms),
            extra_revolutions: parse_var(&lookup, "WHEEL_EXTRA_REVOLUTIONS")?
                .unwrap_or(defaults.extra_revolutions),
            alignment: parse_var(&lookup, "WHEEL_ALIGNMENT")?.unwrap_or(defaults.alignment),
            seed: parse_var(&lookup, "WHEEL_SEED")?,
            segments_file: lookup("WHEEL_SEGMENTS_FILE")
                .filter(|path| !path.trim().is_empty())
                .map(PathBuf::from),
        })
    }

    pub fn spin_duration(&self) -> Duration {
        Duration::from_millis(self.spin_duration_ms)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_ms)
    }

    pub fn planner(&self) -> SpinPlanner {
        SpinPlanner::new(self.extra_revolutions, self.alignment)
    }

    /// Segments from the configured file, or the built-in six names.
    pub async fn load_segments(&self) -> Result<SegmentList> {
        match &self.segments_file {
            Some(path) => load_segments_file(path).await,
            None => Ok(default_segments()),
        }
    }
}

/// Reads a JSON array of `{label, weight, image?}` entries in wheel order.
pub async fn load_segments_file(path: &Path) -> Result<SegmentList> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("reading segment file {}", path.display()))?;
    let entries: Vec<Segment> = serde_json::from_str(&content)
        .with_context(|| format!("parsing segment file {}", path.display()))?;
    Ok(SegmentList::from_entries(entries)?)
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("invalid {key}={raw:?}: {e}")),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = WheelConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, WheelConfig::default());
        assert_eq!(config.spin_duration(), Duration::from_secs(20));
        assert_eq!(config.planner(), SpinPlanner::default());
    }

    #[test]
    fn test_reads_overrides() {
        let config = WheelConfig::from_lookup(lookup_from(&[
            ("WHEEL_SPIN_DURATION_MS", "1500"),
            ("WHEEL_EXTRA_REVOLUTIONS", "3"),
            ("WHEEL_ALIGNMENT", "center"),
            ("WHEEL_SEED", "99"),
            ("WHEEL_SEGMENTS_FILE", "wheel.json"),
        ]))
        .unwrap();
        assert_eq!(config.spin_duration_ms, 1500);
        assert_eq!(config.extra_revolutions, 3);
        assert_eq!(config.alignment, PointerAlignment::Center);
        assert_eq!(config.seed, Some(99));
        assert_eq!(config.segments_file, Some(PathBuf::from("wheel.json")));

        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["alignment"], "center");
    }

    #[test]
    fn test_bad_value_names_key() {
        let err = WheelConfig::from_lookup(lookup_from(&[("WHEEL_EXTRA_REVOLUTIONS", "lots")]))
            .unwrap_err();
        assert!(err.to_string().contains("WHEEL_EXTRA_REVOLUTIONS"));
    }

    #[tokio::test]
    async fn test_load_segments_file() {
        let path = std::env::temp_dir().join(format!("prizewheel-{}.json", std::process::id()));
        fs::write(
            &path,
            r#"[{"label":"Tea","weight":3},{"label":"Coffee","weight":1.5,"image":"cup.png"}]"#,
        )
        .await
        .unwrap();
        let list = load_segments_file(&path).await.unwrap();
        fs::remove_file(&path).await.ok();
        assert_eq!(list.len(), 2);
        assert_eq!(list.get(1).unwrap().label, "Coffee");
        assert_eq!(list.get(1).unwrap().index, 1);
    }

    #[tokio::test]
    async fn test_default_segments_without_file() {
        let list = WheelConfig::default().load_segments().await.unwrap();
        assert_eq!(list, default_segments());
    }
}
