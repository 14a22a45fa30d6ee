//! Scan configuration types.

use derive_builder::Builder;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ScanError;

/// Depth limit applied when none is configured explicitly.
pub const DEFAULT_MAX_DEPTH: u32 = 15;

/// Default value of the concurrency hint.
pub const DEFAULT_CONCURRENT_OPS: usize = 5;

const ZERO_CONCURRENCY: &str = "concurrent_ops must be at least 1";

/// Policy bundle for one scan.
///
/// Built once per scan and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
#[serde(default)]
pub struct ScanConfig {
    /// Maximum depth to expand (None = unlimited, still bounded by the
    /// scanner's hard ceiling). Serialized as `-1` when unlimited.
    #[builder(default = "Some(DEFAULT_MAX_DEPTH)")]
    #[serde(
        serialize_with = "serialize_depth",
        deserialize_with = "deserialize_depth"
    )]
    pub max_depth: Option<u32>,

    /// Include entries whose name starts with `.`.
    #[builder(default = "false")]
    pub show_hidden: bool,

    /// Order directories before files, each group by byte-wise name.
    #[builder(default = "true")]
    pub sort_directories_first: bool,

    /// Record file sizes so they can be shown next to file names.
    #[builder(default = "false")]
    pub show_size: bool,

    /// Concurrency hint. Accepted and validated but never consulted:
    /// traversal is single-threaded.
    #[builder(default = "DEFAULT_CONCURRENT_OPS")]
    pub concurrent_ops: usize,
}

impl ScanConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(0) = self.concurrent_ops {
            return Err(ZERO_CONCURRENCY.to_string());
        }
        Ok(())
    }
}

impl ScanConfig {
    /// Create a new scan config builder.
    pub fn builder() -> ScanConfigBuilder {
        ScanConfigBuilder::default()
    }

    /// Check a config that was built without the builder, e.g. deserialized.
    pub fn validate(&self) -> Result<(), ScanError> {
        if self.concurrent_ops == 0 {
            return Err(ScanError::invalid_config(ZERO_CONCURRENCY));
        }
        Ok(())
    }

    /// Convert a signed depth where any negative value means "unlimited".
    pub fn depth_limit(raw: i64) -> Option<u32> {
        if raw < 0 {
            None
        } else {
            u32::try_from(raw).ok()
        }
    }

    /// Check whether a directory at `depth` lies beyond the configured limit.
    pub fn exceeds_depth(&self, depth: usize) -> bool {
        self.max_depth.is_some_and(|max| depth > max as usize)
    }

    /// Check if hidden entries should be skipped.
    pub fn should_skip_hidden(&self, name: &str) -> bool {
        !self.show_hidden && name.starts_with('.')
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_depth: Some(DEFAULT_MAX_DEPTH),
            show_hidden: false,
            sort_directories_first: true,
            show_size: false,
            concurrent_ops: DEFAULT_CONCURRENT_OPS,
        }
    }
}

fn serialize_depth<S: Serializer>(depth: &Option<u32>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_i64(depth.map_or(-1, i64::from))
}

fn deserialize_depth<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    let raw = Option::<i64>::deserialize(deserializer)?;
    Ok(raw.and_then(ScanConfig::depth_limit))
}
