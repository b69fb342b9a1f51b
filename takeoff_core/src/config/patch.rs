//! Merging partial configuration records.
//!
//! A drawing analyzer (or any other pre-fill source) returns only the
//! geometry it could read off a drawing. `ConfigurationPatch` is that record;
//! applying it overwrites exactly the fields it carries and nothing else.
//! Patched values go through the same validation as typed-in ones.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Configuration, FrameWidth, SpanLength};

/// Partial configuration, every field optional.
///
/// ## JSON Example
///
/// ```json
/// {
///   "spans": { "1800": 8, "1200": 1 },
///   "frame_columns": { "900": 1 },
///   "level_count": 5
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigurationPatch {
    /// Span counts to overwrite, per length
    pub spans: BTreeMap<SpanLength, u32>,
    /// Column counts to overwrite, per width
    pub frame_columns: BTreeMap<FrameWidth, u32>,
    pub level_count: Option<u32>,
}

impl ConfigurationPatch {
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty() && self.frame_columns.is_empty() && self.level_count.is_none()
    }
}

impl Configuration {
    /// Overwrite the fields present in `patch`, keeping everything else.
    pub fn apply_patch(&mut self, patch: &ConfigurationPatch) {
        for (length, count) in &patch.spans {
            self.spans.insert(*length, *count);
        }
        for (width, count) in &patch.frame_columns {
            self.frame_columns.insert(*width, *count);
        }
        if let Some(level_count) = patch.level_count {
            self.level_count = level_count;
        }
        log::debug!(
            "applied patch: {} span entries, {} column entries, levels {:?}",
            patch.spans.len(),
            patch.frame_columns.len(),
            patch.level_count
        );
    }

    /// Builder form of [`Configuration::apply_patch`]
    pub fn patched(mut self, patch: &ConfigurationPatch) -> Self {
        self.apply_patch(patch);
        self
    }
}
