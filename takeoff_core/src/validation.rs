//! # Consistency Validator
//!
//! Advisory cross-checks between what the user declared and what the
//! geometry needs. A mismatch never changes a quantity and never fails;
//! the front end shows it next to the result.
//!
//! | check | needed | provided |
//! |---|---|---|
//! | custom heights | level count | Σ row counts |
//! | jack bases | post positions (ground level only) | SB20 + SB40 in custom mode |
//! | post heights | scaffold total height | Σ declared post length × count |
//!
//! Validation runs on incomplete configurations too: zero spans or columns
//! simply produce smaller requirements.

use serde::{Deserialize, Serialize};

use crate::config::{Configuration, HeightMode, JackBaseOption};
use crate::dimensions::{total_height, PillarGrid};
use crate::units::Millimeters;

/// Outcome of a need/provided comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Ok,
    Under,
    Over,
}

/// One need/provided comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountCheck {
    pub status: CheckStatus,
    pub needed: u32,
    pub provided: u32,
    /// How many are still missing; zero unless `status` is `under`
    pub remaining: u32,
}

impl CountCheck {
    pub fn compare(needed: u32, provided: u32) -> Self {
        let status = match provided.cmp(&needed) {
            std::cmp::Ordering::Less => CheckStatus::Under,
            std::cmp::Ordering::Equal => CheckStatus::Ok,
            std::cmp::Ordering::Greater => CheckStatus::Over,
        };
        CountCheck {
            status,
            needed,
            provided,
            remaining: needed.saturating_sub(provided),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == CheckStatus::Ok
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostHeightStatus {
    Ok,
    Mismatch,
}

/// Declared posts against the scaffold's total height
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostHeightCheck {
    pub status: PostHeightStatus,
    pub declared: Millimeters,
    pub required: Millimeters,
}

/// Every advisory check for one configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub custom_heights: CountCheck,
    pub jack_bases: CountCheck,
    /// Only present when posts were declared
    pub post_height: Option<PostHeightCheck>,
}

impl ValidationResult {
    /// True when nothing needs the user's attention
    pub fn is_clean(&self) -> bool {
        self.custom_heights.is_ok()
            && self.jack_bases.is_ok()
            && self
                .post_height
                .map_or(true, |check| check.status == PostHeightStatus::Ok)
    }
}

/// Run the advisory checks
pub fn validate(config: &Configuration) -> ValidationResult {
    ValidationResult {
        custom_heights: check_custom_heights(config),
        jack_bases: check_jack_bases(config),
        post_height: check_post_height(config),
    }
}

fn check_custom_heights(config: &Configuration) -> CountCheck {
    let needed = config.level_count;
    match config.height_mode {
        HeightMode::Uniform => CountCheck::compare(needed, needed),
        HeightMode::Custom => {
            let provided = config
                .custom_heights
                .iter()
                .fold(0u32, |sum, row| sum.saturating_add(row.count));
            CountCheck::compare(needed, provided)
        }
    }
}

fn check_jack_bases(config: &Configuration) -> CountCheck {
    if !config.is_ground_level {
        return CountCheck::compare(0, 0);
    }

    // Oversized totals are refused by `Configuration::validate`; here they saturate
    let span_total = config.span_total().unwrap_or(u32::MAX);
    let column_total = config.column_total().unwrap_or(u32::MAX);
    let needed = PillarGrid::new(span_total, column_total, config.level_count).positions();
    let provided = match config.base.jack_base {
        JackBaseOption::Custom => config.base.declared_jack_bases(),
        JackBaseOption::AllSb20 | JackBaseOption::AllSb40 => needed,
    };
    CountCheck::compare(needed, provided)
}

fn check_post_height(config: &Configuration) -> Option<PostHeightCheck> {
    if config.post_lengths.values().all(|count| *count == 0) {
        return None;
    }

    let declared: Millimeters = config
        .post_lengths
        .iter()
        .map(|(length, count)| length.mm() * u64::from(*count))
        .sum();
    let required = total_height(config);
    let status = if declared == required {
        PostHeightStatus::Ok
    } else {
        PostHeightStatus::Mismatch
    };
    Some(PostHeightCheck {
        status,
        declared,
        required,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BaseHardware, FrameWidth, HeightRow, LevelHeight, SpanLength};

    fn basic() -> Configuration {
        Configuration::default()
            .with_spans(SpanLength::L900, 4)
            .with_frame_columns(FrameWidth::W900, 2)
            .with_levels(3)
    }

    #[test]
    fn test_uniform_heights_always_ok() {
        let result = validate(&basic());
        assert_eq!(result.custom_heights.status, CheckStatus::Ok);
        assert_eq!(result.custom_heights.provided, 3);
        assert!(result.is_clean());
    }

    #[test]
    fn test_custom_heights_short_by_one() {
        let config = basic().with_levels(5).with_custom_heights(vec![
            HeightRow::new(LevelHeight::H1700, 3),
            HeightRow::new(LevelHeight::H900, 1),
        ]);
        let check = validate(&config).custom_heights;
        assert_eq!(check.status, CheckStatus::Under);
        assert_eq!(check.needed, 5);
        assert_eq!(check.provided, 4);
        assert_eq!(check.remaining, 1);
    }

    #[test]
    fn test_custom_heights_over() {
        let config = basic().with_custom_heights(vec![HeightRow::new(LevelHeight::H1200, 4)]);
        let check = validate(&config).custom_heights;
        assert_eq!(check.status, CheckStatus::Over);
        assert_eq!(check.remaining, 0);
    }

    #[test]
    fn test_jack_bases_not_needed_above_ground() {
        let mut config = basic();
        config.base = BaseHardware {
            jack_base: JackBaseOption::Custom,
            sb20_count: 7,
            ..Default::default()
        };
        let check = validate(&config).jack_bases;
        assert_eq!(check.needed, 0);
        assert_eq!(check.status, CheckStatus::Ok);
    }

    #[test]
    fn test_custom_jack_bases_against_positions() {
        let mut config = basic();
        config.is_ground_level = true;
        config.base = BaseHardware {
            jack_base: JackBaseOption::Custom,
            sb20_count: 10,
            sb40_count: 2,
            ..Default::default()
        };
        let check = validate(&config).jack_bases;
        assert_eq!(check.needed, 15);
        assert_eq!(check.provided, 12);
        assert_eq!(check.status, CheckStatus::Under);
        assert_eq!(check.remaining, 3);

        config.base.sb40_count = 8;
        assert_eq!(validate(&config).jack_bases.status, CheckStatus::Over);

        config.base.jack_base = JackBaseOption::AllSb20;
        assert!(validate(&config).jack_bases.is_ok());
    }

    #[test]
    fn test_incomplete_configuration_still_validates() {
        let mut config = Configuration::default();
        config.is_ground_level = true;
        let result = validate(&config);
        // a lone post position
        assert_eq!(result.jack_bases.needed, 1);
    }

    #[test]
    fn test_oversized_grid_saturates() {
        let mut config = Configuration::default()
            .with_spans(SpanLength::L1800, 70_000)
            .with_frame_columns(FrameWidth::W900, 70_000);
        config.is_ground_level = true;
        let check = validate(&config).jack_bases;
        assert_eq!(check.needed, u32::MAX);
        assert_eq!(check.status, CheckStatus::Ok);

        let mut config = config
            .with_spans(SpanLength::L1800, u32::MAX)
            .with_spans(SpanLength::L900, 1);
        config.base.jack_base = JackBaseOption::Custom;
        config.base.sb20_count = 10;
        let check = validate(&config).jack_bases;
        assert_eq!(check.needed, u32::MAX);
        assert_eq!(check.status, CheckStatus::Under);
    }

    #[test]
    fn test_huge_level_count_does_not_expand_levels() {
        let mut config = Configuration::default().with_levels(4_000_000_000);
        config.post_lengths.insert(LevelHeight::H1700, 2);
        let result = validate(&config);
        assert_eq!(result.custom_heights.needed, 4_000_000_000);
        assert_eq!(
            result.post_height.unwrap().required,
            Millimeters(1700 * 4_000_000_000)
        );
    }

    #[test]
    fn test_post_height_only_when_declared() {
        let mut config = basic();
        assert!(validate(&config).post_height.is_none());

        config.post_lengths.insert(LevelHeight::H1700, 3);
        let check = validate(&config).post_height.unwrap();
        assert_eq!(check.status, PostHeightStatus::Ok);
        assert_eq!(check.required, Millimeters(5100));

        config.post_lengths.insert(LevelHeight::H900, 1);
        let result = validate(&config);
        assert_eq!(result.post_height.unwrap().status, PostHeightStatus::Mismatch);
        assert!(!result.is_clean());
    }

    #[test]
    fn test_post_height_follows_custom_rows() {
        let mut config = basic().with_custom_heights(vec![
            HeightRow::new(LevelHeight::H1700, 2),
            HeightRow::new(LevelHeight::H900, 1),
        ]);
        config.post_lengths.insert(LevelHeight::H1700, 2);
        config.post_lengths.insert(LevelHeight::H900, 1);
        let check = validate(&config).post_height.unwrap();
        assert_eq!(check.required, Millimeters(4300));
        assert_eq!(check.status, PostHeightStatus::Ok);
    }

    #[test]
    fn test_validation_json_shape() {
        let config = basic().with_levels(5).with_custom_heights(vec![HeightRow::new(LevelHeight::H1700, 4)]);
        let json = serde_json::to_value(validate(&config)).unwrap();
        assert_eq!(json["custom_heights"]["status"], "under");
        assert_eq!(json["custom_heights"]["remaining"], 1);
        assert!(json["post_height"].is_null());
    }
}
