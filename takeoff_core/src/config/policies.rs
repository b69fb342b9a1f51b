//! Accessory policies that are not plain level selectors: gable sides,
//! stairs, wall ties, sheeting and base hardware.

use serde::{Deserialize, Serialize};

use crate::selectors::{LevelCountSelector, LevelSelector};

/// How many gable ends (short faces) need a component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GableSides {
    /// Not required (0 faces)
    None,
    /// One end only (1 face)
    One,
    /// Both ends, the usual case for a new scaffold (2 faces)
    #[default]
    Both,
}

impl GableSides {
    pub fn count(&self) -> u32 {
        match self {
            GableSides::None => 0,
            GableSides::One => 1,
            GableSides::Both => 2,
        }
    }
}

/// Stair installation
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum StairPolicy {
    #[default]
    None,
    /// `span_count` stair bays on each level selected by `levels`
    Install { levels: LevelSelector, span_count: u32 },
}

/// Wall tie models, named by their adjustable reach
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WallTieModel {
    /// 160-200 mm
    Kts16,
    /// 200-240 mm
    Kts20,
    /// 240-320 mm
    Kts30,
    /// 320-480 mm
    Kts45,
    /// 480-670 mm
    Kts60,
    /// 670-860 mm
    Kts80,
    /// 860-1050 mm
    Kts100,
}

impl WallTieModel {
    pub const ALL: [WallTieModel; 7] = [
        WallTieModel::Kts16,
        WallTieModel::Kts20,
        WallTieModel::Kts30,
        WallTieModel::Kts45,
        WallTieModel::Kts60,
        WallTieModel::Kts80,
        WallTieModel::Kts100,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            WallTieModel::Kts16 => "KTS16",
            WallTieModel::Kts20 => "KTS20",
            WallTieModel::Kts30 => "KTS30",
            WallTieModel::Kts45 => "KTS45",
            WallTieModel::Kts60 => "KTS60",
            WallTieModel::Kts80 => "KTS80",
            WallTieModel::Kts100 => "KTS100",
        }
    }
}

/// Wall tie installation: which levels, and how many ties on each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum WallTiePolicy {
    #[default]
    None,
    Install {
        model: WallTieModel,
        levels: LevelCountSelector,
        /// `all` = one per span, `alternate` = every other span, `count` = fixed per level
        per_level: LevelCountSelector,
    },
}

/// Safety net or perimeter sheet installation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum SheetPolicy {
    #[default]
    None,
    Install { levels: LevelCountSelector },
}

/// Gable-end sheeting: faces and levels covered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GableSheetPolicy {
    pub sides: GableSides,
    pub levels: LevelCountSelector,
}

impl Default for GableSheetPolicy {
    fn default() -> Self {
        GableSheetPolicy {
            sides: GableSides::None,
            levels: LevelCountSelector::All,
        }
    }
}

/// Jack base type selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JackBaseOption {
    /// SB20 (H58-H230) at every post position
    #[default]
    AllSb20,
    /// SB40 (H58-H350) at every post position
    AllSb40,
    /// Use the explicit `sb20_count` / `sb40_count`
    Custom,
}

/// Ground-contact hardware, only used when the scaffold is at ground level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseHardware {
    pub jack_base: JackBaseOption,
    pub sb20_count: u32,
    pub sb40_count: u32,
    /// Base extension pieces, 40 mm
    pub extension_40: u32,
    /// Base extension pieces, 80 mm
    pub extension_80: u32,
}

impl BaseHardware {
    /// Jack bases the user declared in custom mode
    pub fn declared_jack_bases(&self) -> u32 {
        self.sb20_count.saturating_add(self.sb40_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gable_side_counts() {
        assert_eq!(GableSides::None.count(), 0);
        assert_eq!(GableSides::One.count(), 1);
        assert_eq!(GableSides::Both.count(), 2);
    }

    #[test]
    fn test_wall_tie_json() {
        let policy = WallTiePolicy::Install {
            model: WallTieModel::Kts45,
            levels: LevelCountSelector::Alternate,
            per_level: LevelCountSelector::Count { count: 20 },
        };
        let json = serde_json::to_string(&policy).unwrap();
        assert!(json.contains("\"mode\":\"install\""));
        assert!(json.contains("\"KTS45\""));
        let roundtrip: WallTiePolicy = serde_json::from_str(&json).unwrap();
        assert_eq!(policy, roundtrip);
    }

    #[test]
    fn test_stair_policy_json() {
        let json = r#"{ "mode": "install", "levels": { "policy": "exclude-last" }, "span_count": 2 }"#;
        let policy: StairPolicy = serde_json::from_str(json).unwrap();
        assert_eq!(
            policy,
            StairPolicy::Install {
                levels: LevelSelector::ExcludeLast,
                span_count: 2
            }
        );
    }

    #[test]
    fn test_declared_jack_bases() {
        let base = BaseHardware {
            jack_base: JackBaseOption::Custom,
            sb20_count: 6,
            sb40_count: 4,
            ..Default::default()
        };
        assert_eq!(base.declared_jack_bases(), 10);
    }
}
