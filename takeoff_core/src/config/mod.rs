//! # Scaffold Configuration
//!
//! The `Configuration` struct is the single input to the engine. It is plain
//! data: every field has a closed domain (fixed span lengths, fixed frame
//! widths, fixed level heights, tagged policy enums) so most invariants are
//! carried by the types. What the types cannot express is checked by
//! [`Configuration::validate`].
//!
//! ## Structure
//!
//! ```text
//! Configuration
//! ├── spans / frame_columns / level_count / height_mode   (geometry)
//! ├── decking / toeboard / stairs                          (level selectors)
//! ├── gable_handrail_sides                                 (0/1/2 sides)
//! ├── wall_ties / safety_net / perimeter_sheet / gable_sheet
//! ├── is_ground_level + base                               (base hardware)
//! └── post_lengths / memo                                  (advisory, free text)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use takeoff_core::config::{Configuration, FrameWidth, SpanLength};
//!
//! let config = Configuration::default()
//!     .with_spans(SpanLength::L1800, 6)
//!     .with_frame_columns(FrameWidth::W900, 1)
//!     .with_levels(4);
//!
//! assert!(config.validate().is_ok());
//! let json = serde_json::to_string_pretty(&config).unwrap();
//! assert!(json.contains("\"1800\": 6"));
//! ```

pub mod patch;
pub mod policies;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::dimensions::PillarGrid;
use crate::errors::{CalcError, CalcResult};
use crate::selectors::{LevelCountSelector, LevelSelector, SelectorCategory};
use crate::units::Millimeters;

pub use patch::ConfigurationPatch;
pub use policies::{
    BaseHardware, GableSheetPolicy, GableSides, JackBaseOption, SheetPolicy, StairPolicy,
    WallTieModel, WallTiePolicy,
};

/// Height of a standard level, used for uniform mode and to pad short custom rows
pub const STANDARD_LEVEL_HEIGHT: LevelHeight = LevelHeight::H1700;

/// Highest level count accepted (340 m at the standard level height)
pub const MAX_LEVEL_COUNT: u32 = 200;

/// Span lengths available along the long axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SpanLength {
    #[serde(rename = "600")]
    L600,
    #[serde(rename = "900")]
    L900,
    #[serde(rename = "1200")]
    L1200,
    #[serde(rename = "1500")]
    L1500,
    #[serde(rename = "1800")]
    L1800,
}

impl SpanLength {
    /// All span lengths, shortest first
    pub const ALL: [SpanLength; 5] = [
        SpanLength::L600,
        SpanLength::L900,
        SpanLength::L1200,
        SpanLength::L1500,
        SpanLength::L1800,
    ];

    pub fn mm(&self) -> Millimeters {
        Millimeters(match self {
            SpanLength::L600 => 600,
            SpanLength::L900 => 900,
            SpanLength::L1200 => 1200,
            SpanLength::L1500 => 1500,
            SpanLength::L1800 => 1800,
        })
    }
}

/// Frame (column) widths available along the short axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FrameWidth {
    #[serde(rename = "450")]
    W450,
    #[serde(rename = "600")]
    W600,
    #[serde(rename = "900")]
    W900,
    #[serde(rename = "1200")]
    W1200,
}

impl FrameWidth {
    /// All frame widths, narrowest first
    pub const ALL: [FrameWidth; 4] = [
        FrameWidth::W450,
        FrameWidth::W600,
        FrameWidth::W900,
        FrameWidth::W1200,
    ];

    pub fn mm(&self) -> Millimeters {
        Millimeters(match self {
            FrameWidth::W450 => 450,
            FrameWidth::W600 => 600,
            FrameWidth::W900 => 900,
            FrameWidth::W1200 => 1200,
        })
    }
}

/// Storey heights a level can be built at (also the post lengths)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LevelHeight {
    #[serde(rename = "400")]
    H400,
    #[serde(rename = "600")]
    H600,
    #[serde(rename = "900")]
    H900,
    #[serde(rename = "1200")]
    H1200,
    #[serde(rename = "1700")]
    H1700,
}

impl LevelHeight {
    pub const ALL: [LevelHeight; 5] = [
        LevelHeight::H1700,
        LevelHeight::H1200,
        LevelHeight::H900,
        LevelHeight::H600,
        LevelHeight::H400,
    ];

    pub fn mm(&self) -> Millimeters {
        Millimeters(match self {
            LevelHeight::H400 => 400,
            LevelHeight::H600 => 600,
            LevelHeight::H900 => 900,
            LevelHeight::H1200 => 1200,
            LevelHeight::H1700 => 1700,
        })
    }
}

/// How per-level heights are given
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HeightMode {
    /// Every level is [`STANDARD_LEVEL_HEIGHT`]
    #[default]
    Uniform,
    /// Levels follow `custom_heights`, bottom level first
    Custom,
}

/// One row of a custom height table: `count` consecutive levels at `height`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeightRow {
    pub height: LevelHeight,
    pub count: u32,
}

impl HeightRow {
    pub fn new(height: LevelHeight, count: u32) -> Self {
        HeightRow { height, count }
    }
}

/// Complete description of one scaffold to take off.
///
/// Missing JSON fields fall back to [`Configuration::default`], so a partial
/// document (hand-written or merged from an analyzer record) deserializes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// Span count per span length
    pub spans: BTreeMap<SpanLength, u32>,

    /// Column (frame line) count per frame width
    pub frame_columns: BTreeMap<FrameWidth, u32>,

    /// Number of vertical levels (must be positive)
    pub level_count: u32,

    pub height_mode: HeightMode,

    /// Only read in [`HeightMode::Custom`]; kept otherwise so switching modes
    /// does not lose the table
    pub custom_heights: Vec<HeightRow>,

    /// Scaffold stands on the ground, so base hardware is needed
    pub is_ground_level: bool,

    pub base: BaseHardware,

    /// Anti-slip decking levels
    pub decking: LevelSelector,

    pub toeboard: LevelSelector,

    pub gable_handrail_sides: GableSides,

    pub stairs: StairPolicy,

    pub wall_ties: WallTiePolicy,

    pub safety_net: SheetPolicy,

    pub perimeter_sheet: SheetPolicy,

    pub gable_sheet: GableSheetPolicy,

    /// Declared post stack (post length -> count), checked against total height
    pub post_lengths: BTreeMap<LevelHeight, u32>,

    /// Free-form note (site name, date, person in charge...)
    pub memo: String,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            spans: BTreeMap::new(),
            frame_columns: BTreeMap::new(),
            level_count: 1,
            height_mode: HeightMode::Uniform,
            custom_heights: Vec::new(),
            is_ground_level: false,
            base: BaseHardware::default(),
            decking: LevelSelector::All,
            toeboard: LevelSelector::All,
            gable_handrail_sides: GableSides::Both,
            stairs: StairPolicy::None,
            wall_ties: WallTiePolicy::None,
            safety_net: SheetPolicy::None,
            perimeter_sheet: SheetPolicy::None,
            gable_sheet: GableSheetPolicy::default(),
            post_lengths: BTreeMap::new(),
            memo: String::new(),
        }
    }
}

impl Configuration {
    /// Set the number of spans of one length
    pub fn with_spans(mut self, length: SpanLength, count: u32) -> Self {
        self.spans.insert(length, count);
        self
    }

    /// Set the number of columns of one width
    pub fn with_frame_columns(mut self, width: FrameWidth, count: u32) -> Self {
        self.frame_columns.insert(width, count);
        self
    }

    pub fn with_levels(mut self, level_count: u32) -> Self {
        self.level_count = level_count;
        self
    }

    /// Switch to custom heights with the given rows
    pub fn with_custom_heights(mut self, rows: Vec<HeightRow>) -> Self {
        self.height_mode = HeightMode::Custom;
        self.custom_heights = rows;
        self
    }

    pub fn span_count(&self, length: SpanLength) -> u32 {
        self.spans.get(&length).copied().unwrap_or(0)
    }

    pub fn column_count(&self, width: FrameWidth) -> u32 {
        self.frame_columns.get(&width).copied().unwrap_or(0)
    }

    /// Number of spans over all lengths, `None` if it overflows
    pub fn span_total(&self) -> Option<u32> {
        self.spans.values().try_fold(0u32, |sum, count| sum.checked_add(*count))
    }

    /// Number of columns over all widths, `None` if it overflows
    pub fn column_total(&self) -> Option<u32> {
        self.frame_columns.values().try_fold(0u32, |sum, count| sum.checked_add(*count))
    }

    /// The level selector a category uses, if that category has one.
    ///
    /// Stairs only have a selector while they are installed.
    pub fn level_selector(&self, category: SelectorCategory) -> Option<&LevelSelector> {
        match category {
            SelectorCategory::Decking => Some(&self.decking),
            SelectorCategory::Toeboard => Some(&self.toeboard),
            SelectorCategory::Stairs => match &self.stairs {
                StairPolicy::None => None,
                StairPolicy::Install { levels, .. } => Some(levels),
            },
        }
    }

    /// Check the scalar domains and each category's allowed policies.
    ///
    /// Zero spans/columns are reported by the dimension resolver and selector
    /// cycles by the selector graph; this covers everything else that would
    /// make a calculation meaningless: level count outside
    /// `1..=MAX_LEVEL_COUNT`, span/column/post position totals that overflow,
    /// empty height rows and unsupported policies.
    pub fn validate(&self) -> CalcResult<()> {
        if self.level_count == 0 {
            return Err(CalcError::invalid_input(
                "level_count",
                "0",
                "A scaffold needs at least one level",
            ));
        }
        if self.level_count > MAX_LEVEL_COUNT {
            return Err(CalcError::invalid_input(
                "level_count",
                self.level_count.to_string(),
                format!("At most {} levels are supported", MAX_LEVEL_COUNT),
            ));
        }
        self.check_grid_size()?;
        if self.height_mode == HeightMode::Custom {
            if let Some(row) = self.custom_heights.iter().find(|row| row.count == 0) {
                return Err(CalcError::invalid_input(
                    "custom_heights",
                    format!("{} x 0", row.height.mm()),
                    "Each height row must cover at least one level",
                ));
            }
        }

        check_selector(SelectorCategory::Decking, &self.decking)?;
        check_selector(SelectorCategory::Toeboard, &self.toeboard)?;
        if let StairPolicy::Install { levels, .. } = &self.stairs {
            check_selector(SelectorCategory::Stairs, levels)?;
        }

        // Sheets come in 3-level panels, skipping every other level is not offered
        if let SheetPolicy::Install { levels: LevelCountSelector::Alternate } = self.perimeter_sheet {
            return Err(CalcError::unknown_policy("perimeter_sheet", "alternate"));
        }
        if matches!(self.gable_sheet.levels, LevelCountSelector::Alternate)
            && self.gable_sheet.sides != GableSides::None
        {
            return Err(CalcError::unknown_policy("gable_sheet", "alternate"));
        }

        Ok(())
    }
}

impl Configuration {
    /// Span, column and post position totals must all fit a `u32`
    fn check_grid_size(&self) -> CalcResult<()> {
        let span_total = self.span_total().ok_or_else(|| {
            CalcError::invalid_input(
                "spans",
                wide_total(self.spans.values()).to_string(),
                "Too many spans",
            )
        })?;
        let column_total = self.column_total().ok_or_else(|| {
            CalcError::invalid_input(
                "frame_columns",
                wide_total(self.frame_columns.values()).to_string(),
                "Too many columns",
            )
        })?;
        if PillarGrid::checked(span_total, column_total, self.level_count).is_none() {
            return Err(CalcError::invalid_input(
                "spans",
                format!("{} spans x {} columns", span_total, column_total),
                "Too many post positions",
            ));
        }
        Ok(())
    }
}

fn wide_total<'a>(counts: impl Iterator<Item = &'a u32>) -> u64 {
    counts.map(|count| u64::from(*count)).sum()
}

/// Which selector tags each category accepts
fn check_selector(category: SelectorCategory, selector: &LevelSelector) -> CalcResult<()> {
    let allowed = match (category, selector) {
        (_, LevelSelector::ExplicitList { .. }) => true,
        (SelectorCategory::Decking, LevelSelector::All | LevelSelector::ExcludeFirst) => true,
        (SelectorCategory::Toeboard, LevelSelector::All) => true,
        (
            SelectorCategory::Toeboard,
            LevelSelector::SameAs {
                category: SelectorCategory::Decking,
            },
        ) => true,
        (SelectorCategory::Stairs, LevelSelector::ExcludeLast) => true,
        _ => false,
    };
    if allowed {
        Ok(())
    } else {
        Err(CalcError::unknown_policy(category.name(), selector.tag()))
    }
}
