//! # Dimension Resolver
//!
//! Derives the geometry every quantity rule builds on: span totals, column
//! totals, per-level heights and the pillar grid.
//!
//! The pillar grid counts post positions in plan. Posts stand at both ends of
//! every span and on both sides of every column, so a run of `s` spans and
//! `c` columns has `(s + 1) × (c + 1)` ground-contact positions.
//!
//! ## Example
//!
//! ```rust
//! use takeoff_core::config::{Configuration, FrameWidth, SpanLength};
//! use takeoff_core::dimensions::resolve_dimensions;
//!
//! let config = Configuration::default()
//!     .with_spans(SpanLength::L900, 4)
//!     .with_frame_columns(FrameWidth::W900, 2)
//!     .with_levels(3);
//!
//! let dims = resolve_dimensions(&config).unwrap();
//! assert_eq!(dims.span_total, 4);
//! assert_eq!(dims.span_length_total.0, 3600);
//! assert_eq!(dims.total_height.0, 5100);
//! assert_eq!(dims.pillar_grid.positions(), 15);
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{Configuration, FrameWidth, HeightMode, SpanLength, MAX_LEVEL_COUNT, STANDARD_LEVEL_HEIGHT};
use crate::errors::{CalcError, CalcResult};
use crate::units::Millimeters;

/// Post positions in plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PillarGrid {
    /// Post lines along the span direction (span_total + 1)
    pub span_lines: u32,
    /// Post lines across the frame direction (column_total + 1)
    pub column_lines: u32,
    pub levels: u32,
}

impl PillarGrid {
    /// Grid for the given totals. Line counts and positions saturate at
    /// `u32::MAX`; use [`PillarGrid::checked`] where overflow must be refused.
    pub fn new(span_total: u32, column_total: u32, levels: u32) -> Self {
        PillarGrid {
            span_lines: span_total.saturating_add(1),
            column_lines: column_total.saturating_add(1),
            levels,
        }
    }

    /// Grid for the given totals, `None` when the position count overflows
    pub fn checked(span_total: u32, column_total: u32, levels: u32) -> Option<Self> {
        let grid = PillarGrid {
            span_lines: span_total.checked_add(1)?,
            column_lines: column_total.checked_add(1)?,
            levels,
        };
        grid.span_lines.checked_mul(grid.column_lines)?;
        Some(grid)
    }

    /// Ground-contact positions, one jack base each
    pub fn positions(&self) -> u32 {
        self.span_lines.saturating_mul(self.column_lines)
    }
}

/// How a custom height table was fitted to the level count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "levels", rename_all = "kebab-case")]
pub enum HeightFit {
    /// Rows cover exactly the level count (or uniform mode)
    #[default]
    Exact,
    /// Rows were short; this many levels were filled at the standard height
    Padded(u32),
    /// Rows were long; this many trailing entries were ignored
    Truncated(u32),
}

/// Geometry derived from a configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Number of spans along the long axis
    pub span_total: u32,
    /// Length of the run along the long axis
    pub span_length_total: Millimeters,
    /// Number of columns across the short axis
    pub column_total: u32,
    /// Width of the scaffold across the short axis
    pub frame_width_total: Millimeters,
    pub level_count: u32,
    /// Height of each level, bottom first; always `level_count` long
    pub level_heights: Vec<Millimeters>,
    pub total_height: Millimeters,
    pub height_fit: HeightFit,
    pub pillar_grid: PillarGrid,
}

/// Resolve the geometry of a configuration.
///
/// Fails with `InvalidConfiguration` when there are no spans or no columns,
/// and with `InvalidInput` when the level count is outside
/// `1..=MAX_LEVEL_COUNT` or a span, column or post position total does not
/// fit a `u32`. A custom height table
/// that does not add up to the level count is padded or truncated
/// deterministically; the mismatch is recorded in [`Dimensions::height_fit`].
pub fn resolve_dimensions(config: &Configuration) -> CalcResult<Dimensions> {
    if config.level_count == 0 || config.level_count > MAX_LEVEL_COUNT {
        return Err(CalcError::invalid_input(
            "level_count",
            config.level_count.to_string(),
            format!("A scaffold has between 1 and {} levels", MAX_LEVEL_COUNT),
        ));
    }

    let span_total = config
        .span_total()
        .ok_or_else(|| CalcError::invalid_input("spans", "overflow", "Too many spans"))?;
    if span_total == 0 {
        return Err(CalcError::invalid_configuration(
            "A scaffold needs at least one span",
        ));
    }
    let span_length_total: Millimeters = SpanLength::ALL
        .iter()
        .map(|l| l.mm() * u64::from(config.span_count(*l)))
        .sum();

    let column_total = config
        .column_total()
        .ok_or_else(|| CalcError::invalid_input("frame_columns", "overflow", "Too many columns"))?;
    if column_total == 0 {
        return Err(CalcError::invalid_configuration(
            "A scaffold needs at least one column",
        ));
    }
    let frame_width_total: Millimeters = FrameWidth::ALL
        .iter()
        .map(|w| w.mm() * u64::from(config.column_count(*w)))
        .sum();

    let pillar_grid = PillarGrid::checked(span_total, column_total, config.level_count).ok_or_else(|| {
        CalcError::invalid_input(
            "spans",
            format!("{} spans x {} columns", span_total, column_total),
            "Too many post positions",
        )
    })?;

    let (level_heights, height_fit) = level_heights(config);
    let total_height: Millimeters = level_heights.iter().copied().sum();

    Ok(Dimensions {
        span_total,
        span_length_total,
        column_total,
        frame_width_total,
        level_count: config.level_count,
        level_heights,
        total_height,
        height_fit,
        pillar_grid,
    })
}

/// Total height without expanding the levels; equals the sum of
/// [`Dimensions::level_heights`] for any level count.
pub fn total_height(config: &Configuration) -> Millimeters {
    let levels = u64::from(config.level_count);
    match config.height_mode {
        HeightMode::Uniform => STANDARD_LEVEL_HEIGHT.mm() * levels,
        HeightMode::Custom => {
            let mut remaining = levels;
            let mut total = Millimeters(0);
            for row in &config.custom_heights {
                let taken = remaining.min(u64::from(row.count));
                total = total + row.height.mm() * taken;
                remaining -= taken;
            }
            total + STANDARD_LEVEL_HEIGHT.mm() * remaining
        }
    }
}

/// Expand the height mode into one height per level
fn level_heights(config: &Configuration) -> (Vec<Millimeters>, HeightFit) {
    let levels = config.level_count as usize;
    match config.height_mode {
        HeightMode::Uniform => (vec![STANDARD_LEVEL_HEIGHT.mm(); levels], HeightFit::Exact),
        HeightMode::Custom => {
            let declared: u64 = config.custom_heights.iter().map(|r| u64::from(r.count)).sum();
            let mut heights: Vec<Millimeters> = config
                .custom_heights
                .iter()
                .flat_map(|row| std::iter::repeat(row.height.mm()).take(row.count as usize))
                .take(levels)
                .collect();

            let fit = if (declared as usize) < levels {
                let missing = levels - heights.len();
                heights.resize(levels, STANDARD_LEVEL_HEIGHT.mm());
                log::warn!("custom heights cover {} of {} levels, padding {} at standard height", declared, levels, missing);
                HeightFit::Padded(missing as u32)
            } else if (declared as usize) > levels {
                let extra = declared - levels as u64;
                log::warn!("custom heights cover {} levels but only {} exist, ignoring {}", declared, levels, extra);
                HeightFit::Truncated(extra as u32)
            } else {
                HeightFit::Exact
            };
            (heights, fit)
        }
    }
}
