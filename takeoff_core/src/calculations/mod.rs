//! # Takeoff Calculation
//!
//! The engine entry point. A calculation follows the pattern:
//!
//! - [`Configuration`] - Input (JSON-serializable)
//! - [`CalculationResult`] - Output (JSON-serializable)
//! - `calculate(config) -> Result<CalculationResult, CalcError>` - Pure function
//!
//! ## Pipeline
//!
//! ```text
//! Configuration
//!   ├─ SelectorGraph ────────── same-as order, cycle check
//!   ├─ validate ─────────────── policy tags, level count, grid size
//!   ├─ resolve_dimensions ───── spans, columns, heights, pillar grid
//!   ├─ resolve levels ───────── level set per category
//!   ├─ material_takeoff ─────── raw counts per category
//!   ├─ aggregate_weights ────── itemized + total weight
//!   └─ plan_loading ─────────── recommended trucks + split options
//! ```
//!
//! Nothing is cached between calls; the same configuration always yields
//! the same result.
//!
//! ## Available Calculations
//!
//! - [`quantities`] - Per-category quantity rules
//! - [`logistics`] - Vehicle allocation

pub mod logistics;
pub mod quantities;

use serde::{Deserialize, Serialize};

use crate::config::Configuration;
use crate::dimensions::{resolve_dimensions, HeightFit};
use crate::errors::CalcResult;
use crate::materials::{aggregate_weights, MaterialItem, MaterialKey, StandardWeights, UnitWeightTable};
use crate::selectors::SelectorGraph;
use crate::units::{Grams, Millimeters};
use crate::validation::{validate, ValidationResult};

pub use logistics::{plan_loading, LoadingPlan, SplitOption, VehicleCatalogue, VehicleKind};
pub use quantities::material_takeoff;

/// Everything the engine derives from one configuration.
///
/// ## JSON Example
///
/// ```json
/// {
///   "materials": [
///     { "key": { "decking": "900" }, "name": "decking/anti-900", "quantity": 12, "unit_weight": 8600, "total_weight": 103200 }
///   ],
///   "total_weight": 164400,
///   "span_total": 4,
///   "span_length_total": 3600,
///   "total_height": 5100,
///   "base_positions": 15,
///   "height_fit": { "kind": "exact" },
///   "recommended_unic_count": 1,
///   "recommended_flatbed_count": 0,
///   "split_options": [
///     { "mix": { "unic": 1 }, "loads": [{ "kind": "unic", "capacity": 2900000, "load": 164400 }], "label": "Unic ×1" }
///   ],
///   "manual_selection_required": false
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationResult {
    /// Category-grouped, fixed order within each category
    pub materials: Vec<MaterialItem>,

    /// Sum of every item's total weight, exactly
    pub total_weight: Grams,

    pub span_total: u32,

    pub span_length_total: Millimeters,

    pub total_height: Millimeters,

    /// Ground-contact post positions (jack bases needed at ground level)
    pub base_positions: u32,

    /// How the custom height table was fitted to the level count
    pub height_fit: HeightFit,

    pub recommended_unic_count: u32,

    pub recommended_flatbed_count: u32,

    /// Alternative loadings, fewest vehicles first
    pub split_options: Vec<SplitOption>,

    /// No split option within the fleet bound covers the weight
    pub manual_selection_required: bool,
}

impl CalculationResult {
    /// Quantity of one material, zero if it is not in the list
    pub fn quantity_of(&self, key: MaterialKey) -> u32 {
        self.materials
            .iter()
            .find(|item| item.key == key)
            .map(|item| item.quantity)
            .unwrap_or(0)
    }

    /// Recommended loading as one line, e.g. "Unic 1 / Flatbed 2"
    pub fn recommended_summary(&self) -> String {
        format!(
            "Unic {} / Flatbed {}",
            self.recommended_unic_count, self.recommended_flatbed_count
        )
    }

    /// Labels of the split options, in order
    pub fn split_labels(&self) -> Vec<&str> {
        self.split_options.iter().map(|o| o.label.as_str()).collect()
    }
}

/// Run the full takeoff with the standard weights and vehicle catalogue.
///
/// # Example
///
/// ```rust
/// use takeoff_core::calculations::calculate;
/// use takeoff_core::config::{Configuration, FrameWidth, SpanLength};
/// use takeoff_core::materials::MaterialKey;
///
/// let config = Configuration::default()
///     .with_spans(SpanLength::L900, 4)
///     .with_frame_columns(FrameWidth::W900, 2)
///     .with_levels(3);
///
/// let result = calculate(&config).expect("valid configuration");
/// assert_eq!(result.quantity_of(MaterialKey::Decking(SpanLength::L900)), 12);
/// assert_eq!(result.total_height.0, 5100);
/// ```
pub fn calculate(config: &Configuration) -> CalcResult<CalculationResult> {
    calculate_with(config, &StandardWeights, &VehicleCatalogue::default())
}

/// Run the full takeoff against a given weight table and vehicle catalogue.
///
/// Fails only on structural configuration errors (no spans or columns, no
/// levels, a same-as cycle, a policy the category does not support). No
/// partial result is returned in that case.
pub fn calculate_with(
    config: &Configuration,
    weights: &dyn UnitWeightTable,
    catalogue: &VehicleCatalogue,
) -> CalcResult<CalculationResult> {
    // Cycles first, so a same-as loop is reported as such rather than as a policy
    let graph = SelectorGraph::build(config)?;
    config.validate()?;
    let dims = resolve_dimensions(config)?;
    log::debug!(
        "dimensions: {} spans / {}, {} columns, {} levels / {}",
        dims.span_total,
        dims.span_length_total,
        dims.column_total,
        dims.level_count,
        dims.total_height
    );

    let resolved = graph.resolve(dims.level_count)?;
    let takeoff = material_takeoff(config, &dims, &resolved);
    let weighted = aggregate_weights(&takeoff, weights);
    log::debug!("{} material lines, {}", weighted.materials.len(), weighted.total_weight);

    let plan = plan_loading(weighted.total_weight, catalogue);

    Ok(CalculationResult {
        materials: weighted.materials,
        total_weight: weighted.total_weight,
        span_total: dims.span_total,
        span_length_total: dims.span_length_total,
        total_height: dims.total_height,
        base_positions: dims.pillar_grid.positions(),
        height_fit: dims.height_fit,
        recommended_unic_count: plan.recommended.count(VehicleKind::Unic),
        recommended_flatbed_count: plan.recommended.count(VehicleKind::Flatbed),
        split_options: plan.split_options,
        manual_selection_required: plan.manual_selection_required,
    })
}

/// Calculation and advisory validation together, as a front end shows them.
///
/// Validation runs even when the calculation fails, so a half-entered form
/// can still show its count mismatches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub result: Result<CalculationResult, crate::errors::CalcError>,
    pub validation: ValidationResult,
}

/// Calculate and validate one configuration
pub fn assess(config: &Configuration) -> Assessment {
    Assessment {
        result: calculate(config),
        validation: validate(config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        BaseHardware, FrameWidth, GableSheetPolicy, GableSides, JackBaseOption, SheetPolicy, SpanLength,
        StairPolicy, WallTieModel, WallTiePolicy,
    };
    use crate::errors::CalcError;
    use crate::selectors::{LevelCountSelector, LevelSelector, SelectorCategory};

    fn example() -> Configuration {
        Configuration::default()
            .with_spans(SpanLength::L900, 4)
            .with_frame_columns(FrameWidth::W900, 2)
            .with_levels(3)
    }

    /// Configuration touching every category
    fn loaded() -> Configuration {
        let mut config = example()
            .with_spans(SpanLength::L1800, 6)
            .with_frame_columns(FrameWidth::W600, 1)
            .with_levels(7);
        config.is_ground_level = true;
        config.decking = LevelSelector::ExcludeFirst;
        config.toeboard = LevelSelector::SameAs {
            category: SelectorCategory::Decking,
        };
        config.stairs = StairPolicy::Install {
            levels: LevelSelector::ExcludeLast,
            span_count: 1,
        };
        config.wall_ties = WallTiePolicy::Install {
            model: WallTieModel::Kts45,
            levels: LevelCountSelector::Alternate,
            per_level: LevelCountSelector::Alternate,
        };
        config.safety_net = SheetPolicy::Install {
            levels: LevelCountSelector::All,
        };
        config.perimeter_sheet = SheetPolicy::Install {
            levels: LevelCountSelector::All,
        };
        config.gable_sheet = GableSheetPolicy {
            sides: GableSides::Both,
            levels: LevelCountSelector::All,
        };
        config.base = BaseHardware {
            jack_base: JackBaseOption::AllSb40,
            extension_40: 2,
            ..Default::default()
        };
        config
    }

    fn unit_fixture(_key: MaterialKey) -> Grams {
        Grams(1_000)
    }

    #[test]
    fn test_end_to_end_example() {
        let result = calculate(&example()).unwrap();
        assert_eq!(result.span_total, 4);
        assert_eq!(result.span_length_total, Millimeters(3600));
        assert_eq!(result.total_height, Millimeters(5100));
        assert_eq!(result.quantity_of(MaterialKey::Decking(SpanLength::L900)), 12);
        assert_eq!(result.quantity_of(MaterialKey::Toeboard(SpanLength::L900)), 12);
        assert_eq!(result.quantity_of(MaterialKey::GableHandrailSet), 2);
        assert_eq!(result.materials.len(), 3);
        assert_eq!(result.recommended_summary(), "Unic 1 / Flatbed 0");

        let expected = StandardWeights.unit_weight(MaterialKey::Decking(SpanLength::L900)) * 12
            + StandardWeights.unit_weight(MaterialKey::Toeboard(SpanLength::L900)) * 12
            + StandardWeights.unit_weight(MaterialKey::GableHandrailSet) * 2;
        assert_eq!(result.total_weight, expected);
    }

    #[test]
    fn test_fixture_weights_are_injected() {
        let result = calculate_with(&example(), &unit_fixture, &VehicleCatalogue::default()).unwrap();
        assert_eq!(result.total_weight, Grams(26_000));
        assert!(result.materials.iter().all(|i| i.unit_weight == Grams(1_000)));
    }

    #[test]
    fn test_output_order_is_category_grouped() {
        let result = calculate(&loaded()).unwrap();
        let keys: Vec<MaterialKey> = result.materials.iter().map(|i| i.key).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
        assert_eq!(keys.first(), Some(&MaterialKey::Decking(SpanLength::L900)));
        assert_eq!(keys.last(), Some(&MaterialKey::BaseExtension40));
    }

    #[test]
    fn test_loaded_quantities() {
        let result = calculate(&loaded()).unwrap();
        // 6 decked levels out of 7
        assert_eq!(result.quantity_of(MaterialKey::Decking(SpanLength::L1800)), 36);
        assert_eq!(result.quantity_of(MaterialKey::Toeboard(SpanLength::L900)), 24);
        assert_eq!(result.quantity_of(MaterialKey::StairUnit), 6);
        // 4 of 7 levels × 5 of 10 spans
        assert_eq!(result.quantity_of(MaterialKey::WallTie(WallTieModel::Kts45)), 20);
        assert_eq!(result.quantity_of(MaterialKey::SafetyNet), 3);
        assert_eq!(result.quantity_of(MaterialKey::PerimeterSheet), 3);
        assert_eq!(result.quantity_of(MaterialKey::GableSheet), 6);
        // (10 + 1) × (3 + 1)
        assert_eq!(result.base_positions, 44);
        assert_eq!(result.quantity_of(MaterialKey::JackBaseSb40), 44);
        assert_eq!(result.quantity_of(MaterialKey::BasePlate), 44);
    }

    #[test]
    fn test_deterministic() {
        let config = loaded();
        let a = calculate(&config).unwrap();
        let b = calculate(&config).unwrap();
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_weight_consistency() {
        for levels in 1..=9 {
            for spans in 1..=6 {
                let config = loaded().with_levels(levels).with_spans(SpanLength::L1500, spans);
                let result = calculate(&config).unwrap();
                let sum: Grams = result.materials.iter().map(|i| i.total_weight).sum();
                assert_eq!(sum, result.total_weight);
            }
        }
    }

    #[test]
    fn test_monotonic_in_spans_columns_levels() {
        let base = loaded();
        let before = calculate(&base).unwrap();
        let grown = [
            base.clone().with_spans(SpanLength::L600, 3),
            base.clone().with_frame_columns(FrameWidth::W1200, 2),
            base.clone().with_levels(base.level_count + 2),
        ];
        for config in grown {
            let after = calculate(&config).unwrap();
            assert!(after.total_weight >= before.total_weight);
            for item in &before.materials {
                assert!(
                    after.quantity_of(item.key) >= item.quantity,
                    "{} decreased",
                    item.name
                );
            }
        }
    }

    #[test]
    fn test_logistics_options_cover_weight() {
        let result = calculate(&loaded()).unwrap();
        assert!(!result.split_options.is_empty());
        for option in &result.split_options {
            assert!(option.capacity() >= result.total_weight);
            assert!(option.loads.iter().all(|l| l.load <= l.capacity));
        }
    }

    #[test]
    fn test_structural_errors_abort() {
        let no_columns = Configuration::default().with_spans(SpanLength::L900, 2);
        assert_eq!(
            calculate(&no_columns).unwrap_err().error_code(),
            "INVALID_CONFIGURATION"
        );

        let mut cyclic = example();
        cyclic.toeboard = LevelSelector::SameAs {
            category: SelectorCategory::Toeboard,
        };
        assert_eq!(
            calculate(&cyclic).unwrap_err(),
            CalcError::cyclic_selector("toeboard -> toeboard")
        );

        let mut unsupported = example();
        unsupported.decking = LevelSelector::Alternate;
        assert!(matches!(
            calculate(&unsupported).unwrap_err(),
            CalcError::UnknownPolicy { .. }
        ));
    }

    #[test]
    fn test_oversized_counts_are_errors() {
        let grid = Configuration::default()
            .with_spans(SpanLength::L1800, 70_000)
            .with_frame_columns(FrameWidth::W900, 70_000);
        let spans = example()
            .with_spans(SpanLength::L1800, u32::MAX)
            .with_spans(SpanLength::L900, 1);
        let levels = example().with_levels(4_000_000_000);

        for config in [grid, spans, levels] {
            let assessment = assess(&config);
            assert_eq!(assessment.result.unwrap_err().error_code(), "INVALID_INPUT");
            assert!(assessment.validation.custom_heights.is_ok());
        }
    }

    #[test]
    fn test_advisory_mismatch_does_not_block() {
        let mut config = example().with_levels(5);
        config.is_ground_level = true;
        config.base = BaseHardware {
            jack_base: JackBaseOption::Custom,
            sb20_count: 3,
            ..Default::default()
        };
        let assessment = assess(&config);
        let result = assessment.result.unwrap();
        assert_eq!(result.quantity_of(MaterialKey::JackBaseSb20), 3);
        assert!(!assessment.validation.is_clean());
    }

    #[test]
    fn test_result_serialization() {
        let result = calculate(&example()).unwrap();
        let json = serde_json::to_string_pretty(&result).unwrap();
        assert!(json.contains("decking/anti-900"));
        let roundtrip: CalculationResult = serde_json::from_str(&json).unwrap();
        assert_eq!(result, roundtrip);
    }
}
