//! # Material Quantity Calculator
//!
//! One rule per accessory category. Each rule reads the resolved geometry and
//! its own level resolution and adds raw counts to a [`Takeoff`].
//!
//! | category | quantity |
//! |---|---|
//! | decking | spans of each length × selected levels |
//! | toeboard | spans of each length × selected levels |
//! | gable handrail | one set per side (0/1/2), independent of levels |
//! | stairs | stair bays × selected levels |
//! | wall ties | tied levels × ties per level |
//! | safety net, perimeter sheet | ⌈covered levels / 3⌉ |
//! | gable sheet | ⌈covered levels / 3⌉ × sides |
//! | base hardware | one jack base and one plate per post position |

use crate::config::{
    Configuration, GableSheetPolicy, GableSides, JackBaseOption, SheetPolicy, SpanLength, StairPolicy,
    WallTiePolicy,
};
use crate::dimensions::Dimensions;
use crate::materials::{MaterialKey, Takeoff};
use crate::selectors::{LevelCountSelector, LevelSet, ResolvedLevels, SelectorCategory};

/// Levels one sheet or net panel covers
pub const LEVELS_PER_SHEET: u32 = 3;

/// Run every category rule and collect the counts
pub fn material_takeoff(config: &Configuration, dims: &Dimensions, resolved: &ResolvedLevels) -> Takeoff {
    let mut takeoff = Takeoff::new();
    takeoff.extend(decking(config, &resolved.levels(SelectorCategory::Decking)));
    takeoff.extend(toeboard(config, &resolved.levels(SelectorCategory::Toeboard)));
    takeoff.extend(gable_handrail(config.gable_handrail_sides));
    takeoff.extend(stairs(&config.stairs, &resolved.levels(SelectorCategory::Stairs)));
    takeoff.extend(wall_ties(&config.wall_ties, dims));
    takeoff.extend(safety_net(&config.safety_net, dims.level_count));
    takeoff.extend(perimeter_sheet(&config.perimeter_sheet, dims.level_count));
    takeoff.extend(gable_sheet(&config.gable_sheet, dims.level_count));
    takeoff.extend(base_hardware(config, dims));
    takeoff
}

/// Sheet panels needed to cover `levels` levels
pub fn sheet_units(levels: u32) -> u32 {
    levels.div_ceil(LEVELS_PER_SHEET)
}

/// One deck per span on every selected level
pub fn decking(config: &Configuration, levels: &LevelSet) -> Takeoff {
    per_span_and_level(config, levels, MaterialKey::Decking)
}

/// One toeboard per span on every selected level
pub fn toeboard(config: &Configuration, levels: &LevelSet) -> Takeoff {
    per_span_and_level(config, levels, MaterialKey::Toeboard)
}

fn per_span_and_level(config: &Configuration, levels: &LevelSet, key: fn(SpanLength) -> MaterialKey) -> Takeoff {
    let mut takeoff = Takeoff::new();
    for length in SpanLength::ALL {
        takeoff.add(key(length), config.span_count(length).saturating_mul(levels.len()));
    }
    takeoff
}

/// Gable ends run the short face once per project, not per level
pub fn gable_handrail(sides: GableSides) -> Takeoff {
    let mut takeoff = Takeoff::new();
    takeoff.add(MaterialKey::GableHandrailSet, sides.count());
    takeoff
}

pub fn stairs(policy: &StairPolicy, levels: &LevelSet) -> Takeoff {
    let mut takeoff = Takeoff::new();
    match policy {
        StairPolicy::None => {}
        StairPolicy::Install { span_count, .. } => {
            takeoff.add(MaterialKey::StairUnit, span_count.saturating_mul(levels.len()));
        }
    }
    takeoff
}

/// Tied levels × ties per level; "all" per level means one tie per span
pub fn wall_ties(policy: &WallTiePolicy, dims: &Dimensions) -> Takeoff {
    let mut takeoff = Takeoff::new();
    match policy {
        WallTiePolicy::None => {}
        WallTiePolicy::Install {
            model,
            levels,
            per_level,
        } => {
            let tied_levels = levels.resolve(dims.level_count);
            // An explicit per-level figure is a tie count, not a span count, so it is not capped
            let ties_per_level = match per_level {
                LevelCountSelector::Count { count } => *count,
                spans => spans.resolve(dims.span_total),
            };
            takeoff.add(MaterialKey::WallTie(*model), tied_levels.saturating_mul(ties_per_level));
        }
    }
    takeoff
}

pub fn safety_net(policy: &SheetPolicy, level_count: u32) -> Takeoff {
    sheeted(policy, level_count, MaterialKey::SafetyNet)
}

pub fn perimeter_sheet(policy: &SheetPolicy, level_count: u32) -> Takeoff {
    sheeted(policy, level_count, MaterialKey::PerimeterSheet)
}

fn sheeted(policy: &SheetPolicy, level_count: u32, key: MaterialKey) -> Takeoff {
    let mut takeoff = Takeoff::new();
    if let SheetPolicy::Install { levels } = policy {
        takeoff.add(key, sheet_units(levels.resolve(level_count)));
    }
    takeoff
}

pub fn gable_sheet(policy: &GableSheetPolicy, level_count: u32) -> Takeoff {
    let mut takeoff = Takeoff::new();
    let units = sheet_units(policy.levels.resolve(level_count));
    takeoff.add(MaterialKey::GableSheet, units.saturating_mul(policy.sides.count()));
    takeoff
}

/// Jack bases, plates and extension pieces; nothing above ground level.
///
/// In custom mode the declared SB20/SB40 counts are used as given. Whether
/// they match the post positions is reported by the validator, not fixed here.
pub fn base_hardware(config: &Configuration, dims: &Dimensions) -> Takeoff {
    let mut takeoff = Takeoff::new();
    if !config.is_ground_level {
        return takeoff;
    }

    let positions = dims.pillar_grid.positions();
    let base = &config.base;
    match base.jack_base {
        JackBaseOption::AllSb20 => takeoff.add(MaterialKey::JackBaseSb20, positions),
        JackBaseOption::AllSb40 => takeoff.add(MaterialKey::JackBaseSb40, positions),
        JackBaseOption::Custom => {
            takeoff.add(MaterialKey::JackBaseSb20, base.sb20_count);
            takeoff.add(MaterialKey::JackBaseSb40, base.sb40_count);
        }
    }
    takeoff.add(MaterialKey::BasePlate, positions);
    takeoff.add(MaterialKey::BaseExtension40, base.extension_40);
    takeoff.add(MaterialKey::BaseExtension80, base.extension_80);
    takeoff
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BaseHardware, FrameWidth, WallTieModel};
    use crate::dimensions::resolve_dimensions;
    use crate::selectors::{LevelSelector, SelectorGraph};

    fn basic() -> Configuration {
        Configuration::default()
            .with_spans(SpanLength::L900, 4)
            .with_frame_columns(FrameWidth::W900, 2)
            .with_levels(3)
    }

    fn run(config: &Configuration) -> Takeoff {
        let dims = resolve_dimensions(config).unwrap();
        let resolved = SelectorGraph::build(config).unwrap().resolve(dims.level_count).unwrap();
        material_takeoff(config, &dims, &resolved)
    }

    #[test]
    fn test_decking_and_toeboard_per_span_and_level() {
        let takeoff = run(&basic());
        assert_eq!(takeoff.quantity(MaterialKey::Decking(SpanLength::L900)), 12);
        assert_eq!(takeoff.quantity(MaterialKey::Toeboard(SpanLength::L900)), 12);
        assert_eq!(takeoff.quantity(MaterialKey::GableHandrailSet), 2);
    }

    #[test]
    fn test_decking_split_by_span_length() {
        let mut config = basic().with_spans(SpanLength::L1800, 2).with_levels(5);
        config.decking = LevelSelector::ExcludeFirst;
        let takeoff = run(&config);
        assert_eq!(takeoff.quantity(MaterialKey::Decking(SpanLength::L900)), 16);
        assert_eq!(takeoff.quantity(MaterialKey::Decking(SpanLength::L1800)), 8);
        assert_eq!(takeoff.quantity(MaterialKey::Toeboard(SpanLength::L1800)), 10);
    }

    #[test]
    fn test_toeboard_same_as_decking() {
        let mut config = basic().with_levels(6);
        config.decking = LevelSelector::ExplicitList {
            levels: "2,4,6".to_string(),
        };
        config.toeboard = LevelSelector::SameAs {
            category: SelectorCategory::Decking,
        };
        let takeoff = run(&config);
        assert_eq!(takeoff.quantity(MaterialKey::Toeboard(SpanLength::L900)), 12);
    }

    #[test]
    fn test_empty_explicit_list_gives_zero_quantity() {
        let mut config = basic();
        config.decking = LevelSelector::ExplicitList {
            levels: "none".to_string(),
        };
        let takeoff = run(&config);
        assert_eq!(takeoff.quantity(MaterialKey::Decking(SpanLength::L900)), 0);
        assert_eq!(takeoff.quantity(MaterialKey::Toeboard(SpanLength::L900)), 12);
    }

    #[test]
    fn test_gable_handrail_ignores_levels() {
        for levels in 1..=8 {
            let mut config = basic().with_levels(levels);
            config.gable_handrail_sides = GableSides::One;
            assert_eq!(run(&config).quantity(MaterialKey::GableHandrailSet), 1);
        }
        let mut config = basic();
        config.gable_handrail_sides = GableSides::None;
        assert_eq!(run(&config).quantity(MaterialKey::GableHandrailSet), 0);
    }

    #[test]
    fn test_stairs() {
        let mut config = basic().with_levels(5);
        assert_eq!(run(&config).quantity(MaterialKey::StairUnit), 0);

        config.stairs = StairPolicy::Install {
            levels: LevelSelector::ExcludeLast,
            span_count: 2,
        };
        assert_eq!(run(&config).quantity(MaterialKey::StairUnit), 8);

        config.stairs = StairPolicy::Install {
            levels: LevelSelector::ExplicitList {
                levels: "1,2".to_string(),
            },
            span_count: 1,
        };
        assert_eq!(run(&config).quantity(MaterialKey::StairUnit), 2);
    }

    #[test]
    fn test_stairs_on_single_level_scaffold() {
        let mut config = basic().with_levels(1);
        config.stairs = StairPolicy::Install {
            levels: LevelSelector::ExcludeLast,
            span_count: 3,
        };
        assert_eq!(run(&config).quantity(MaterialKey::StairUnit), 0);
    }

    #[test]
    fn test_wall_ties_compose_two_selectors() {
        let key = MaterialKey::WallTie(WallTieModel::Kts30);
        let mut config = basic().with_spans(SpanLength::L900, 5).with_levels(5);

        config.wall_ties = WallTiePolicy::Install {
            model: WallTieModel::Kts30,
            levels: LevelCountSelector::All,
            per_level: LevelCountSelector::All,
        };
        assert_eq!(run(&config).quantity(key), 25);

        config.wall_ties = WallTiePolicy::Install {
            model: WallTieModel::Kts30,
            levels: LevelCountSelector::Alternate,
            per_level: LevelCountSelector::Alternate,
        };
        assert_eq!(run(&config).quantity(key), 3 * 3);

        config.wall_ties = WallTiePolicy::Install {
            model: WallTieModel::Kts30,
            levels: LevelCountSelector::Count { count: 2 },
            per_level: LevelCountSelector::Count { count: 20 },
        };
        assert_eq!(run(&config).quantity(key), 40);
    }

    #[test]
    fn test_sheet_rounding() {
        assert_eq!(sheet_units(0), 0);
        assert_eq!(sheet_units(1), 1);
        assert_eq!(sheet_units(3), 1);
        assert_eq!(sheet_units(4), 2);
        assert_eq!(sheet_units(7), 3);
    }

    #[test]
    fn test_sheeted_categories() {
        let mut config = basic().with_levels(7);
        config.perimeter_sheet = SheetPolicy::Install {
            levels: LevelCountSelector::All,
        };
        config.safety_net = SheetPolicy::Install {
            levels: LevelCountSelector::Alternate,
        };
        config.gable_sheet = GableSheetPolicy {
            sides: GableSides::Both,
            levels: LevelCountSelector::Count { count: 5 },
        };
        let takeoff = run(&config);
        assert_eq!(takeoff.quantity(MaterialKey::PerimeterSheet), 3);
        assert_eq!(takeoff.quantity(MaterialKey::SafetyNet), 2);
        assert_eq!(takeoff.quantity(MaterialKey::GableSheet), 4);
    }

    #[test]
    fn test_base_hardware_only_at_ground_level() {
        let mut config = basic();
        config.base.extension_40 = 4;
        let takeoff = run(&config);
        assert_eq!(takeoff.quantity(MaterialKey::JackBaseSb20), 0);
        assert_eq!(takeoff.quantity(MaterialKey::BaseExtension40), 0);

        config.is_ground_level = true;
        let takeoff = run(&config);
        // (4 + 1) span lines × (2 + 1) column lines
        assert_eq!(takeoff.quantity(MaterialKey::JackBaseSb20), 15);
        assert_eq!(takeoff.quantity(MaterialKey::BasePlate), 15);
        assert_eq!(takeoff.quantity(MaterialKey::BaseExtension40), 4);
    }

    #[test]
    fn test_custom_jack_bases_used_verbatim() {
        let mut config = basic();
        config.is_ground_level = true;
        config.base = BaseHardware {
            jack_base: JackBaseOption::Custom,
            sb20_count: 10,
            sb40_count: 2,
            extension_40: 0,
            extension_80: 3,
        };
        let takeoff = run(&config);
        assert_eq!(takeoff.quantity(MaterialKey::JackBaseSb20), 10);
        assert_eq!(takeoff.quantity(MaterialKey::JackBaseSb40), 2);
        assert_eq!(takeoff.quantity(MaterialKey::BasePlate), 15);
        assert_eq!(takeoff.quantity(MaterialKey::BaseExtension80), 3);
    }

    #[test]
    fn test_all_sb40() {
        let mut config = basic();
        config.is_ground_level = true;
        config.base.jack_base = JackBaseOption::AllSb40;
        let takeoff = run(&config);
        assert_eq!(takeoff.quantity(MaterialKey::JackBaseSb20), 0);
        assert_eq!(takeoff.quantity(MaterialKey::JackBaseSb40), 15);
    }
}
