//! Unit weights and the weight aggregator.
//!
//! The engine never reads a global table: callers pass a [`UnitWeightTable`],
//! normally [`StandardWeights`]. Tests substitute their own fixtures.
//!
//! Catalogue figures are in kilograms with up to one decimal; they are held
//! as grams so every product and sum is exact.

use serde::{Deserialize, Serialize};

use super::{MaterialItem, MaterialKey, Takeoff};
use crate::config::{SpanLength, WallTieModel};
use crate::units::Grams;

/// Weight of one unit of each material. Must be total over [`MaterialKey`].
pub trait UnitWeightTable {
    fn unit_weight(&self, key: MaterialKey) -> Grams;
}

impl<F> UnitWeightTable for F
where
    F: Fn(MaterialKey) -> Grams,
{
    fn unit_weight(&self, key: MaterialKey) -> Grams {
        self(key)
    }
}

/// Manufacturer catalogue weights
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardWeights;

impl UnitWeightTable for StandardWeights {
    fn unit_weight(&self, key: MaterialKey) -> Grams {
        Grams(match key {
            MaterialKey::Decking(length) => match length {
                SpanLength::L600 => 6_200,
                SpanLength::L900 => 8_600,
                SpanLength::L1200 => 11_000,
                SpanLength::L1500 => 13_400,
                SpanLength::L1800 => 15_800,
            },
            MaterialKey::Toeboard(length) => match length {
                SpanLength::L600 => 2_200,
                SpanLength::L900 => 3_100,
                SpanLength::L1200 => 4_000,
                SpanLength::L1500 => 4_900,
                SpanLength::L1800 => 5_800,
            },
            MaterialKey::GableHandrailSet => 12_000,
            MaterialKey::StairUnit => 26_500,
            MaterialKey::WallTie(model) => match model {
                WallTieModel::Kts16 => 1_900,
                WallTieModel::Kts20 => 2_100,
                WallTieModel::Kts30 => 2_400,
                WallTieModel::Kts45 => 2_900,
                WallTieModel::Kts60 => 3_500,
                WallTieModel::Kts80 => 4_200,
                WallTieModel::Kts100 => 4_800,
            },
            MaterialKey::SafetyNet => 6_500,
            MaterialKey::PerimeterSheet => 7_800,
            MaterialKey::GableSheet => 7_800,
            MaterialKey::JackBaseSb20 => 2_900,
            MaterialKey::JackBaseSb40 => 3_900,
            MaterialKey::BasePlate => 4_000,
            MaterialKey::BaseExtension40 => 1_100,
            MaterialKey::BaseExtension80 => 1_900,
        })
    }
}

/// Itemized materials list and its total weight
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightedTakeoff {
    pub materials: Vec<MaterialItem>,
    pub total_weight: Grams,
}

/// Apply unit weights to a raw takeoff.
///
/// Items keep the takeoff's order. The total is the sum of the item totals,
/// so the two always agree exactly.
pub fn aggregate_weights(takeoff: &Takeoff, weights: &dyn UnitWeightTable) -> WeightedTakeoff {
    let materials: Vec<MaterialItem> = takeoff
        .iter()
        .map(|(key, quantity)| MaterialItem::new(key, quantity, weights))
        .collect();
    let total_weight = materials.iter().map(|item| item.total_weight).sum();
    WeightedTakeoff {
        materials,
        total_weight,
    }
}
