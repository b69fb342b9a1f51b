//! # Materials
//!
//! Every component the takeoff can produce is a [`MaterialKey`]. Keys are a
//! closed enum so a weight table can be total over them, and their `Ord`
//! gives the fixed output order: category first (decking, toeboard, gable
//! handrail, stairs, wall ties, safety net, perimeter sheet, gable sheet,
//! base hardware), then size within the category.
//!
//! ## Example
//!
//! ```rust
//! use takeoff_core::config::SpanLength;
//! use takeoff_core::materials::{MaterialItem, MaterialKey, StandardWeights};
//!
//! let item = MaterialItem::new(MaterialKey::Decking(SpanLength::L1800), 10, &StandardWeights);
//! assert_eq!(item.name, "decking/anti-1800");
//! assert_eq!(item.total_weight, item.unit_weight * 10);
//! ```

pub mod weights;

pub use weights::{aggregate_weights, StandardWeights, UnitWeightTable, WeightedTakeoff};

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::{SpanLength, WallTieModel};
use crate::units::Grams;

/// Accessory category a material belongs to, in output order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MaterialCategory {
    Decking,
    Toeboard,
    GableHandrail,
    Stairs,
    WallTies,
    SafetyNet,
    PerimeterSheet,
    GableSheet,
    BaseHardware,
}

impl MaterialCategory {
    pub fn name(&self) -> &'static str {
        match self {
            MaterialCategory::Decking => "decking",
            MaterialCategory::Toeboard => "toeboard",
            MaterialCategory::GableHandrail => "handrail",
            MaterialCategory::Stairs => "stairs",
            MaterialCategory::WallTies => "wall-tie",
            MaterialCategory::SafetyNet => "net",
            MaterialCategory::PerimeterSheet => "sheet",
            MaterialCategory::GableSheet => "sheet",
            MaterialCategory::BaseHardware => "base",
        }
    }
}

/// One stockable component
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MaterialKey {
    /// Anti-slip steel deck for one span
    Decking(SpanLength),
    Toeboard(SpanLength),
    /// Handrail set closing one gable end
    GableHandrailSet,
    /// Stair unit for one stair bay on one level
    StairUnit,
    WallTie(WallTieModel),
    /// Interlevel safety net panel
    SafetyNet,
    /// Perimeter sheet panel (covers three levels)
    PerimeterSheet,
    /// Gable-end sheet panel (covers three levels)
    GableSheet,
    JackBaseSb20,
    JackBaseSb40,
    /// Sole board under a jack base
    BasePlate,
    /// 40 mm base extension piece
    BaseExtension40,
    /// 80 mm base extension piece
    BaseExtension80,
}

impl MaterialKey {
    pub fn category(&self) -> MaterialCategory {
        match self {
            MaterialKey::Decking(_) => MaterialCategory::Decking,
            MaterialKey::Toeboard(_) => MaterialCategory::Toeboard,
            MaterialKey::GableHandrailSet => MaterialCategory::GableHandrail,
            MaterialKey::StairUnit => MaterialCategory::Stairs,
            MaterialKey::WallTie(_) => MaterialCategory::WallTies,
            MaterialKey::SafetyNet => MaterialCategory::SafetyNet,
            MaterialKey::PerimeterSheet => MaterialCategory::PerimeterSheet,
            MaterialKey::GableSheet => MaterialCategory::GableSheet,
            MaterialKey::JackBaseSb20
            | MaterialKey::JackBaseSb40
            | MaterialKey::BasePlate
            | MaterialKey::BaseExtension40
            | MaterialKey::BaseExtension80 => MaterialCategory::BaseHardware,
        }
    }

    /// Category-qualified identifier, stable across releases
    pub fn name(&self) -> String {
        let item = match self {
            MaterialKey::Decking(length) => format!("anti-{}", length.mm().0),
            MaterialKey::Toeboard(length) => length.mm().0.to_string(),
            MaterialKey::GableHandrailSet => "gable-set".to_string(),
            MaterialKey::StairUnit => "unit".to_string(),
            MaterialKey::WallTie(model) => model.code().to_string(),
            MaterialKey::SafetyNet => "layer".to_string(),
            MaterialKey::PerimeterSheet => "perimeter".to_string(),
            MaterialKey::GableSheet => "gable".to_string(),
            MaterialKey::JackBaseSb20 => "jack-sb20".to_string(),
            MaterialKey::JackBaseSb40 => "jack-sb40".to_string(),
            MaterialKey::BasePlate => "plate".to_string(),
            MaterialKey::BaseExtension40 => "extension-40".to_string(),
            MaterialKey::BaseExtension80 => "extension-80".to_string(),
        };
        format!("{}/{}", self.category().name(), item)
    }
}

impl fmt::Display for MaterialKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// Raw counts per material, before weights are applied.
///
/// Zero quantities are never stored, so a category that is switched off
/// leaves no trace in the output.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Takeoff(BTreeMap<MaterialKey, u32>);

impl Takeoff {
    pub fn new() -> Self {
        Takeoff::default()
    }

    /// Add `quantity` units of `key`, saturating at `u32::MAX`
    pub fn add(&mut self, key: MaterialKey, quantity: u32) {
        if quantity > 0 {
            let entry = self.0.entry(key).or_insert(0);
            *entry = entry.saturating_add(quantity);
        }
    }

    pub fn quantity(&self, key: MaterialKey) -> u32 {
        self.0.get(&key).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries in output order
    pub fn iter(&self) -> impl Iterator<Item = (MaterialKey, u32)> + '_ {
        self.0.iter().map(|(key, quantity)| (*key, *quantity))
    }

    /// Merge another takeoff into this one
    pub fn extend(&mut self, other: Takeoff) {
        for (key, quantity) in other.0 {
            self.add(key, quantity);
        }
    }
}

/// One line of the materials list.
///
/// ## JSON Example
///
/// ```json
/// {
///   "key": { "decking": "900" },
///   "name": "decking/anti-900",
///   "quantity": 12,
///   "unit_weight": 8600,
///   "total_weight": 103200
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialItem {
    pub key: MaterialKey,
    /// Category-qualified identifier (see [`MaterialKey::name`])
    pub name: String,
    pub quantity: u32,
    /// Weight of one unit, grams
    pub unit_weight: Grams,
    /// `quantity × unit_weight`, grams
    pub total_weight: Grams,
}

impl MaterialItem {
    /// Build an item, looking its unit weight up in `weights`
    pub fn new(key: MaterialKey, quantity: u32, weights: &dyn UnitWeightTable) -> Self {
        let unit_weight = weights.unit_weight(key);
        MaterialItem {
            key,
            name: key.name(),
            quantity,
            unit_weight,
            total_weight: unit_weight * u64::from(quantity),
        }
    }

    pub fn category(&self) -> MaterialCategory {
        self.key.category()
    }
}
