//! # Logistics Allocator
//!
//! Chooses trucks for the shipped weight.
//!
//! - **Recommended loading**: the fewest vehicles, filling the largest
//!   vehicle first and finishing with the smallest one that takes the rest.
//! - **Split options**: every mix of up to `max_split_vehicles` vehicles that
//!   covers the weight without a redundant vehicle, for sites that restrict
//!   what can drive in. Each option carries its per-vehicle loads.
//!
//! When no mix within the bound covers the weight, the options list is empty
//! and `manual_selection_required` is set. Nothing is ever overloaded.
//!
//! ## Example
//!
//! ```rust
//! use takeoff_core::calculations::logistics::{plan_loading, VehicleCatalogue, VehicleKind};
//! use takeoff_core::units::Grams;
//!
//! let plan = plan_loading(Grams::from_whole_kg(5_000), &VehicleCatalogue::default());
//! assert_eq!(plan.recommended.count(VehicleKind::Flatbed), 1);
//! assert_eq!(plan.recommended.count(VehicleKind::Unic), 1);
//! assert!(!plan.split_options.is_empty());
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::units::Grams;

/// Vehicle types the yard dispatches
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VehicleKind {
    /// Truck with a loader crane
    Unic,
    /// Flatbed truck
    Flatbed,
}

impl VehicleKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            VehicleKind::Unic => "Unic",
            VehicleKind::Flatbed => "Flatbed",
        }
    }
}

/// One vehicle type and its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleProfile {
    pub kind: VehicleKind,
    pub capacity: Grams,
}

/// Vehicles available for allocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleCatalogue {
    pub vehicles: Vec<VehicleProfile>,
    /// Largest fleet considered when enumerating split options
    pub max_split_vehicles: u32,
}

impl Default for VehicleCatalogue {
    fn default() -> Self {
        VehicleCatalogue {
            vehicles: vec![
                VehicleProfile {
                    kind: VehicleKind::Unic,
                    capacity: Grams::from_whole_kg(2_900),
                },
                VehicleProfile {
                    kind: VehicleKind::Flatbed,
                    capacity: Grams::from_whole_kg(4_000),
                },
            ],
            max_split_vehicles: 4,
        }
    }
}

impl VehicleCatalogue {
    /// Profiles, largest capacity first (stable for equal capacities)
    fn by_capacity_desc(&self) -> Vec<VehicleProfile> {
        let mut vehicles = self.vehicles.clone();
        vehicles.sort_by(|a, b| b.capacity.cmp(&a.capacity));
        vehicles
    }

    fn capacity_of(&self, kind: VehicleKind) -> Option<Grams> {
        self.vehicles.iter().find(|v| v.kind == kind).map(|v| v.capacity)
    }
}

/// Vehicle count per kind
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VehicleMix(BTreeMap<VehicleKind, u32>);

impl VehicleMix {
    pub fn count(&self, kind: VehicleKind) -> u32 {
        self.0.get(&kind).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u32 {
        self.0.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    fn add(&mut self, kind: VehicleKind, count: u32) {
        if count > 0 {
            *self.0.entry(kind).or_insert(0) += count;
        }
    }

    /// Combined payload of the mix
    pub fn capacity(&self, catalogue: &VehicleCatalogue) -> Grams {
        self.0
            .iter()
            .map(|(kind, count)| catalogue.capacity_of(*kind).unwrap_or(Grams::ZERO) * u64::from(*count))
            .sum()
    }
}

impl fmt::Display for VehicleMix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(kind, count)| format!("{} ×{}", kind.display_name(), count))
            .collect();
        if parts.is_empty() {
            f.write_str("no vehicles")
        } else {
            f.write_str(&parts.join(" + "))
        }
    }
}

/// What one vehicle carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleLoad {
    pub kind: VehicleKind,
    pub capacity: Grams,
    pub load: Grams,
}

/// One feasible way to split the shipment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitOption {
    pub mix: VehicleMix,
    /// One entry per vehicle, largest first
    pub loads: Vec<VehicleLoad>,
    /// Human-readable label, e.g. "Unic ×1 + Flatbed ×1"
    pub label: String,
}

impl SplitOption {
    pub fn capacity(&self) -> Grams {
        self.loads.iter().map(|l| l.capacity).sum()
    }
}

impl fmt::Display for SplitOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// Result of the logistics step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadingPlan {
    pub total_weight: Grams,
    pub recommended: VehicleMix,
    pub split_options: Vec<SplitOption>,
    /// Weight is non-zero but no mix within the bound covers it
    pub manual_selection_required: bool,
}

impl LoadingPlan {
    /// One-line summary of the recommended loading
    pub fn recommended_summary(&self) -> String {
        format!(
            "Unic {} / Flatbed {}",
            self.recommended.count(VehicleKind::Unic),
            self.recommended.count(VehicleKind::Flatbed)
        )
    }
}

/// Allocate vehicles for `total_weight`
pub fn plan_loading(total_weight: Grams, catalogue: &VehicleCatalogue) -> LoadingPlan {
    let recommended = recommend(total_weight, catalogue);
    let split_options = split_options(total_weight, catalogue);
    let manual_selection_required = total_weight > Grams::ZERO && split_options.is_empty();
    if manual_selection_required {
        log::warn!(
            "{} exceeds every mix of up to {} vehicles, manual selection required",
            total_weight,
            catalogue.max_split_vehicles
        );
    }
    LoadingPlan {
        total_weight,
        recommended,
        split_options,
        manual_selection_required,
    }
}

/// Greedy, largest vehicle first; the last vehicle is the smallest that fits the rest
fn recommend(total_weight: Grams, catalogue: &VehicleCatalogue) -> VehicleMix {
    let mut mix = VehicleMix::default();
    let profiles = catalogue.by_capacity_desc();
    let Some(largest) = profiles.first().copied() else {
        return mix;
    };
    if largest.capacity == Grams::ZERO {
        return mix;
    }

    // Full loads of the largest vehicle while more than one load remains
    let full_loads = total_weight.0.saturating_sub(1) / largest.capacity.0;
    mix.add(largest.kind, u32::try_from(full_loads).unwrap_or(u32::MAX));
    let remaining = total_weight - largest.capacity * full_loads;
    if remaining > Grams::ZERO {
        let last = profiles
            .iter()
            .rev()
            .find(|p| p.capacity >= remaining)
            .copied()
            .unwrap_or(largest);
        mix.add(last.kind, 1);
    }
    mix
}

/// Every minimal covering mix of 1..=max vehicles.
///
/// Sorted by vehicle count, then by how many of the largest vehicle type are
/// used (more first).
fn split_options(total_weight: Grams, catalogue: &VehicleCatalogue) -> Vec<SplitOption> {
    if total_weight == Grams::ZERO {
        return Vec::new();
    }
    let profiles = catalogue.by_capacity_desc();
    if profiles.is_empty() {
        return Vec::new();
    }

    let mut counts = vec![0u32; profiles.len()];
    let mut found: Vec<Vec<u32>> = Vec::new();
    enumerate(&profiles, 0, catalogue.max_split_vehicles, &mut counts, &mut |counts| {
        if is_minimal_cover(counts, &profiles, total_weight) {
            found.push(counts.to_vec());
        }
    });

    found.sort_by(|a, b| {
        let total_a: u32 = a.iter().sum();
        let total_b: u32 = b.iter().sum();
        total_a.cmp(&total_b).then_with(|| b.cmp(a))
    });

    found
        .into_iter()
        .map(|counts| build_option(&counts, &profiles, total_weight))
        .collect()
}

/// Visit every count vector over `profiles` with at most `budget` vehicles
fn enumerate(
    profiles: &[VehicleProfile],
    index: usize,
    budget: u32,
    counts: &mut Vec<u32>,
    visit: &mut dyn FnMut(&[u32]),
) {
    if index == profiles.len() {
        visit(counts);
        return;
    }
    for n in 0..=budget {
        counts[index] = n;
        enumerate(profiles, index + 1, budget - n, counts, visit);
    }
    counts[index] = 0;
}

fn capacity(counts: &[u32], profiles: &[VehicleProfile]) -> Grams {
    counts
        .iter()
        .zip(profiles)
        .map(|(n, p)| p.capacity * u64::from(*n))
        .sum()
}

/// Covers the weight, and dropping any single vehicle would not
fn is_minimal_cover(counts: &[u32], profiles: &[VehicleProfile], total_weight: Grams) -> bool {
    let total = capacity(counts, profiles);
    if counts.iter().all(|n| *n == 0) || total < total_weight {
        return false;
    }
    counts
        .iter()
        .zip(profiles)
        .filter(|(n, _)| **n > 0)
        .all(|(_, p)| total - p.capacity < total_weight)
}

fn build_option(counts: &[u32], profiles: &[VehicleProfile], total_weight: Grams) -> SplitOption {
    let mut mix = VehicleMix::default();
    let mut loads = Vec::new();
    let mut remaining = total_weight;
    for (n, profile) in counts.iter().zip(profiles) {
        mix.add(profile.kind, *n);
        for _ in 0..*n {
            let load = remaining.min(profile.capacity);
            remaining = remaining - load;
            loads.push(VehicleLoad {
                kind: profile.kind,
                capacity: profile.capacity,
                load,
            });
        }
    }
    let label = mix.to_string();
    SplitOption { mix, loads, label }
}
