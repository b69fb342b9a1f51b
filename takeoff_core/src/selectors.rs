//! # Level Selectors
//!
//! Turns a level policy ("all levels", "all but the bottom", "1,3,5", "same
//! as decking") into a concrete, sorted set of 1-based level indices.
//!
//! Categories that carry a [`LevelSelector`] form a small graph through
//! `same-as` references. [`SelectorGraph::build`] orders that graph once per
//! calculation and rejects cycles before anything is resolved.
//!
//! Count-only policies (wall ties, nets, sheets) use [`LevelCountSelector`],
//! which yields a number of levels rather than a set.
//!
//! ## Example
//!
//! ```rust
//! use takeoff_core::selectors::{parse_level_list, LevelSelector, ResolvedLevels, resolve};
//!
//! let levels = parse_level_list("1,1,3,99", 5);
//! assert_eq!(levels.as_slice(), &[1, 3]);
//!
//! let all = resolve(&LevelSelector::All, 4, &ResolvedLevels::default()).unwrap();
//! assert_eq!(all.as_slice(), &[1, 2, 3, 4]);
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::Configuration;
use crate::errors::{CalcError, CalcResult};

/// Categories whose levels are chosen with a [`LevelSelector`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectorCategory {
    /// Anti-slip decking
    Decking,
    Toeboard,
    Stairs,
}

impl SelectorCategory {
    pub const ALL: [SelectorCategory; 3] = [
        SelectorCategory::Decking,
        SelectorCategory::Toeboard,
        SelectorCategory::Stairs,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SelectorCategory::Decking => "decking",
            SelectorCategory::Toeboard => "toeboard",
            SelectorCategory::Stairs => "stairs",
        }
    }
}

impl fmt::Display for SelectorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Policy choosing a set of levels.
///
/// ## JSON Example
///
/// ```json
/// { "policy": "explicit-list", "levels": "1,3,5" }
/// { "policy": "same-as", "category": "decking" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "kebab-case")]
pub enum LevelSelector {
    /// Every level
    #[default]
    All,
    /// Every level except the bottom one
    ExcludeFirst,
    /// Every level except the top one
    ExcludeLast,
    /// Levels 1, 3, 5, ...
    Alternate,
    /// Comma-separated level numbers, as typed by the user
    ExplicitList { levels: String },
    /// Whatever another category resolves to
    SameAs { category: SelectorCategory },
}

impl LevelSelector {
    /// Policy tag as it appears in JSON
    pub fn tag(&self) -> String {
        match self {
            LevelSelector::All => "all".to_string(),
            LevelSelector::ExcludeFirst => "exclude-first".to_string(),
            LevelSelector::ExcludeLast => "exclude-last".to_string(),
            LevelSelector::Alternate => "alternate".to_string(),
            LevelSelector::ExplicitList { .. } => "explicit-list".to_string(),
            LevelSelector::SameAs { category } => format!("same-as:{}", category),
        }
    }

    fn reference(&self) -> Option<SelectorCategory> {
        match self {
            LevelSelector::SameAs { category } => Some(*category),
            _ => None,
        }
    }
}

/// Sorted, duplicate-free set of 1-based level indices
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelSet(Vec<u32>);

impl LevelSet {
    /// Levels `1..=level_count`
    pub fn all(level_count: u32) -> Self {
        LevelSet((1..=level_count).collect())
    }

    /// Build from arbitrary indices, keeping only those in `1..=level_count`
    pub fn from_indices(indices: impl IntoIterator<Item = u32>, level_count: u32) -> Self {
        let mut levels: Vec<u32> = indices
            .into_iter()
            .filter(|level| (1..=level_count).contains(level))
            .collect();
        levels.sort_unstable();
        levels.dedup();
        LevelSet(levels)
    }

    pub fn len(&self) -> u32 {
        self.0.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }
}

/// Parse free-form level text such as `"1, 3,5"`.
///
/// Non-numeric tokens, duplicates and levels outside `1..=level_count` are
/// dropped. Text with nothing usable yields an empty set.
pub fn parse_level_list(text: &str, level_count: u32) -> LevelSet {
    let indices = text
        .split([',', '、', '，'])
        .filter_map(|token| token.trim().parse::<u32>().ok());
    LevelSet::from_indices(indices, level_count)
}

/// Level sets already resolved in this calculation, keyed by category
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResolvedLevels(BTreeMap<SelectorCategory, LevelSet>);

impl ResolvedLevels {
    pub fn get(&self, category: SelectorCategory) -> Option<&LevelSet> {
        self.0.get(&category)
    }

    /// Resolved set for a category, empty when the category is not in use
    pub fn levels(&self, category: SelectorCategory) -> LevelSet {
        self.0.get(&category).cloned().unwrap_or_default()
    }

    fn insert(&mut self, category: SelectorCategory, levels: LevelSet) {
        self.0.insert(category, levels);
    }
}

/// Resolve one selector. `same-as` reads from `resolved`, so the referenced
/// category must have been resolved first.
pub fn resolve(selector: &LevelSelector, level_count: u32, resolved: &ResolvedLevels) -> CalcResult<LevelSet> {
    let levels = match selector {
        LevelSelector::All => LevelSet::all(level_count),
        LevelSelector::ExcludeFirst => LevelSet::from_indices(2..=level_count, level_count),
        LevelSelector::ExcludeLast => LevelSet::from_indices(1..level_count, level_count),
        LevelSelector::Alternate => LevelSet::from_indices((1..=level_count).step_by(2), level_count),
        LevelSelector::ExplicitList { levels } => parse_level_list(levels, level_count),
        LevelSelector::SameAs { category } => resolved.get(*category).cloned().ok_or_else(|| CalcError::Internal {
            message: format!("'{}' referenced before it was resolved", category),
        })?,
    };
    Ok(levels)
}

/// The same-as reference graph of one configuration, in dependency order
#[derive(Debug, Clone)]
pub struct SelectorGraph {
    order: Vec<(SelectorCategory, LevelSelector)>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

impl SelectorGraph {
    /// Collect the categories in use and order them so every `same-as`
    /// target comes before the category referring to it.
    ///
    /// Fails with `CyclicSelector` on a reference cycle (including a
    /// category referring to itself) and with `UnknownPolicy` when the target
    /// category has no selector in this configuration.
    pub fn build(config: &Configuration) -> CalcResult<Self> {
        let selectors: BTreeMap<SelectorCategory, LevelSelector> = SelectorCategory::ALL
            .iter()
            .filter_map(|category| config.level_selector(*category).map(|s| (*category, s.clone())))
            .collect();

        let mut marks: BTreeMap<SelectorCategory, Mark> = BTreeMap::new();
        let mut order = Vec::with_capacity(selectors.len());
        for category in selectors.keys() {
            let mut path = Vec::new();
            visit(*category, &selectors, &mut marks, &mut path, &mut order)?;
        }

        Ok(SelectorGraph { order })
    }

    /// Categories in resolution order
    pub fn order(&self) -> impl Iterator<Item = SelectorCategory> + '_ {
        self.order.iter().map(|(category, _)| *category)
    }

    /// Resolve every category in dependency order
    pub fn resolve(&self, level_count: u32) -> CalcResult<ResolvedLevels> {
        let mut resolved = ResolvedLevels::default();
        for (category, selector) in &self.order {
            let levels = resolve(selector, level_count, &resolved)?;
            log::debug!("{} levels: {:?}", category, levels.as_slice());
            resolved.insert(*category, levels);
        }
        Ok(resolved)
    }
}

fn visit(
    category: SelectorCategory,
    selectors: &BTreeMap<SelectorCategory, LevelSelector>,
    marks: &mut BTreeMap<SelectorCategory, Mark>,
    path: &mut Vec<SelectorCategory>,
    order: &mut Vec<(SelectorCategory, LevelSelector)>,
) -> CalcResult<()> {
    match marks.get(&category) {
        Some(Mark::Done) => return Ok(()),
        Some(Mark::Visiting) => {
            let start = path.iter().position(|c| *c == category).unwrap_or(0);
            let chain: Vec<&str> = path[start..]
                .iter()
                .chain(std::iter::once(&category))
                .map(|c| c.name())
                .collect();
            return Err(CalcError::cyclic_selector(chain.join(" -> ")));
        }
        None => {}
    }

    let selector = selectors.get(&category).ok_or_else(|| {
        let referrer = path.last().map(|c| c.name()).unwrap_or("configuration");
        CalcError::unknown_policy(referrer, format!("same-as:{}", category))
    })?;

    marks.insert(category, Mark::Visiting);
    path.push(category);
    if let Some(target) = selector.reference() {
        visit(target, selectors, marks, path, order)?;
    }
    path.pop();
    marks.insert(category, Mark::Done);
    order.push((category, selector.clone()));
    Ok(())
}

/// Policy choosing how many levels (or spans) a count-based category covers.
///
/// ## JSON Example
///
/// ```json
/// { "policy": "count", "count": 3 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "kebab-case")]
pub enum LevelCountSelector {
    /// The full count
    #[default]
    All,
    /// Every other one, rounded up
    Alternate,
    /// A fixed number, capped at the full count
    Count { count: u32 },
}

impl LevelCountSelector {
    /// Resolve against the full count available
    pub fn resolve(&self, full: u32) -> u32 {
        match self {
            LevelCountSelector::All => full,
            LevelCountSelector::Alternate => full.div_ceil(2),
            LevelCountSelector::Count { count } => (*count).min(full),
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            LevelCountSelector::All => "all",
            LevelCountSelector::Alternate => "alternate",
            LevelCountSelector::Count { .. } => "count",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StairPolicy;

    fn empty() -> ResolvedLevels {
        ResolvedLevels::default()
    }

    #[test]
    fn test_all_is_full_range() {
        for n in 1..=12 {
            let levels = resolve(&LevelSelector::All, n, &empty()).unwrap();
            assert_eq!(levels.as_slice(), (1..=n).collect::<Vec<_>>().as_slice());
        }
    }

    #[test]
    fn test_exclude_first_and_last() {
        let first = resolve(&LevelSelector::ExcludeFirst, 4, &empty()).unwrap();
        assert_eq!(first.as_slice(), &[2, 3, 4]);
        let last = resolve(&LevelSelector::ExcludeLast, 4, &empty()).unwrap();
        assert_eq!(last.as_slice(), &[1, 2, 3]);
    }

    #[test]
    fn test_exclude_on_single_level_is_empty() {
        assert!(resolve(&LevelSelector::ExcludeFirst, 1, &empty()).unwrap().is_empty());
        assert!(resolve(&LevelSelector::ExcludeLast, 1, &empty()).unwrap().is_empty());
    }

    #[test]
    fn test_alternate_takes_odd_levels() {
        let levels = resolve(&LevelSelector::Alternate, 6, &empty()).unwrap();
        assert_eq!(levels.as_slice(), &[1, 3, 5]);
        let levels = resolve(&LevelSelector::Alternate, 7, &empty()).unwrap();
        assert_eq!(levels.as_slice(), &[1, 3, 5, 7]);
    }

    #[test]
    fn test_explicit_list_cleanup() {
        let selector = LevelSelector::ExplicitList {
            levels: "1,1,3,99".to_string(),
        };
        let levels = resolve(&selector, 5, &empty()).unwrap();
        assert_eq!(levels.as_slice(), &[1, 3]);
    }

    #[test]
    fn test_explicit_list_sorts_and_skips_junk() {
        let levels = parse_level_list(" 5, x, 2 ,0, -1, 3.5, 4", 5);
        assert_eq!(levels.as_slice(), &[2, 4, 5]);
        let levels = parse_level_list("2、1，3", 5);
        assert_eq!(levels.as_slice(), &[1, 2, 3]);
    }

    #[test]
    fn test_malformed_explicit_list_is_empty_not_error() {
        let selector = LevelSelector::ExplicitList {
            levels: "top, middle".to_string(),
        };
        let levels = resolve(&selector, 5, &empty()).unwrap();
        assert!(levels.is_empty());
        assert!(parse_level_list("", 5).is_empty());
    }

    #[test]
    fn test_same_as_follows_target() {
        let mut config = Configuration::default().with_levels(5);
        config.decking = LevelSelector::ExcludeFirst;
        config.toeboard = LevelSelector::SameAs {
            category: SelectorCategory::Decking,
        };
        let graph = SelectorGraph::build(&config).unwrap();
        let order: Vec<_> = graph.order().collect();
        let deck_pos = order.iter().position(|c| *c == SelectorCategory::Decking).unwrap();
        let toe_pos = order.iter().position(|c| *c == SelectorCategory::Toeboard).unwrap();
        assert!(deck_pos < toe_pos);

        let resolved = graph.resolve(5).unwrap();
        assert_eq!(resolved.levels(SelectorCategory::Toeboard).as_slice(), &[2, 3, 4, 5]);
    }

    #[test]
    fn test_cycle_rejected() {
        let mut config = Configuration::default().with_levels(3);
        config.decking = LevelSelector::SameAs {
            category: SelectorCategory::Toeboard,
        };
        config.toeboard = LevelSelector::SameAs {
            category: SelectorCategory::Decking,
        };
        let err = SelectorGraph::build(&config).unwrap_err();
        assert_eq!(err, CalcError::cyclic_selector("decking -> toeboard -> decking"));
    }

    #[test]
    fn test_self_reference_rejected() {
        let mut config = Configuration::default();
        config.toeboard = LevelSelector::SameAs {
            category: SelectorCategory::Toeboard,
        };
        let err = SelectorGraph::build(&config).unwrap_err();
        assert_eq!(err.error_code(), "CYCLIC_SELECTOR");
    }

    #[test]
    fn test_reference_to_unused_category() {
        let mut config = Configuration::default();
        config.stairs = StairPolicy::None;
        config.toeboard = LevelSelector::SameAs {
            category: SelectorCategory::Stairs,
        };
        let err = SelectorGraph::build(&config).unwrap_err();
        assert_eq!(err, CalcError::unknown_policy("toeboard", "same-as:stairs"));
    }

    #[test]
    fn test_count_selector() {
        assert_eq!(LevelCountSelector::All.resolve(7), 7);
        assert_eq!(LevelCountSelector::Alternate.resolve(7), 4);
        assert_eq!(LevelCountSelector::Alternate.resolve(6), 3);
        assert_eq!(LevelCountSelector::Count { count: 3 }.resolve(7), 3);
        assert_eq!(LevelCountSelector::Count { count: 30 }.resolve(7), 7);
    }

    #[test]
    fn test_selector_json() {
        let selector: LevelSelector =
            serde_json::from_str(r#"{ "policy": "same-as", "category": "decking" }"#).unwrap();
        assert_eq!(selector.tag(), "same-as:decking");
        let json = serde_json::to_string(&LevelSelector::ExcludeFirst).unwrap();
        assert_eq!(json, r#"{"policy":"exclude-first"}"#);
    }
}
