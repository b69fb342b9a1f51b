//! # takeoff_core - Scaffold Quantity Takeoff Engine
//!
//! `takeoff_core` turns a scaffold configuration (spans, frame columns,
//! levels and the accessory policies chosen for each category) into an
//! itemized materials list with weights, the scaffold's main dimensions and
//! a truck loading plan. All inputs and outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: `calculate` is a pure function of its configuration
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types, not just strings
//! - **Exact**: Lengths in millimeters and weights in grams, all integer
//!
//! ## Quick Start
//!
//! ```rust
//! use takeoff_core::calculations::calculate;
//! use takeoff_core::config::{Configuration, FrameWidth, SpanLength};
//!
//! let config = Configuration::default()
//!     .with_spans(SpanLength::L1800, 6)
//!     .with_frame_columns(FrameWidth::W900, 1)
//!     .with_levels(4);
//!
//! let result = calculate(&config).unwrap();
//! for item in &result.materials {
//!     println!("{:<24} {:>5}  {}", item.name, item.quantity, item.total_weight);
//! }
//! println!("total {}", result.total_weight);
//! ```
//!
//! ## Modules
//!
//! - [`config`] - Configuration and accessory policies
//! - [`selectors`] - Level selection policies and the same-as graph
//! - [`dimensions`] - Span, column and height totals, pillar grid
//! - [`materials`] - Material keys, items and unit weights
//! - [`calculations`] - Quantity rules, logistics and the pipeline
//! - [`validation`] - Advisory consistency checks
//! - [`project`] - Project container for saved plans
//! - [`units`] - Integer unit wrappers
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod config;
pub mod dimensions;
pub mod errors;
pub mod materials;
pub mod project;
pub mod selectors;
pub mod units;
pub mod validation;

// Re-export commonly used types at crate root for convenience
pub use calculations::{assess, calculate, calculate_with, Assessment, CalculationResult};
pub use config::Configuration;
pub use errors::{CalcError, CalcResult};
pub use project::{Project, ProjectMetadata};
pub use validation::{validate, ValidationResult};
