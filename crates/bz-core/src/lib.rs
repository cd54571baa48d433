//! # bz-core
//!
//! Core types, layer catalog, and error types for Blue Zones.
//!
//! This crate provides the foundational types shared across all Blue Zones crates:
//! - Epoch, geometry-kind, and measure enums
//! - The fixed classification rules (area fraction, point count, buffer distance, CRS)
//! - Attribute values carried through overlays and into output tables
//! - Atomic zones, intersection fragments, and per-zone aggregates
//! - The declarative layer catalog for the past, present, and future epochs
//! - Cross-cutting error types

pub mod attr;
pub mod catalog;
pub mod enums;
pub mod errors;
pub mod fragment;
pub mod rules;
pub mod zone;

pub use attr::{AttrValue, Attributes};
pub use catalog::{AttrFilter, InputRoot, LayerCatalog, LayerSpec, PreprocessSpec};
pub use enums::{Epoch, GeometryKind, MeasureKind};
pub use errors::CoreError;
pub use fragment::{IntersectionFragment, ZoneLayerAggregate};
pub use zone::{AtomicZone, SkipReason, ZoneId, ZoneSet};
