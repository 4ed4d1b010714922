//! Core query-serving brain for an offline public-transport catalogue:
//! stop/bus bookkeeping, route statistics, a time-expanded Dijkstra
//! router, an SVG map renderer and the binary snapshot that lets a build
//! process and a serve process share one sealed catalogue.
//!
//! The two CLI entry points (`make_base`, `process_requests`) live in
//! `main.rs` and are thin consumers of this library.

pub mod catalogue;
pub mod dispatch;
pub mod geo;
pub mod graph;
pub mod json;
pub mod projector;
pub mod render;
pub mod settings;
pub mod snapshot;
pub mod svg;
pub mod transit;
