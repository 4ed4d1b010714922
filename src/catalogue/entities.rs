use std::sync::Arc;

use crate::geo::Coordinate;

/// A unique, never-renamed point in the network. Identity is by `name`;
/// other components reference stops by name or by their stable index into
/// [`crate::catalogue::Catalogue::stops`], never by address, so the
/// catalogue's backing storage is free to grow without invalidating
/// anything held elsewhere.
#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    pub index: u32,
    pub name: Arc<str>,
    pub coordinate: Coordinate,
}

/// How a bus traverses its listed stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum RouteKind {
    /// Traversed once, in listed order; the first and last entry are
    /// typically the same terminus.
    Circular,
    /// Traversed from first to last stop, then back.
    Linear,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bus {
    pub index: u32,
    pub name: Arc<str>,
    /// Indices into the catalogue's stop list, in listed order.
    pub stops: Vec<u32>,
    pub kind: RouteKind,
}

impl Bus {
    /// The full traversal this bus makes: the listed order for a circular
    /// bus, listed-then-reversed (minus the repeated terminus) for a
    /// linear one.
    pub fn traversal(&self) -> Vec<u32> {
        match self.kind {
            RouteKind::Circular => self.stops.clone(),
            RouteKind::Linear => {
                let mut full = self.stops.clone();
                full.extend(self.stops.iter().rev().skip(1));
                full
            }
        }
    }
}

/// Derived per-route statistics (§3 of the spec). `curvature` is `None`
/// when the geometric length is zero (degenerate/too-short routes).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteStats {
    pub stop_count: usize,
    pub unique_stop_count: usize,
    pub geographic_length: f64,
    pub road_length: f64,
    pub curvature: Option<f64>,
}
