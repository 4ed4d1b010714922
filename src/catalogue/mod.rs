mod entities;

pub use entities::{Bus, RouteKind, RouteStats, Stop};

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use thiserror::Error;

use crate::geo::Coordinate;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("duplicate name: {0}")]
    DuplicateName(String),
    #[error("unknown stop: {0}")]
    UnknownStop(String),
}

/// An append-only graph of stops, directed road distances, and bus routes.
///
/// Stops and buses are addressed by name (via a lookup table into their
/// owned index) or by the stable index assigned on insertion; nothing here
/// is ever removed or renamed, so other components (the renderer, the
/// router) can freely hold onto those indices/names across the catalogue's
/// lifetime.
#[derive(Debug, Clone, Default)]
pub struct Catalogue {
    stops: Vec<Stop>,
    buses: Vec<Bus>,
    stop_lookup: HashMap<Arc<str>, u32>,
    bus_lookup: HashMap<Arc<str>, u32>,
    /// Directed `(from_idx, to_idx) -> meters`.
    road_distances: HashMap<(u32, u32), u32>,
    /// `stop_idx -> sorted bus names passing through it`.
    stop_to_buses: Vec<BTreeSet<Arc<str>>>,
}

impl Catalogue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_stop(&mut self, name: &str, coordinate: Coordinate) -> Result<u32, Error> {
        if self.stop_lookup.contains_key(name) {
            return Err(Error::DuplicateName(name.to_string()));
        }
        let index = self.stops.len() as u32;
        let name: Arc<str> = Arc::from(name);
        self.stops.push(Stop {
            index,
            name: name.clone(),
            coordinate,
        });
        self.stop_lookup.insert(name, index);
        self.stop_to_buses.push(BTreeSet::new());
        Ok(index)
    }

    pub fn set_road_distance(&mut self, from: &str, to: &str, meters: u32) -> Result<(), Error> {
        let from_idx = self
            .stop_lookup
            .get(from)
            .copied()
            .ok_or_else(|| Error::UnknownStop(from.to_string()))?;
        let to_idx = self
            .stop_lookup
            .get(to)
            .copied()
            .ok_or_else(|| Error::UnknownStop(to.to_string()))?;
        self.road_distances.insert((from_idx, to_idx), meters);
        Ok(())
    }

    pub fn add_bus(
        &mut self,
        name: &str,
        stop_names: &[String],
        kind: RouteKind,
    ) -> Result<u32, Error> {
        if self.bus_lookup.contains_key(name) {
            return Err(Error::DuplicateName(name.to_string()));
        }
        let mut stop_indices = Vec::with_capacity(stop_names.len());
        for stop_name in stop_names {
            let idx = self
                .stop_lookup
                .get(stop_name.as_str())
                .copied()
                .ok_or_else(|| Error::UnknownStop(stop_name.clone()))?;
            stop_indices.push(idx);
        }

        let index = self.buses.len() as u32;
        let name: Arc<str> = Arc::from(name);
        self.buses.push(Bus {
            index,
            name: name.clone(),
            stops: stop_indices.clone(),
            kind,
        });
        self.bus_lookup.insert(name.clone(), index);

        for idx in stop_indices {
            self.stop_to_buses[idx as usize].insert(name.clone());
        }
        Ok(index)
    }

    pub fn find_stop(&self, name: &str) -> Option<&Stop> {
        let idx = self.stop_lookup.get(name)?;
        self.stops.get(*idx as usize)
    }

    pub fn find_bus(&self, name: &str) -> Option<&Bus> {
        let idx = self.bus_lookup.get(name)?;
        self.buses.get(*idx as usize)
    }

    pub fn stop_by_index(&self, index: u32) -> &Stop {
        &self.stops[index as usize]
    }

    /// Sorted set of bus names passing through `name`; empty both when the
    /// stop has no buses and when the stop does not exist. Callers that
    /// need to distinguish "known stop, no buses" from "unknown stop"
    /// should check [`Catalogue::find_stop`] first.
    pub fn stop_info(&self, name: &str) -> BTreeSet<&str> {
        match self.stop_lookup.get(name) {
            Some(idx) => self.stop_to_buses[*idx as usize]
                .iter()
                .map(|s| s.as_ref())
                .collect(),
            None => BTreeSet::new(),
        }
    }

    /// Directed road distance from `a` to `b`, falling back to the reverse
    /// direction if the forward one was never set.
    pub fn road_distance(&self, a: &str, b: &str) -> Option<u32> {
        let a_idx = *self.stop_lookup.get(a)?;
        let b_idx = *self.stop_lookup.get(b)?;
        self.road_distances
            .get(&(a_idx, b_idx))
            .or_else(|| self.road_distances.get(&(b_idx, a_idx)))
            .copied()
    }

    pub(crate) fn road_distance_by_index(&self, a: u32, b: u32) -> Option<u32> {
        self.road_distances
            .get(&(a, b))
            .or_else(|| self.road_distances.get(&(b, a)))
            .copied()
    }

    /// Route statistics computed on demand from the bus's traversal.
    ///
    /// Returns `None` both when the bus is unknown and when it has fewer
    /// than two stops, since curvature (and so the whole statistic set) is
    /// undefined in that case — treated as "not found" per the routing
    /// design notes.
    pub fn route_stats(&self, bus_name: &str) -> Option<RouteStats> {
        let bus = self.find_bus(bus_name)?;
        if bus.stops.len() < 2 {
            return None;
        }
        let traversal = bus.traversal();

        let unique_stop_count = {
            let set: BTreeSet<u32> = bus.stops.iter().copied().collect();
            set.len()
        };

        let mut geographic_length = 0.0;
        let mut road_length = 0.0;
        for pair in traversal.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            let a = &self.stops[from as usize];
            let b = &self.stops[to as usize];
            geographic_length += a.coordinate.distance_to(&b.coordinate);
            road_length += self.road_distance_by_index(from, to).unwrap_or(0) as f64;
        }

        let curvature = if geographic_length > 0.0 {
            Some(road_length / geographic_length)
        } else {
            None
        };

        Some(RouteStats {
            stop_count: traversal.len(),
            unique_stop_count,
            geographic_length,
            road_length,
            curvature,
        })
    }

    /// Stops in insertion order.
    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    /// Buses in insertion order.
    pub fn buses(&self) -> &[Bus] {
        &self.buses
    }

    /// Every directly-set directed road distance, as `(from_idx, to_idx,
    /// meters)` triples. Used by the snapshot codec; does not include
    /// distances only reachable via the reverse-direction fallback.
    pub fn road_distance_triples(&self) -> impl Iterator<Item = (u32, u32, u32)> + '_ {
        self.road_distances
            .iter()
            .map(|(&(from, to), &meters)| (from, to, meters))
    }
}
