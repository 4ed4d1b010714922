//! Builds the time-expanded routing graph from a sealed catalogue and
//! answers shortest-journey queries over it. Each stop contributes a
//! *waiting* vertex and a *boarded* vertex; boarding edges cost the wait
//! time, travel edges cost accumulated ride time along a single route.

use std::collections::HashSet;
use std::sync::Arc;

use crate::catalogue::Catalogue;
use crate::graph::Graph;
use crate::settings::RoutingSettings;

#[derive(Debug, Clone, PartialEq)]
pub enum JourneyItem {
    Wait { stop: Arc<str>, time: f64 },
    Ride { bus: Arc<str>, time: f64, span: u32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Journey {
    pub total_time: f64,
    pub items: Vec<JourneyItem>,
}

#[derive(Debug, Clone)]
enum EdgeLabel {
    Boarding { stop: Arc<str> },
    Travel { bus: Arc<str>, span: u32 },
}

/// The sealed time-expanded graph plus enough bookkeeping to translate
/// stop names to vertex ids. Built once per serve phase and never mutated
/// afterward.
pub struct Router {
    graph: Graph<f64, EdgeLabel>,
}

impl Router {
    pub fn build(catalogue: &Catalogue, settings: &RoutingSettings) -> Self {
        let vertex_count = catalogue.stops().len() * 2;
        let mut graph = Graph::new(vertex_count);
        let mut boarding_added: HashSet<u32> = HashSet::new();

        for bus in catalogue.buses() {
            if bus.stops.is_empty() {
                continue;
            }
            match bus.kind {
                crate::catalogue::RouteKind::Circular => {
                    add_pass(&mut graph, catalogue, settings, &mut boarding_added, &bus.stops, &bus.name);
                }
                crate::catalogue::RouteKind::Linear => {
                    add_pass(&mut graph, catalogue, settings, &mut boarding_added, &bus.stops, &bus.name);
                    let reversed: Vec<u32> = bus.stops.iter().rev().copied().collect();
                    add_pass(&mut graph, catalogue, settings, &mut boarding_added, &reversed, &bus.name);
                }
            }
        }

        Self { graph }
    }

    /// Shortest-time journey from `from` to `to`, or `None` if either stop
    /// is unknown or no journey connects them.
    pub fn find_journey(&self, catalogue: &Catalogue, from: &str, to: &str) -> Option<Journey> {
        let from_stop = catalogue.find_stop(from)?;
        let to_stop = catalogue.find_stop(to)?;
        let source = waiting_vertex(from_stop.index);
        let target = waiting_vertex(to_stop.index);

        let edge_ids = self.graph.shortest_path(source, target)?;
        let mut items = Vec::with_capacity(edge_ids.len());
        let mut total_time = 0.0;
        for edge_id in edge_ids {
            let edge = self.graph.edge(edge_id);
            total_time += edge.weight;
            let item = match &edge.label {
                EdgeLabel::Boarding { stop } => JourneyItem::Wait {
                    stop: stop.clone(),
                    time: edge.weight,
                },
                EdgeLabel::Travel { bus, span } => JourneyItem::Ride {
                    bus: bus.clone(),
                    time: edge.weight,
                    span: *span,
                },
            };
            items.push(item);
        }

        Some(Journey { total_time, items })
    }
}

fn waiting_vertex(stop_index: u32) -> u32 {
    2 * stop_index
}

fn boarded_vertex(stop_index: u32) -> u32 {
    2 * stop_index + 1
}

/// Adds boarding and travel edges for a single directional walk of `stops`
/// (already expanded for whichever direction is being processed).
fn add_pass(
    graph: &mut Graph<f64, EdgeLabel>,
    catalogue: &Catalogue,
    settings: &RoutingSettings,
    boarding_added: &mut HashSet<u32>,
    stops: &[u32],
    bus_name: &Arc<str>,
) {
    for (i, &stop_i) in stops.iter().enumerate() {
        if boarding_added.insert(stop_i) {
            graph.add_edge(
                waiting_vertex(stop_i),
                boarded_vertex(stop_i),
                settings.bus_wait_time_minutes,
                EdgeLabel::Boarding {
                    stop: catalogue.stop_by_index(stop_i).name.clone(),
                },
            );
        }

        let mut accumulated = 0.0;
        for (offset, pair) in stops[i..].windows(2).enumerate() {
            let (from, to) = (pair[0], pair[1]);
            let meters = catalogue.road_distance_by_index(from, to).unwrap_or(0);
            accumulated += settings.travel_time_minutes(meters);
            let span = (offset + 1) as u32;
            graph.add_edge(
                boarded_vertex(stop_i),
                waiting_vertex(to),
                accumulated,
                EdgeLabel::Travel {
                    bus: bus_name.clone(),
                    span,
                },
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::RouteKind;
    use crate::geo::Coordinate;

    fn scenario_4_catalogue() -> Catalogue {
        let mut cat = Catalogue::new();
        cat.add_stop("U", Coordinate::new(0.0, 0.0)).unwrap();
        cat.add_stop("V", Coordinate::new(0.0, 1.0)).unwrap();
        cat.add_stop("W", Coordinate::new(0.0, 2.0)).unwrap();
        cat.set_road_distance("U", "V", 1200).unwrap();
        cat.set_road_distance("V", "W", 1800).unwrap();
        cat.add_bus(
            "L",
            &["U".to_string(), "V".to_string(), "W".to_string()],
            RouteKind::Linear,
        )
        .unwrap();
        cat
    }

    #[test]
    fn scenario_4_journey_matches_expected_items() {
        let cat = scenario_4_catalogue();
        let settings = RoutingSettings {
            bus_velocity_kmh: 36.0,
            bus_wait_time_minutes: 6.0,
        };
        let router = Router::build(&cat, &settings);
        let journey = router.find_journey(&cat, "U", "W").unwrap();

        assert!((journey.total_time - 11.0).abs() < 1e-9);
        assert_eq!(journey.items.len(), 2);
        match &journey.items[0] {
            JourneyItem::Wait { stop, time } => {
                assert_eq!(stop.as_ref(), "U");
                assert!((*time - 6.0).abs() < 1e-9);
            }
            other => panic!("expected Wait, got {other:?}"),
        }
        match &journey.items[1] {
            JourneyItem::Ride { bus, time, span } => {
                assert_eq!(bus.as_ref(), "L");
                assert_eq!(*span, 2);
                assert!((*time - 5.0).abs() < 1e-9);
            }
            other => panic!("expected Ride, got {other:?}"),
        }
    }

    #[test]
    fn unknown_endpoint_yields_no_journey() {
        let cat = scenario_4_catalogue();
        let settings = RoutingSettings {
            bus_velocity_kmh: 36.0,
            bus_wait_time_minutes: 6.0,
        };
        let router = Router::build(&cat, &settings);
        assert!(router.find_journey(&cat, "U", "nowhere").is_none());
    }

    #[test]
    fn journey_never_has_adjacent_waits_or_adjacent_rides() {
        let cat = scenario_4_catalogue();
        let settings = RoutingSettings {
            bus_velocity_kmh: 36.0,
            bus_wait_time_minutes: 6.0,
        };
        let router = Router::build(&cat, &settings);
        let journey = router.find_journey(&cat, "U", "W").unwrap();
        for pair in journey.items.windows(2) {
            let same_kind = matches!(
                (&pair[0], &pair[1]),
                (JourneyItem::Wait { .. }, JourneyItem::Wait { .. })
                    | (JourneyItem::Ride { .. }, JourneyItem::Ride { .. })
            );
            assert!(!same_kind);
        }
    }
}
