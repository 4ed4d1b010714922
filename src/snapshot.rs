//! Binary encoding of a sealed catalogue plus its render and routing
//! settings (§4.6). Stop and bus identity across the build/serve process
//! boundary is positional: a stop's index in the encoded `stops` vector is
//! exactly the index the rebuilt catalogue assigns it, since both sides
//! add stops (then buses) in the same order.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalogue::{self, Catalogue, RouteKind};
use crate::geo::Coordinate;
use crate::settings::{RenderSettings, RoutingSettings};
use crate::svg::Color;

#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to encode snapshot: {0}")]
    Encode(#[source] bincode::Error),
    #[error("failed to decode snapshot: {0}")]
    Decode(#[source] bincode::Error),
    #[error("snapshot references unknown stop index {0}")]
    DanglingStopIndex(u32),
    #[error(transparent)]
    Catalogue(#[from] catalogue::Error),
}

#[derive(Debug, Serialize, Deserialize)]
struct StopRecord {
    name: String,
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Serialize, Deserialize)]
struct RoadDistanceRecord {
    from: u32,
    to: u32,
    meters: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct BusRecord {
    name: String,
    kind: RouteKind,
    stops: Vec<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RenderSettingsRecord {
    width: f64,
    height: f64,
    padding: f64,
    line_width: f64,
    stop_radius: f64,
    bus_label_font_size: u32,
    bus_label_offset: (f64, f64),
    stop_label_font_size: u32,
    stop_label_offset: (f64, f64),
    underlayer_color: Color,
    underlayer_width: f64,
    color_palette: Vec<Color>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RoutingSettingsRecord {
    bus_velocity_kmh: f64,
    bus_wait_time_minutes: f64,
}

#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    stops: Vec<StopRecord>,
    road_distances: Vec<RoadDistanceRecord>,
    buses: Vec<BusRecord>,
    render_settings: RenderSettingsRecord,
    routing_settings: RoutingSettingsRecord,
}

/// Serializes `catalogue` and its settings to the binary snapshot format.
pub fn encode(
    catalogue: &Catalogue,
    render_settings: &RenderSettings,
    routing_settings: &RoutingSettings,
) -> Result<Vec<u8>, Error> {
    let stops = catalogue
        .stops()
        .iter()
        .map(|s| StopRecord {
            name: s.name.to_string(),
            latitude: s.coordinate.latitude,
            longitude: s.coordinate.longitude,
        })
        .collect();

    let road_distances = catalogue
        .road_distance_triples()
        .map(|(from, to, meters)| RoadDistanceRecord { from, to, meters })
        .collect();

    let buses = catalogue
        .buses()
        .iter()
        .map(|b| BusRecord {
            name: b.name.to_string(),
            kind: b.kind,
            stops: b.stops.clone(),
        })
        .collect();

    let snapshot = Snapshot {
        stops,
        road_distances,
        buses,
        render_settings: RenderSettingsRecord {
            width: render_settings.width,
            height: render_settings.height,
            padding: render_settings.padding,
            line_width: render_settings.line_width,
            stop_radius: render_settings.stop_radius,
            bus_label_font_size: render_settings.bus_label_font_size,
            bus_label_offset: render_settings.bus_label_offset,
            stop_label_font_size: render_settings.stop_label_font_size,
            stop_label_offset: render_settings.stop_label_offset,
            underlayer_color: render_settings.underlayer_color.clone(),
            underlayer_width: render_settings.underlayer_width,
            color_palette: render_settings.color_palette.clone(),
        },
        routing_settings: RoutingSettingsRecord {
            bus_velocity_kmh: routing_settings.bus_velocity_kmh,
            bus_wait_time_minutes: routing_settings.bus_wait_time_minutes,
        },
    };

    bincode::serialize(&snapshot).map_err(Error::Encode)
}

/// Deserializes a snapshot, rebuilding the catalogue by replaying stops,
/// road distances and buses in their persisted order so positional
/// identity matches the process that built the snapshot.
pub fn decode(bytes: &[u8]) -> Result<(Catalogue, RenderSettings, RoutingSettings), Error> {
    let snapshot: Snapshot = bincode::deserialize(bytes).map_err(Error::Decode)?;

    let mut catalogue = Catalogue::new();
    for stop in &snapshot.stops {
        catalogue.add_stop(&stop.name, Coordinate::new(stop.latitude, stop.longitude))?;
    }

    let names: Vec<&str> = snapshot.stops.iter().map(|s| s.name.as_str()).collect();
    for distance in &snapshot.road_distances {
        let from = *names
            .get(distance.from as usize)
            .ok_or(Error::DanglingStopIndex(distance.from))?;
        let to = *names
            .get(distance.to as usize)
            .ok_or(Error::DanglingStopIndex(distance.to))?;
        catalogue.set_road_distance(from, to, distance.meters)?;
    }

    for bus in &snapshot.buses {
        let mut stop_names = Vec::with_capacity(bus.stops.len());
        for &idx in &bus.stops {
            let name = *names
                .get(idx as usize)
                .ok_or(Error::DanglingStopIndex(idx))?;
            stop_names.push(name.to_string());
        }
        catalogue.add_bus(&bus.name, &stop_names, bus.kind)?;
    }

    let render_settings = RenderSettings {
        width: snapshot.render_settings.width,
        height: snapshot.render_settings.height,
        padding: snapshot.render_settings.padding,
        line_width: snapshot.render_settings.line_width,
        stop_radius: snapshot.render_settings.stop_radius,
        bus_label_font_size: snapshot.render_settings.bus_label_font_size,
        bus_label_offset: snapshot.render_settings.bus_label_offset,
        stop_label_font_size: snapshot.render_settings.stop_label_font_size,
        stop_label_offset: snapshot.render_settings.stop_label_offset,
        underlayer_color: snapshot.render_settings.underlayer_color,
        underlayer_width: snapshot.render_settings.underlayer_width,
        color_palette: snapshot.render_settings.color_palette,
    };

    let routing_settings = RoutingSettings {
        bus_velocity_kmh: snapshot.routing_settings.bus_velocity_kmh,
        bus_wait_time_minutes: snapshot.routing_settings.bus_wait_time_minutes,
    };

    Ok((catalogue, render_settings, routing_settings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::RouteKind;

    fn sample_settings() -> (RenderSettings, RoutingSettings) {
        (
            RenderSettings {
                width: 600.0,
                height: 400.0,
                padding: 50.0,
                line_width: 14.0,
                stop_radius: 5.0,
                bus_label_font_size: 20,
                bus_label_offset: (7.0, 15.0),
                stop_label_font_size: 18,
                stop_label_offset: (7.0, -3.0),
                underlayer_color: Color::Rgba(255, 255, 255, 0.85),
                underlayer_width: 3.0,
                color_palette: vec![
                    Color::Named("green".to_string()),
                    Color::Rgb(255, 160, 0),
                    Color::Rgba(0, 0, 0, 0.5),
                ],
            },
            RoutingSettings {
                bus_velocity_kmh: 40.0,
                bus_wait_time_minutes: 5.0,
            },
        )
    }

    #[test]
    fn round_trips_scenario_6_catalogue() {
        let mut catalogue = Catalogue::new();
        catalogue
            .add_stop("A", Coordinate::new(55.6, 37.6))
            .unwrap();
        catalogue
            .add_stop("B", Coordinate::new(55.6, 37.7))
            .unwrap();
        catalogue
            .add_stop("C", Coordinate::new(55.7, 37.65))
            .unwrap();
        catalogue.set_road_distance("A", "B", 2000).unwrap();
        catalogue.set_road_distance("B", "C", 1500).unwrap();
        catalogue
            .add_bus(
                "99",
                &["A".to_string(), "B".to_string(), "A".to_string()],
                RouteKind::Circular,
            )
            .unwrap();
        catalogue
            .add_bus(
                "7",
                &["A".to_string(), "B".to_string(), "C".to_string()],
                RouteKind::Linear,
            )
            .unwrap();

        let (render_settings, routing_settings) = sample_settings();
        let bytes = encode(&catalogue, &render_settings, &routing_settings).unwrap();
        let (decoded, decoded_render, decoded_routing) = decode(&bytes).unwrap();

        assert_eq!(decoded.stops().len(), 3);
        assert_eq!(decoded.buses().len(), 2);
        for (original, restored) in catalogue.stops().iter().zip(decoded.stops()) {
            assert_eq!(original.name, restored.name);
            assert_eq!(original.coordinate, restored.coordinate);
        }
        for (original, restored) in catalogue.buses().iter().zip(decoded.buses()) {
            assert_eq!(original.name, restored.name);
            assert_eq!(original.kind, restored.kind);
            assert_eq!(original.stops, restored.stops);
        }
        assert_eq!(decoded.road_distance("A", "B"), Some(2000));
        assert_eq!(decoded.road_distance("B", "C"), Some(1500));
        assert_eq!(
            decoded.stop_info("B").into_iter().collect::<Vec<_>>(),
            vec!["7", "99"]
        );
        assert_eq!(decoded_render, render_settings);
        assert_eq!(decoded_routing, routing_settings);
    }

    #[test]
    fn preserves_empty_catalogue() {
        let catalogue = Catalogue::new();
        let (render_settings, routing_settings) = sample_settings();
        let bytes = encode(&catalogue, &render_settings, &routing_settings).unwrap();
        let (decoded, _, _) = decode(&bytes).unwrap();
        assert!(decoded.stops().is_empty());
        assert!(decoded.buses().is_empty());
    }
}
