//! The request/response bridge between the structured-value tree (C3) and
//! the catalogue/renderer/router (C4/C6/C8): populating a catalogue from a
//! `base_requests` document, parsing render/routing/serialization
//! settings, and answering one `stat_requests` entry at a time (§4.8).
//! Kept in the library (rather than `main.rs`) so the request/response
//! field contract can be exercised directly from tests, not just through
//! the library calls it wraps.

use thiserror::Error;
use tracing::debug;

use crate::catalogue::{self, Catalogue, RouteKind};
use crate::geo::Coordinate;
use crate::json::{ArrayBuilder, MapBuilder, Node, NodeError};
use crate::render;
use crate::settings::{RenderSettings, RoutingSettings, SerializationSettings};
use crate::svg::Color;
use crate::transit::{JourneyItem, Router};

#[derive(Error, Debug)]
pub enum Error {
    #[error("malformed input: {0}")]
    Node(#[from] NodeError),
    #[error("catalogue build failed: {0}")]
    Catalogue(#[from] catalogue::Error),
    #[error("malformed input: {0}")]
    Invalid(String),
}

/// Populates `catalogue` from the `base_requests` array in three passes so
/// that stops, road distances, and bus routes can appear in any order in
/// the source document: stops must exist before distances or buses that
/// reference them can be recorded.
pub fn populate_catalogue(catalogue: &mut Catalogue, base_requests: &[Node]) -> Result<(), Error> {
    for request in base_requests {
        if request.get("type")?.as_str()? == "Stop" {
            let name = request.get("name")?.as_str()?;
            let latitude = request.get("latitude")?.as_f64()?;
            let longitude = request.get("longitude")?.as_f64()?;
            catalogue.add_stop(name, Coordinate::new(latitude, longitude))?;
        }
    }

    for request in base_requests {
        if request.get("type")?.as_str()? == "Stop" {
            let name = request.get("name")?.as_str()?;
            if let Some(distances) = request.get_opt("road_distances")? {
                for (to, meters) in distances.as_map()? {
                    catalogue.set_road_distance(name, to, meters.as_i64()? as u32)?;
                }
            }
        }
    }

    for request in base_requests {
        if request.get("type")?.as_str()? == "Bus" {
            let name = request.get("name")?.as_str()?;
            let stops: Vec<String> = request
                .get("stops")?
                .as_array()?
                .iter()
                .map(|n| n.as_str().map(str::to_string))
                .collect::<Result<_, _>>()?;
            let kind = if request.get("is_roundtrip")?.as_bool()? {
                RouteKind::Circular
            } else {
                RouteKind::Linear
            };
            catalogue.add_bus(name, &stops, kind)?;
        }
    }

    Ok(())
}

pub fn parse_color(node: &Node) -> Result<Color, Error> {
    if let Ok(name) = node.as_str() {
        return Ok(Color::Named(name.to_string()));
    }
    let components = node
        .as_array()
        .map_err(|_| Error::Invalid("color must be a string or an array".to_string()))?;
    match components {
        [r, g, b] => Ok(Color::Rgb(
            r.as_i64().map_err(|_| Error::Invalid("rgb component must be an integer".into()))? as u8,
            g.as_i64().map_err(|_| Error::Invalid("rgb component must be an integer".into()))? as u8,
            b.as_i64().map_err(|_| Error::Invalid("rgb component must be an integer".into()))? as u8,
        )),
        [r, g, b, a] => Ok(Color::Rgba(
            r.as_i64().map_err(|_| Error::Invalid("rgba component must be an integer".into()))? as u8,
            g.as_i64().map_err(|_| Error::Invalid("rgba component must be an integer".into()))? as u8,
            b.as_i64().map_err(|_| Error::Invalid("rgba component must be an integer".into()))? as u8,
            a.as_f64().map_err(|_| Error::Invalid("rgba alpha must be a number".into()))?,
        )),
        other => Err(Error::Invalid(format!(
            "color array must have 3 or 4 elements, got {}",
            other.len()
        ))),
    }
}

fn parse_offset(node: &Node) -> Result<(f64, f64), Error> {
    let pair = node.as_array()?;
    let dx = pair
        .first()
        .ok_or_else(|| Error::Invalid("offset must have 2 elements".into()))?
        .as_f64()?;
    let dy = pair
        .get(1)
        .ok_or_else(|| Error::Invalid("offset must have 2 elements".into()))?
        .as_f64()?;
    Ok((dx, dy))
}

pub fn parse_render_settings(node: &Node) -> Result<RenderSettings, Error> {
    Ok(RenderSettings {
        width: node.get("width")?.as_f64()?,
        height: node.get("height")?.as_f64()?,
        padding: node.get("padding")?.as_f64()?,
        line_width: node.get("line_width")?.as_f64()?,
        stop_radius: node.get("stop_radius")?.as_f64()?,
        bus_label_font_size: node.get("bus_label_font_size")?.as_i64()? as u32,
        bus_label_offset: parse_offset(node.get("bus_label_offset")?)?,
        stop_label_font_size: node.get("stop_label_font_size")?.as_i64()? as u32,
        stop_label_offset: parse_offset(node.get("stop_label_offset")?)?,
        underlayer_color: parse_color(node.get("underlayer_color")?)?,
        underlayer_width: node.get("underlayer_width")?.as_f64()?,
        color_palette: node
            .get("color_palette")?
            .as_array()?
            .iter()
            .map(parse_color)
            .collect::<Result<Vec<_>, _>>()?,
    })
}

pub fn parse_routing_settings(node: &Node) -> Result<RoutingSettings, Error> {
    Ok(RoutingSettings {
        bus_velocity_kmh: node.get("bus_velocity")?.as_f64()?,
        bus_wait_time_minutes: node.get("bus_wait_time")?.as_f64()?,
    })
}

pub fn parse_serialization_settings(node: &Node) -> Result<SerializationSettings, Error> {
    Ok(SerializationSettings {
        file: node.get("file")?.as_str()?.to_string(),
    })
}

/// Answers one `stat_requests` entry, dispatching on its `type` (§4.8) and
/// echoing its `id` as `request_id` in the returned map.
pub fn dispatch(
    request: &Node,
    catalogue: &Catalogue,
    render_settings: &RenderSettings,
    router: &Router,
) -> Result<Node, Error> {
    let id = request.get("id")?.as_i64()?;
    let kind = request.get("type")?.as_str()?;

    let body = match kind {
        "Stop" => dispatch_stop(request, catalogue)?,
        "Bus" => dispatch_bus(request, catalogue)?,
        "Map" => MapBuilder::new()
            .set("map", render::render(catalogue, render_settings))
            .build(),
        "Route" => dispatch_route(request, catalogue, router)?,
        other => {
            return Err(Error::Invalid(format!("unknown request type {other:?}")));
        }
    };

    let mut fields = body.as_map()?.clone();
    fields.insert("request_id".to_string(), Node::Int(id));
    Ok(Node::Map(fields))
}

/// Builds the `error_message = "not found"` response item and logs it at
/// `debug` level: a per-query miss is an expected, well-formed outcome,
/// not a defect, so it never aborts the run.
fn not_found(kind: &str, name: &str) -> Node {
    debug!(kind, name, "query not found");
    MapBuilder::new().set("error_message", "not found").build()
}

fn dispatch_stop(request: &Node, catalogue: &Catalogue) -> Result<Node, Error> {
    let name = request.get("name")?.as_str()?;
    if catalogue.find_stop(name).is_none() {
        return Ok(not_found("Stop", name));
    }
    let buses: Vec<Node> = catalogue
        .stop_info(name)
        .into_iter()
        .map(Node::from)
        .collect();
    Ok(MapBuilder::new().set("buses", buses).build())
}

fn dispatch_bus(request: &Node, catalogue: &Catalogue) -> Result<Node, Error> {
    let name = request.get("name")?.as_str()?;
    match catalogue.route_stats(name) {
        Some(stats) => Ok(MapBuilder::new()
            .set("stop_count", stats.stop_count as i64)
            .set("unique_stop_count", stats.unique_stop_count as i64)
            .set("route_length", stats.road_length)
            .set("curvature", stats.curvature.unwrap_or(0.0))
            .build()),
        None => Ok(not_found("Bus", name)),
    }
}

fn dispatch_route(request: &Node, catalogue: &Catalogue, router: &Router) -> Result<Node, Error> {
    let from = request.get("from")?.as_str()?;
    let to = request.get("to")?.as_str()?;
    match router.find_journey(catalogue, from, to) {
        Some(journey) => {
            let items = journey
                .items
                .into_iter()
                .map(|item| match item {
                    JourneyItem::Wait { stop, time } => MapBuilder::new()
                        .set("type", "Wait")
                        .set("stop_name", stop.to_string())
                        .set("time", time)
                        .build(),
                    JourneyItem::Ride { bus, time, span } => MapBuilder::new()
                        .set("type", "Bus")
                        .set("bus", bus.to_string())
                        .set("time", time)
                        .set("span_count", span as i64)
                        .build(),
                })
                .fold(ArrayBuilder::new(), |builder, item| builder.push(item))
                .build();
            Ok(MapBuilder::new()
                .set("total_time", journey.total_time)
                .set("items", items)
                .build())
        }
        None => Ok(not_found("Route", &format!("{from}->{to}"))),
    }
}
