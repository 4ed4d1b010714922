//! End-to-end scenarios spanning catalogue construction, snapshot
//! round-tripping and journey routing, mirroring the worked examples in
//! the design document rather than any single module's unit tests.

use transit_catalogue::catalogue::{Catalogue, RouteKind};
use transit_catalogue::dispatch;
use transit_catalogue::geo::Coordinate;
use transit_catalogue::json::{self, Node};
use transit_catalogue::render;
use transit_catalogue::settings::{RenderSettings, RoutingSettings};
use transit_catalogue::snapshot;
use transit_catalogue::svg::Color;
use transit_catalogue::transit::Router;

fn sample_render_settings() -> RenderSettings {
    RenderSettings {
        width: 200.0,
        height: 200.0,
        padding: 10.0,
        line_width: 14.0,
        stop_radius: 5.0,
        bus_label_font_size: 20,
        bus_label_offset: (7.0, 15.0),
        stop_label_font_size: 18,
        stop_label_offset: (7.0, -3.0),
        underlayer_color: Color::Rgba(255, 255, 255, 0.85),
        underlayer_width: 3.0,
        color_palette: vec![Color::Named("green".to_string()), Color::Rgb(255, 160, 0)],
    }
}

fn sample_routing_settings() -> RoutingSettings {
    RoutingSettings {
        bus_velocity_kmh: 36.0,
        bus_wait_time_minutes: 6.0,
    }
}

/// Builds the catalogue behind the spec's scenarios S1/S2/S4/S5: two
/// termini `A`/`B`, a linear three-stop line `U`-`V`-`W`, and a circular
/// bus `99` looping `A`-`B`-`A`.
fn build_network() -> Catalogue {
    let mut cat = Catalogue::new();
    cat.add_stop("A", Coordinate::new(55.6, 37.6)).unwrap();
    cat.add_stop("B", Coordinate::new(55.6, 37.7)).unwrap();
    cat.add_stop("U", Coordinate::new(0.0, 0.0)).unwrap();
    cat.add_stop("V", Coordinate::new(0.0, 1.0)).unwrap();
    cat.add_stop("W", Coordinate::new(0.0, 2.0)).unwrap();

    cat.set_road_distance("A", "B", 2000).unwrap();
    cat.set_road_distance("U", "V", 1200).unwrap();
    cat.set_road_distance("V", "W", 1800).unwrap();

    cat.add_bus(
        "99",
        &["A".to_string(), "B".to_string(), "A".to_string()],
        RouteKind::Circular,
    )
    .unwrap();
    cat.add_bus(
        "L",
        &["U".to_string(), "V".to_string(), "W".to_string()],
        RouteKind::Linear,
    )
    .unwrap();
    cat
}

#[test]
fn scenario_1_bus_stats_match_worked_example() {
    let cat = build_network();
    let stats = cat.route_stats("99").unwrap();
    assert_eq!(stats.stop_count, 3);
    assert_eq!(stats.unique_stop_count, 2);
    assert_eq!(stats.road_length, 4000.0);
    let d_ab = cat
        .find_stop("A")
        .unwrap()
        .coordinate
        .distance_to(&cat.find_stop("B").unwrap().coordinate);
    assert!((stats.curvature.unwrap() - 4000.0 / (2.0 * d_ab)).abs() < 1e-9);
}

#[test]
fn scenario_4_journey_matches_worked_example() {
    let cat = build_network();
    let settings = sample_routing_settings();
    let router = Router::build(&cat, &settings);
    let journey = router.find_journey(&cat, "U", "W").unwrap();
    assert!((journey.total_time - 11.0).abs() < 1e-9);
    assert_eq!(journey.items.len(), 2);
}

#[test]
fn stop_info_distinguishes_unknown_stop_from_a_quiet_one() {
    let mut cat = Catalogue::new();
    cat.add_stop("Lonely", Coordinate::new(0.0, 0.0)).unwrap();

    assert!(cat.stop_info("Lonely").is_empty());
    assert!(cat.find_stop("Lonely").is_some());
    assert!(cat.find_stop("Nowhere").is_none());
}

#[test]
fn map_renders_layers_in_fixed_order_for_the_full_network() {
    let cat = build_network();
    let svg = render::render(&cat, &sample_render_settings());
    let polyline = svg.find("<polyline").unwrap();
    let circle = svg.find("<circle").unwrap();
    assert!(polyline < circle);
    assert!(svg.starts_with("<?xml"));
}

#[test]
fn build_and_serve_round_trip_preserves_every_query_answer() {
    let cat = build_network();
    let render_settings = sample_render_settings();
    let routing_settings = sample_routing_settings();

    let bytes = snapshot::encode(&cat, &render_settings, &routing_settings).unwrap();
    let (served_cat, served_render, served_routing) = snapshot::decode(&bytes).unwrap();

    assert_eq!(cat.route_stats("99"), served_cat.route_stats("99"));
    assert_eq!(cat.route_stats("L"), served_cat.route_stats("L"));
    assert_eq!(
        render::render(&cat, &render_settings),
        render::render(&served_cat, &served_render)
    );

    let router = Router::build(&cat, &routing_settings);
    let served_router = Router::build(&served_cat, &served_routing);
    let journey = router.find_journey(&cat, "U", "W").unwrap();
    let served_journey = served_router
        .find_journey(&served_cat, "U", "W")
        .unwrap();
    assert_eq!(journey.total_time, served_journey.total_time);
    assert_eq!(journey.items.len(), served_journey.items.len());
}

#[test]
fn bus_with_fewer_than_two_stops_has_no_stats() {
    let mut cat = Catalogue::new();
    cat.add_stop("Solo", Coordinate::new(0.0, 0.0)).unwrap();
    cat.add_bus("1", &["Solo".to_string()], RouteKind::Circular)
        .unwrap();
    assert!(cat.route_stats("1").is_none());
}

#[test]
fn unreachable_stop_pair_has_no_journey() {
    let cat = build_network();
    let router = Router::build(&cat, &sample_routing_settings());
    assert!(router.find_journey(&cat, "A", "U").is_none());
}

/// A `render_settings` document matching `sample_render_settings()`, for
/// tests that drive the dispatch layer through actual JSON text.
const RENDER_SETTINGS_JSON: &str = r#"{
    "width": 200.0, "height": 200.0, "padding": 10.0,
    "line_width": 14.0, "stop_radius": 5.0,
    "bus_label_font_size": 20, "bus_label_offset": [7.0, 15.0],
    "stop_label_font_size": 18, "stop_label_offset": [7.0, -3.0],
    "underlayer_color": [255, 255, 255, 0.85], "underlayer_width": 3.0,
    "color_palette": ["green", [255, 160, 0]]
}"#;

fn base_requests_json() -> String {
    r#"[
        {"type": "Stop", "name": "A", "latitude": 55.6, "longitude": 37.6,
         "road_distances": {"B": 2000}},
        {"type": "Stop", "name": "B", "latitude": 55.6, "longitude": 37.7,
         "road_distances": {}},
        {"type": "Stop", "name": "U", "latitude": 0.0, "longitude": 0.0,
         "road_distances": {"V": 1200}},
        {"type": "Stop", "name": "V", "latitude": 0.0, "longitude": 1.0,
         "road_distances": {"W": 1800}},
        {"type": "Stop", "name": "W", "latitude": 0.0, "longitude": 2.0,
         "road_distances": {}},
        {"type": "Bus", "name": "99", "stops": ["A", "B", "A"], "is_roundtrip": true},
        {"type": "Bus", "name": "L", "stops": ["U", "V", "W"], "is_roundtrip": false}
    ]"#
    .to_string()
}

#[test]
fn dispatch_answers_a_bus_request_with_the_sect_4_8_field_contract() {
    let base_requests = json::parse(&base_requests_json()).unwrap();
    let mut catalogue = Catalogue::new();
    dispatch::populate_catalogue(&mut catalogue, base_requests.as_array().unwrap()).unwrap();

    let render_settings = dispatch::parse_render_settings(&json::parse(RENDER_SETTINGS_JSON).unwrap()).unwrap();
    let router = Router::build(&catalogue, &sample_routing_settings());

    let request = json::parse(r#"{"id": 1, "type": "Bus", "name": "99"}"#).unwrap();
    let response = dispatch::dispatch(&request, &catalogue, &render_settings, &router).unwrap();

    let printed = json::print(&response);
    let parsed_back: Node = json::parse(&printed).unwrap();
    let map = parsed_back.as_map().unwrap();
    assert_eq!(map["request_id"].as_i64().unwrap(), 1);
    assert_eq!(map["stop_count"].as_i64().unwrap(), 3);
    assert_eq!(map["unique_stop_count"].as_i64().unwrap(), 2);
    assert_eq!(map["route_length"].as_f64().unwrap(), 4000.0);
    assert!(map.contains_key("curvature"));
}

#[test]
fn dispatch_answers_a_route_request_with_wait_and_bus_items() {
    let base_requests = json::parse(&base_requests_json()).unwrap();
    let mut catalogue = Catalogue::new();
    dispatch::populate_catalogue(&mut catalogue, base_requests.as_array().unwrap()).unwrap();

    let render_settings = dispatch::parse_render_settings(&json::parse(RENDER_SETTINGS_JSON).unwrap()).unwrap();
    let router = Router::build(&catalogue, &sample_routing_settings());

    let request = json::parse(r#"{"id": 4, "type": "Route", "from": "U", "to": "W"}"#).unwrap();
    let response = dispatch::dispatch(&request, &catalogue, &render_settings, &router).unwrap();

    let printed = json::print(&response);
    let parsed_back = json::parse(&printed).unwrap();
    let map = parsed_back.as_map().unwrap();
    assert_eq!(map["request_id"].as_i64().unwrap(), 4);
    assert!((map["total_time"].as_f64().unwrap() - 11.0).abs() < 1e-9);
    let items = map["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    let wait = items[0].as_map().unwrap();
    assert_eq!(wait["type"].as_str().unwrap(), "Wait");
    assert_eq!(wait["stop_name"].as_str().unwrap(), "U");
    let ride = items[1].as_map().unwrap();
    assert_eq!(ride["type"].as_str().unwrap(), "Bus");
    assert_eq!(ride["bus"].as_str().unwrap(), "L");
    assert_eq!(ride["span_count"].as_i64().unwrap(), 2);
}

#[test]
fn dispatch_answers_a_map_request_with_a_rendered_svg_string() {
    let base_requests = json::parse(&base_requests_json()).unwrap();
    let mut catalogue = Catalogue::new();
    dispatch::populate_catalogue(&mut catalogue, base_requests.as_array().unwrap()).unwrap();

    let render_settings = dispatch::parse_render_settings(&json::parse(RENDER_SETTINGS_JSON).unwrap()).unwrap();
    let router = Router::build(&catalogue, &sample_routing_settings());

    let request = json::parse(r#"{"id": 2, "type": "Map"}"#).unwrap();
    let response = dispatch::dispatch(&request, &catalogue, &render_settings, &router).unwrap();
    let map = response.as_map().unwrap();
    assert_eq!(map["request_id"].as_i64().unwrap(), 2);
    assert!(map["map"].as_str().unwrap().starts_with("<?xml"));
}

#[test]
fn dispatch_reports_not_found_for_an_unknown_stop_through_full_json_text() {
    let catalogue = Catalogue::new();
    let render_settings = dispatch::parse_render_settings(&json::parse(RENDER_SETTINGS_JSON).unwrap()).unwrap();
    let router = Router::build(&catalogue, &sample_routing_settings());

    let request = json::parse(r#"{"id": 9, "type": "Stop", "name": "Nowhere"}"#).unwrap();
    let response = dispatch::dispatch(&request, &catalogue, &render_settings, &router).unwrap();

    let printed = json::print(&response);
    assert!(printed.contains("\"error_message\": \"not found\""));
    assert!(printed.contains("\"request_id\": 9"));
}
