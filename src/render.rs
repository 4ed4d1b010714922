//! Composes an SVG map from a sealed catalogue and its render settings.
//! Layer order and within-layer sort order are fixed and are the
//! renderer's entire observable contract (§4.3 of the design).

use std::collections::BTreeSet;

use crate::catalogue::{Catalogue, RouteKind};
use crate::projector::Projector;
use crate::settings::RenderSettings;
use crate::svg::{Circle, Color, Document, LineCap, LineJoin, Paint, Polyline, Shape, Text};

/// Renders the full map for `catalogue` under `settings`.
pub fn render(catalogue: &Catalogue, settings: &RenderSettings) -> String {
    let buses = non_empty_buses_by_name(catalogue);

    let traversals: Vec<Vec<u32>> = buses.iter().map(|b| b.traversal()).collect();
    let all_coords: Vec<_> = traversals
        .iter()
        .flatten()
        .map(|&idx| catalogue.stop_by_index(idx).coordinate)
        .collect();
    let projector = Projector::new(&all_coords, settings.width, settings.height, settings.padding);

    let mut document = Document::new();

    // Layer 1: route polylines.
    for (bus, traversal) in buses.iter().zip(&traversals) {
        let color = bus_color(settings, bus_color_index(&buses, bus.index));
        let points = traversal
            .iter()
            .map(|&idx| projector.project(&catalogue.stop_by_index(idx).coordinate))
            .collect();
        document.push(Shape::Polyline(Polyline {
            points,
            paint: Paint {
                fill: Color::None,
                stroke: color,
                stroke_width: settings.line_width,
                stroke_linecap: Some(LineCap::Round),
                stroke_linejoin: Some(LineJoin::Round),
            },
        }));
    }

    // Layer 2: bus labels, at the first stop and (for linear buses whose
    // first differs from its last) also at the last stop. A circular
    // bus is labelled once even if its listed stops don't close the loop:
    // §4.3 step 4 restricts the second anchor to linear buses only.
    for bus in &buses {
        let color = bus_color(settings, bus_color_index(&buses, bus.index));
        let first = bus.stops[0];
        let last = *bus.stops.last().unwrap();
        let mut anchors = vec![first];
        if bus.kind == RouteKind::Linear && first != last {
            anchors.push(last);
        }
        for stop_idx in anchors {
            let position = projector.project(&catalogue.stop_by_index(stop_idx).coordinate);
            push_label_pair(
                &mut document,
                position,
                settings.bus_label_offset,
                settings.bus_label_font_size,
                Some("bold".to_string()),
                bus.name.to_string(),
                settings.underlayer_color.clone(),
                settings.underlayer_width,
                color,
            );
        }
    }

    // Layer 3 & 4: stop circles and labels, for every stop referenced by
    // at least one non-empty bus, in ascending name order.
    let referenced_stops = referenced_stop_indices(catalogue, &buses);
    for &idx in &referenced_stops {
        let stop = catalogue.stop_by_index(idx);
        let position = projector.project(&stop.coordinate);
        document.push(Shape::Circle(Circle {
            center: position,
            radius: settings.stop_radius,
            paint: Paint {
                fill: Color::Named("white".to_string()),
                ..Default::default()
            },
        }));
    }
    for &idx in &referenced_stops {
        let stop = catalogue.stop_by_index(idx);
        let position = projector.project(&stop.coordinate);
        push_label_pair(
            &mut document,
            position,
            settings.stop_label_offset,
            settings.stop_label_font_size,
            None,
            stop.name.to_string(),
            settings.underlayer_color.clone(),
            settings.underlayer_width,
            Color::Named("black".to_string()),
        );
    }

    document.render()
}

fn non_empty_buses_by_name<'a>(catalogue: &'a Catalogue) -> Vec<&'a crate::catalogue::Bus> {
    let mut buses: Vec<_> = catalogue.buses().iter().filter(|b| !b.stops.is_empty()).collect();
    buses.sort_by(|a, b| a.name.cmp(&b.name));
    buses
}

/// Position of `bus_index` within the name-sorted, non-empty bus list,
/// which is what the palette cycles over.
fn bus_color_index(sorted_buses: &[&crate::catalogue::Bus], bus_index: u32) -> usize {
    sorted_buses
        .iter()
        .position(|b| b.index == bus_index)
        .expect("bus_index must belong to sorted_buses")
}

fn bus_color(settings: &RenderSettings, position: usize) -> Color {
    if settings.color_palette.is_empty() {
        return Color::None;
    }
    settings.color_palette[position % settings.color_palette.len()].clone()
}

fn referenced_stop_indices(catalogue: &Catalogue, buses: &[&crate::catalogue::Bus]) -> Vec<u32> {
    let mut set = BTreeSet::new();
    for bus in buses {
        for &idx in &bus.stops {
            set.insert(idx);
        }
    }
    let mut indices: Vec<u32> = set.into_iter().collect();
    indices.sort_by(|&a, &b| {
        catalogue
            .stop_by_index(a)
            .name
            .cmp(&catalogue.stop_by_index(b).name)
    });
    indices
}

#[allow(clippy::too_many_arguments)]
fn push_label_pair(
    document: &mut Document,
    position: (f64, f64),
    offset: (f64, f64),
    font_size: u32,
    font_weight: Option<String>,
    content: String,
    underlayer_color: Color,
    underlayer_width: f64,
    label_color: Color,
) {
    document.push(Shape::Text(Text {
        position,
        offset,
        font_size,
        font_family: "Verdana".to_string(),
        font_weight: font_weight.clone(),
        content: content.clone(),
        paint: Paint {
            fill: underlayer_color.clone(),
            stroke: underlayer_color,
            stroke_width: underlayer_width,
            stroke_linecap: Some(LineCap::Round),
            stroke_linejoin: Some(LineJoin::Round),
        },
    }));
    document.push(Shape::Text(Text {
        position,
        offset,
        font_size,
        font_family: "Verdana".to_string(),
        font_weight,
        content,
        paint: Paint {
            fill: label_color,
            ..Default::default()
        },
    }));
}
