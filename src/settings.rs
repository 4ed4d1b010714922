//! Configuration carried alongside the catalogue: how to draw the map and
//! how to weigh the routing graph. Populated once in build mode, persisted
//! in the snapshot, and read-only thereafter.

use crate::svg::Color;

#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
    pub line_width: f64,
    pub stop_radius: f64,
    pub bus_label_font_size: u32,
    pub bus_label_offset: (f64, f64),
    pub stop_label_font_size: u32,
    pub stop_label_offset: (f64, f64),
    pub underlayer_color: Color,
    pub underlayer_width: f64,
    pub color_palette: Vec<Color>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoutingSettings {
    pub bus_velocity_kmh: f64,
    pub bus_wait_time_minutes: f64,
}

impl RoutingSettings {
    /// Minutes to travel `meters` at this velocity.
    pub fn travel_time_minutes(&self, meters: u32) -> f64 {
        let meters_per_minute = self.bus_velocity_kmh * 1000.0 / 60.0;
        meters as f64 / meters_per_minute
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializationSettings {
    pub file: String,
}
