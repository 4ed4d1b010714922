//! A minimal SVG document model: a handful of shape variants, a shared
//! stroke/fill attribute block, and a serializer. Rendering is a pattern
//! match over the shape sum type rather than a class hierarchy, per the
//! design note this crate follows for polymorphic SVG objects.

use std::fmt::Write as _;

/// An SVG paint value: the four forms the snapshot codec also needs to be
/// able to round-trip.
#[derive(Debug, Clone, PartialEq)]
pub enum Color {
    None,
    Named(String),
    Rgb(u8, u8, u8),
    Rgba(u8, u8, u8, f64),
}

impl Color {
    fn to_attr(&self) -> String {
        match self {
            Color::None => "none".to_string(),
            Color::Named(name) => name.clone(),
            Color::Rgb(r, g, b) => format!("rgb({r},{g},{b})"),
            Color::Rgba(r, g, b, a) => format!("rgba({r},{g},{b},{a})"),
        }
    }
}

/// Hand-written wire layout for the snapshot codec: a leading tag byte
/// (0=none, 1=named, 2=rgb, 3=rgba) followed by that variant's fields, with
/// no enum-name or field-name framing. Kept alongside `Color` rather than
/// derived, so the 4-variant layout stays exactly as narrow as the
/// snapshot format specifies regardless of how `serde_derive` would encode
/// an enum with a `String` variant.
impl serde::Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeTuple;
        match self {
            Color::None => {
                let mut tup = serializer.serialize_tuple(1)?;
                tup.serialize_element(&0u8)?;
                tup.end()
            }
            Color::Named(name) => {
                let mut tup = serializer.serialize_tuple(2)?;
                tup.serialize_element(&1u8)?;
                tup.serialize_element(name)?;
                tup.end()
            }
            Color::Rgb(r, g, b) => {
                let mut tup = serializer.serialize_tuple(4)?;
                tup.serialize_element(&2u8)?;
                tup.serialize_element(r)?;
                tup.serialize_element(g)?;
                tup.serialize_element(b)?;
                tup.end()
            }
            Color::Rgba(r, g, b, a) => {
                let mut tup = serializer.serialize_tuple(5)?;
                tup.serialize_element(&3u8)?;
                tup.serialize_element(r)?;
                tup.serialize_element(g)?;
                tup.serialize_element(b)?;
                tup.serialize_element(a)?;
                tup.end()
            }
        }
    }
}

impl<'de> serde::Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct ColorVisitor;

        impl<'de> serde::de::Visitor<'de> for ColorVisitor {
            type Value = Color;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a color tag byte followed by that variant's fields")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Color, A::Error>
            where
                A: serde::de::SeqAccess<'de>,
            {
                let tag: u8 = seq
                    .next_element()?
                    .ok_or_else(|| serde::de::Error::invalid_length(0, &self))?;
                match tag {
                    0 => Ok(Color::None),
                    1 => {
                        let name: String = seq
                            .next_element()?
                            .ok_or_else(|| serde::de::Error::invalid_length(1, &self))?;
                        Ok(Color::Named(name))
                    }
                    2 => {
                        let r: u8 = seq
                            .next_element()?
                            .ok_or_else(|| serde::de::Error::invalid_length(1, &self))?;
                        let g: u8 = seq
                            .next_element()?
                            .ok_or_else(|| serde::de::Error::invalid_length(2, &self))?;
                        let b: u8 = seq
                            .next_element()?
                            .ok_or_else(|| serde::de::Error::invalid_length(3, &self))?;
                        Ok(Color::Rgb(r, g, b))
                    }
                    3 => {
                        let r: u8 = seq
                            .next_element()?
                            .ok_or_else(|| serde::de::Error::invalid_length(1, &self))?;
                        let g: u8 = seq
                            .next_element()?
                            .ok_or_else(|| serde::de::Error::invalid_length(2, &self))?;
                        let b: u8 = seq
                            .next_element()?
                            .ok_or_else(|| serde::de::Error::invalid_length(3, &self))?;
                        let a: f64 = seq
                            .next_element()?
                            .ok_or_else(|| serde::de::Error::invalid_length(4, &self))?;
                        Ok(Color::Rgba(r, g, b, a))
                    }
                    other => Err(serde::de::Error::custom(format!(
                        "unknown color tag {other}"
                    ))),
                }
            }
        }

        deserializer.deserialize_tuple(5, ColorVisitor)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineCap {
    Round,
}

impl LineCap {
    fn to_attr(self) -> &'static str {
        match self {
            LineCap::Round => "round",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineJoin {
    Round,
}

impl LineJoin {
    fn to_attr(self) -> &'static str {
        match self {
            LineJoin::Round => "round",
        }
    }
}

/// Stroke/fill attributes shared by every shape variant.
#[derive(Debug, Clone, PartialEq)]
pub struct Paint {
    pub fill: Color,
    pub stroke: Color,
    pub stroke_width: f64,
    pub stroke_linecap: Option<LineCap>,
    pub stroke_linejoin: Option<LineJoin>,
}

impl Default for Paint {
    fn default() -> Self {
        Self {
            fill: Color::None,
            stroke: Color::None,
            stroke_width: 0.0,
            stroke_linecap: None,
            stroke_linejoin: None,
        }
    }
}

impl Paint {
    fn write_attrs(&self, out: &mut String) {
        let _ = write!(out, r#" fill="{}""#, self.fill.to_attr());
        let _ = write!(out, r#" stroke="{}""#, self.stroke.to_attr());
        let _ = write!(out, r#" stroke-width="{}""#, self.stroke_width);
        if let Some(cap) = self.stroke_linecap {
            let _ = write!(out, r#" stroke-linecap="{}""#, cap.to_attr());
        }
        if let Some(join) = self.stroke_linejoin {
            let _ = write!(out, r#" stroke-linejoin="{}""#, join.to_attr());
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    pub center: (f64, f64),
    pub radius: f64,
    pub paint: Paint,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    pub points: Vec<(f64, f64)>,
    pub paint: Paint,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub position: (f64, f64),
    pub offset: (f64, f64),
    pub font_size: u32,
    pub font_family: String,
    pub font_weight: Option<String>,
    pub content: String,
    pub paint: Paint,
}

/// A shape in the document: `Circle | Polyline | Text`, per the design note
/// preferring a sum type to a class hierarchy for SVG objects.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Circle(Circle),
    Polyline(Polyline),
    Text(Text),
}

impl Shape {
    fn write(&self, out: &mut String) {
        match self {
            Shape::Circle(c) => {
                let _ = write!(
                    out,
                    r#"<circle cx="{}" cy="{}" r="{}""#,
                    c.center.0, c.center.1, c.radius
                );
                c.paint.write_attrs(out);
                out.push_str("/>");
            }
            Shape::Polyline(p) => {
                out.push_str("<polyline points=\"");
                for (i, (x, y)) in p.points.iter().enumerate() {
                    if i > 0 {
                        out.push(' ');
                    }
                    let _ = write!(out, "{x},{y}");
                }
                out.push('"');
                p.paint.write_attrs(out);
                out.push_str("/>");
            }
            Shape::Text(t) => {
                let _ = write!(
                    out,
                    r#"<text x="{}" y="{}" dx="{}" dy="{}" font-size="{}" font-family="{}""#,
                    t.position.0,
                    t.position.1,
                    t.offset.0,
                    t.offset.1,
                    t.font_size,
                    escape_attr(&t.font_family),
                );
                if let Some(weight) = &t.font_weight {
                    let _ = write!(out, r#" font-weight="{}""#, escape_attr(weight));
                }
                t.paint.write_attrs(out);
                out.push('>');
                out.push_str(&escape_text(&t.content));
                out.push_str("</text>");
            }
        }
    }
}

fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;").replace('"', "&quot;")
}

fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// A sequence of shapes in emission order; rendering never reorders them,
/// so callers control z-order simply by the order they push shapes in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    shapes: Vec<Shape>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(r#"<?xml version="1.0" encoding="UTF-8" ?>"#);
        out.push('\n');
        out.push_str(r#"<svg xmlns="http://www.w3.org/2000/svg" version="1.1">"#);
        for shape in &self.shapes {
            shape.write(&mut out);
        }
        out.push_str("</svg>");
        out
    }
}
