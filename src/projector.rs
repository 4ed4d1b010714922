//! Maps geographic coordinates onto a fixed-size canvas with uniform zoom
//! and symmetric padding. Built once from the full set of coordinates the
//! map will ever need to draw; the mapping is then purely a cheap affine
//! transform per point.

use crate::geo::Coordinate;

const ZOOM_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projector {
    lon_min: f64,
    lat_max: f64,
    zoom: f64,
    padding: f64,
}

impl Projector {
    /// Builds a projector from every coordinate the map will draw plus the
    /// target canvas dimensions. Empty input yields an all-zero projector;
    /// a single point yields zoom `0`, so every point maps to
    /// `(padding, padding)`.
    pub fn new<'a>(
        coordinates: impl IntoIterator<Item = &'a Coordinate>,
        width: f64,
        height: f64,
        padding: f64,
    ) -> Self {
        let mut lon_min = f64::INFINITY;
        let mut lon_max = f64::NEG_INFINITY;
        let mut lat_min = f64::INFINITY;
        let mut lat_max = f64::NEG_INFINITY;
        let mut any = false;

        for c in coordinates {
            any = true;
            lon_min = lon_min.min(c.longitude);
            lon_max = lon_max.max(c.longitude);
            lat_min = lat_min.min(c.latitude);
            lat_max = lat_max.max(c.latitude);
        }

        if !any {
            return Self {
                lon_min: 0.0,
                lat_max: 0.0,
                zoom: 0.0,
                padding,
            };
        }

        let zx = if (lon_max - lon_min).abs() > ZOOM_EPSILON {
            Some((width - 2.0 * padding) / (lon_max - lon_min))
        } else {
            None
        };
        let zy = if (lat_max - lat_min).abs() > ZOOM_EPSILON {
            Some((height - 2.0 * padding) / (lat_max - lat_min))
        } else {
            None
        };

        let zoom = match (zx, zy) {
            (Some(zx), Some(zy)) => zx.min(zy),
            (Some(zx), None) => zx,
            (None, Some(zy)) => zy,
            (None, None) => 0.0,
        };

        Self {
            lon_min,
            lat_max,
            zoom,
            padding,
        }
    }

    /// Projects a coordinate to canvas `(x, y)`. `y` is inverted so that
    /// north (greater latitude) renders closer to the top of the canvas.
    pub fn project(&self, coordinate: &Coordinate) -> (f64, f64) {
        let x = (coordinate.longitude - self.lon_min) * self.zoom + self.padding;
        let y = (self.lat_max - coordinate.latitude) * self.zoom + self.padding;
        (x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_all_zero() {
        let p = Projector::new(std::iter::empty(), 200.0, 200.0, 10.0);
        assert_eq!(p.project(&Coordinate::new(0.0, 0.0)), (10.0, 10.0));
    }

    #[test]
    fn single_point_maps_to_padding() {
        let coords = [Coordinate::new(10.0, 20.0)];
        let p = Projector::new(&coords, 200.0, 200.0, 10.0);
        assert_eq!(p.project(&coords[0]), (10.0, 10.0));
    }

    #[test]
    fn scenario_5_two_point_projection() {
        let a = Coordinate::new(55.6, 37.6);
        let b = Coordinate::new(55.7, 37.7);
        let coords = [a, b];
        let p = Projector::new(&coords, 200.0, 200.0, 10.0);
        let (ax, ay) = p.project(&a);
        let (bx, by) = p.project(&b);
        assert!((ax - 10.0).abs() < 1e-9);
        assert!((ay - 190.0).abs() < 1e-9);
        assert!((bx - 190.0).abs() < 1e-9);
        assert!((by - 10.0).abs() < 1e-9);
    }

    #[test]
    fn lat_max_lon_min_maps_to_padding_corner() {
        let coords = [Coordinate::new(10.0, -5.0), Coordinate::new(-10.0, 5.0)];
        let p = Projector::new(&coords, 300.0, 300.0, 15.0);
        let (x, y) = p.project(&Coordinate::new(10.0, -5.0));
        assert!((x - 15.0).abs() < 1e-9);
        assert!((y - 15.0).abs() < 1e-9);
    }
}
