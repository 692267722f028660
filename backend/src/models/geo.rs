use serde::{Deserialize, Serialize};

/// A validated latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Coordinate-wise arithmetic mean. `None` for an empty input.
    pub fn centroid<'a, I>(points: I) -> Option<GeoPoint>
    where
        I: IntoIterator<Item = &'a GeoPoint>,
    {
        let mut lat_sum = 0.0;
        let mut lon_sum = 0.0;
        let mut count = 0usize;
        for point in points {
            lat_sum += point.lat;
            lon_sum += point.lon;
            count += 1;
        }
        if count == 0 {
            return None;
        }
        Some(GeoPoint::new(lat_sum / count as f64, lon_sum / count as f64))
    }
}

/// Inclusive latitude/longitude window for the metro region.
///
/// Points outside the window are rejected at ingestion, which also catches the
/// `0,0` sentinel some upstream rows carry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundingBox {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl BoundingBox {
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.lat_min && lat <= self.lat_max && lon >= self.lon_min && lon <= self.lon_max
    }

    /// A box is usable when both ranges are finite and non-empty.
    pub fn is_valid(&self) -> bool {
        [self.lat_min, self.lat_max, self.lon_min, self.lon_max]
            .iter()
            .all(|v| v.is_finite())
            && self.lat_min <= self.lat_max
            && self.lon_min <= self.lon_max
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self {
            lat_min: 23.0,
            lat_max: 26.0,
            lon_min: 45.0,
            lon_max: 48.0,
        }
    }
}
