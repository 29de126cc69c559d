use anyhow::{anyhow, Context};

/// Column holding the unique pole identifier.
pub const POLE_ID_FIELD: &str = "pole_id";
pub const LONGITUDE_FIELD: &str = "longitude";
pub const LATITUDE_FIELD: &str = "latitude";
/// Derived field, not read from the table.
pub const MOUNTING_FIELD: &str = "mounting";

/// One row of the pole table.
///
/// Coordinates are kept as the strings found in the table and only parsed when a feature is
/// built, so a malformed value is reported for the pole that is actually drawn. All columns other
/// than the known ones are carried verbatim, in column order.
#[derive(Debug, Clone, PartialEq)]
pub struct PoleRecord {
    pub pole_id: String,
    pub longitude: String,
    pub latitude: String,
    pub mounting: Option<String>,
    pub extra_fields: Vec<(String, String)>,
}

impl PoleRecord {
    pub fn new(pole_id: &str, longitude: &str, latitude: &str) -> Self {
        Self {
            pole_id: pole_id.to_string(),
            longitude: longitude.to_string(),
            latitude: latitude.to_string(),
            mounting: None,
            extra_fields: Vec::new(),
        }
    }

    /// Parse the coordinate fields into a lon/lat point.
    pub fn point(&self) -> anyhow::Result<geo::Point> {
        let lon = parse_coordinate(&self.longitude)
            .with_context(|| format!("Invalid {} for pole {}", LONGITUDE_FIELD, self.pole_id))?;
        let lat = parse_coordinate(&self.latitude)
            .with_context(|| format!("Invalid {} for pole {}", LATITUDE_FIELD, self.pole_id))?;
        Ok(geo::Point::new(lon, lat))
    }
}

fn parse_coordinate(value: &str) -> anyhow::Result<f64> {
    let parsed: f64 = value
        .trim()
        .parse()
        .map_err(|err| anyhow!("'{}' is not a number, {}", value, err))?;
    if !parsed.is_finite() {
        return Err(anyhow!("'{}' is not a finite number", value));
    }
    Ok(parsed)
}
