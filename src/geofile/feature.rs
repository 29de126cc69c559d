use geojson::{Feature, Geometry, JsonObject, JsonValue};

use crate::poles::record::{PoleRecord, LATITUDE_FIELD, LONGITUDE_FIELD, MOUNTING_FIELD};

// simplestyle properties understood by common GeoJSON renderers.
pub const MARKER_SIZE: &str = "small";
pub const MARKER_COLOR: &str = "#1f78b4";
pub const MARKER_SYMBOL: &str = "circle";
pub const LINE_STROKE: &str = "#ff7800";
/// Use of a cable run. The graph description does not say, so every line gets this value.
pub const LINE_USE: &str = "unknown";

fn feature_with(geometry: Geometry, properties: JsonObject) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(geometry),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Properties of the point feature for a pole: the table row without the pole id, the attached
/// mounting style, marker styling, and `name` set to the pole id.
pub fn point_properties(record: &PoleRecord) -> JsonObject {
    let mut properties = JsonObject::new();
    for (key, value) in &record.extra_fields {
        properties.insert(key.clone(), JsonValue::from(value.as_str()));
    }
    properties.insert(
        LONGITUDE_FIELD.to_string(),
        JsonValue::from(record.longitude.as_str()),
    );
    properties.insert(
        LATITUDE_FIELD.to_string(),
        JsonValue::from(record.latitude.as_str()),
    );
    if let Some(mounting) = &record.mounting {
        properties.insert(
            MOUNTING_FIELD.to_string(),
            JsonValue::from(mounting.as_str()),
        );
    }
    properties.insert("marker-size".to_string(), JsonValue::from(MARKER_SIZE));
    properties.insert("marker-color".to_string(), JsonValue::from(MARKER_COLOR));
    properties.insert("marker-symbol".to_string(), JsonValue::from(MARKER_SYMBOL));
    properties.insert("name".to_string(), JsonValue::from(record.pole_id.as_str()));
    properties
}

/// Build the point feature for a single pole. Fails if the pole's coordinates are not numbers.
pub fn build_point(record: &PoleRecord) -> anyhow::Result<Feature> {
    let point = record.point()?;
    Ok(feature_with(
        Geometry::new(geojson::Value::from(&point)),
        point_properties(record),
    ))
}

/// Build the line feature for a cable run from `source` to `destination`, named `<id1>_<id2>`.
pub fn build_line(source: &PoleRecord, destination: &PoleRecord) -> anyhow::Result<Feature> {
    let line = geo::LineString::from(vec![source.point()?, destination.point()?]);
    let mut properties = JsonObject::new();
    properties.insert("use".to_string(), JsonValue::from(LINE_USE));
    properties.insert("stroke".to_string(), JsonValue::from(LINE_STROKE));
    properties.insert(
        "name".to_string(),
        JsonValue::from(format!("{}_{}", source.pole_id, destination.pole_id)),
    );
    Ok(feature_with(
        Geometry::new(geojson::Value::from(&line)),
        properties,
    ))
}

#[cfg(test)]
mod tests {
    use geojson::{JsonValue, Value};

    use crate::poles::record::PoleRecord;

    use super::{build_line, build_point};

    fn pole(pole_id: &str, longitude: &str, latitude: &str) -> PoleRecord {
        let mut record = PoleRecord::new(pole_id, longitude, latitude);
        record.extra_fields = vec![("owner".to_string(), "city".to_string())];
        record
    }

    #[test]
    fn test_build_point() {
        let mut record = pole("P-1", "-122.5", "45.25");
        record.mounting = Some("sig".to_string());
        let feature = build_point(&record).unwrap();

        assert_eq!(
            feature.geometry.unwrap().value,
            Value::Point(vec![-122.5, 45.25])
        );
        let properties = feature.properties.unwrap();
        assert_eq!(properties["name"], JsonValue::from("P-1"));
        assert_eq!(properties["owner"], JsonValue::from("city"));
        assert_eq!(properties["longitude"], JsonValue::from("-122.5"));
        assert_eq!(properties["latitude"], JsonValue::from("45.25"));
        assert_eq!(properties["mounting"], JsonValue::from("sig"));
        assert_eq!(properties["marker-size"], JsonValue::from("small"));
        assert_eq!(properties["marker-color"], JsonValue::from("#1f78b4"));
        assert_eq!(properties["marker-symbol"], JsonValue::from("circle"));
        assert!(!properties.contains_key("pole_id"));
    }

    #[test]
    fn test_build_point_without_mounting() {
        let feature = build_point(&pole("P-1", "1", "2")).unwrap();
        assert!(!feature.properties.unwrap().contains_key("mounting"));
    }

    #[test]
    fn test_build_point_malformed_coordinate() {
        let err = build_point(&pole("P-1", "east", "2")).unwrap_err();
        assert_eq!(err.to_string(), "Invalid longitude for pole P-1");
    }

    #[test]
    fn test_build_line() {
        let feature = build_line(&pole("A", "1.0", "2.0"), &pole("B", "3.0", "4.0")).unwrap();

        assert_eq!(
            feature.geometry.unwrap().value,
            Value::LineString(vec![vec![1.0, 2.0], vec![3.0, 4.0]])
        );
        let properties = feature.properties.unwrap();
        assert_eq!(properties.len(), 3);
        assert_eq!(properties["use"], JsonValue::from("unknown"));
        assert_eq!(properties["stroke"], JsonValue::from("#ff7800"));
        assert_eq!(properties["name"], JsonValue::from("A_B"));
    }

    #[test]
    fn test_build_line_malformed_coordinate() {
        let err = build_line(&pole("A", "1.0", "2.0"), &pole("B", "3.0", "north")).unwrap_err();
        assert_eq!(err.to_string(), "Invalid latitude for pole B");
    }
}
