pub mod feature;
pub mod feature_set;
pub mod geojson;
