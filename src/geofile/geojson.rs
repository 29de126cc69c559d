use std::{fs, path::Path};

use anyhow::Context;
use serde::Serialize;

use super::feature_set::FeatureSet;

const INDENT: &[u8] = b"    ";

/// Serialize the features as a pretty printed GeoJSON FeatureCollection.
///
/// Object keys are written in sorted order and features in the set's order, so the same input
/// always produces the same text.
pub fn feature_collection_to_string(features: &FeatureSet) -> anyhow::Result<String> {
    let feature_collection = geojson::FeatureCollection {
        bbox: None,
        features: features.features().to_vec(),
        foreign_members: None,
    };
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    feature_collection
        .serialize(&mut serializer)
        .context("Could not serialize feature collection")?;
    buffer.push(b'\n');
    Ok(String::from_utf8(buffer)?)
}

/// Write the features to a GeoJSON file. Nothing is written if serialization fails.
pub fn write_feature_collection(features: &FeatureSet, output_filepath: &Path) -> anyhow::Result<()> {
    let contents = feature_collection_to_string(features)?;
    fs::write(output_filepath, contents)
        .with_context(|| format!("Could not write feature collection to {:?}", output_filepath))
}
