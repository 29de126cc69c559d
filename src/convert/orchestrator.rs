use std::fmt;

use crate::{
    geofile::{
        feature::{build_line, build_point},
        feature_set::{FeatureKey, FeatureSet},
    },
    graph::edge_list::RawEdge,
    naming::{mounting::mounting_style, normalize::normalize_edge_name},
    poles::{record::MOUNTING_FIELD, table::PoleTable},
};

/// Endpoint of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Source,
    Destination,
}

/// Edge endpoint whose canonical name is not in the pole table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unresolved {
    pub side: Side,
    pub canonical_name: String,
    pub raw_label: String,
}

impl fmt::Display for Unresolved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Could not find {}", self.canonical_name)
    }
}

/// Result of converting an edge list.
#[derive(Debug, Default)]
pub struct Conversion {
    pub features: FeatureSet,
    pub unresolved: Vec<Unresolved>,
}

/// Convert raw edges into point and line features, matching endpoints against `poles`.
///
/// Edges are processed in order. For an edge whose endpoints both resolve:
/// - both poles get the mounting style of their raw label attached, the last edge wins;
/// - the line feature is (re)built under the key of the two canonical names;
/// - a pole's point feature is built the first time the pole is seen. Later edges only update
///   its `mounting` property, so it matches the pole record.
///
/// An edge with an unresolved endpoint adds no features and one diagnostic per unresolved side.
/// Fails on the first pole with malformed coordinates.
pub fn convert_edges(edges: &[RawEdge], poles: &mut PoleTable) -> anyhow::Result<Conversion> {
    let mut conversion = Conversion::default();
    for edge in edges {
        let source = normalize_edge_name(&edge.source);
        let destination = normalize_edge_name(&edge.destination);
        let found_source = poles.contains(&source);
        let found_destination = poles.contains(&destination);
        if !(found_source && found_destination) {
            let sides = [
                (found_source, Side::Source, &source, &edge.source),
                (found_destination, Side::Destination, &destination, &edge.destination),
            ];
            for (found, side, canonical_name, raw_label) in sides {
                if !found {
                    conversion.unresolved.push(Unresolved {
                        side,
                        canonical_name: canonical_name.clone(),
                        raw_label: raw_label.clone(),
                    });
                }
            }
            continue;
        }
        log::debug!(
            "Edge {} -> {} resolved to {} -> {}",
            edge.source,
            edge.destination,
            source,
            destination
        );

        attach_mounting(poles, &source, &edge.source);
        attach_mounting(poles, &destination, &edge.destination);

        // Both names were found above.
        let (Some(source_pole), Some(destination_pole)) =
            (poles.get(&source), poles.get(&destination))
        else {
            continue;
        };
        conversion.features.insert(
            FeatureKey::Line(source.clone(), destination.clone()),
            build_line(source_pole, destination_pole)?,
        );
        for (name, pole) in [(&source, source_pole), (&destination, destination_pole)] {
            let key = FeatureKey::Point(name.clone());
            match conversion.features.get_mut(&key) {
                Some(feature) => {
                    if let Some(mounting) = &pole.mounting {
                        feature.set_property(MOUNTING_FIELD, mounting.as_str());
                    }
                }
                None => {
                    conversion.features.insert(key, build_point(pole)?);
                }
            }
        }
    }
    Ok(conversion)
}

fn attach_mounting(poles: &mut PoleTable, canonical_name: &str, raw_label: &str) {
    if let Some(pole) = poles.get_mut(canonical_name) {
        pole.mounting = Some(mounting_style(raw_label));
    }
}
