use std::path::PathBuf;

use crate::{
    geofile::geojson::write_feature_collection,
    graph::edge_list::{raw_edges, read_edge_graph_from_file},
    poles::table::PoleTable,
};

use super::orchestrator::{convert_edges, Unresolved};

/// Input and output files of a conversion run.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionPaths {
    pub poles_filepath: PathBuf,
    pub graph_filepath: PathBuf,
    pub output_filepath: PathBuf,
}

#[derive(Debug)]
pub struct RunSummary {
    pub point_count: usize,
    pub line_count: usize,
    pub unresolved: Vec<Unresolved>,
}

/// Read both inputs, convert the edges and write the feature collection.
///
/// Unresolved endpoints are printed to stdout as they are reported and the run continues. Any
/// other failure aborts the run before the output file is written.
pub fn run_conversion(paths: &ConversionPaths) -> anyhow::Result<RunSummary> {
    let mut poles = PoleTable::load_from_csv(&paths.poles_filepath)?;
    log::info!(
        "Read {} poles from {:?}",
        poles.len(),
        &paths.poles_filepath
    );
    let graph = read_edge_graph_from_file(&paths.graph_filepath)?;
    let edges = raw_edges(&graph);
    log::info!(
        "Read {} edges between {} nodes from {:?}",
        edges.len(),
        graph.node_count(),
        &paths.graph_filepath
    );

    let conversion = convert_edges(&edges, &mut poles)?;
    for unresolved in &conversion.unresolved {
        println!("{}", unresolved);
    }
    if !conversion.unresolved.is_empty() {
        log::info!(
            "{} edge endpoints could not be matched to a pole",
            conversion.unresolved.len()
        );
    }

    log::info!(
        "Writing {} features to {:?}",
        conversion.features.len(),
        &paths.output_filepath
    );
    write_feature_collection(&conversion.features, &paths.output_filepath)?;
    Ok(RunSummary {
        point_count: conversion.features.point_count(),
        line_count: conversion.features.line_count(),
        unresolved: conversion.unresolved,
    })
}

#[cfg(test)]
mod tests {
    use std::{fs, path::Path};

    use geojson::GeoJson;
    use testdir::testdir;

    use super::{run_conversion, ConversionPaths};

    const POLES_CSV: &str = "\
pole_id,longitude,latitude,owner
A,-122.60,45.50,city
B,-122.61,45.51,city
C,-122.62,45.52,utility
";

    const GRAPH_DOT: &str = "\
digraph cables {
    A_sig -> B_vert;
    A_vert -> C;
    _rawid_sig -> C;
}
";

    fn write_inputs(dir: &Path, poles_csv: &str) -> ConversionPaths {
        let paths = ConversionPaths {
            poles_filepath: dir.join("poles.csv"),
            graph_filepath: dir.join("graph.txt"),
            output_filepath: dir.join("features.json"),
        };
        fs::write(&paths.poles_filepath, poles_csv).unwrap();
        fs::write(&paths.graph_filepath, GRAPH_DOT).unwrap();
        paths
    }

    #[test]
    fn test_run_conversion() {
        let test_dir = testdir!();
        let paths = write_inputs(&test_dir, POLES_CSV);
        let summary = run_conversion(&paths).unwrap();

        assert_eq!(summary.point_count, 3);
        assert_eq!(summary.line_count, 2);
        let messages: Vec<String> = summary.unresolved.iter().map(|u| u.to_string()).collect();
        assert_eq!(messages, vec!["Could not find rawid"]);

        let text = fs::read_to_string(&paths.output_filepath).unwrap();
        let collection = match text.parse::<GeoJson>().unwrap() {
            GeoJson::FeatureCollection(collection) => collection,
            other => panic!("Expected a FeatureCollection, got {:?}", other),
        };
        let names: Vec<&str> = collection
            .features
            .iter()
            .map(|feature| feature.property("name").unwrap().as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["A_B", "A", "B", "A_C", "C"]);
        assert_eq!(collection.features[1].property("mounting").unwrap(), "vert");
        assert_eq!(collection.features[2].property("mounting").unwrap(), "vert");
    }

    #[test]
    fn test_run_conversion_is_deterministic() {
        let test_dir = testdir!();
        let paths = write_inputs(&test_dir, POLES_CSV);
        run_conversion(&paths).unwrap();
        let first = fs::read(&paths.output_filepath).unwrap();
        run_conversion(&paths).unwrap();
        let second = fs::read(&paths.output_filepath).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_malformed_coordinate_writes_no_output() {
        let test_dir = testdir!();
        let poles_csv = "pole_id,longitude,latitude\nA,west,45.50\nB,-122.61,45.51\nC,-122.62,45.52\n";
        let paths = write_inputs(&test_dir, poles_csv);
        let err = run_conversion(&paths).unwrap_err();
        assert_eq!(err.to_string(), "Invalid longitude for pole A");
        assert!(!paths.output_filepath.exists());
    }

    #[test]
    fn test_missing_graph_writes_no_output() {
        let test_dir = testdir!();
        let mut paths = write_inputs(&test_dir, POLES_CSV);
        paths.graph_filepath = test_dir.join("missing.txt");
        assert!(run_conversion(&paths).is_err());
        assert!(!paths.output_filepath.exists());
    }
}
