use std::{collections::HashMap, fs::File, io, path::Path};

use anyhow::{anyhow, Context};

use super::record::{PoleRecord, LATITUDE_FIELD, LONGITUDE_FIELD, POLE_ID_FIELD};

/// Pole records indexed by pole id.
#[derive(Debug, Default)]
pub struct PoleTable {
    poles: HashMap<String, PoleRecord>,
}

impl PoleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a pole table from a CSV file with a header row.
    pub fn load_from_csv(filepath: &Path) -> anyhow::Result<Self> {
        let file = File::open(filepath)
            .with_context(|| format!("Could not open pole table {:?}", filepath))?;
        Self::from_reader(file).with_context(|| format!("Could not read pole table {:?}", filepath))
    }

    /// Read CSV data with a header row. The `pole_id`, `longitude` and `latitude` columns are
    /// required, every other column is kept as a passthrough field.
    pub fn from_reader<R: io::Read>(reader: R) -> anyhow::Result<Self> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let headers = csv_reader.headers()?.clone();
        let column = |name: &str| {
            headers
                .iter()
                .position(|header| header.trim() == name)
                .ok_or_else(|| anyhow!("Missing required column '{}'", name))
        };
        let id_column = column(POLE_ID_FIELD)?;
        let lon_column = column(LONGITUDE_FIELD)?;
        let lat_column = column(LATITUDE_FIELD)?;

        let mut table = Self::new();
        for (row_index, row) in csv_reader.records().enumerate() {
            let row = row?;
            let field = |index: usize| row.get(index).unwrap_or("");
            let pole_id = field(id_column);
            if pole_id.is_empty() {
                log::warn!("Skipping row {} without a {}", row_index + 1, POLE_ID_FIELD);
                continue;
            }
            let mut record = PoleRecord::new(pole_id, field(lon_column), field(lat_column));
            record.extra_fields = headers
                .iter()
                .enumerate()
                .filter(|(index, _)| ![id_column, lon_column, lat_column].contains(index))
                .map(|(index, header)| (header.to_string(), field(index).to_string()))
                .collect();
            if let Some(replaced) = table.insert(record) {
                log::warn!(
                    "Duplicate pole id {}, keeping the last row",
                    replaced.pole_id
                );
            }
        }
        Ok(table)
    }

    /// Insert a record, returning the record previously stored under the same id.
    pub fn insert(&mut self, record: PoleRecord) -> Option<PoleRecord> {
        self.poles.insert(record.pole_id.clone(), record)
    }

    pub fn get(&self, pole_id: &str) -> Option<&PoleRecord> {
        self.poles.get(pole_id)
    }

    pub fn get_mut(&mut self, pole_id: &str) -> Option<&mut PoleRecord> {
        self.poles.get_mut(pole_id)
    }

    pub fn contains(&self, pole_id: &str) -> bool {
        self.poles.contains_key(pole_id)
    }

    pub fn len(&self) -> usize {
        self.poles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poles.is_empty()
    }
}
