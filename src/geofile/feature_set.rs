use std::collections::HashMap;

use geojson::Feature;

/// Deduplication key of a feature.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FeatureKey {
    /// Point feature of a pole, by canonical name.
    Point(String),
    /// Line feature of a cable run, by the canonical names of its endpoints in traversal order.
    Line(String, String),
}

/// Features by key, iterated in order of first insertion.
#[derive(Debug, Default)]
pub struct FeatureSet {
    features: Vec<Feature>,
    keys: Vec<FeatureKey>,
    index: HashMap<FeatureKey, usize>,
}

impl FeatureSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the feature stored under `key`. A replaced feature keeps its position.
    pub fn insert(&mut self, key: FeatureKey, feature: Feature) -> Option<Feature> {
        match self.index.get(&key) {
            Some(&position) => Some(std::mem::replace(&mut self.features[position], feature)),
            None => {
                self.index.insert(key.clone(), self.features.len());
                self.keys.push(key);
                self.features.push(feature);
                None
            }
        }
    }

    pub fn contains_key(&self, key: &FeatureKey) -> bool {
        self.index.contains_key(key)
    }

    pub fn get(&self, key: &FeatureKey) -> Option<&Feature> {
        self.index.get(key).map(|&position| &self.features[position])
    }

    pub fn get_mut(&mut self, key: &FeatureKey) -> Option<&mut Feature> {
        match self.index.get(key) {
            Some(&position) => self.features.get_mut(position),
            None => None,
        }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FeatureKey, &Feature)> {
        self.keys.iter().zip(self.features.iter())
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn point_count(&self) -> usize {
        self.keys
            .iter()
            .filter(|key| matches!(key, FeatureKey::Point(_)))
            .count()
    }

    pub fn line_count(&self) -> usize {
        self.len() - self.point_count()
    }
}
