use std::collections::BTreeMap;

use grid_policy::GridPolicy;
use grid_types::AttributeValue;
use snapshot_format::ProjectMetadata;

pub const PREF_UNIT_SCHEMA: &str = "Units/UserSchema";
pub const PREF_GRID_SIZE: &str = "Grid/Size";
pub const PREF_GRID_SNAP: &str = "Grid/Snap";
pub const PREF_GRID_STYLE: &str = "Grid/Style";

/// Path-keyed preference values, e.g. `"Grid/Size"`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Preferences {
    values: BTreeMap<String, AttributeValue>,
}

impl Preferences {
    pub fn set(&mut self, key: &str, value: impl Into<AttributeValue>) {
        self.values.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.values.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Mirror the grid settings.
    pub(crate) fn write_grid(&mut self, grid: &GridPolicy) {
        self.set(PREF_GRID_SIZE, grid.size());
        self.set(PREF_GRID_SNAP, grid.snap_enabled());
        self.set(PREF_GRID_STYLE, grid.style().as_str());
    }
}

/// A kernel document: its unique name, the kernel instance and its preferences.
pub struct Document<K> {
    pub(crate) name: String,
    pub(crate) kernel: K,
    pub(crate) preferences: Preferences,
    pub(crate) metadata: ProjectMetadata,
}

impl<K> Document<K> {
    pub(crate) fn open(name: String, kernel: K, unit_schema: u32, grid: &GridPolicy) -> Self {
        let mut preferences = Preferences::default();
        preferences.set(PREF_UNIT_SCHEMA, i64::from(unit_schema));
        preferences.write_grid(grid);
        Self {
            metadata: ProjectMetadata::new(name.clone()),
            name,
            kernel,
            preferences,
        }
    }

    /// Unique name, `"{name}_{8 hex}"`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kernel(&self) -> &K {
        &self.kernel
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn metadata(&self) -> &ProjectMetadata {
        &self.metadata
    }
}
