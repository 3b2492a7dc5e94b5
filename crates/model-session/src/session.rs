use std::collections::BTreeMap;
use std::path::Path;

use feature_store::{Feature, FeatureId, FeatureStore, StoreError};
use geometry_bridge::{from_external, to_external, to_multipoint};
use grid_policy::GridPolicy;
use grid_types::{AttributeValue, GeometryRecord, ShapeParams};
use shape_kernel::KernelBundle;
use snapshot_format::{load_snapshot, save_snapshot, DocumentSnapshot, FeatureSnapshot};
use tracing::{debug, info, instrument, warn};

use crate::config::SessionConfig;
use crate::document::Document;
use crate::types::{FeatureType, SessionError};

/// Feature type recorded for geometry imported from external records.
pub const IMPORTED_FEATURE_TYPE: &str = "Imported";

/// A single open document and the features registered in it.
///
/// Feature IDs cross this boundary as strings. Unparsable IDs behave exactly like
/// unknown ones.
pub struct ModelSession<K: KernelBundle> {
    document: Document<K>,
    store: FeatureStore,
    config: SessionConfig,
}

fn log_alignment(feature: &Feature) {
    debug!(
        feature = %feature.name(),
        aligned = feature.grid_aligned(),
        deviation = feature.grid_deviation(),
        "grid alignment"
    );
}

impl<K: KernelBundle> ModelSession<K> {
    /// Open a document with the default configuration.
    pub fn new(name: &str, kernel: K) -> Self {
        Self::with_config(name, kernel, SessionConfig::default())
    }

    pub fn with_config(name: &str, kernel: K, config: SessionConfig) -> Self {
        let doc_name = format!("{}_{}", name, feature_store::short_hex());
        let document = Document::open(doc_name, kernel, config.unit_schema, &config.grid);
        info!(
            document = %document.name(),
            grid_size = config.grid.size(),
            tolerance = config.grid.tolerance(),
            "document opened"
        );
        Self {
            document,
            store: FeatureStore::new(),
            config,
        }
    }

    pub fn document(&self) -> &Document<K> {
        &self.document
    }

    pub fn kernel(&self) -> &K {
        &self.document.kernel
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn grid_policy(&self) -> &GridPolicy {
        &self.config.grid
    }

    pub fn feature_count(&self) -> usize {
        self.store.len()
    }

    pub fn features(&self) -> impl Iterator<Item = &Feature> {
        self.store.iter()
    }

    fn resolve(&self, id: &str) -> Option<&Feature> {
        let id: FeatureId = id.parse().ok()?;
        self.store.lookup(&id)
    }

    fn resolve_id(&self, id: &str) -> Result<FeatureId, SessionError> {
        match self.resolve(id) {
            Some(feature) => Ok(feature.id()),
            None => {
                warn!(id, "invalid feature reference");
                Err(SessionError::InvalidFeatureReference { id: id.to_string() })
            }
        }
    }

    fn after_change(&mut self) -> Result<(), SessionError> {
        if self.config.recompute_on_change {
            self.recompute()?;
        }
        Ok(())
    }

    /// Run the post-change recompute for a just-registered feature. If it fails the
    /// feature is removed again, so the call leaves nothing behind.
    fn settle_new_feature(&mut self, id: FeatureId) -> Result<FeatureId, SessionError> {
        if let Err(e) = self.after_change() {
            warn!(%id, error = %e, "recompute failed, discarding new feature");
            self.store.remove(&mut self.document.kernel, &id);
            return Err(e);
        }
        Ok(id)
    }

    /// Synthesize a parametric feature. Missing dimensions default to 10.0.
    #[instrument(skip(self, params))]
    pub fn create_feature(
        &mut self,
        feature_type: &str,
        params: &ShapeParams,
    ) -> Result<FeatureId, SessionError> {
        let feature_type: FeatureType = feature_type.parse().map_err(|e| {
            warn!("rejected feature type");
            e
        })?;

        let kernel = &mut self.document.kernel;
        let handle = kernel.create_shape(feature_type.as_str(), params)?;
        let feature = self
            .store
            .adopt(kernel, handle, feature_type.as_str(), &self.config.grid)?;
        info!(feature = %feature.name(), id = %feature.id(), "feature registered");
        log_alignment(feature);
        let id = feature.id();

        self.settle_new_feature(id)
    }

    /// Register external geometry as a new feature.
    #[instrument(skip(self, record), fields(record = record.type_name()))]
    pub fn import_geometry(&mut self, record: &GeometryRecord) -> Result<FeatureId, SessionError> {
        let description = from_external(record).map_err(|e| {
            warn!(error = %e, "rejected geometry");
            e
        })?;

        let feature = self.store.register(
            &mut self.document.kernel,
            &description,
            IMPORTED_FEATURE_TYPE,
            &self.config.grid,
        )?;
        info!(feature = %feature.name(), id = %feature.id(), "feature registered");
        log_alignment(feature);
        let id = feature.id();

        self.settle_new_feature(id)
    }

    /// Export a feature as an external record (see [`to_external`] for the rules).
    pub fn export_geometry(&self, id: &str) -> Result<GeometryRecord, SessionError> {
        let id = self.resolve_id(id)?;
        let feature = self.store.get(&id)?;
        Ok(to_external(&self.document.kernel, feature.shape())?)
    }

    /// Export every vertex of a feature as 3D points.
    pub fn export_vertices(&self, id: &str) -> Result<GeometryRecord, SessionError> {
        let id = self.resolve_id(id)?;
        let feature = self.store.get(&id)?;
        Ok(to_multipoint(&self.document.kernel, feature.shape())?)
    }

    pub fn feature(&self, id: &str) -> Option<&Feature> {
        self.resolve(id)
    }

    /// Remove a feature. Returns false if no such feature exists.
    #[instrument(skip(self))]
    pub fn remove_feature(&mut self, id: &str) -> bool {
        let Ok(id) = id.parse::<FeatureId>() else {
            return false;
        };
        let removed = self.store.remove(&mut self.document.kernel, &id);
        if removed {
            info!(%id, "feature removed");
        }
        removed
    }

    /// Attach user parameters to a feature.
    ///
    /// Reserved names are checked before anything is written, so a rejected call
    /// changes nothing.
    #[instrument(skip(self, params))]
    pub fn apply_parameters(
        &mut self,
        id: &str,
        params: BTreeMap<String, AttributeValue>,
    ) -> Result<(), SessionError> {
        let id = self.resolve_id(id)?;
        if let Some(name) = params
            .keys()
            .find(|name| feature_store::is_reserved_attribute(name))
        {
            warn!(%name, "rejected reserved parameter");
            return Err(StoreError::ReservedAttribute { name: name.clone() }.into());
        }

        for (name, value) in params {
            self.store
                .set_attribute(&mut self.document.kernel, &id, &name, value)?;
        }
        Ok(())
    }

    /// Replace the grid policy and re-evaluate every feature against it.
    ///
    /// The policy and the grid preferences change only once every feature has been
    /// re-evaluated.
    #[instrument(skip(self))]
    pub fn set_grid_policy(&mut self, policy: GridPolicy) -> Result<(), SessionError> {
        self.store
            .reevaluate_all(&mut self.document.kernel, &policy)?;
        self.config.grid = policy;
        self.document.preferences.write_grid(&policy);
        info!(
            features = self.store.len(),
            misaligned = self.store.iter().filter(|f| !f.grid_aligned()).count(),
            "grid policy applied"
        );
        Ok(())
    }

    /// Change grid spacing and tolerance, keeping the other grid settings.
    pub fn configure_grid(&mut self, size: f64, tolerance: f64) -> Result<(), SessionError> {
        let current = self.config.grid;
        let policy = GridPolicy::new(size, tolerance)?
            .with_snap(current.snap_enabled())
            .with_style(current.style())
            .with_axis_restriction(current.axis_restriction());
        self.set_grid_policy(policy)
    }

    /// Recompute the kernel document, then refresh every feature's alignment.
    pub fn recompute(&mut self) -> Result<(), SessionError> {
        self.document.kernel.recompute()?;
        self.store
            .reevaluate_all(&mut self.document.kernel, &self.config.grid)?;
        for feature in self.store.iter() {
            log_alignment(feature);
        }
        Ok(())
    }

    /// Persistable view of the document.
    pub fn snapshot(&self) -> Result<DocumentSnapshot, SessionError> {
        let mut project = self.document.metadata.clone();
        project.touch();

        let features = self
            .store
            .iter()
            .map(|f| -> Result<FeatureSnapshot, SessionError> {
                let vertices = self.document.kernel.vertices(f.shape())?;
                Ok(FeatureSnapshot::capture(f, vertices))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(DocumentSnapshot::new(project, self.config.grid, features))
    }

    /// Write the snapshot to `path` as JSON.
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SessionError> {
        let json = save_snapshot(&self.snapshot()?)?;
        std::fs::write(path.as_ref(), json)?;
        info!(document = %self.document.name(), "document saved");
        Ok(())
    }

    /// Close the document: release every feature's shape and hand the kernel back.
    pub fn close(self) -> K {
        let Self {
            mut document,
            mut store,
            ..
        } = self;
        let count = store.len();
        store.clear(&mut document.kernel);
        info!(document = %document.name(), features = count, "document closed");
        document.kernel
    }
}

/// Read and validate a snapshot file written by [`ModelSession::save`].
pub fn read_snapshot(path: impl AsRef<Path>) -> Result<DocumentSnapshot, SessionError> {
    let json = std::fs::read_to_string(path)?;
    Ok(load_snapshot(&json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shape_kernel::MockKernel;

    #[test]
    fn test_document_name_has_hex_suffix() {
        let session = ModelSession::new("Plan", MockKernel::new());
        let name = session.document().name();
        let suffix = name.strip_prefix("Plan_").unwrap();
        assert_eq!(suffix.len(), 8);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_two_sessions_get_distinct_documents() {
        let a = ModelSession::new("Plan", MockKernel::new());
        let b = ModelSession::new("Plan", MockKernel::new());
        assert_ne!(a.document().name(), b.document().name());
    }

    #[test]
    fn test_recompute_on_change_can_be_disabled() {
        let config = SessionConfig {
            recompute_on_change: false,
            ..Default::default()
        };
        let mut session = ModelSession::with_config("Plan", MockKernel::new(), config);
        session
            .import_geometry(&GeometryRecord::point(0.0, 0.0))
            .unwrap();
        assert_eq!(session.kernel().recompute_count(), 0);

        session.recompute().unwrap();
        assert_eq!(session.kernel().recompute_count(), 1);
    }
}
