//! On-disk mirror of the campaign data catalog.
//!
//! The remote catalog is not queried; entries that were cached before are
//! read from
//!
//! ```text
//! $PATH_CACHE_INTAKE/<MISSION>/<PLATFORM>/<PRODUCT>/<FLIGHT_ID>[_<NN>].nc
//! ```

use std::path::{Path, PathBuf};

use lizard_common::{DataPaths, Dataset};
use tracing::debug;
use walkdir::WalkDir;

use crate::archive;
use crate::error::{ReaderError, ReaderResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalCatalog {
    root: PathBuf,
}

impl LocalCatalog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn from_paths(paths: &DataPaths) -> ReaderResult<Self> {
        paths
            .path_cache_intake
            .as_ref()
            .map(Self::new)
            .ok_or(ReaderError::CatalogNotConfigured)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn product_dir(&self, mission: &str, platform: &str, product: &str) -> PathBuf {
        self.root.join(mission).join(platform).join(product)
    }

    /// File of a single-file entry.
    pub fn entry_path(&self, mission: &str, platform: &str, product: &str, entry: &str) -> PathBuf {
        self.product_dir(mission, platform, product)
            .join(format!("{}.nc", entry))
    }

    /// Names of all cached entries of a product, sorted.
    pub fn entries(&self, mission: &str, platform: &str, product: &str) -> Vec<String> {
        let dir = self.product_dir(mission, platform, product);
        let mut names: Vec<String> = WalkDir::new(&dir)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter_map(|e| {
                e.path()
                    .file_name()
                    .and_then(|n| n.to_str())
                    .and_then(|n| n.strip_suffix(".nc"))
                    .map(str::to_string)
            })
            .collect();
        names.sort();
        debug!(dir = %dir.display(), entries = names.len(), "Listed catalog entries");
        names
    }

    /// Read one entry.
    pub fn read(&self, mission: &str, platform: &str, product: &str, entry: &str) -> ReaderResult<Dataset> {
        archive::open(&self.entry_path(mission, platform, product, entry))
    }

    /// Entries of a flight that were stored as numbered parts
    /// (`<FLIGHT_ID>_01`, `<FLIGHT_ID>_02`, ...).
    pub fn numbered_entries(&self, mission: &str, platform: &str, product: &str, flight_id: &str) -> Vec<String> {
        let prefix = format!("{}_", flight_id);
        self.entries(mission, platform, product)
            .into_iter()
            .filter(|name| {
                name.strip_prefix(&prefix)
                    .is_some_and(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_layout() {
        let catalog = LocalCatalog::new("/cache");
        assert_eq!(
            catalog.entry_path("HALO-AC3", "HALO", "GPS_INS", "HALO-AC3_HALO_RF03"),
            PathBuf::from("/cache/HALO-AC3/HALO/GPS_INS/HALO-AC3_HALO_RF03.nc")
        );
    }

    #[test]
    fn test_numbered_entries() {
        let dir = tempfile::tempdir().unwrap();
        let product = dir.path().join("AFLUX/P5/DROPSONDES");
        std::fs::create_dir_all(&product).unwrap();
        for name in ["AFLUX_P5_RF08_02", "AFLUX_P5_RF08_01", "AFLUX_P5_RF08", "AFLUX_P5_RF09_01"] {
            std::fs::write(product.join(format!("{}.nc", name)), b"").unwrap();
        }

        let catalog = LocalCatalog::new(dir.path());
        assert_eq!(
            catalog.numbered_entries("AFLUX", "P5", "DROPSONDES", "AFLUX_P5_RF08"),
            vec!["AFLUX_P5_RF08_01", "AFLUX_P5_RF08_02"]
        );
        assert_eq!(catalog.entries("AFLUX", "P5", "DROPSONDES").len(), 4);
        assert!(matches!(
            LocalCatalog::from_paths(&DataPaths {
                path_cache_intake: None,
                ..DataPaths::under("/data")
            }),
            Err(ReaderError::CatalogNotConfigured)
        ));
    }
}
