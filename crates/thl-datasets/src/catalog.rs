//! Dataset catalog
//!
//! Maps dataset names to descriptor constructors. Descriptors are built on
//! lookup, so a catalog is cheap to create and holds no per-run state.

use crate::error::{DatasetError, DatasetResult};
use crate::{epirapo, inci, vaccreg};
use std::collections::BTreeMap;
use thl_compact::Descriptor;

/// Builds a dataset descriptor
pub type DescriptorFn = fn() -> Descriptor;

/// Registry of named datasets, iterated in name order
#[derive(Debug, Default, Clone)]
pub struct Catalog {
    datasets: BTreeMap<String, DescriptorFn>,
}

impl Catalog {
    /// Create empty catalog
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create catalog with every built-in dataset
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut catalog = Self::new();
        catalog.register("kunnat", epirapo::kunnat);
        catalog.register("alueet", epirapo::alueet);
        catalog.register("testit", epirapo::testit);
        catalog.register("tartunnat", epirapo::tartunnat);
        catalog.register("iat", epirapo::iat);
        catalog.register("ageweeks", epirapo::ageweeks);
        catalog.register("kuolemat", epirapo::kuolemat);
        catalog.register("kuolemaiat", epirapo::kuolemaiat);
        catalog.register("sairaalat", epirapo::sairaalat);

        catalog.register("vaxweeks", vaccreg::vaxweeks);
        catalog.register("vaxcoverage", vaccreg::vaxcoverage);
        catalog.register("vaxpopulation", vaccreg::vaxpopulation);
        catalog.register("vaxproduct", vaccreg::vaxproduct);
        catalog.register("vaxmunicipalities", vaccreg::vaxmunicipalities);

        catalog.register("vaxstatpatients", inci::vaxstatpatients);
        catalog.register("vaxstaticu", inci::vaxstaticu);
        catalog.register("vaxstatdeaths", inci::vaxstatdeaths);
        catalog.register("vaxstatcases", inci::vaxstatcases);
        catalog.register("vaxstatpersonmonths", inci::vaxstatpersonmonths);
        catalog.register("vaxincpatients", inci::vaxincpatients);
        catalog.register("vaxincicu", inci::vaxincicu);
        catalog.register("vaxincdeaths", inci::vaxincdeaths);
        catalog.register("vaxinccases", inci::vaxinccases);
        catalog
    }

    /// Register a dataset, replacing any previous one with the same name
    pub fn register(&mut self, name: &str, build: DescriptorFn) {
        self.datasets.insert(name.to_string(), build);
    }

    /// Check if dataset exists
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.datasets.contains_key(name)
    }

    /// Dataset names in sorted order
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.datasets.keys().map(String::as_str).collect()
    }

    /// Build the descriptor for a dataset
    ///
    /// # Errors
    /// [`DatasetError::UnknownDataset`] if no dataset has this name
    pub fn get(&self, name: &str) -> DatasetResult<Descriptor> {
        let build = self
            .datasets
            .get(name)
            .ok_or_else(|| DatasetError::unknown(name, self.names()))?;
        tracing::debug!(dataset = name, "descriptor built");
        Ok(build())
    }

    /// Number of datasets
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    /// Check if catalog is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }
}

/// Look up a built-in dataset
///
/// # Errors
/// [`DatasetError::UnknownDataset`] if no built-in dataset has this name
pub fn find(name: &str) -> DatasetResult<Descriptor> {
    Catalog::with_defaults().get(name)
}

/// Sorted names of the built-in datasets
#[must_use]
pub fn names() -> Vec<String> {
    Catalog::with_defaults()
        .names()
        .into_iter()
        .map(str::to_string)
        .collect()
}
