//! Element factory - mints element instances and resolves their assets
//!
//! The presentation side owns the actual sprites and prefabs; the factory only
//! needs to know that a variant *has* an asset. Lookups go through an
//! [`AssetCatalog`] and are cached per variant, so identical variants always
//! resolve to the same [`AssetId`] (goal icons rely on that).

use std::collections::HashMap;
use std::fmt;

use crate::element::{ElementId, GridElement};
use crate::error::GridError;
use crate::rng::RandomSource;
use crate::types::{Coord, ElementKind};

/// Opaque handle to a presentation asset (sprite, prefab, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetId(pub String);

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of presentation assets for element variants.
pub trait AssetCatalog {
    fn lookup(&self, kind: ElementKind) -> Option<AssetId>;
}

/// Catalog that knows every built-in variant under `GridElements/<AssetName>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinCatalog;

impl BuiltinCatalog {
    pub const FOLDER: &'static str = "GridElements/";
}

impl AssetCatalog for BuiltinCatalog {
    fn lookup(&self, kind: ElementKind) -> Option<AssetId> {
        Some(AssetId(format!("{}{}", Self::FOLDER, kind.asset_name())))
    }
}

#[derive(Debug)]
pub struct ElementFactory<C = BuiltinCatalog> {
    catalog: C,
    cache: HashMap<ElementKind, AssetId>,
    next_id: u32,
}

impl ElementFactory<BuiltinCatalog> {
    pub fn builtin() -> Self {
        Self::new(BuiltinCatalog)
    }
}

impl Default for ElementFactory<BuiltinCatalog> {
    fn default() -> Self {
        Self::builtin()
    }
}

impl<C: AssetCatalog> ElementFactory<C> {
    pub fn new(catalog: C) -> Self {
        Self {
            catalog,
            cache: HashMap::new(),
            next_id: 0,
        }
    }

    /// Asset for `kind`, loaded once and served from cache afterwards.
    pub fn icon(&mut self, kind: ElementKind) -> Result<AssetId, GridError> {
        if let Some(asset) = self.cache.get(&kind) {
            return Ok(asset.clone());
        }

        match self.catalog.lookup(kind) {
            Some(asset) => {
                self.cache.insert(kind, asset.clone());
                Ok(asset)
            }
            None => {
                log::error!("failed to load asset for {kind}");
                Err(GridError::MissingAssetForElement(kind))
            }
        }
    }

    /// New element instance of `kind` resting at `coord`.
    pub fn create(&mut self, kind: ElementKind, coord: Coord) -> Result<GridElement, GridError> {
        self.icon(kind)?;
        let id = ElementId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        Ok(GridElement::new(id, kind, coord))
    }

    /// New cube of a uniformly random colour.
    pub fn create_random_cube<R>(&mut self, rng: &mut R, coord: Coord) -> Result<GridElement, GridError>
    where
        R: RandomSource + ?Sized,
    {
        let kind = ElementKind::Cube(rng.cube_color());
        self.create(kind, coord)
    }

    /// Number of variants currently cached.
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }
}
