use std::collections::{BTreeMap, BTreeSet};

use rand::{Rng, SeedableRng, rngs::SmallRng};

use crate::catalog::Catalog;
use crate::foundation::core::{TraitChoice, TraitId, TraitType};
use crate::foundation::error::{WorkbenchError, WorkbenchResult};

/// Separator used when an [`Order`] is persisted as a single string.
pub const ORDER_SEPARATOR: char = ',';

/// Stacking and display order of trait types. Members are distinct.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Order(Vec<TraitType>);

impl Order {
    /// Build an order, dropping repeated types (first occurrence wins).
    pub fn new(types: Vec<TraitType>) -> Self {
        let mut seen = BTreeSet::new();
        Self(types.into_iter().filter(|t| seen.insert(t.clone())).collect())
    }

    /// Parse the comma-joined form produced by [`Order::to_saved`]. Empty segments are skipped.
    pub fn parse_saved(saved: &str) -> Self {
        Self::new(
            saved
                .split(ORDER_SEPARATOR)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(TraitType::new)
                .collect(),
        )
    }

    pub fn to_saved(&self) -> String {
        self.0
            .iter()
            .map(TraitType::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn as_slice(&self) -> &[TraitType] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TraitType> {
        self.0.iter()
    }

    pub fn contains(&self, ty: &TraitType) -> bool {
        self.0.contains(ty)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a Order {
    type Item = &'a TraitType;
    type IntoIter = std::slice::Iter<'a, TraitType>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Current choice per trait type: at most one frame identifier each.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection(BTreeMap<TraitType, TraitId>);

impl Selection {
    pub fn get(&self, ty: &TraitType) -> Option<&TraitId> {
        self.0.get(ty)
    }

    pub fn contains(&self, ty: &TraitType) -> bool {
        self.0.contains_key(ty)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TraitType, &TraitId)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn apply(&mut self, ty: TraitType, choice: TraitChoice) {
        match choice {
            TraitChoice::Empty => {
                self.0.remove(&ty);
            }
            TraitChoice::Frame(id) => {
                self.0.insert(ty, id);
            }
        }
    }
}

/// The authoritative session state: catalog, order and selection.
///
/// Owned by one [`crate::Workbench`] and mutated by one handler at a time.
#[derive(Debug)]
pub struct TraitStore {
    catalog: Catalog,
    order: Order,
    selection: Selection,
    rng: SmallRng,
}

impl TraitStore {
    /// Create a store with an empty selection. `seed` makes randomization reproducible.
    pub fn new(catalog: Catalog, order: Order, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        Self {
            catalog,
            order,
            selection: Selection::default(),
            rng,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn order(&self) -> &Order {
        &self.order
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Replace the order wholesale.
    ///
    /// Types unknown to the catalog are dropped, as are selections for types that fall out of
    /// the order. Malformed input never fails.
    pub fn set_order(&mut self, types: Vec<TraitType>) {
        let (known, unknown): (Vec<_>, Vec<_>) = types
            .into_iter()
            .partition(|t| self.catalog.contains_type(t));
        if !unknown.is_empty() {
            tracing::warn!(?unknown, "ignoring unknown trait types in order");
        }

        self.order = Order::new(known);
        let order = &self.order;
        self.selection.0.retain(|ty, _| order.contains(ty));
    }

    /// Apply a choice coming from the canvas or the operator.
    ///
    /// Returns `false` (and changes nothing) when `ty` is not in the order or the frame is not
    /// catalogued under `ty`.
    pub fn choose(&mut self, ty: &TraitType, choice: TraitChoice) -> bool {
        if !self.order.contains(ty) {
            tracing::debug!(trait_type = %ty, "ignoring choice for type outside the order");
            return false;
        }
        if let TraitChoice::Frame(id) = &choice
            && self.catalog.name_of(ty, id).is_none()
        {
            tracing::debug!(trait_type = %ty, id = %id, "ignoring uncatalogued frame");
            return false;
        }
        self.selection.apply(ty.clone(), choice);
        true
    }

    /// Pick a trait for every type in the order, uniformly among its catalogued names.
    pub fn randomize_all(&mut self) {
        let types = self.order.as_slice().to_vec();
        for ty in &types {
            if let Some(choice) = self.random_choice(ty) {
                self.selection.apply(ty.clone(), choice);
            }
        }
    }

    /// Pick a trait for one type. Fails when the type is not an ordered layer.
    pub fn randomize_one(&mut self, ty: &TraitType) -> WorkbenchResult<()> {
        if !self.order.contains(ty) {
            return Err(WorkbenchError::validation(format!(
                "layer '{ty}' is not part of the current order"
            )));
        }
        let choice = self.random_choice(ty).ok_or_else(|| {
            WorkbenchError::validation(format!("layer '{ty}' has no traits to pick from"))
        })?;
        self.selection.apply(ty.clone(), choice);
        Ok(())
    }

    /// Remove the selection for `ty`. Returns whether anything was removed.
    pub fn delete_one(&mut self, ty: &TraitType) -> bool {
        self.selection.0.remove(ty).is_some()
    }

    pub fn clear(&mut self) {
        self.selection.0.clear();
    }

    fn random_choice(&mut self, ty: &TraitType) -> Option<TraitChoice> {
        let traits = self.catalog.traits(ty)?;
        if traits.is_empty() {
            return None;
        }
        let idx = self.rng.random_range(0..traits.len());
        let (name, id) = traits.iter().nth(idx)?;
        Some(TraitChoice::resolve(name, id.clone()))
    }
}

#[cfg(test)]
#[path = "../tests/unit/store.rs"]
mod tests;
