use std::collections::BTreeMap;

use crate::foundation::core::{TraitId, TraitName, TraitTag, TraitType};
use crate::host::NodeInfo;
use crate::store::Order;

/// Every discovered trait: type -> name -> frame identifier.
///
/// Built once from the document's top-level frames and append-only afterwards.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Catalog {
    layers: BTreeMap<TraitType, BTreeMap<TraitName, TraitId>>,
}

/// Result of scanning a document for trait frames.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Scan {
    /// No frame follows the `trait#<type>#<name>` convention.
    Empty,
    /// Catalog plus trait types in first-encounter order.
    Found { catalog: Catalog, order: Order },
}

impl Catalog {
    /// Scan document children for trait frames.
    ///
    /// Two frames sharing a `(type, name)` pair resolve to the last one scanned.
    #[tracing::instrument(skip(children), fields(children = children.len()))]
    pub fn scan(children: &[NodeInfo]) -> Scan {
        let mut catalog = Catalog::default();
        let mut order = Vec::new();

        for node in children.iter().filter(|n| n.is_frame()) {
            let Some(tag) = TraitTag::parse(&node.name) else {
                continue;
            };
            if !catalog.layers.contains_key(&tag.ty) {
                order.push(tag.ty.clone());
            }
            if let Some(previous) = catalog.insert(tag.ty.clone(), tag.name.clone(), node.id.clone())
            {
                tracing::warn!(
                    trait_type = %tag.ty,
                    trait_name = %tag.name,
                    previous = %previous,
                    replacement = %node.id,
                    "duplicate trait frame, keeping the last one"
                );
            }
        }

        if order.is_empty() {
            tracing::info!("no trait frames found");
            return Scan::Empty;
        }

        tracing::debug!(types = order.len(), "trait catalog built");
        Scan::Found {
            catalog,
            order: Order::new(order),
        }
    }

    /// Insert `(ty, name) -> id`, returning the identifier it replaced.
    pub fn insert(&mut self, ty: TraitType, name: TraitName, id: TraitId) -> Option<TraitId> {
        self.layers.entry(ty).or_default().insert(name, id)
    }

    pub fn contains_type(&self, ty: &TraitType) -> bool {
        self.layers.contains_key(ty)
    }

    pub fn traits(&self, ty: &TraitType) -> Option<&BTreeMap<TraitName, TraitId>> {
        self.layers.get(ty)
    }

    pub fn types(&self) -> impl Iterator<Item = &TraitType> {
        self.layers.keys()
    }

    /// Reverse lookup of the trait name registered for `id` under `ty`.
    pub fn name_of(&self, ty: &TraitType, id: &TraitId) -> Option<&TraitName> {
        self.layers
            .get(ty)?
            .iter()
            .find_map(|(name, candidate)| (candidate == id).then_some(name))
    }

    pub fn len(&self) -> usize {
        self.layers.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

#[cfg(test)]
#[path = "../tests/unit/catalog.rs"]
mod tests;
