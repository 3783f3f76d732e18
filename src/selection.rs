use crate::foundation::core::{TraitChoice, TraitTag, TraitType};
use crate::host::NodeInfo;
use crate::store::TraitStore;

/// Whether the next canvas selection is an ordinary pick or answers a replace-trait request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ReplaceState {
    #[default]
    Idle,
    /// The next selection event replaces the trait of this layer, then the state returns to idle.
    AwaitingReplacement(TraitType),
}

/// Why a pending replacement was abandoned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReplaceRejection {
    /// The selection was empty or its first node is not a frame.
    NoFrame,
    /// The first selected frame is not a trait of the layer being replaced.
    WrongLayer,
}

/// What a selection event did to the store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// Ordinary event; `changed` trait frames were applied.
    Applied { changed: usize },
    /// A pending replacement was committed for this layer.
    Replaced(TraitType),
    /// A pending replacement was abandoned without touching the store.
    ReplaceRejected {
        layer: TraitType,
        reason: ReplaceRejection,
    },
}

impl SelectionOutcome {
    /// Whether the store may have changed and the composite needs a re-render.
    pub fn needs_render(&self) -> bool {
        !matches!(self, Self::ReplaceRejected { .. })
    }
}

/// Maps canvas selection events onto the [`TraitStore`].
#[derive(Debug, Default)]
pub struct SelectionController {
    state: ReplaceState,
}

impl SelectionController {
    pub fn state(&self) -> &ReplaceState {
        &self.state
    }

    /// Arm replace mode for `layer`. A replacement that was already pending is superseded and
    /// returned.
    pub fn begin_replace(&mut self, layer: TraitType) -> Option<TraitType> {
        match std::mem::replace(&mut self.state, ReplaceState::AwaitingReplacement(layer)) {
            ReplaceState::Idle => None,
            ReplaceState::AwaitingReplacement(previous) => Some(previous),
        }
    }

    /// Handle one selection-change event. Replace mode is single-shot: whatever this event
    /// contains, the controller is idle afterwards.
    pub fn on_selection_changed(
        &mut self,
        store: &mut TraitStore,
        selected: &[NodeInfo],
    ) -> SelectionOutcome {
        match std::mem::take(&mut self.state) {
            ReplaceState::Idle => Self::apply_batch(store, selected),
            ReplaceState::AwaitingReplacement(layer) => Self::replace(store, layer, selected),
        }
    }

    fn apply_batch(store: &mut TraitStore, selected: &[NodeInfo]) -> SelectionOutcome {
        let mut changed = 0;
        for node in selected.iter().filter(|n| n.is_frame()) {
            let Some(tag) = TraitTag::parse(&node.name) else {
                continue;
            };
            if store.choose(&tag.ty, tag.choice(node.id.clone())) {
                changed += 1;
            }
        }
        SelectionOutcome::Applied { changed }
    }

    fn replace(store: &mut TraitStore, layer: TraitType, selected: &[NodeInfo]) -> SelectionOutcome {
        let Some(frame) = selected.first().filter(|n| n.is_frame()) else {
            return SelectionOutcome::ReplaceRejected {
                layer,
                reason: ReplaceRejection::NoFrame,
            };
        };

        let choice = store
            .catalog()
            .name_of(&layer, &frame.id)
            .map(|name| TraitChoice::resolve(name, frame.id.clone()));
        let committed = match choice {
            Some(choice) => store.choose(&layer, choice),
            None => false,
        };
        if !committed {
            return SelectionOutcome::ReplaceRejected {
                layer,
                reason: ReplaceRejection::WrongLayer,
            };
        }

        tracing::debug!(layer = %layer, id = %frame.id, "trait replaced");
        SelectionOutcome::Replaced(layer)
    }
}

#[cfg(test)]
#[path = "../tests/unit/selection.rs"]
mod tests;
