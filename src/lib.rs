//! A workbench for generative art built from layered traits.
//!
//! Trait artwork lives in a host design document as frames named `trait#<type>#<name>`. The
//! workbench discovers them, lets an operator pick one trait per type (by hand on the canvas or at
//! random), and stacks the picks into a single composite image.
//!
//! # Pipeline overview
//!
//! 1. **Scan**: document children -> [`Catalog`] + initial [`Order`]
//! 2. **Select**: canvas events and panel commands mutate the [`TraitStore`]
//! 3. **Compose**: `Order + Selection -> Composite` by exporting and stacking SVG fragments
//! 4. **Patch**: targeted `ui-update` messages refresh the panel
//!
//! The host (document, panel, storage) is abstracted behind the traits in [`host`];
//! [`MemoryHost`] implements them in-process for the headless binary and the tests.
#![forbid(unsafe_code)]

mod foundation;

pub mod catalog;
pub mod command;
pub mod compose;
pub mod config;
pub mod host;
pub mod persist;
pub mod selection;
pub mod session;
pub mod store;
pub mod ui;

pub use catalog::{Catalog, Scan};
pub use command::{Command, CommandError, Message, OrderField};
pub use compose::{ComposedLayer, Composite, RENDER_HINTS, decorate_svg, rasterize, render};
pub use config::{PreviewSize, WorkbenchConfig};
pub use foundation::core::{
    NONE_LABEL, NONE_TRAIT, TRAIT_PREFIX, TraitChoice, TraitId, TraitName, TraitTag, TraitType,
};
pub use foundation::error::{WorkbenchError, WorkbenchResult};
pub use host::{
    ClientStorage, Document, DocumentFile, EditorKind, Host, MemoryHost, MemoryNode, NodeInfo,
    NodeKind, Notification, Panel, Posted, UiUpdate, WindowOptions,
};
pub use persist::{OrderPersistence, SaveOutcome};
pub use selection::{ReplaceRejection, ReplaceState, SelectionController, SelectionOutcome};
pub use session::{Startup, Workbench};
pub use store::{Order, Selection, TraitStore};
