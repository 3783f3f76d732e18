//! Collaborators provided by the design tool hosting the workbench.
//!
//! The workbench never talks to a document, a panel or a storage backend directly. It goes through
//! the traits below, which a host integration implements. [`MemoryHost`] is the in-process
//! implementation used by the headless binary and the tests.
//!
//! All handlers run on one logical thread; the async methods are suspension points only, so none
//! of the traits require `Send`.
#![allow(async_fn_in_trait)]

pub mod memory;

pub use memory::{DocumentFile, MemoryHost, MemoryNode, Posted};

use crate::foundation::core::TraitId;
use crate::foundation::error::WorkbenchResult;

/// Kind of editor the workbench was launched in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorKind {
    /// Design document; the only editor the workbench supports.
    #[default]
    Design,
    /// Whiteboard document.
    Whiteboard,
    /// Anything else reported by the host.
    #[serde(other)]
    Other,
}

/// Node type as reported by the host document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    #[default]
    Frame,
    Group,
    Component,
    Text,
    #[serde(other)]
    Other,
}

/// Snapshot of one document node.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct NodeInfo {
    pub id: TraitId,
    pub name: String,
    #[serde(default)]
    pub kind: NodeKind,
}

impl NodeInfo {
    pub fn is_frame(&self) -> bool {
        self.kind == NodeKind::Frame
    }
}

/// Panel options passed to [`Panel::show_ui`].
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct WindowOptions {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub theme_colors: bool,
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            title: "Generative Art Workbench".to_string(),
            width: 500,
            height: 800,
            theme_colors: true,
        }
    }
}

/// Transient message shown to the operator.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Notification {
    pub message: String,
    #[serde(default)]
    pub error: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error: false,
            timeout_ms: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error: true,
            timeout_ms: None,
        }
    }

    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }
}

/// Targeted patch for the panel: replace the markup of `selector` with `html`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename = "ui-update")]
pub struct UiUpdate {
    pub selector: String,
    pub html: String,
}

impl UiUpdate {
    pub fn new(selector: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            html: html.into(),
        }
    }
}

/// Document model, node lookup, image export, viewport and selection control.
pub trait Document {
    fn editor_kind(&self) -> EditorKind;

    /// Current top-level children of the page, in document order.
    fn children(&self) -> Vec<NodeInfo>;

    fn node(&self, id: &TraitId) -> Option<NodeInfo>;

    /// Export the contents of node `id` as SVG markup bytes.
    async fn export_svg(&self, id: &TraitId) -> WorkbenchResult<Vec<u8>>;

    fn scroll_into_view(&mut self, node: &NodeInfo);

    fn selection(&self) -> Vec<NodeInfo>;

    fn set_selection(&mut self, nodes: Vec<NodeInfo>);
}

/// Durable key-value storage scoped to the plugin and host user.
pub trait ClientStorage {
    async fn get_list(&self, key: &str) -> WorkbenchResult<Option<Vec<String>>>;

    async fn set_list(&mut self, key: &str, value: Vec<String>) -> WorkbenchResult<()>;
}

/// Operator-facing surface: the panel plus transient notifications.
pub trait Panel {
    fn show_ui(&mut self, opts: &WindowOptions);

    fn post(&mut self, update: UiUpdate);

    fn notify(&mut self, notification: Notification);

    /// Terminate the plugin session.
    fn close(&mut self);
}

/// Everything a [`crate::Workbench`] session needs from its host.
pub trait Host: Document + ClientStorage + Panel {}

impl<T: Document + ClientStorage + Panel> Host for T {}
