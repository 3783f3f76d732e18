use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::foundation::core::TraitId;
use crate::foundation::error::{WorkbenchError, WorkbenchResult};
use crate::host::{
    ClientStorage, Document, EditorKind, NodeInfo, NodeKind, Notification, Panel, UiUpdate,
    WindowOptions,
};

/// One node of an in-memory document, with the SVG markup its export produces.
#[derive(Clone, Debug)]
pub struct MemoryNode {
    pub info: NodeInfo,
    /// Export result; `None` makes exporting this node fail.
    pub svg: Option<String>,
}

impl MemoryNode {
    pub fn frame(id: &str, name: &str, svg: impl Into<String>) -> Self {
        Self {
            info: NodeInfo {
                id: TraitId::new(id),
                name: name.to_string(),
                kind: NodeKind::Frame,
            },
            svg: Some(svg.into()),
        }
    }

    pub fn with_kind(mut self, kind: NodeKind) -> Self {
        self.info.kind = kind;
        self
    }

    pub fn without_export(mut self) -> Self {
        self.svg = None;
        self
    }
}

/// Everything the in-memory host sent towards the operator, in emission order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Posted {
    ShowUi(WindowOptions),
    Update(UiUpdate),
    Notify(Notification),
    Close,
}

/// Host implementation backed by plain data, optionally persisting storage to a JSON file.
#[derive(Debug, Default)]
pub struct MemoryHost {
    editor: EditorKind,
    nodes: Vec<MemoryNode>,
    selection: Vec<TraitId>,
    storage: BTreeMap<String, Vec<String>>,
    storage_path: Option<PathBuf>,
    posted: Vec<Posted>,
    viewport: Vec<TraitId>,
    closed: bool,
}

impl MemoryHost {
    pub fn new(nodes: Vec<MemoryNode>) -> Self {
        Self {
            nodes,
            ..Self::default()
        }
    }

    pub fn with_editor(mut self, editor: EditorKind) -> Self {
        self.editor = editor;
        self
    }

    pub fn with_stored_list(mut self, key: &str, value: Vec<String>) -> Self {
        self.storage.insert(key.to_string(), value);
        self
    }

    /// Back client storage with a JSON file. Existing content is loaded; every write rewrites it.
    pub fn with_storage_file(mut self, path: impl Into<PathBuf>) -> WorkbenchResult<Self> {
        let path = path.into();
        if path.exists() {
            let bytes = std::fs::read(&path)
                .with_context(|| format!("read storage file '{}'", path.display()))?;
            self.storage = serde_json::from_slice(&bytes)?;
        }
        self.storage_path = Some(path);
        Ok(self)
    }

    /// Build a host from a document file (see [`DocumentFile`]).
    pub fn from_document_file(path: &Path) -> WorkbenchResult<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read document '{}'", path.display()))?;
        let doc: DocumentFile = serde_json::from_slice(&bytes)?;
        let root = path.parent().unwrap_or_else(|| Path::new("."));
        doc.into_host(root)
    }

    /// Simulate the operator selecting `ids` on the canvas. Unknown ids are dropped.
    pub fn select(&mut self, ids: &[&str]) -> Vec<NodeInfo> {
        self.selection = ids
            .iter()
            .map(|id| TraitId::new(*id))
            .filter(|id| self.find(id).is_some())
            .collect();
        self.selection()
    }

    pub fn posted(&self) -> &[Posted] {
        &self.posted
    }

    pub fn drain_posted(&mut self) -> Vec<Posted> {
        std::mem::take(&mut self.posted)
    }

    /// UI patches posted so far.
    pub fn updates(&self) -> impl Iterator<Item = &UiUpdate> {
        self.posted.iter().filter_map(|p| match p {
            Posted::Update(u) => Some(u),
            _ => None,
        })
    }

    /// Markup of the most recent patch aimed at `selector`.
    pub fn last_update_for(&self, selector: &str) -> Option<&str> {
        self.updates()
            .filter(|u| u.selector == selector)
            .last()
            .map(|u| u.html.as_str())
    }

    pub fn notifications(&self) -> impl Iterator<Item = &Notification> {
        self.posted.iter().filter_map(|p| match p {
            Posted::Notify(n) => Some(n),
            _ => None,
        })
    }

    pub fn stored_list(&self, key: &str) -> Option<&[String]> {
        self.storage.get(key).map(Vec::as_slice)
    }

    /// Nodes scrolled into view, oldest first.
    pub fn viewport_history(&self) -> &[TraitId] {
        &self.viewport
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn find(&self, id: &TraitId) -> Option<&MemoryNode> {
        self.nodes.iter().find(|n| &n.info.id == id)
    }

    fn persist(&self) -> WorkbenchResult<()> {
        let Some(path) = &self.storage_path else {
            return Ok(());
        };
        let json = serde_json::to_vec_pretty(&self.storage)?;
        std::fs::write(path, json)
            .map_err(|e| WorkbenchError::storage(format!("write '{}': {e}", path.display())))
    }
}

impl Document for MemoryHost {
    fn editor_kind(&self) -> EditorKind {
        self.editor
    }

    fn children(&self) -> Vec<NodeInfo> {
        self.nodes.iter().map(|n| n.info.clone()).collect()
    }

    fn node(&self, id: &TraitId) -> Option<NodeInfo> {
        self.find(id).map(|n| n.info.clone())
    }

    async fn export_svg(&self, id: &TraitId) -> WorkbenchResult<Vec<u8>> {
        let node = self
            .find(id)
            .ok_or_else(|| WorkbenchError::export(format!("node '{id}' not found")))?;
        node.svg
            .as_ref()
            .map(|svg| svg.as_bytes().to_vec())
            .ok_or_else(|| WorkbenchError::export(format!("node '{id}' cannot be exported")))
    }

    fn scroll_into_view(&mut self, node: &NodeInfo) {
        self.viewport.push(node.id.clone());
    }

    fn selection(&self) -> Vec<NodeInfo> {
        self.selection
            .iter()
            .filter_map(|id| self.node(id))
            .collect()
    }

    fn set_selection(&mut self, nodes: Vec<NodeInfo>) {
        self.selection = nodes.into_iter().map(|n| n.id).collect();
    }
}

impl ClientStorage for MemoryHost {
    async fn get_list(&self, key: &str) -> WorkbenchResult<Option<Vec<String>>> {
        Ok(self.storage.get(key).cloned())
    }

    async fn set_list(&mut self, key: &str, value: Vec<String>) -> WorkbenchResult<()> {
        self.storage.insert(key.to_string(), value);
        self.persist()
    }
}

impl Panel for MemoryHost {
    fn show_ui(&mut self, opts: &WindowOptions) {
        self.posted.push(Posted::ShowUi(opts.clone()));
    }

    fn post(&mut self, update: UiUpdate) {
        self.posted.push(Posted::Update(update));
    }

    fn notify(&mut self, notification: Notification) {
        self.posted.push(Posted::Notify(notification));
    }

    fn close(&mut self) {
        self.closed = true;
        self.posted.push(Posted::Close);
    }
}

/// On-disk description of a document for the headless host.
///
/// ```json
/// {"editor": "design", "children": [
///   {"id": "1:2", "name": "trait#bg#red", "kind": "frame", "svg_path": "bg/red.svg"}
/// ]}
/// ```
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct DocumentFile {
    #[serde(default)]
    pub editor: EditorKind,
    pub children: Vec<DocumentNode>,
}

/// One node entry of a [`DocumentFile`]. `svg` wins over `svg_path` when both are set.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct DocumentNode {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub svg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub svg_path: Option<String>,
}

impl DocumentFile {
    /// Resolve every node's markup (reading `svg_path` relative to `root`) into a host.
    pub fn into_host(self, root: &Path) -> WorkbenchResult<MemoryHost> {
        let mut nodes = Vec::with_capacity(self.children.len());
        for child in self.children {
            let svg = match (child.svg, child.svg_path) {
                (Some(svg), _) => Some(svg),
                (None, Some(rel)) => {
                    let rel = normalize_rel_path(&rel)?;
                    let full = root.join(&rel);
                    let svg = std::fs::read_to_string(&full)
                        .with_context(|| format!("read svg '{}'", full.display()))?;
                    Some(svg)
                }
                (None, None) => None,
            };
            nodes.push(MemoryNode {
                info: NodeInfo {
                    id: TraitId::new(child.id),
                    name: child.name,
                    kind: child.kind,
                },
                svg,
            });
        }
        Ok(MemoryHost::new(nodes).with_editor(self.editor))
    }
}

/// Normalize a document-relative path to forward slashes, rejecting absolute paths and `..`.
pub fn normalize_rel_path(source: &str) -> WorkbenchResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(WorkbenchError::validation(format!(
            "svg path must be relative: '{source}'"
        )));
    }

    let mut parts = Vec::new();
    for part in s.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                return Err(WorkbenchError::validation(format!(
                    "svg path must not contain '..': '{source}'"
                )));
            }
            p => parts.push(p),
        }
    }
    if parts.is_empty() {
        return Err(WorkbenchError::validation("svg path must not be empty"));
    }
    Ok(parts.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/host/memory.rs"]
mod tests;
