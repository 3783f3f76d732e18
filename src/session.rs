//! The workbench session: owns the trait store and routes host events and panel commands.
//!
//! A [`Workbench`] is built once per plugin run and every handler takes `&mut self`, so events are
//! processed strictly one after another. Each handler awaits its own re-render before returning,
//! which means a driver feeding events in arrival order never lets an older composite overwrite a
//! newer one.

use crate::catalog::{Catalog, Scan};
use crate::command::{Command, Message};
use crate::compose::{self, Composite};
use crate::config::WorkbenchConfig;
use crate::foundation::core::{NONE_LABEL, TraitId, TraitType};
use crate::foundation::error::WorkbenchResult;
use crate::host::{EditorKind, Host, Notification};
use crate::persist::{OrderPersistence, SaveOutcome};
use crate::selection::{ReplaceRejection, ReplaceState, SelectionController, SelectionOutcome};
use crate::store::{Order, TraitStore};
use crate::ui;

const EXIT_MESSAGE: &str = "👋 Exiting workbench";

/// How [`Workbench::start`] ended.
pub enum Startup<H: Host> {
    /// Traits were found; the session is ready for events.
    Running(Workbench<H>),
    /// The document has no trait frames. The empty state was shown and no handlers exist.
    NoTraits(H),
    /// The host editor is not a design document; the session was closed.
    Unsupported(H),
}

/// A running workbench session.
pub struct Workbench<H: Host> {
    host: H,
    config: WorkbenchConfig,
    store: TraitStore,
    selection: SelectionController,
    orders: OrderPersistence,
    closed: bool,
}

impl<H: Host> Workbench<H> {
    /// Open the panel, scan the document, restore the first saved order and render.
    pub async fn start(mut host: H, config: WorkbenchConfig) -> WorkbenchResult<Startup<H>> {
        if host.editor_kind() != EditorKind::Design {
            exit(
                &mut host,
                Some("This plugin is only available in design files, not whiteboards!"),
            );
            return Ok(Startup::Unsupported(host));
        }

        host.show_ui(&config.window);

        let Scan::Found { catalog, order } = Catalog::scan(&host.children()) else {
            host.post(ui::empty_state());
            return Ok(Startup::NoTraits(host));
        };

        let mut wb = Self {
            store: TraitStore::new(catalog, order, config.seed),
            orders: OrderPersistence::new(config.storage_key.clone()),
            selection: SelectionController::default(),
            closed: false,
            host,
            config,
        };
        tracing::info!(
            types = wb.store.order().len(),
            traits = wb.store.catalog().len(),
            "workbench started"
        );

        wb.host.post(ui::layers(wb.store.order(), &Default::default()));
        wb.refresh_saved_orders().await?;
        wb.restore_saved_order().await?;
        wb.render().await?;
        Ok(Startup::Running(wb))
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    pub fn store(&self) -> &TraitStore {
        &self.store
    }

    pub fn config(&self) -> &WorkbenchConfig {
        &self.config
    }

    pub fn replace_state(&self) -> &ReplaceState {
        self.selection.state()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Decode and dispatch a panel message. Unknown or malformed messages are logged and dropped.
    pub async fn handle_message(&mut self, msg: Message) -> WorkbenchResult<()> {
        match Command::try_from(msg) {
            Ok(cmd) => self.handle_command(cmd).await,
            Err(e) => {
                tracing::warn!("dropping panel message: {e}");
                Ok(())
            }
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn handle_command(&mut self, cmd: Command) -> WorkbenchResult<()> {
        if self.closed {
            tracing::debug!("session closed, ignoring command");
            return Ok(());
        }

        match cmd {
            Command::Close => {
                exit(&mut self.host, None);
                self.closed = true;
            }
            Command::ViewFrame(id) => self.view_frame(&id),
            Command::UpdateOrder(types) => {
                self.store.set_order(types);
                self.render().await?;
            }
            Command::Randomize => {
                self.store.randomize_all();
                self.render().await?;
            }
            Command::ClearCanvas => self.clear_canvas(),
            Command::SaveOrder => self.save_order().await?,
            Command::DeleteOrder(saved) => {
                self.orders.delete(&mut self.host, &saved).await?;
                self.refresh_saved_orders().await?;
            }
            Command::ReplaceTrait(layer) => self.begin_replace(layer),
            Command::RandomizeTrait(layer) => {
                self.store.randomize_one(&layer)?;
                self.render().await?;
            }
            Command::DeleteTrait(layer) => {
                self.store.delete_one(&layer);
                self.render().await?;
            }
        }
        Ok(())
    }

    /// React to the host's selection-change event, reading the current canvas selection.
    #[tracing::instrument(skip(self))]
    pub async fn handle_selection_change(&mut self) -> WorkbenchResult<()> {
        if self.closed {
            return Ok(());
        }

        let selected = self.host.selection();
        match self
            .selection
            .on_selection_changed(&mut self.store, &selected)
        {
            SelectionOutcome::ReplaceRejected { layer, reason } => {
                let message = match reason {
                    ReplaceRejection::NoFrame => "No frame selected".to_string(),
                    ReplaceRejection::WrongLayer => {
                        format!("Selected frame is not a {layer} trait")
                    }
                };
                tracing::info!(layer = %layer, ?reason, "replacement abandoned");
                self.notify_error(message);
                Ok(())
            }
            outcome => {
                tracing::debug!(?outcome, "selection applied");
                self.render().await.map(|_| ())
            }
        }
    }

    /// Export the current selection and patch the panel with the result.
    ///
    /// An export failure is shown to the operator and returned; the panel keeps its previous
    /// composite.
    pub async fn render(&mut self) -> WorkbenchResult<Composite> {
        let composite =
            match compose::render(&self.host, self.store.order(), self.store.selection()).await {
                Ok(c) => c,
                Err(e) => {
                    tracing::error!("render failed: {e}");
                    self.notify_error(format!("Could not render traits: {e}"));
                    return Err(e);
                }
            };

        self.host
            .post(ui::layers(self.store.order(), &composite.labels));
        for update in ui::display(&composite.markup) {
            self.host.post(update);
        }
        for layer in &composite.layers {
            let label = composite
                .labels
                .get(&layer.ty)
                .map(String::as_str)
                .unwrap_or_default();
            self.host.post(ui::label(&layer.ty, label));
            self.host.post(ui::view_control(&layer.ty, &layer.id));
        }
        Ok(composite)
    }

    /// Rasterize the current composite at the configured preview size.
    pub async fn preview(&mut self) -> WorkbenchResult<image::RgbaImage> {
        let composite = self.render().await?;
        let size = self.config.preview;
        compose::rasterize(&composite, size.width, size.height)
    }

    fn view_frame(&mut self, id: &TraitId) {
        match self.host.node(id) {
            Some(node) => self.host.scroll_into_view(&node),
            None => tracing::debug!(id = %id, "view-frame target not found"),
        }
    }

    fn clear_canvas(&mut self) {
        self.store.clear();
        for update in ui::display("") {
            self.host.post(update);
        }
        for ty in self.store.order() {
            self.host.post(ui::reset_controls(ty));
            self.host.post(ui::label(ty, NONE_LABEL));
        }
    }

    async fn save_order(&mut self) -> WorkbenchResult<()> {
        match self.orders.save(&mut self.host, self.store.order()).await? {
            SaveOutcome::Saved(_) => self.refresh_saved_orders().await,
            SaveOutcome::Duplicate(_) => {
                self.notify_error("Order is already saved locally");
                Ok(())
            }
            SaveOutcome::EmptyOrder => {
                self.notify_error("There is no order to save");
                Ok(())
            }
        }
    }

    fn begin_replace(&mut self, layer: TraitType) {
        if !self.store.order().contains(&layer) {
            tracing::warn!(layer = %layer, "replace-trait for a layer outside the order");
            return;
        }

        self.host.set_selection(Vec::new());
        if let Some(previous) = self.selection.begin_replace(layer.clone()) {
            tracing::debug!(previous = %previous, "pending replacement superseded");
        }
        self.host.notify(Notification::info(format!(
            "Next frame you select will replace {layer} currently selected"
        )));
    }

    async fn refresh_saved_orders(&mut self) -> WorkbenchResult<()> {
        let orders = self.orders.list(&self.host).await?;
        self.host.post(ui::saved_orders(&orders));
        Ok(())
    }

    async fn restore_saved_order(&mut self) -> WorkbenchResult<()> {
        let Some(saved) = self.orders.most_recent(&self.host).await? else {
            return Ok(());
        };

        let order = Order::parse_saved(&saved);
        if !order.iter().any(|ty| self.store.catalog().contains_type(ty)) {
            tracing::warn!(order = %saved, "saved order names no known layer, keeping discovery order");
            return Ok(());
        }

        self.host
            .notify(Notification::info(format!("Loading saved order: {saved}")));
        self.store.set_order(order.as_slice().to_vec());
        Ok(())
    }

    fn notify_error(&mut self, message: impl Into<String>) {
        self.host.notify(
            Notification::error(message).with_timeout(self.config.error_timeout_ms),
        );
    }
}

fn exit<H: Host>(host: &mut H, reason: Option<&str>) {
    let message = match reason {
        Some(reason) => format!("{EXIT_MESSAGE}\n({reason})"),
        None => EXIT_MESSAGE.to_string(),
    };
    tracing::warn!("{message}");
    host.notify(Notification::info(message));
    host.close();
}

#[cfg(test)]
#[path = "../tests/unit/session.rs"]
mod tests;
