use crate::foundation::error::WorkbenchResult;
use crate::host::ClientStorage;
use crate::store::Order;

/// Storage key holding the saved orders unless configured otherwise.
pub const DEFAULT_ORDERS_KEY: &str = "orders";

/// Result of [`OrderPersistence::save`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The order was appended under its saved form.
    Saved(String),
    /// Nothing to save.
    EmptyOrder,
    /// The exact same order string is already stored.
    Duplicate(String),
}

/// Named orderings of trait types kept in durable client storage, oldest first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderPersistence {
    key: String,
}

impl Default for OrderPersistence {
    fn default() -> Self {
        Self::new(DEFAULT_ORDERS_KEY)
    }
}

impl OrderPersistence {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Saved orders as stored; empty when nothing was ever saved.
    pub async fn list<S: ClientStorage>(&self, storage: &S) -> WorkbenchResult<Vec<String>> {
        Ok(storage.get_list(&self.key).await?.unwrap_or_default())
    }

    /// Append `order` unless it is empty or already stored.
    pub async fn save<S: ClientStorage>(
        &self,
        storage: &mut S,
        order: &Order,
    ) -> WorkbenchResult<SaveOutcome> {
        if order.is_empty() {
            return Ok(SaveOutcome::EmptyOrder);
        }

        let saved = order.to_saved();
        let mut orders = self.list(storage).await?;
        if orders.contains(&saved) {
            return Ok(SaveOutcome::Duplicate(saved));
        }

        orders.push(saved.clone());
        storage.set_list(&self.key, orders).await?;
        tracing::info!(order = %saved, "order saved");
        Ok(SaveOutcome::Saved(saved))
    }

    /// Remove every stored entry equal to `saved`. Returns whether storage changed.
    pub async fn delete<S: ClientStorage>(
        &self,
        storage: &mut S,
        saved: &str,
    ) -> WorkbenchResult<bool> {
        let Some(orders) = storage.get_list(&self.key).await? else {
            return Ok(false);
        };

        let before = orders.len();
        let kept: Vec<String> = orders.into_iter().filter(|o| o != saved).collect();
        if kept.len() == before {
            return Ok(false);
        }

        storage.set_list(&self.key, kept).await?;
        tracing::info!(order = %saved, "order deleted");
        Ok(true)
    }

    /// The order restored at startup: the first stored entry, if any.
    pub async fn most_recent<S: ClientStorage>(&self, storage: &S) -> WorkbenchResult<Option<String>> {
        Ok(self.list(storage).await?.into_iter().next())
    }
}

#[cfg(test)]
#[path = "../tests/unit/persist.rs"]
mod tests;
