use crate::foundation::core::{TraitId, TraitType};
use crate::store::Order;

/// Raw message posted by the panel.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Message {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<OrderField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer: Option<String>,
}

/// The `order` payload: a list of trait types, or the comma-joined saved form.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum OrderField {
    List(Vec<String>),
    Saved(String),
}

impl OrderField {
    fn into_types(self) -> Vec<TraitType> {
        match self {
            Self::List(types) => types.into_iter().map(TraitType::new).collect(),
            Self::Saved(saved) => Order::parse_saved(&saved).as_slice().to_vec(),
        }
    }

    fn into_saved(self) -> String {
        match self {
            Self::List(types) => types.join(","),
            Self::Saved(saved) => saved,
        }
    }
}

/// Operator command with its payload validated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Close,
    ViewFrame(TraitId),
    UpdateOrder(Vec<TraitType>),
    Randomize,
    ClearCanvas,
    SaveOrder,
    DeleteOrder(String),
    ReplaceTrait(TraitType),
    RandomizeTrait(TraitType),
    DeleteTrait(TraitType),
}

/// Why a [`Message`] could not become a [`Command`].
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("can't handle \"{0}\" type messages")]
    UnknownType(String),

    #[error("\"{command}\" message is missing `{field}`")]
    MissingField {
        command: &'static str,
        field: &'static str,
    },
}

impl TryFrom<Message> for Command {
    type Error = CommandError;

    fn try_from(msg: Message) -> Result<Self, Self::Error> {
        fn required<T>(
            value: Option<T>,
            command: &'static str,
            field: &'static str,
        ) -> Result<T, CommandError> {
            value.ok_or(CommandError::MissingField { command, field })
        }

        let Message {
            kind,
            id,
            order,
            layer,
        } = msg;
        let id = id.filter(|s| !s.is_empty());
        let layer = layer.filter(|s| !s.is_empty()).map(TraitType::new);

        Ok(match kind.as_str() {
            "close" => Self::Close,
            "view-frame" => Self::ViewFrame(TraitId::new(required(id, "view-frame", "id")?)),
            "update-order" => {
                Self::UpdateOrder(required(order, "update-order", "order")?.into_types())
            }
            "randomize" => Self::Randomize,
            "clear-canvas" => Self::ClearCanvas,
            "save-order" => Self::SaveOrder,
            "delete-order" => {
                let saved = required(order, "delete-order", "order")?.into_saved();
                if saved.is_empty() {
                    return Err(CommandError::MissingField {
                        command: "delete-order",
                        field: "order",
                    });
                }
                Self::DeleteOrder(saved)
            }
            "replace-trait" => Self::ReplaceTrait(required(layer, "replace-trait", "layer")?),
            "randomize-trait" => Self::RandomizeTrait(required(layer, "randomize-trait", "layer")?),
            "delete-trait" => Self::DeleteTrait(required(layer, "delete-trait", "layer")?),
            _ => return Err(CommandError::UnknownType(kind)),
        })
    }
}

#[cfg(test)]
#[path = "../tests/unit/command.rs"]
mod tests;
