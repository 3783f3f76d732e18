use std::fmt;

/// Name prefix that marks a frame as a trait.
pub const TRAIT_PREFIX: &str = "trait#";
/// Separator between the segments of a trait frame name.
pub const TRAIT_SEPARATOR: char = '#';
/// Reserved trait name meaning "nothing selected for this layer" (matched case-insensitively).
pub const NONE_TRAIT: &str = "none";
/// Label displayed for a layer without a selection.
pub const NONE_LABEL: &str = "None";

/// Layer/category key that groups traits (e.g. `background`, `eyes`).
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct TraitType(pub String);

/// One selectable option within a trait type.
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct TraitName(pub String);

/// Opaque, host-assigned identifier of a rendered frame.
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct TraitId(pub String);

macro_rules! string_newtype {
    ($ty:ident) => {
        impl $ty {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $ty {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

string_newtype!(TraitType);
string_newtype!(TraitName);
string_newtype!(TraitId);

impl TraitName {
    /// Whether this is the reserved `none` sentinel.
    pub fn is_none(&self) -> bool {
        self.0.eq_ignore_ascii_case(NONE_TRAIT)
    }
}

/// Type and name parsed from a `trait#<type>#<name>` frame name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TraitTag {
    pub ty: TraitType,
    pub name: TraitName,
}

impl TraitTag {
    /// Parse a frame display name. Returns `None` unless the name carries the trait prefix and
    /// non-empty type and name segments. Segments past the name are ignored.
    pub fn parse(frame_name: &str) -> Option<Self> {
        let rest = frame_name.strip_prefix(TRAIT_PREFIX)?;
        let mut segments = rest.split(TRAIT_SEPARATOR);
        let ty = segments.next().filter(|s| !s.is_empty())?;
        let name = segments.next().filter(|s| !s.is_empty())?;
        Some(Self {
            ty: TraitType::new(ty),
            name: TraitName::new(name),
        })
    }

    /// Resolve what choosing the frame `id` carrying this tag means for its layer.
    pub fn choice(&self, id: TraitId) -> TraitChoice {
        TraitChoice::resolve(&self.name, id)
    }
}

/// Outcome of choosing a trait for a layer, with the `none` sentinel resolved once.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TraitChoice {
    /// The `none` trait: the layer ends up without a selection.
    Empty,
    /// A regular trait frame.
    Frame(TraitId),
}

impl TraitChoice {
    pub fn resolve(name: &TraitName, id: TraitId) -> Self {
        if name.is_none() {
            Self::Empty
        } else {
            Self::Frame(id)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
