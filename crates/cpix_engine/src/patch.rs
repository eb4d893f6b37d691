//! Paint patches: per cell, per lane "keep", "clear" or "set".

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{CharRef, Color};

/// One lane of a patch cell.
///
/// In serialized form an omitted field is [`Lane::Keep`], `null` is
/// [`Lane::Clear`] and a value is [`Lane::Set`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Lane<T> {
    #[default]
    Keep,
    Clear,
    Set(T),
}

impl<T> Lane<T> {
    pub fn is_keep(&self) -> bool {
        matches!(self, Lane::Keep)
    }
}

impl<T> From<Option<T>> for Lane<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Lane::Set(value),
            None => Lane::Clear,
        }
    }
}

impl<T: Serialize> Serialize for Lane<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Lane::Set(value) => serializer.serialize_some(value),
            // Keep is skipped by the containing struct
            Lane::Keep | Lane::Clear => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Lane<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Option::<T>::deserialize(deserializer)?.into())
    }
}

/// A cell of a [`crate::Document::paint`] patch, holding palette values.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchCell {
    #[serde(default, skip_serializing_if = "Lane::is_keep")]
    pub ch: Lane<CharRef>,
    #[serde(default, skip_serializing_if = "Lane::is_keep")]
    pub fg: Lane<Color>,
    #[serde(default, skip_serializing_if = "Lane::is_keep")]
    pub bg: Lane<Color>,
}

impl PatchCell {
    pub fn new(ch: CharRef, fg: Color, bg: Option<Color>) -> Self {
        Self {
            ch: Lane::Set(ch),
            fg: Lane::Set(fg),
            bg: bg.into(),
        }
    }

    /// Clears all three lanes.
    pub fn erase() -> Self {
        Self {
            ch: Lane::Clear,
            fg: Lane::Clear,
            bg: Lane::Clear,
        }
    }

    pub fn with_ch(mut self, ch: impl Into<Lane<CharRef>>) -> Self {
        self.ch = ch.into();
        self
    }

    pub fn with_fg(mut self, fg: impl Into<Lane<Color>>) -> Self {
        self.fg = fg.into();
        self
    }

    pub fn with_bg(mut self, bg: impl Into<Lane<Color>>) -> Self {
        self.bg = bg.into();
        self
    }
}
