//! Fixed capacity slot tables for chars and colors.
//!
//! Slot 0 is a permanent sentinel meaning "nothing". Every other slot is
//! either unused or holds a value, and a value is held by at most one slot
//! as long as it only enters the table through [`Palette::ensure`].

use std::fmt::Display;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{CharRef, Color, EngineError, Result};

/// Number of slots of every palette. A cpix lane is one byte wide.
pub const PALETTE_SIZE: usize = 256;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaletteKind {
    Char,
    Color,
}

impl Display for PaletteKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaletteKind::Char => write!(f, "char"),
            PaletteKind::Color => write!(f, "color"),
        }
    }
}

/// Values that can live in a palette.
pub trait PaletteEntry: Clone + PartialEq {
    const KIND: PaletteKind;
}

impl PaletteEntry for CharRef {
    const KIND: PaletteKind = PaletteKind::Char;
}

impl PaletteEntry for Color {
    const KIND: PaletteKind = PaletteKind::Color;
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Slot<T> {
    /// The slot 0 sentinel.
    Empty,
    Unused,
    Assigned(T),
}

impl<T> Slot<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Slot::Assigned(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_unused(&self) -> bool {
        matches!(self, Slot::Unused)
    }
}

/// Bitset of unused slots; lowest set bit is the next allocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct FreeSlots([u64; PALETTE_SIZE / 64]);

impl FreeSlots {
    fn all_but_sentinel() -> Self {
        let mut words = [u64::MAX; PALETTE_SIZE / 64];
        words[0] &= !1;
        FreeSlots(words)
    }

    fn none() -> Self {
        FreeSlots([0; PALETTE_SIZE / 64])
    }

    fn insert(&mut self, index: usize) {
        self.0[index / 64] |= 1u64 << (index % 64);
    }

    fn remove(&mut self, index: usize) {
        self.0[index / 64] &= !(1u64 << (index % 64));
    }

    fn lowest(&self) -> Option<usize> {
        self.0
            .iter()
            .enumerate()
            .find(|(_, word)| **word != 0)
            .map(|(i, word)| i * 64 + word.trailing_zeros() as usize)
    }

    fn count(&self) -> usize {
        self.0.iter().map(|word| word.count_ones() as usize).sum()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Palette<T> {
    slots: Vec<Slot<T>>,
    free: FreeSlots,
}

impl<T: PaletteEntry> Default for Palette<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PaletteEntry> Palette<T> {
    pub fn new() -> Self {
        let mut slots = vec![Slot::Unused; PALETTE_SIZE];
        slots[0] = Slot::Empty;
        Self {
            slots,
            free: FreeSlots::all_but_sentinel(),
        }
    }

    /// Creates a palette with `values` in slots 1, 2, ...
    pub fn with_values(values: impl IntoIterator<Item = T>) -> Result<Self> {
        let mut palette = Self::new();
        for value in values {
            palette.ensure(value)?;
        }
        Ok(palette)
    }

    /// Rebuilds a palette from serialized slots.
    ///
    /// # Errors
    ///
    /// Fails if the slot count is wrong or the sentinel is misplaced.
    pub fn from_slots(slots: Vec<Slot<T>>) -> Result<Self> {
        if slots.len() != PALETTE_SIZE {
            return Err(EngineError::palette_edit(format!(
                "{} palette needs {PALETTE_SIZE} slots, got {}",
                T::KIND,
                slots.len()
            )));
        }
        let mut free = FreeSlots::none();
        for (i, slot) in slots.iter().enumerate() {
            match (i, slot) {
                (0, Slot::Empty) | (1.., Slot::Assigned(_)) => {}
                (1.., Slot::Unused) => free.insert(i),
                _ => {
                    return Err(EngineError::palette_edit(format!("{} palette slot {i} has an invalid state", T::KIND)));
                }
            }
        }
        Ok(Self { slots, free })
    }

    pub fn kind(&self) -> PaletteKind {
        T::KIND
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of assigned slots, the sentinel excluded.
    pub fn len(&self) -> usize {
        self.capacity() - 1 - self.free.count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn slots(&self) -> &[Slot<T>] {
        &self.slots
    }

    pub fn get(&self, index: u8) -> Option<&T> {
        self.slots.get(index as usize).and_then(Slot::value)
    }

    pub fn is_assigned(&self, index: u8) -> bool {
        self.get(index).is_some()
    }

    pub fn position(&self, value: &T) -> Option<u8> {
        self.slots.iter().position(|slot| slot.value() == Some(value)).map(|i| i as u8)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, &T)> {
        self.slots.iter().enumerate().filter_map(|(i, slot)| slot.value().map(|v| (i as u8, v)))
    }

    /// Returns the slot already holding `value`, or stores it in the lowest
    /// unused slot.
    ///
    /// # Errors
    ///
    /// [`EngineError::PaletteExhausted`] if `value` is new and no slot is free.
    pub fn ensure(&mut self, value: T) -> Result<u8> {
        if let Some(index) = self.position(&value) {
            return Ok(index);
        }
        let Some(index) = self.free.lowest() else {
            return Err(EngineError::PaletteExhausted {
                kind: T::KIND,
                capacity: self.capacity(),
            });
        };
        self.slots[index] = Slot::Assigned(value);
        self.free.remove(index);
        Ok(index as u8)
    }

    /// Overwrites a slot without looking for duplicates.
    /// Returns false if the slot already held `value`.
    pub fn set(&mut self, index: u8, value: T) -> Result<bool> {
        let index = self.check_index(index)?;
        if self.slots[index].value() == Some(&value) {
            return Ok(false);
        }
        self.slots[index] = Slot::Assigned(value);
        self.free.remove(index);
        Ok(true)
    }

    /// Frees a slot. Returns false if it was already unused.
    ///
    /// Cells still referencing the slot must be rewritten by the caller.
    pub fn clear(&mut self, index: u8) -> Result<bool> {
        let index = self.check_index(index)?;
        if self.slots[index].is_unused() {
            return Ok(false);
        }
        self.slots[index] = Slot::Unused;
        self.free.insert(index);
        Ok(true)
    }

    /// Slots whose content differs from `other`.
    pub fn changed_slots(&self, other: &Palette<T>) -> Vec<u8> {
        self.slots
            .iter()
            .zip(other.slots.iter())
            .enumerate()
            .filter(|(_, (a, b))| a != b)
            .map(|(i, _)| i as u8)
            .collect()
    }

    fn check_index(&self, index: u8) -> Result<usize> {
        let index = index as usize;
        if index == 0 {
            return Err(EngineError::ProtectedSlot { kind: T::KIND });
        }
        if index >= self.slots.len() {
            return Err(EngineError::InvalidPaletteSlot { kind: T::KIND, index });
        }
        Ok(index)
    }
}

impl Palette<Color> {
    /// The default color palette: white and black after the sentinel.
    pub fn default_colors() -> Self {
        let mut palette = Self::new();
        palette.slots[1] = Slot::Assigned(Color::WHITE);
        palette.slots[2] = Slot::Assigned(Color::BLACK);
        palette.free.remove(1);
        palette.free.remove(2);
        palette
    }
}

impl<T: Serialize> Serialize for Palette<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.slots.serialize(serializer)
    }
}

impl<'de, T: PaletteEntry + Deserialize<'de>> Deserialize<'de> for Palette<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let slots = Vec::<Slot<T>>::deserialize(deserializer)?;
        Palette::from_slots(slots).map_err(serde::de::Error::custom)
    }
}
