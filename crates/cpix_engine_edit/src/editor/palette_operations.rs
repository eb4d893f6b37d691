#![allow(clippy::missing_errors_doc)]
use cpix_engine::{CharRef, Color, PaletteUpdate};

use super::{Applied, EditState, Operation, Result};

impl EditState {
    pub fn update_palette(&mut self, update: &PaletteUpdate) -> Result<Applied> {
        let next = self.document.update_palette(update)?;
        let description = Operation::UpdatePalette { update: update.clone() }.description();
        Ok(self.commit(description, next))
    }

    /// Stores `color` unless present and returns its slot.
    pub fn ensure_color(&mut self, color: Color) -> Result<u8> {
        self.update_palette(&PaletteUpdate::Color {
            index: None,
            value: Some(color),
        })?;
        Ok(self.document.color_palette().position(&color).unwrap_or_default())
    }

    pub fn ensure_char(&mut self, ch: CharRef) -> Result<u8> {
        self.update_palette(&PaletteUpdate::Char { index: None, value: Some(ch) })?;
        Ok(self.document.char_palette().position(&ch).unwrap_or_default())
    }

    pub fn replace_color(&mut self, index: u8, color: Color) -> Result<Applied> {
        self.update_palette(&PaletteUpdate::Color {
            index: Some(index),
            value: Some(color),
        })
    }

    pub fn remove_color(&mut self, index: u8) -> Result<Applied> {
        self.update_palette(&PaletteUpdate::Color { index: Some(index), value: None })
    }

    pub fn remove_char(&mut self, index: u8) -> Result<Applied> {
        self.update_palette(&PaletteUpdate::Char { index: Some(index), value: None })
    }
}
