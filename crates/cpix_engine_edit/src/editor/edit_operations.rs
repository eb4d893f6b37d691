#![allow(clippy::missing_errors_doc)]
use cpix_engine::{Cpix, LayerId, PatchCell};

use super::{Applied, EditState, Result};

impl EditState {
    pub fn paint(&mut self, layer: LayerId, x: i32, y: i32, cells: &[Vec<PatchCell>]) -> Result<Applied> {
        let next = self.document.paint(layer, x, y, cells)?;
        Ok(self.commit(format!("Paint on layer {layer}"), next))
    }

    pub fn paint_raw(&mut self, layer: LayerId, x: i32, y: i32, cells: &[Vec<Cpix>]) -> Result<Applied> {
        let next = self.document.paint_raw(layer, x, y, cells)?;
        Ok(self.commit(format!("Paint on layer {layer}"), next))
    }

    pub fn erase(&mut self, layer: LayerId, from: (i32, i32), to: (i32, i32)) -> Result<Applied> {
        let next = self.document.erase(layer, from, to)?;
        Ok(self.commit(format!("Erase on layer {layer}"), next))
    }

    /// Registers a font and returns its index.
    pub fn add_font(&mut self, name: &str) -> Result<(Applied, u8)> {
        let (next, index) = self.document.add_font(name)?;
        Ok((self.commit(format!("Add font '{name}'"), next), index))
    }

    pub fn remove_font(&mut self, name: &str) -> Result<Applied> {
        let next = self.document.remove_font(name)?;
        Ok(self.commit(format!("Remove font '{name}'"), Some(next)))
    }

    /// Stores a brush and returns its index.
    pub fn add_brush(&mut self, cells: Vec<Vec<Cpix>>) -> Result<usize> {
        let (next, index) = self.document.add_brush(cells)?;
        self.commit("Add brush", Some(next));
        Ok(index)
    }

    /// Stores a region of a layer as brush.
    pub fn brush_from_region(&mut self, layer: LayerId, x: usize, y: usize, width: usize, height: usize) -> Result<usize> {
        let cells = self.document.copy_region(layer, x, y, width, height)?;
        self.add_brush(cells)
    }

    pub fn remove_brush(&mut self, index: usize) -> Result<Applied> {
        let next = self.document.remove_brush(index)?;
        Ok(self.commit(format!("Remove brush {index}"), Some(next)))
    }

    pub fn stamp_brush(&mut self, layer: LayerId, brush: usize, x: i32, y: i32) -> Result<Applied> {
        let next = self.document.stamp_brush(layer, brush, x, y)?;
        Ok(self.commit(format!("Stamp brush {brush} on layer {layer}"), next))
    }
}
