//! Document snapshots and the operations producing them.
//!
//! A [`Document`] is never mutated once handed out: every operation returns a
//! new snapshot sharing all untouched layers, rows and palettes with `self`.
//! An operation that fails returns the error and no snapshot.

use std::{collections::BTreeMap, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::{
    CharRef, Color, Cpix, EngineError, Grid, Lane, Layer, LayerId, LayerProperties, LayerUpdate, Palette, PaletteEntry, PatchCell, Result, grid_size,
};

pub const DEFAULT_HBLOCKS: usize = 3;
pub const DEFAULT_VBLOCKS: usize = 3;
pub const DEFAULT_PPB: u32 = 128;

/// Font indices live in the top byte of a char reference.
pub const MAX_FONTS: usize = 256;

/// Partial document properties; `None` keeps the current (or default) value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hblocks: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vblocks: Option<usize>,
    /// Pixels per block, only used by renderers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ppb: Option<u32>,
}

impl DocumentProperties {
    pub fn blocks(hblocks: usize, vblocks: usize) -> Self {
        Self {
            hblocks: Some(hblocks),
            vblocks: Some(vblocks),
            ..Default::default()
        }
    }
}

/// Palette edit.
///
/// * no index, a value: store the value unless present
/// * index and value: overwrite the slot
/// * index, no value: free the slot and erase every cell using it
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaletteUpdate {
    Char { index: Option<u8>, value: Option<CharRef> },
    Color { index: Option<u8>, value: Option<Color> },
}

/// A cell with its palette indices looked up.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResolvedCell {
    pub ch: Option<CharRef>,
    pub fg: Option<Color>,
    pub bg: Option<Color>,
}

impl ResolvedCell {
    pub fn glyph(&self) -> Option<(CharRef, Color)> {
        self.ch.zip(self.fg)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub name: String,
    hblocks: usize,
    vblocks: usize,
    ppb: u32,
    char_palette: Arc<Palette<CharRef>>,
    color_palette: Arc<Palette<Color>>,
    layers: BTreeMap<LayerId, Arc<Layer>>,
    /// Index = font id used in char references. Removed fonts stay as `None`.
    fonts: Vec<Option<String>>,
    brushes: Vec<Grid>,
    next_layer_id: u64,
    created: bool,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            name: String::new(),
            hblocks: DEFAULT_HBLOCKS,
            vblocks: DEFAULT_VBLOCKS,
            ppb: DEFAULT_PPB,
            char_palette: Arc::new(Palette::new()),
            color_palette: Arc::new(Palette::new()),
            layers: BTreeMap::new(),
            fonts: vec![None],
            brushes: Vec::new(),
            next_layer_id: 0,
            created: false,
        }
    }
}

impl Document {
    /// A fresh document with seeded palettes and no layers.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidDimensions`] for zero block counts or ppb.
    pub fn create(properties: &DocumentProperties) -> Result<Document> {
        let doc = Document {
            name: properties.name.clone().unwrap_or_default(),
            hblocks: properties.hblocks.unwrap_or(DEFAULT_HBLOCKS),
            vblocks: properties.vblocks.unwrap_or(DEFAULT_VBLOCKS),
            ppb: properties.ppb.unwrap_or(DEFAULT_PPB),
            color_palette: Arc::new(Palette::default_colors()),
            created: true,
            ..Default::default()
        };
        doc.check_dimensions()?;
        log::debug!("created document {}x{} blocks, ppb {}", doc.hblocks, doc.vblocks, doc.ppb);
        Ok(doc)
    }

    pub fn is_created(&self) -> bool {
        self.created
    }

    pub fn hblocks(&self) -> usize {
        self.hblocks
    }

    pub fn vblocks(&self) -> usize {
        self.vblocks
    }

    pub fn ppb(&self) -> u32 {
        self.ppb
    }

    pub fn char_palette(&self) -> &Arc<Palette<CharRef>> {
        &self.char_palette
    }

    pub fn color_palette(&self) -> &Arc<Palette<Color>> {
        &self.color_palette
    }

    pub fn fonts(&self) -> &[Option<String>] {
        &self.fonts
    }

    pub fn font_index(&self, name: &str) -> Option<u8> {
        self.fonts.iter().position(|f| f.as_deref() == Some(name)).map(|i| i as u8)
    }

    pub fn brushes(&self) -> &[Grid] {
        &self.brushes
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn layers(&self) -> impl Iterator<Item = (LayerId, &Layer)> {
        self.layers.iter().map(|(id, layer)| (*id, layer.as_ref()))
    }

    /// Layers bottom to top.
    pub fn layers_by_index(&self) -> Vec<(LayerId, &Layer)> {
        let mut layers: Vec<_> = self.layers().collect();
        layers.sort_by_key(|(_, layer)| layer.index);
        layers
    }

    pub fn layer(&self, id: LayerId) -> Result<&Layer> {
        self.layers.get(&id).map(AsRef::as_ref).ok_or(EngineError::InvalidLayer { id })
    }

    /// Shared handle of a layer, for identity checks between snapshots.
    pub fn layer_handle(&self, id: LayerId) -> Option<&Arc<Layer>> {
        self.layers.get(&id)
    }

    pub fn cell(&self, id: LayerId, x: usize, y: usize) -> Result<Option<Cpix>> {
        Ok(self.layer(id)?.grid().get(x, y))
    }

    pub fn resolve(&self, cpix: Cpix) -> ResolvedCell {
        let lookup_color = |index: u8| if index == 0 { None } else { self.color_palette.get(index).copied() };
        ResolvedCell {
            ch: if cpix.ch() == 0 { None } else { self.char_palette.get(cpix.ch()).copied() },
            fg: lookup_color(cpix.fg()),
            bg: lookup_color(cpix.bg()),
        }
    }

    pub fn copy_region(&self, id: LayerId, x: usize, y: usize, width: usize, height: usize) -> Result<Vec<Vec<Cpix>>> {
        Ok(self.layer(id)?.grid().copy_region(x, y, width, height))
    }

    // =========================================================================
    // Document operations
    // =========================================================================

    /// Merges `properties`; changed block counts resize every layer grid.
    /// `None` if every property keeps its value.
    pub fn update_document(&self, properties: &DocumentProperties) -> Result<Option<Document>> {
        let name = properties.name.as_ref().unwrap_or(&self.name);
        let hblocks = properties.hblocks.unwrap_or(self.hblocks);
        let vblocks = properties.vblocks.unwrap_or(self.vblocks);
        let ppb = properties.ppb.unwrap_or(self.ppb);
        if *name == self.name && hblocks == self.hblocks && vblocks == self.vblocks && ppb == self.ppb {
            return Ok(None);
        }

        let mut doc = self.clone();
        doc.name.clone_from(name);
        doc.hblocks = hblocks;
        doc.vblocks = vblocks;
        doc.ppb = ppb;
        doc.check_dimensions()?;

        if doc.hblocks != self.hblocks || doc.vblocks != self.vblocks {
            for layer in doc.layers.values_mut() {
                Arc::make_mut(layer).fit_grid(doc.hblocks, doc.vblocks)?;
            }
            log::debug!("document resized to {}x{} blocks", doc.hblocks, doc.vblocks);
        }
        Ok(Some(doc))
    }

    // =========================================================================
    // Layer operations
    // =========================================================================

    /// Adds a layer on top of the stack.
    pub fn create_layer(&self, update: &LayerUpdate) -> Result<(Document, LayerId)> {
        let index = self.layers.len();
        let defaults = LayerProperties {
            title: format!("Layer #{index}"),
            ..Default::default()
        };
        let layer = Layer::new(update.apply_to(&defaults), index, self.hblocks, self.vblocks)?;

        let mut doc = self.clone();
        let id = doc.allocate_layer_id();
        doc.layers.insert(id, Arc::new(layer));
        log::debug!("created layer {id} at index {index}");
        Ok((doc, id))
    }

    /// Copies a layer directly above the original.
    pub fn duplicate_layer(&self, id: LayerId) -> Result<(Document, LayerId)> {
        let source = self.layer(id)?;
        // grids are persistent, sharing rows is a full copy
        let mut copy = source.clone();
        copy.index = source.index + 1;
        copy.properties.title = format!("Duplicated {}", source.title());

        let mut doc = self.clone();
        for layer in doc.layers.values_mut() {
            if layer.index >= copy.index {
                Arc::make_mut(layer).index += 1;
            }
        }
        let new_id = doc.allocate_layer_id();
        doc.layers.insert(new_id, Arc::new(copy));
        log::debug!("duplicated layer {id} as {new_id}");
        Ok((doc, new_id))
    }

    /// Moves a layer to stack position `target`. `None` if already there.
    pub fn move_layer(&self, id: LayerId, target: usize) -> Result<Option<Document>> {
        let from = self.layer(id)?.index;
        if target >= self.layers.len() {
            return Err(EngineError::InvalidStackIndex {
                index: target,
                len: self.layers.len(),
            });
        }
        if from == target {
            return Ok(None);
        }

        let mut doc = self.clone();
        for (layer_id, layer) in &mut doc.layers {
            let index = layer.index;
            if *layer_id == id {
                Arc::make_mut(layer).index = target;
            } else if target < from && (target..from).contains(&index) {
                Arc::make_mut(layer).index += 1;
            } else if target > from && (from + 1..=target).contains(&index) {
                Arc::make_mut(layer).index -= 1;
            }
        }
        log::debug!("moved layer {id} from {from} to {target}");
        Ok(Some(doc))
    }

    pub fn delete_layer(&self, id: LayerId) -> Result<Document> {
        let deleted = self.layer(id)?.index;
        let mut doc = self.clone();
        doc.layers.remove(&id);
        for layer in doc.layers.values_mut() {
            if layer.index > deleted {
                Arc::make_mut(layer).index -= 1;
            }
        }
        log::debug!("deleted layer {id}");
        Ok(doc)
    }

    /// Merges `update` into the layer properties. `None` if nothing changes.
    pub fn update_layer(&self, id: LayerId, update: &LayerUpdate) -> Result<Option<Document>> {
        let current = self.layer(id)?;
        if update.apply_to(&current.properties) == current.properties {
            return Ok(None);
        }
        let layer = current.updated(update, self.hblocks, self.vblocks)?;
        let mut doc = self.clone();
        doc.layers.insert(id, Arc::new(layer));
        Ok(Some(doc))
    }

    // =========================================================================
    // Palette operations
    // =========================================================================

    /// `None` if the edit changes nothing.
    ///
    /// # Errors
    ///
    /// * [`EngineError::ProtectedSlot`] for index 0
    /// * [`EngineError::InvalidPaletteEdit`] for a clear without index
    /// * [`EngineError::PaletteExhausted`] if a new value finds no slot
    pub fn update_palette(&self, update: &PaletteUpdate) -> Result<Option<Document>> {
        let mut doc = self.clone();
        let changed = match update {
            PaletteUpdate::Char { index, value } => {
                let cleared = edit_palette(Arc::make_mut(&mut doc.char_palette), *index, *value)?;
                if let Some(index) = cleared {
                    let count = doc.rewrite_cells(|c| if c.ch() == index { Cpix::new(0, 0, c.bg()) } else { c });
                    log::debug!("removed char slot {index}, {count} cells erased");
                    true
                } else {
                    doc.char_palette != self.char_palette
                }
            }
            PaletteUpdate::Color { index, value } => {
                let cleared = edit_palette(Arc::make_mut(&mut doc.color_palette), *index, *value)?;
                if let Some(index) = cleared {
                    let count = doc.rewrite_cells(|c| without_color(c, index));
                    log::debug!("removed color slot {index}, {count} cells erased");
                    true
                } else {
                    doc.color_palette != self.color_palette
                }
            }
        };
        Ok(changed.then_some(doc))
    }

    // =========================================================================
    // Paint operations
    // =========================================================================

    /// Writes palette values with the top-left patch cell at `(x0, y0)`.
    /// New values are added to the palettes. `None` if nothing changed.
    ///
    /// # Errors
    ///
    /// [`EngineError::PaletteExhausted`] rejects the whole patch.
    pub fn paint(&self, id: LayerId, x0: i32, y0: i32, patch: &[Vec<PatchCell>]) -> Result<Option<Document>> {
        let layer = self.layer(id)?;
        let mut chars = (*self.char_palette).clone();
        let mut colors = (*self.color_palette).clone();

        let grid = layer.grid().write_region(x0, y0, patch, |current, cell| {
            let ch = resolve_lane(&cell.ch, current.ch(), &mut chars)?;
            let fg = resolve_lane(&cell.fg, current.fg(), &mut colors)?;
            let bg = resolve_lane(&cell.bg, current.bg(), &mut colors)?;
            Ok(Cpix::new(ch, fg, bg))
        })?;

        let grid_changed = !grid.ptr_eq(layer.grid());
        let chars_changed = chars != *self.char_palette;
        let colors_changed = colors != *self.color_palette;
        if !grid_changed && !chars_changed && !colors_changed {
            return Ok(None);
        }

        let mut doc = self.clone();
        if chars_changed {
            doc.char_palette = Arc::new(chars);
        }
        if colors_changed {
            doc.color_palette = Arc::new(colors);
        }
        if grid_changed {
            doc.replace_grid(id, grid);
        }
        Ok(Some(doc))
    }

    /// Writes already resolved cells. Indices of unassigned slots are written as 0.
    pub fn paint_raw(&self, id: LayerId, x0: i32, y0: i32, cells: &[Vec<Cpix>]) -> Result<Option<Document>> {
        let layer = self.layer(id)?;
        let grid = layer.grid().write_region(x0, y0, cells, |_, cpix| Ok(self.sanitize(*cpix)))?;
        if grid.ptr_eq(layer.grid()) {
            return Ok(None);
        }
        let mut doc = self.clone();
        doc.replace_grid(id, grid);
        Ok(Some(doc))
    }

    /// Clears every lane inside the rectangle spanned by both corners,
    /// clipped to the layer grid.
    pub fn erase(&self, id: LayerId, from: (i32, i32), to: (i32, i32)) -> Result<Option<Document>> {
        let grid = self.layer(id)?.grid();
        let clip = |a: i32, b: i32, len: usize| {
            let lo = i64::from(a.min(b)).max(0);
            let hi = i64::from(a.max(b)).min(len as i64 - 1);
            (lo <= hi).then_some((lo as usize, (hi - lo + 1) as usize))
        };
        let (Some((x0, width)), Some((y0, height))) = (clip(from.0, to.0, grid.width()), clip(from.1, to.1, grid.height())) else {
            return Ok(None);
        };
        let patch = vec![vec![PatchCell::erase(); width]; height];
        self.paint(id, x0 as i32, y0 as i32, &patch)
    }

    // =========================================================================
    // Fonts
    // =========================================================================

    /// Registers a font and returns its index. Known fonts keep their index
    /// and produce no new snapshot.
    pub fn add_font(&self, name: &str) -> Result<(Option<Document>, u8)> {
        if let Some(index) = self.font_index(name) {
            return Ok((None, index));
        }
        if self.fonts.len() >= MAX_FONTS {
            return Err(EngineError::FontRegistryFull { capacity: MAX_FONTS });
        }
        let mut doc = self.clone();
        doc.fonts.push(Some(name.to_string()));
        let index = (doc.fonts.len() - 1) as u8;
        log::debug!("registered font '{name}' as {index}");
        Ok((Some(doc), index))
    }

    /// Unregisters a font, freeing every char slot using it and erasing the
    /// glyphs of cells referencing those slots.
    pub fn remove_font(&self, name: &str) -> Result<Document> {
        let font = self.font_index(name).ok_or_else(|| EngineError::UnknownFont { name: name.to_string() })?;

        let mut doc = self.clone();
        let mut removed = [false; crate::PALETTE_SIZE];
        let freed: Vec<u8> = self.char_palette.iter().filter(|(_, ch)| ch.font() == font).map(|(i, _)| i).collect();
        if !freed.is_empty() {
            let chars = Arc::make_mut(&mut doc.char_palette);
            for index in &freed {
                chars.clear(*index)?;
                removed[*index as usize] = true;
            }
            doc.rewrite_cells(|c| if removed[c.ch() as usize] { Cpix::new(0, 0, c.bg()) } else { c });
        }
        doc.fonts[font as usize] = None;
        log::debug!("removed font '{name}', {} char slots freed", freed.len());
        Ok(doc)
    }

    // =========================================================================
    // Brushes
    // =========================================================================

    pub fn add_brush(&self, cells: Vec<Vec<Cpix>>) -> Result<(Document, usize)> {
        let grid = Grid::from_rows(cells)?;
        if grid.width() == 0 || grid.height() == 0 {
            return Err(EngineError::dimensions("brush needs at least one cell"));
        }
        let (grid, _) = grid.map_cells(|c| self.sanitize(c));
        let mut doc = self.clone();
        doc.brushes.push(grid);
        Ok((doc, self.brushes.len()))
    }

    pub fn remove_brush(&self, index: usize) -> Result<Document> {
        self.check_brush(index)?;
        let mut doc = self.clone();
        doc.brushes.remove(index);
        Ok(doc)
    }

    pub fn stamp_brush(&self, id: LayerId, brush: usize, x0: i32, y0: i32) -> Result<Option<Document>> {
        self.check_brush(brush)?;
        self.paint_raw(id, x0, y0, &self.brushes[brush].to_rows())
    }

    // =========================================================================
    // Invariants
    // =========================================================================

    /// Checks the structural invariants. Used after loading project data.
    ///
    /// # Errors
    ///
    /// * [`EngineError::GeometryMismatch`] for a grid of the wrong size
    /// * [`EngineError::InvalidStackIndex`] if stack indices aren't `0..n`
    /// * [`EngineError::InvalidPaletteSlot`] for a cell using an unassigned slot
    pub fn validate(&self) -> Result<()> {
        self.check_dimensions()?;
        let mut seen = vec![false; self.layers.len()];
        for (id, layer) in self.layers() {
            if !layer.has_expected_size(self.hblocks, self.vblocks) {
                return Err(EngineError::geometry(format!(
                    "layer {id} grid is {}x{}",
                    layer.grid().width(),
                    layer.grid().height()
                )));
            }
            match seen.get_mut(layer.index) {
                Some(slot) if !*slot => *slot = true,
                _ => {
                    return Err(EngineError::InvalidStackIndex {
                        index: layer.index,
                        len: self.layers.len(),
                    });
                }
            }
            if id.0 >= self.next_layer_id {
                return Err(EngineError::InvalidLayer { id });
            }
        }
        let grids = self.layers.values().map(|l| l.grid()).chain(self.brushes.iter());
        for grid in grids {
            for (_, _, cpix) in grid.cells() {
                self.check_references(cpix)?;
            }
        }
        Ok(())
    }

    fn check_references(&self, cpix: Cpix) -> Result<()> {
        let [ch, fg, bg] = cpix.lanes();
        if ch != 0 && !self.char_palette.is_assigned(ch) {
            return Err(EngineError::InvalidPaletteSlot {
                kind: CharRef::KIND,
                index: ch as usize,
            });
        }
        for index in [fg, bg] {
            if index != 0 && !self.color_palette.is_assigned(index) {
                return Err(EngineError::InvalidPaletteSlot {
                    kind: Color::KIND,
                    index: index as usize,
                });
            }
        }
        Ok(())
    }

    fn check_dimensions(&self) -> Result<()> {
        if self.hblocks == 0 || self.vblocks == 0 || self.ppb == 0 {
            return Err(EngineError::dimensions(format!(
                "document needs hblocks, vblocks and ppb >= 1 ({}x{}, ppb {})",
                self.hblocks, self.vblocks, self.ppb
            )));
        }
        // the smallest layer geometry has to fit
        grid_size(self.hblocks, self.vblocks, 1, 1)?;
        Ok(())
    }

    fn check_brush(&self, index: usize) -> Result<()> {
        if index >= self.brushes.len() {
            return Err(EngineError::InvalidBrush {
                index,
                len: self.brushes.len(),
            });
        }
        Ok(())
    }

    fn allocate_layer_id(&mut self) -> LayerId {
        let id = LayerId(self.next_layer_id);
        self.next_layer_id += 1;
        id
    }

    fn replace_grid(&mut self, id: LayerId, grid: Grid) {
        if let Some(layer) = self.layers.get_mut(&id) {
            Arc::make_mut(layer).set_grid(grid);
        }
    }

    /// Zeroes lanes that point to unassigned slots.
    fn sanitize(&self, cpix: Cpix) -> Cpix {
        let [ch, fg, bg] = cpix.lanes();
        let live_color = |index: u8| if self.color_palette.is_assigned(index) { index } else { 0 };
        let ch = if self.char_palette.is_assigned(ch) { ch } else { 0 };
        Cpix::new(ch, live_color(fg), live_color(bg))
    }

    /// Rewrites cells of all layers and brushes. Returns the number of changed cells.
    fn rewrite_cells<F: Fn(Cpix) -> Cpix>(&mut self, f: F) -> usize {
        let mut total = 0;
        for layer in self.layers.values_mut() {
            let (grid, count) = layer.grid().map_cells(&f);
            if count > 0 {
                Arc::make_mut(layer).set_grid(grid);
                total += count;
            }
        }
        for brush in &mut self.brushes {
            let (grid, count) = brush.map_cells(&f);
            if count > 0 {
                *brush = grid;
                total += count;
            }
        }
        total
    }
}

/// Applies a palette edit. Returns the slot index if a slot was freed.
fn edit_palette<T: PaletteEntry>(palette: &mut Palette<T>, index: Option<u8>, value: Option<T>) -> Result<Option<u8>> {
    if index == Some(0) {
        return Err(EngineError::ProtectedSlot { kind: T::KIND });
    }
    match (index, value) {
        (None, Some(value)) => {
            palette.ensure(value)?;
            Ok(None)
        }
        (Some(index), Some(value)) => {
            palette.set(index, value)?;
            Ok(None)
        }
        (Some(index), None) => Ok(palette.clear(index)?.then_some(index)),
        (None, None) => Err(EngineError::palette_edit(format!("removing a {} needs a slot index", T::KIND))),
    }
}

fn resolve_lane<T: PaletteEntry>(lane: &Lane<T>, current: u8, palette: &mut Palette<T>) -> Result<u8> {
    match lane {
        Lane::Keep => Ok(current),
        Lane::Clear => Ok(0),
        Lane::Set(value) => palette.ensure(value.clone()),
    }
}

/// A removed foreground takes the glyph with it, a removed background only itself.
fn without_color(cpix: Cpix, index: u8) -> Cpix {
    let [mut ch, mut fg, mut bg] = cpix.lanes();
    if fg != index && bg != index {
        return cpix;
    }
    if fg == index {
        ch = 0;
        fg = 0;
    }
    if bg == index {
        bg = 0;
    }
    Cpix::new(ch, fg, bg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_without_color() {
        assert_eq!(Cpix::new(0, 0, 3), without_color(Cpix::new(4, 2, 3), 2));
        assert_eq!(Cpix::new(4, 2, 0), without_color(Cpix::new(4, 2, 3), 3));
        assert_eq!(Cpix::EMPTY, without_color(Cpix::new(4, 3, 3), 3));
        assert_eq!(Cpix::new(4, 2, 1), without_color(Cpix::new(4, 2, 1), 3));
    }

    #[test]
    fn test_edit_palette_rules() {
        let mut palette = Palette::default_colors();
        assert!(matches!(
            edit_palette(&mut palette, Some(0), Some(Color::WHITE)),
            Err(EngineError::ProtectedSlot { .. })
        ));
        assert!(edit_palette(&mut palette, None, None).is_err());
        assert_eq!(None, edit_palette(&mut palette, None, Some(Color::new(1, 1, 1))).unwrap());
        assert_eq!(Some(3), edit_palette(&mut palette, Some(3), None).unwrap());
        assert_eq!(None, edit_palette(&mut palette, Some(3), None).unwrap());
    }

    #[test]
    fn test_default_document_is_not_created() {
        let doc = Document::default();
        assert!(!doc.is_created());
        assert!(Document::create(&DocumentProperties::default()).unwrap().is_created());
    }
}
