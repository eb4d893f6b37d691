//! Redraw work between two document snapshots.
//!
//! The diff relies on snapshot identity: a grid, row or palette that is the
//! same allocation in both snapshots is unchanged and isn't scanned.

use std::sync::Arc;

use bitflags::bitflags;

use crate::{Cpix, Document, Grid, Layer, LayerId, PALETTE_SIZE, Palette, PaletteEntry, ResolvedCell, Result};

bitflags! {
    /// What differs between two views of one layer.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct LayerChanges: u8 {
        /// Cell size or grid dimensions changed; nothing can be reused.
        const GEOMETRY = 1 << 0;
        const GRID = 1 << 1;
        const CHAR_PALETTE = 1 << 2;
        const COLOR_PALETTE = 1 << 3;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiffAction {
    /// Clear the whole layer surface.
    CleanAll,
    Clean { x: usize, y: usize },
    Draw { x: usize, y: usize, cpix: Cpix, cell: ResolvedCell },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DiffStats {
    pub rows_skipped: usize,
    pub cells_scanned: usize,
    pub cleaned: usize,
    pub drawn: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LayerDiff {
    pub changes: LayerChanges,
    pub actions: Vec<DiffAction>,
    pub stats: DiffStats,
}

impl LayerDiff {
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    fn clean(&mut self, x: usize, y: usize) {
        self.actions.push(DiffAction::Clean { x, y });
        self.stats.cleaned += 1;
    }

    fn draw_if_visible(&mut self, doc: &Document, x: usize, y: usize, cpix: Cpix) {
        if cpix.is_visible() {
            self.actions.push(DiffAction::Draw {
                x,
                y,
                cpix,
                cell: doc.resolve(cpix),
            });
            self.stats.drawn += 1;
        }
    }
}

/// Everything the rendering of one layer depends on.
#[derive(Clone, Copy, Debug)]
pub struct LayerView<'a> {
    doc: &'a Document,
    layer: &'a Layer,
}

impl<'a> LayerView<'a> {
    pub fn new(doc: &'a Document, id: LayerId) -> Result<Self> {
        Ok(Self { doc, layer: doc.layer(id)? })
    }

    pub fn grid(&self) -> &'a Grid {
        self.layer.grid()
    }

    fn geometry(&self) -> (usize, usize, u32, u32, u32, usize, usize) {
        let p = &self.layer.properties;
        (p.resolution, p.cpc, p.text_margin, p.text_weight, self.doc.ppb(), self.doc.hblocks(), self.doc.vblocks())
    }

    pub fn changes(&self, prev: &LayerView<'_>) -> LayerChanges {
        let mut changes = LayerChanges::empty();
        let grid = self.grid();
        if self.geometry() != prev.geometry() || grid.width() != prev.grid().width() || grid.height() != prev.grid().height() {
            changes |= LayerChanges::GEOMETRY;
        }
        if !grid.ptr_eq(prev.grid()) {
            changes |= LayerChanges::GRID;
        }
        if !Arc::ptr_eq(self.doc.char_palette(), prev.doc.char_palette()) {
            changes |= LayerChanges::CHAR_PALETTE;
        }
        if !Arc::ptr_eq(self.doc.color_palette(), prev.doc.color_palette()) {
            changes |= LayerChanges::COLOR_PALETTE;
        }
        changes
    }
}

/// Clears the surface and draws every visible cell.
pub fn redraw_grid(doc: &Document, grid: &Grid) -> LayerDiff {
    let mut diff = LayerDiff {
        changes: LayerChanges::GEOMETRY,
        ..Default::default()
    };
    diff.actions.push(DiffAction::CleanAll);
    for (x, y, cpix) in grid.cells() {
        diff.stats.cells_scanned += 1;
        diff.draw_if_visible(doc, x, y, cpix);
    }
    diff
}

/// Cleans every cell whose packed value differs and draws it if visible.
/// Rows shared between both grids are skipped.
pub fn diff_grids(doc: &Document, prev: &Grid, next: &Grid) -> LayerDiff {
    if prev.width() != next.width() || prev.height() != next.height() {
        return redraw_grid(doc, next);
    }
    let mut diff = LayerDiff::default();
    if next.ptr_eq(prev) {
        return diff;
    }
    diff.changes = LayerChanges::GRID;
    grid_differences(&mut diff, doc, prev, next);
    diff
}

fn grid_differences(diff: &mut LayerDiff, doc: &Document, prev: &Grid, next: &Grid) {
    for y in 0..next.height() {
        if next.row_ptr_eq(prev, y) {
            diff.stats.rows_skipped += 1;
            continue;
        }
        for (x, (&cpix, &old)) in next.row(y).iter().zip(prev.row(y)).enumerate() {
            diff.stats.cells_scanned += 1;
            if cpix == old {
                continue;
            }
            diff.clean(x, y);
            diff.draw_if_visible(doc, x, y, cpix);
        }
    }
}

/// Redraws cells referencing one of the given palette slots.
///
/// Cells without glyph and background are skipped; so are cells whose
/// value differs from `skip`, as a grid diff already covers them.
fn palette_differences(diff: &mut LayerDiff, doc: &Document, grid: &Grid, skip: Option<&Grid>, chars: &[u8], colors: &[u8]) {
    let mut char_hit = [false; PALETTE_SIZE];
    let mut color_hit = [false; PALETTE_SIZE];
    for &i in chars {
        char_hit[i as usize] = true;
    }
    for &i in colors {
        color_hit[i as usize] = true;
    }

    for (x, y, cpix) in grid.cells() {
        diff.stats.cells_scanned += 1;
        let [ch, fg, bg] = cpix.lanes();
        if ch == 0 && bg == 0 {
            continue;
        }
        if !char_hit[ch as usize] && !color_hit[fg as usize] && !color_hit[bg as usize] {
            continue;
        }
        if skip.is_some_and(|prev| prev.get(x, y) != Some(cpix)) {
            continue;
        }
        diff.clean(x, y);
        diff.draw_if_visible(doc, x, y, cpix);
    }
}

/// Redraw work for the palette slots `chars` and `colors`, on a grid that
/// didn't change itself.
pub fn palette_update(doc: &Document, grid: &Grid, chars: &[u8], colors: &[u8]) -> LayerDiff {
    let mut diff = LayerDiff::default();
    if !chars.is_empty() {
        diff.changes |= LayerChanges::CHAR_PALETTE;
    }
    if !colors.is_empty() {
        diff.changes |= LayerChanges::COLOR_PALETTE;
    }
    palette_differences(&mut diff, doc, grid, None, chars, colors);
    diff
}

/// Redraw work for layer `id` going from `prev` to `next`.
///
/// A layer missing in `prev` is drawn from scratch.
///
/// # Errors
///
/// [`crate::EngineError::InvalidLayer`] if `next` has no layer `id`.
pub fn diff_layer(prev: &Document, next: &Document, id: LayerId) -> Result<LayerDiff> {
    let view = LayerView::new(next, id)?;
    let Ok(prev_view) = LayerView::new(prev, id) else {
        return Ok(redraw_grid(next, view.grid()));
    };

    let changes = view.changes(&prev_view);
    let mut diff = if changes.contains(LayerChanges::GEOMETRY) {
        redraw_grid(next, view.grid())
    } else {
        let mut diff = LayerDiff {
            changes,
            ..Default::default()
        };
        if changes.contains(LayerChanges::GRID) {
            grid_differences(&mut diff, next, prev_view.grid(), view.grid());
        }
        if changes.intersects(LayerChanges::CHAR_PALETTE | LayerChanges::COLOR_PALETTE) {
            // a slot that was free in `prev` is only used by cells the grid diff covers
            let chars = replaced_slots(prev.char_palette(), next.char_palette());
            let colors = replaced_slots(prev.color_palette(), next.color_palette());
            if !chars.is_empty() || !colors.is_empty() {
                let skip = changes.contains(LayerChanges::GRID).then(|| prev_view.grid());
                palette_differences(&mut diff, next, view.grid(), skip, &chars, &colors);
            }
        }
        diff
    };
    diff.changes |= changes;

    log::trace!(
        "diff layer {id}: {:?}, {} scanned, {} rows skipped, {} cleaned, {} drawn",
        diff.changes,
        diff.stats.cells_scanned,
        diff.stats.rows_skipped,
        diff.stats.cleaned,
        diff.stats.drawn
    );
    Ok(diff)
}

fn replaced_slots<T: PaletteEntry>(prev: &Palette<T>, next: &Palette<T>) -> Vec<u8> {
    next.changed_slots(prev)
        .into_iter()
        .filter(|i| prev.is_assigned(*i) && next.is_assigned(*i))
        .collect()
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DocumentDiff {
    /// Layers of `next`, bottom to top.
    pub layers: Vec<(LayerId, LayerDiff)>,
    /// Layers of `prev` that are gone.
    pub removed: Vec<LayerId>,
}

pub fn diff_document(prev: &Document, next: &Document) -> DocumentDiff {
    let mut result = DocumentDiff::default();
    for (id, _) in next.layers_by_index() {
        match diff_layer(prev, next, id) {
            Ok(diff) => result.layers.push((id, diff)),
            Err(err) => log::warn!("skipping layer {id}: {err}"),
        }
    }
    result.removed = prev
        .layers()
        .map(|(id, _)| id)
        .filter(|id| next.layer(*id).is_err())
        .collect();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, DocumentProperties, LayerUpdate, PaletteUpdate, PatchCell};
    use pretty_assertions::assert_eq;

    fn document() -> (Document, LayerId) {
        let doc = Document::create(&DocumentProperties::blocks(1, 1)).unwrap();
        doc.create_layer(&LayerUpdate::default()).unwrap()
    }

    fn cell(c: char) -> PatchCell {
        PatchCell::new(crate::CharRef::from_char(0, c), Color::WHITE, None)
    }

    #[test]
    fn test_same_snapshot_is_empty() {
        let (doc, id) = document();
        let diff = diff_layer(&doc, &doc, id).unwrap();
        assert!(diff.is_empty());
        assert_eq!(LayerChanges::empty(), diff.changes);
    }

    #[test]
    fn test_paint_diffs_touched_row_only() {
        let (doc, id) = document();
        let next = doc.paint(id, 2, 3, &[vec![cell('x')]]).unwrap().unwrap();
        let diff = diff_layer(&doc, &next, id).unwrap();

        assert!(diff.changes.contains(LayerChanges::GRID));
        assert_eq!(7, diff.stats.rows_skipped);
        assert_eq!(8, diff.stats.cells_scanned);
        let cpix = next.cell(id, 2, 3).unwrap().unwrap();
        assert_eq!(
            vec![
                DiffAction::Clean { x: 2, y: 3 },
                DiffAction::Draw {
                    x: 2,
                    y: 3,
                    cpix,
                    cell: next.resolve(cpix),
                },
            ],
            diff.actions
        );
    }

    #[test]
    fn test_erase_cleans_without_draw() {
        let (doc, id) = document();
        let painted = doc.paint(id, 0, 0, &[vec![cell('x')]]).unwrap().unwrap();
        let erased = painted.erase(id, (0, 0), (1, 1)).unwrap().unwrap();
        let diff = diff_layer(&painted, &erased, id).unwrap();
        // (1,0), (0,1) and (1,1) were already empty
        assert_eq!(vec![DiffAction::Clean { x: 0, y: 0 }], diff.actions);
    }

    #[test]
    fn test_geometry_change_redraws_all() {
        let (doc, id) = document();
        let painted = doc
            .paint(id, 0, 0, &[vec![cell('a'), PatchCell::default().with_bg(Some(Color::BLACK))]])
            .unwrap()
            .unwrap();
        let next = painted
            .update_layer(
                id,
                &LayerUpdate {
                    text_margin: Some(1),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();
        let diff = diff_layer(&painted, &next, id).unwrap();
        assert!(diff.changes.contains(LayerChanges::GEOMETRY));
        assert_eq!(DiffAction::CleanAll, diff.actions[0]);
        assert_eq!(2, diff.stats.drawn);
        assert_eq!(3, diff.actions.len());
    }

    #[test]
    fn test_palette_replace_redraws_referencing_cells() {
        let (doc, id) = document();
        let painted = doc
            .paint(id, 0, 0, &[vec![cell('a'), cell('b'), PatchCell::default().with_bg(Some(Color::WHITE))]])
            .unwrap()
            .unwrap();
        let next = painted
            .update_palette(&PaletteUpdate::Char {
                index: Some(2),
                value: Some(crate::CharRef::from_char(0, 'z')),
            })
            .unwrap()
            .unwrap();

        let diff = diff_layer(&painted, &next, id).unwrap();
        assert_eq!(LayerChanges::CHAR_PALETTE, diff.changes);
        let cpix = next.cell(id, 1, 0).unwrap().unwrap();
        assert_eq!(Some(crate::CharRef::from_char(0, 'z')), next.resolve(cpix).ch);
        assert_eq!(
            vec![
                DiffAction::Clean { x: 1, y: 0 },
                DiffAction::Draw {
                    x: 1,
                    y: 0,
                    cpix,
                    cell: next.resolve(cpix),
                },
            ],
            diff.actions
        );
    }

    fn cleaned_at(diff: &LayerDiff) -> Vec<(usize, usize)> {
        diff.actions
            .iter()
            .filter_map(|a| match a {
                DiffAction::Clean { x, y } => Some((*x, *y)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_color_replace_redraws_fg_and_bg_cells() {
        let (doc, id) = document();
        let red = Color::new(255, 0, 0);
        let blue = Color::new(0, 0, 255);
        let painted = doc
            .paint(
                id,
                0,
                0,
                &[vec![
                    PatchCell::new(crate::CharRef::from_char(0, 'a'), red, None),
                    PatchCell::default().with_bg(Some(red)),
                    cell('b'),
                ]],
            )
            .unwrap()
            .unwrap();
        let slot = painted.color_palette().position(&red).unwrap();
        let next = painted
            .update_palette(&PaletteUpdate::Color {
                index: Some(slot),
                value: Some(blue),
            })
            .unwrap()
            .unwrap();

        let diff = diff_layer(&painted, &next, id).unwrap();
        assert_eq!(LayerChanges::COLOR_PALETTE, diff.changes);
        assert_eq!(vec![(0, 0), (1, 0)], cleaned_at(&diff));
        assert_eq!(2, diff.stats.drawn);
        let DiffAction::Draw { cell: fg_cell, .. } = diff.actions[1] else {
            panic!("expected a draw, got {:?}", diff.actions[1]);
        };
        assert_eq!(Some(blue), fg_cell.fg);
        let DiffAction::Draw { cell: bg_cell, .. } = diff.actions[3] else {
            panic!("expected a draw, got {:?}", diff.actions[3]);
        };
        assert_eq!(Some(blue), bg_cell.bg);
        assert_eq!(None, bg_cell.glyph());

        // the same work through the direct entry point
        let direct = palette_update(&next, next.layer(id).unwrap().grid(), &[], &[slot]);
        assert_eq!(LayerChanges::COLOR_PALETTE, direct.changes);
        assert_eq!(diff.actions, direct.actions);
    }

    #[test]
    fn test_palette_and_grid_change_clean_once() {
        let (doc, id) = document();
        let prev = doc.paint(id, 0, 0, &[vec![cell('a')]]).unwrap().unwrap();
        let replaced = prev
            .update_palette(&PaletteUpdate::Char {
                index: Some(1),
                value: Some(crate::CharRef::from_char(0, 'z')),
            })
            .unwrap()
            .unwrap();
        // (1, 0) reuses the replaced slot, so both the grid and the palette scan see it
        let next = replaced.paint(id, 1, 0, &[vec![cell('z'), cell('q')]]).unwrap().unwrap();
        assert_eq!(next.cell(id, 0, 0).unwrap(), next.cell(id, 1, 0).unwrap());

        let diff = diff_layer(&prev, &next, id).unwrap();
        assert!(diff.changes.contains(LayerChanges::GRID | LayerChanges::CHAR_PALETTE));
        let mut cleaned = cleaned_at(&diff);
        cleaned.sort_unstable();
        assert_eq!(vec![(0, 0), (1, 0), (2, 0)], cleaned);
        assert_eq!(3, diff.stats.drawn);
    }

    #[test]
    fn test_diff_grids() {
        let (doc, _) = document();
        let prev = Grid::new(4, 4);
        assert!(diff_grids(&doc, &prev, &prev).is_empty());

        let next = prev.write_region(1, 1, &[vec![Cpix::new(0, 0, 1)]], |_, c| Ok(*c)).unwrap();
        let diff = diff_grids(&doc, &prev, &next);
        assert_eq!(LayerChanges::GRID, diff.changes);
        assert_eq!(3, diff.stats.rows_skipped);
        assert_eq!(vec![(1, 1)], cleaned_at(&diff));

        // a size change can't be diffed cell by cell
        let wider = next.resize(5, 4).unwrap();
        let diff = diff_grids(&doc, &next, &wider);
        assert_eq!(LayerChanges::GEOMETRY, diff.changes);
        assert_eq!(DiffAction::CleanAll, diff.actions[0]);
        assert_eq!(20, diff.stats.cells_scanned);
        assert_eq!(1, diff.stats.drawn);
    }

    #[test]
    fn test_draw_iff_visible() {
        let (doc, id) = document();
        let patch = vec![vec![
            cell('a'),
            PatchCell::default().with_bg(Some(Color::BLACK)),
            PatchCell::default().with_ch(Some(crate::CharRef::from_char(0, 'q'))),
            PatchCell::default().with_fg(Some(Color::BLACK)),
        ]];
        let next = doc.paint(id, 0, 0, &patch).unwrap().unwrap();
        let diff = diff_layer(&doc, &next, id).unwrap();
        for action in &diff.actions {
            if let DiffAction::Draw { cpix, .. } = action {
                assert!(cpix.is_visible());
            }
        }
        // a lone char or a lone foreground is coupled away
        assert_eq!(Some(Cpix::EMPTY), next.cell(id, 2, 0).unwrap());
        assert_eq!(Some(Cpix::EMPTY), next.cell(id, 3, 0).unwrap());
        assert_eq!(2, diff.stats.drawn);
        assert_eq!(2, diff.stats.cleaned);
    }

    #[test]
    fn test_diff_document_reports_new_and_removed_layers() {
        let (doc, first) = document();
        let (with_second, second) = doc.create_layer(&LayerUpdate::default()).unwrap();
        let next = with_second.delete_layer(first).unwrap();

        let diff = diff_document(&doc, &next);
        assert_eq!(vec![first], diff.removed);
        assert_eq!(1, diff.layers.len());
        assert_eq!(second, diff.layers[0].0);
        assert_eq!(DiffAction::CleanAll, diff.layers[0].1.actions[0]);
    }
}
