pub mod undo_stack;
pub use undo_stack::*;

mod operation;
pub use operation::*;

mod editor_error;
pub use editor_error::*;

mod edit_operations;
mod layer_operations;
mod palette_operations;

use std::{path::Path, sync::Arc};

use cpix_engine::{
    Document, DocumentProperties, LayerId,
    diff::{DocumentDiff, diff_document},
};

use crate::EditorOptions;

/// Outcome of an accepted operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Applied {
    /// A new snapshot became current.
    Changed,
    /// Nothing changed, history is untouched.
    Unchanged,
}

impl Applied {
    pub fn is_changed(self) -> bool {
        self == Applied::Changed
    }
}

/// Owns the current document snapshot and its undo history.
///
/// Every operation runs to completion against the current snapshot. A
/// rejected operation leaves document and history as they were.
pub struct EditState {
    document: Arc<Document>,
    undo_stack: UndoStack,
    options: EditorOptions,

    /// Layer created or duplicated last.
    current_layer: Option<LayerId>,

    is_dirty: bool,
}

impl Default for EditState {
    fn default() -> Self {
        Self::new(EditorOptions::default())
    }
}

impl EditState {
    /// An editor without document; operations apply to an uncreated default.
    pub fn new(options: EditorOptions) -> Self {
        Self {
            document: Arc::new(Document::default()),
            undo_stack: UndoStack::new(options.history_limit),
            options,
            current_layer: None,
            is_dirty: false,
        }
    }

    pub fn from_document(document: Document, options: EditorOptions) -> Self {
        let mut state = Self::new(options);
        state.current_layer = document.layers_by_index().last().map(|(id, _)| *id);
        state.document = Arc::new(document);
        state
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Shared handle of the current snapshot, e.g. to diff against later.
    pub fn snapshot(&self) -> Arc<Document> {
        self.document.clone()
    }

    pub fn options(&self) -> &EditorOptions {
        &self.options
    }

    pub fn current_layer(&self) -> Option<LayerId> {
        self.current_layer
    }

    pub fn set_current_layer(&mut self, layer: LayerId) -> Result<()> {
        self.document.layer(layer)?;
        self.current_layer = Some(layer);
        Ok(())
    }

    pub fn is_dirty(&self) -> bool {
        self.is_dirty
    }

    pub fn undo_stack(&self) -> &UndoStack {
        &self.undo_stack
    }

    /// Applies one operation.
    ///
    /// # Errors
    ///
    /// The reason the operation was rejected; nothing changed.
    pub fn apply(&mut self, operation: Operation) -> Result<Applied> {
        let description = operation.description();
        let recorded = operation.is_recorded();
        let result = self.dispatch(operation);
        match &result {
            Ok(Applied::Unchanged) => log::debug!("{description}: nothing changed"),
            Ok(Applied::Changed) => debug_assert!(!recorded || self.is_last_recorded(&description), "'{description}' missing from history"),
            Err(err) => log::warn!("rejected {description}: {err}"),
        }
        result
    }

    /// True if the newest undo entry is `description` and nothing is left to redo.
    pub fn is_last_recorded(&self, description: &str) -> bool {
        !self.can_redo() && (self.undo_stack.limit() == 0 || self.undo_description() == Some(description))
    }

    fn dispatch(&mut self, operation: Operation) -> Result<Applied> {
        match operation {
            Operation::CreateDocument { properties } => self.create_document(&properties).map(|()| Applied::Changed),
            Operation::LoadDocument { document } => self.load_document(*document).map(|()| Applied::Changed),
            Operation::UpdateDocument { properties } => self.update_document(&properties),
            Operation::CreateLayer { properties } => self.create_layer(&properties).map(|_| Applied::Changed),
            Operation::DuplicateLayer { layer } => self.duplicate_layer(layer).map(|_| Applied::Changed),
            Operation::MoveLayer { layer, index } => self.move_layer(layer, index),
            Operation::DeleteLayer { layer } => self.delete_layer(layer),
            Operation::UpdateLayer { layer, properties } => self.update_layer(layer, &properties),
            Operation::UpdatePalette { update } => self.update_palette(&update),
            Operation::Paint { layer, x, y, cells } => self.paint(layer, x, y, &cells),
            Operation::PaintRaw { layer, x, y, cells } => self.paint_raw(layer, x, y, &cells),
            Operation::Erase { layer, from, to } => self.erase(layer, from, to),
            Operation::AddFont { name } => self.add_font(&name).map(|(applied, _)| applied),
            Operation::RemoveFont { name } => self.remove_font(&name),
            Operation::AddBrush { cells } => self.add_brush(cells).map(|_| Applied::Changed),
            Operation::RemoveBrush { index } => self.remove_brush(index),
            Operation::StampBrush { layer, brush, x, y } => self.stamp_brush(layer, brush, x, y),
            Operation::Undo => Ok(self.undo()),
            Operation::Redo => Ok(self.redo()),
        }
    }

    /// Makes `next` current and records the replaced snapshot.
    fn commit(&mut self, description: impl Into<String>, next: Option<Document>) -> Applied {
        let Some(next) = next else {
            return Applied::Unchanged;
        };
        let description = description.into();
        log::debug!("{description}");
        let prev = std::mem::replace(&mut self.document, Arc::new(next));
        self.undo_stack.push(UndoEntry { description, document: prev });
        self.is_dirty = true;
        Applied::Changed
    }

    /// Replaces the document wholesale. History starts over.
    fn reset(&mut self, document: Document) {
        self.current_layer = document.layers_by_index().last().map(|(id, _)| *id);
        self.document = Arc::new(document);
        self.undo_stack.clear();
    }

    pub fn create_document(&mut self, properties: &DocumentProperties) -> Result<()> {
        let document = Document::create(&self.options.default_document.fill(properties))?;
        self.reset(document);
        self.is_dirty = false;
        Ok(())
    }

    /// # Errors
    ///
    /// Fails if `document` breaks a structural invariant.
    pub fn load_document(&mut self, document: Document) -> Result<()> {
        document.validate()?;
        log::debug!("loaded document '{}' with {} layers", document.name, document.layer_count());
        self.reset(document);
        self.is_dirty = false;
        Ok(())
    }

    pub fn load(&mut self, path: &Path) -> Result<()> {
        let document = Document::load(path)?;
        self.load_document(document)
    }

    pub fn save(&mut self, path: &Path) -> Result<()> {
        self.document.save(path)?;
        self.is_dirty = false;
        Ok(())
    }

    pub fn can_undo(&self) -> bool {
        self.undo_stack.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.undo_stack.can_redo()
    }

    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.undo_description()
    }

    pub fn redo_description(&self) -> Option<&str> {
        self.undo_stack.redo_description()
    }

    pub fn undo(&mut self) -> Applied {
        let Some(entry) = self.undo_stack.pop_undo() else {
            return Applied::Unchanged;
        };
        log::debug!("undo {}", entry.description);
        let current = std::mem::replace(&mut self.document, entry.document);
        self.undo_stack.push_redo(UndoEntry {
            description: entry.description,
            document: current,
        });
        self.after_history_step();
        Applied::Changed
    }

    pub fn redo(&mut self) -> Applied {
        let Some(entry) = self.undo_stack.pop_redo() else {
            return Applied::Unchanged;
        };
        log::debug!("redo {}", entry.description);
        let current = std::mem::replace(&mut self.document, entry.document);
        self.undo_stack.push_undo(UndoEntry {
            description: entry.description,
            document: current,
        });
        self.after_history_step();
        Applied::Changed
    }

    fn after_history_step(&mut self) {
        self.is_dirty = true;
        if self.current_layer.is_some_and(|id| self.document.layer(id).is_err()) {
            self.current_layer = self.document.layers_by_index().last().map(|(id, _)| *id);
        }
    }

    /// Redraw work to bring a renderer showing `rendered` up to date.
    pub fn render_changes(&self, rendered: &Document) -> DocumentDiff {
        diff_document(rendered, &self.document)
    }
}
