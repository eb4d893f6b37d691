mod editor;
pub use editor::*;

mod options;
pub use options::*;

// Re-export the model types operations are built from
pub use cpix_engine::{
    CharRef, Color, Cpix, Document, DocumentProperties, EngineError, Layer, LayerId, LayerUpdate, PaletteUpdate, PatchCell, diff,
};
