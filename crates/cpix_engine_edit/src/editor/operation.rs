use cpix_engine::{Cpix, Document, DocumentProperties, LayerId, LayerUpdate, PaletteUpdate, PatchCell};
use serde::{Deserialize, Serialize};

/// Serializable editor operation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Operation {
    /// Replaces the document with a fresh one and resets history.
    CreateDocument {
        #[serde(default)]
        properties: DocumentProperties,
    },
    /// Replaces the document with a loaded one and resets history.
    LoadDocument { document: Box<Document> },
    UpdateDocument { properties: DocumentProperties },

    CreateLayer {
        #[serde(default)]
        properties: LayerUpdate,
    },
    DuplicateLayer { layer: LayerId },
    MoveLayer { layer: LayerId, index: usize },
    DeleteLayer { layer: LayerId },
    UpdateLayer { layer: LayerId, properties: LayerUpdate },

    UpdatePalette { update: PaletteUpdate },

    Paint { layer: LayerId, x: i32, y: i32, cells: Vec<Vec<PatchCell>> },
    PaintRaw { layer: LayerId, x: i32, y: i32, cells: Vec<Vec<Cpix>> },
    Erase { layer: LayerId, from: (i32, i32), to: (i32, i32) },

    AddFont { name: String },
    RemoveFont { name: String },

    AddBrush { cells: Vec<Vec<Cpix>> },
    RemoveBrush { index: usize },
    StampBrush { layer: LayerId, brush: usize, x: i32, y: i32 },

    Undo,
    Redo,
}

impl Operation {
    pub fn description(&self) -> String {
        match self {
            Operation::CreateDocument { .. } => "Create document".to_string(),
            Operation::LoadDocument { .. } => "Load document".to_string(),
            Operation::UpdateDocument { .. } => "Change document properties".to_string(),
            Operation::CreateLayer { .. } => "Create layer".to_string(),
            Operation::DuplicateLayer { layer } => format!("Duplicate layer {layer}"),
            Operation::MoveLayer { layer, index } => format!("Move layer {layer} to {index}"),
            Operation::DeleteLayer { layer } => format!("Delete layer {layer}"),
            Operation::UpdateLayer { layer, .. } => format!("Change layer {layer}"),
            Operation::UpdatePalette { update } => match update {
                PaletteUpdate::Char { value: None, .. } | PaletteUpdate::Color { value: None, .. } => "Remove palette entry".to_string(),
                PaletteUpdate::Char { index: None, .. } | PaletteUpdate::Color { index: None, .. } => "Add palette entry".to_string(),
                _ => "Replace palette entry".to_string(),
            },
            Operation::Paint { layer, .. } | Operation::PaintRaw { layer, .. } => format!("Paint on layer {layer}"),
            Operation::Erase { layer, .. } => format!("Erase on layer {layer}"),
            Operation::AddFont { name } => format!("Add font '{name}'"),
            Operation::RemoveFont { name } => format!("Remove font '{name}'"),
            Operation::AddBrush { .. } => "Add brush".to_string(),
            Operation::RemoveBrush { index } => format!("Remove brush {index}"),
            Operation::StampBrush { brush, layer, .. } => format!("Stamp brush {brush} on layer {layer}"),
            Operation::Undo => "Undo".to_string(),
            Operation::Redo => "Redo".to_string(),
        }
    }

    /// True for operations recorded in the undo history.
    pub fn is_recorded(&self) -> bool {
        !matches!(
            self,
            Operation::CreateDocument { .. } | Operation::LoadDocument { .. } | Operation::Undo | Operation::Redo
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cpix_engine::Color;

    #[test]
    fn test_serialized_form() {
        let op = Operation::MoveLayer { layer: LayerId(3), index: 1 };
        let json = serde_json::to_string(&op).unwrap();
        assert_eq!(r#"{"MoveLayer":{"layer":3,"index":1}}"#, json);
        assert_eq!(op, serde_json::from_str(&json).unwrap());

        let op: Operation = serde_json::from_str(r#""Undo""#).unwrap();
        assert_eq!(Operation::Undo, op);
        assert!(!op.is_recorded());
    }

    #[test]
    fn test_palette_descriptions() {
        let remove = Operation::UpdatePalette {
            update: PaletteUpdate::Color { index: Some(3), value: None },
        };
        let add = Operation::UpdatePalette {
            update: PaletteUpdate::Color {
                index: None,
                value: Some(Color::WHITE),
            },
        };
        assert_eq!("Remove palette entry", remove.description());
        assert_eq!("Add palette entry", add.description());
    }
}
