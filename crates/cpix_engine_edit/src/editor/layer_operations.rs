#![allow(clippy::missing_errors_doc)]
use cpix_engine::{DocumentProperties, LayerId, LayerUpdate};

use super::{Applied, EditState, Result};

impl EditState {
    /// Adds a layer on top, filling unset properties from the options.
    pub fn create_layer(&mut self, properties: &LayerUpdate) -> Result<LayerId> {
        let properties = self.options.default_layer.fill(properties);
        let (next, id) = self.document.create_layer(&properties)?;
        self.commit("Create layer", Some(next));
        self.current_layer = Some(id);
        Ok(id)
    }

    pub fn duplicate_layer(&mut self, layer: LayerId) -> Result<LayerId> {
        let (next, id) = self.document.duplicate_layer(layer)?;
        self.commit(format!("Duplicate layer {layer}"), Some(next));
        self.current_layer = Some(id);
        Ok(id)
    }

    pub fn move_layer(&mut self, layer: LayerId, index: usize) -> Result<Applied> {
        let next = self.document.move_layer(layer, index)?;
        Ok(self.commit(format!("Move layer {layer} to {index}"), next))
    }

    pub fn delete_layer(&mut self, layer: LayerId) -> Result<Applied> {
        let next = self.document.delete_layer(layer)?;
        let applied = self.commit(format!("Delete layer {layer}"), Some(next));
        if self.current_layer == Some(layer) {
            self.current_layer = self.document.layers_by_index().last().map(|(id, _)| *id);
        }
        Ok(applied)
    }

    pub fn update_layer(&mut self, layer: LayerId, properties: &LayerUpdate) -> Result<Applied> {
        let next = self.document.update_layer(layer, properties)?;
        Ok(self.commit(format!("Change layer {layer}"), next))
    }

    pub fn set_layer_visible(&mut self, layer: LayerId, is_visible: bool) -> Result<Applied> {
        self.update_layer(
            layer,
            &LayerUpdate {
                is_visible: Some(is_visible),
                ..Default::default()
            },
        )
    }

    pub fn update_document(&mut self, properties: &DocumentProperties) -> Result<Applied> {
        let next = self.document.update_document(properties)?;
        Ok(self.commit("Change document properties", next))
    }
}
