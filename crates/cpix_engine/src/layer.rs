use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{EngineError, Grid, Result};

pub const DEFAULT_RESOLUTION: usize = 8;
pub const DEFAULT_CPC: usize = 1;
pub const DEFAULT_TEXT_WEIGHT: u32 = 400;

/// Upper bound for the cell count of one layer grid.
pub const MAX_GRID_CELLS: usize = 1 << 26;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerId(pub u64);

impl Display for LayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerProperties {
    pub title: String,
    pub is_visible: bool,
    /// Grid cells per block, vertically.
    pub resolution: usize,
    /// Characters per cell, horizontally.
    pub cpc: usize,
    pub text_margin: u32,
    pub text_weight: u32,
}

impl Default for LayerProperties {
    fn default() -> Self {
        Self {
            title: String::new(),
            is_visible: true,
            resolution: DEFAULT_RESOLUTION,
            cpc: DEFAULT_CPC,
            text_margin: 0,
            text_weight: DEFAULT_TEXT_WEIGHT,
        }
    }
}

/// Partial layer properties; `None` keeps the current value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpc: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_margin: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_weight: Option<u32>,
}

impl LayerUpdate {
    pub fn geometry(resolution: usize, cpc: usize) -> Self {
        Self {
            resolution: Some(resolution),
            cpc: Some(cpc),
            ..Default::default()
        }
    }

    pub fn apply_to(&self, properties: &LayerProperties) -> LayerProperties {
        LayerProperties {
            title: self.title.clone().unwrap_or_else(|| properties.title.clone()),
            is_visible: self.is_visible.unwrap_or(properties.is_visible),
            resolution: self.resolution.unwrap_or(properties.resolution),
            cpc: self.cpc.unwrap_or(properties.cpc),
            text_margin: self.text_margin.unwrap_or(properties.text_margin),
            text_weight: self.text_weight.unwrap_or(properties.text_weight),
        }
    }
}

/// Grid `(width, height)` of a layer on a `hblocks` x `vblocks` document.
///
/// # Errors
///
/// [`EngineError::InvalidDimensions`] if the grid would exceed [`MAX_GRID_CELLS`].
pub fn grid_size(hblocks: usize, vblocks: usize, resolution: usize, cpc: usize) -> Result<(usize, usize)> {
    let too_large = || {
        EngineError::dimensions(format!(
            "{hblocks}x{vblocks} blocks at resolution {resolution}, cpc {cpc} exceed {MAX_GRID_CELLS} cells"
        ))
    };
    let width = hblocks.checked_mul(cpc).and_then(|w| w.checked_mul(resolution)).ok_or_else(too_large)?;
    let height = vblocks.checked_mul(resolution).ok_or_else(too_large)?;
    match width.checked_mul(height) {
        Some(cells) if cells <= MAX_GRID_CELLS => Ok((width, height)),
        _ => Err(too_large()),
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layer {
    pub properties: LayerProperties,
    /// Stacking position, 0 is the bottom.
    pub index: usize,
    grid: Grid,
}

impl Layer {
    /// # Errors
    ///
    /// [`EngineError::InvalidDimensions`] if resolution or cpc is 0.
    pub fn new(properties: LayerProperties, index: usize, hblocks: usize, vblocks: usize) -> Result<Self> {
        check_geometry(&properties)?;
        let (width, height) = grid_size(hblocks, vblocks, properties.resolution, properties.cpc)?;
        Ok(Layer {
            properties,
            index,
            grid: Grid::new(width, height),
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn set_grid(&mut self, grid: Grid) {
        self.grid = grid;
    }

    pub fn title(&self) -> &str {
        &self.properties.title
    }

    pub fn is_visible(&self) -> bool {
        self.properties.is_visible
    }

    pub fn resolution(&self) -> usize {
        self.properties.resolution
    }

    pub fn cpc(&self) -> usize {
        self.properties.cpc
    }

    /// Applies `update`; a changed resolution or cpc regenerates the grid,
    /// keeping the overlapping content.
    pub fn updated(&self, update: &LayerUpdate, hblocks: usize, vblocks: usize) -> Result<Layer> {
        let properties = update.apply_to(&self.properties);
        check_geometry(&properties)?;
        let mut layer = Layer {
            properties,
            index: self.index,
            grid: self.grid.clone(),
        };
        if layer.properties.resolution != self.properties.resolution || layer.properties.cpc != self.properties.cpc {
            layer.fit_grid(hblocks, vblocks)?;
        }
        Ok(layer)
    }

    /// Resizes the grid to the size the document dimensions require.
    pub fn fit_grid(&mut self, hblocks: usize, vblocks: usize) -> Result<()> {
        let (width, height) = grid_size(hblocks, vblocks, self.properties.resolution, self.properties.cpc)?;
        if width != self.grid.width() || height != self.grid.height() {
            self.grid = self.grid.resize(width, height)?;
        }
        Ok(())
    }

    pub fn has_expected_size(&self, hblocks: usize, vblocks: usize) -> bool {
        grid_size(hblocks, vblocks, self.properties.resolution, self.properties.cpc)
            .is_ok_and(|(width, height)| self.grid.width() == width && self.grid.height() == height)
    }
}

fn check_geometry(properties: &LayerProperties) -> Result<()> {
    if properties.resolution == 0 || properties.cpc == 0 {
        return Err(EngineError::dimensions(format!(
            "layer needs resolution and cpc >= 1 (resolution {}, cpc {})",
            properties.resolution, properties.cpc
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::{Cpix, EngineError, Layer, LayerProperties, LayerUpdate, MAX_GRID_CELLS, grid_size};

    #[test]
    fn test_new_layer_size() {
        let layer = Layer::new(LayerProperties::default(), 0, 8, 12).unwrap();
        assert_eq!(12 * 8, layer.grid().height());
        assert_eq!(8 * 8, layer.grid().width());
    }

    #[test]
    fn test_zero_resolution_is_rejected() {
        let properties = LayerProperties {
            resolution: 0,
            ..Default::default()
        };
        assert!(Layer::new(properties, 0, 3, 3).is_err());
    }

    #[test]
    fn test_grid_size_overflow_is_rejected() {
        assert_eq!((3 * 2 * 8, 3 * 8), grid_size(3, 3, 8, 2).unwrap());
        assert!(matches!(grid_size(3, 3, usize::MAX / 2, 4), Err(EngineError::InvalidDimensions { .. })));
        assert!(matches!(grid_size(usize::MAX, 1, 1, 2), Err(EngineError::InvalidDimensions { .. })));
        assert!(grid_size(MAX_GRID_CELLS, 2, 1, 1).is_err());
        assert!(grid_size(MAX_GRID_CELLS, 1, 1, 1).is_ok());
    }

    #[test]
    fn test_update_keeps_grid_without_geometry_change() {
        let layer = Layer::new(LayerProperties::default(), 0, 3, 3).unwrap();
        let update = LayerUpdate {
            title: Some("ink".into()),
            text_margin: Some(2),
            ..Default::default()
        };
        let updated = layer.updated(&update, 3, 3).unwrap();
        assert_eq!("ink", updated.title());
        assert!(updated.grid().ptr_eq(layer.grid()));
    }

    #[test]
    fn test_update_cpc_resizes_grid() {
        let mut layer = Layer::new(LayerProperties::default(), 0, 2, 2).unwrap();
        let grid = layer
            .grid()
            .write_region(3, 4, &[vec![Cpix::new(1, 1, 1)]], |_, c| Ok(*c))
            .unwrap();
        layer.set_grid(grid);

        let updated = layer.updated(&LayerUpdate::geometry(8, 3), 2, 2).unwrap();
        assert_eq!(2 * 3 * 8, updated.grid().width());
        assert_eq!(Some(Cpix::new(1, 1, 1)), updated.grid().get(3, 4));
    }
}
