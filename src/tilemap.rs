//! Tiled JSON tilemaps and tile index normalization.
//!
//! Tiled numbers tiles from 1 and marks empty cells with 0. Target hardware
//! indexes tiles from 0, so every id is decremented and empty cells map to
//! tile 0.

use crate::error::RleError;
use log::debug;
use serde::Deserialize;
use std::io::Read;

/// Largest width or height the one-byte dimension header can hold.
pub const MAX_DIMENSION: u32 = 255;

#[derive(Debug, Deserialize)]
pub struct TiledMap {
    pub layers: Vec<TiledLayer>,
}

#[derive(Debug, Deserialize)]
pub struct TiledLayer {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    /// Absent on object and image layers.
    pub data: Option<Vec<u32>>,
}

/// A single tile layer with 0-based byte indices, ready for encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tilemap {
    pub width: u8,
    pub height: u8,
    pub tiles: Vec<u8>,
}

impl Tilemap {
    pub fn from_json<R: Read>(reader: R, layer: usize) -> Result<Self, RleError> {
        let map: TiledMap = serde_json::from_reader(reader)?;
        Self::from_map(&map, layer)
    }

    pub fn from_json_str(json: &str, layer: usize) -> Result<Self, RleError> {
        let map: TiledMap = serde_json::from_str(json)?;
        Self::from_map(&map, layer)
    }

    pub fn from_map(map: &TiledMap, layer: usize) -> Result<Self, RleError> {
        let selected = map.layers.get(layer).ok_or_else(|| {
            RleError::InvalidTilemap(format!("layer {} requested, document has {}", layer, map.layers.len()))
        })?;
        Self::from_layer(selected)
    }

    pub fn from_layer(layer: &TiledLayer) -> Result<Self, RleError> {
        let data = layer
            .data
            .as_ref()
            .ok_or_else(|| RleError::InvalidTilemap(format!("layer '{}' has no tile data", layer.name)))?;

        let width = dimension("width", layer.width)?;
        let height = dimension("height", layer.height)?;

        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(RleError::InvalidTilemap(format!(
                "layer '{}' is {}x{} but holds {} tiles",
                layer.name,
                width,
                height,
                data.len()
            )));
        }

        let tiles = normalize(data)?;
        debug!("Loaded layer '{}' ({}x{}, {} tiles)", layer.name, width, height, tiles.len());
        Ok(Self { width, height, tiles })
    }
}

/// Map Tiled global ids to 0-based tile indices.
pub fn normalize(gids: &[u32]) -> Result<Vec<u8>, RleError> {
    gids.iter()
        .enumerate()
        .map(|(index, &gid)| {
            let tile = gid.saturating_sub(1);
            u8::try_from(tile).map_err(|_| RleError::ValueOutOfRange { index, value: tile as i64 })
        })
        .collect()
}

fn dimension(name: &str, value: u32) -> Result<u8, RleError> {
    if value == 0 || value > MAX_DIMENSION {
        return Err(RleError::InvalidTilemap(format!("{} {} is outside 1..={}", name, value, MAX_DIMENSION)));
    }
    Ok(value as u8)
}
