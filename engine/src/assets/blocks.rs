use std::path::{Path, PathBuf};

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::voxels::{block::Block, face::Face};

#[derive(Debug, Error)]
pub enum BlockRegistryError {
    #[error("Failed to read block definitions from {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse block definitions")]
    Parse(#[from] ron::error::SpannedError),
    #[error("Block id {0} is out of range")]
    IdOutOfRange(u16),
    #[error("Block id 0 is reserved for air, got '{0}'")]
    ReservedId(String),
    #[error("Block id {0} is defined twice")]
    DuplicateId(u16),
    #[error("Block name '{0}' is defined twice")]
    DuplicateName(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockTextureDefinition {
    Invisible,
    Single(String),
    PerFace {
        top: String,
        bottom: String,
        side: String,
    },
}

impl BlockTextureDefinition {
    /// Texture path for one side of the block, relative to the texture root
    pub fn face_texture(&self, face: Face) -> Option<&str> {
        match self {
            BlockTextureDefinition::Invisible => None,
            BlockTextureDefinition::Single(path) => Some(path),
            BlockTextureDefinition::PerFace { top, bottom, side } => Some(match face {
                Face::Top => top,
                Face::Bottom => bottom,
                _ => side,
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockDefinition {
    pub id: u16,
    pub name: String,
    pub textures: BlockTextureDefinition,
}

/// Maps block names to `Block` values and their texture definitions
#[derive(Debug, Default)]
pub struct BlockRegistry {
    definitions: Vec<BlockDefinition>,
    by_name: AHashMap<String, usize>,
    by_id: AHashMap<u16, usize>,
}

impl BlockRegistry {
    pub fn new() -> Self {
        let mut registry = BlockRegistry::default();
        registry.definitions.push(BlockDefinition {
            id: 0,
            name: "air".to_string(),
            textures: BlockTextureDefinition::Invisible,
        });
        registry.by_name.insert("air".to_string(), 0);
        registry.by_id.insert(0, 0);
        registry
    }

    /// Registry with the block types the built-in terrain generators place
    pub fn with_builtin_blocks() -> Self {
        let mut registry = BlockRegistry::new();
        let builtin = [
            (Block::STONE, "stone", BlockTextureDefinition::Single("stone.png".into())),
            (Block::DIRT, "dirt", BlockTextureDefinition::Single("dirt.png".into())),
            (
                Block::GRASS,
                "grass",
                BlockTextureDefinition::PerFace {
                    top: "grass_top.png".into(),
                    bottom: "dirt.png".into(),
                    side: "grass_side.png".into(),
                },
            ),
            (Block::SAND, "sand", BlockTextureDefinition::Single("sand.png".into())),
        ];

        for (block, name, textures) in builtin {
            registry
                .register(BlockDefinition {
                    id: block.block_type(),
                    name: name.to_string(),
                    textures,
                })
                .expect("Built-in block definitions are unique");
        }

        registry
    }

    pub fn from_ron_str(data: &str) -> Result<Self, BlockRegistryError> {
        let definitions: Vec<BlockDefinition> = ron::from_str(data)?;
        let mut registry = BlockRegistry::new();
        for definition in definitions {
            registry.register(definition)?;
        }
        log::info!("Loaded {} block definitions", registry.len() - 1);
        Ok(registry)
    }

    pub fn load(path: &Path) -> Result<Self, BlockRegistryError> {
        let data = std::fs::read_to_string(path).map_err(|source| BlockRegistryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron_str(&data)
    }

    pub fn register(&mut self, definition: BlockDefinition) -> Result<Block, BlockRegistryError> {
        if definition.id == 0 {
            return Err(BlockRegistryError::ReservedId(definition.name));
        }
        if definition.id > Block::MAX_TYPE {
            return Err(BlockRegistryError::IdOutOfRange(definition.id));
        }
        if self.by_id.contains_key(&definition.id) {
            return Err(BlockRegistryError::DuplicateId(definition.id));
        }
        if self.by_name.contains_key(&definition.name) {
            return Err(BlockRegistryError::DuplicateName(definition.name));
        }

        let index = self.definitions.len();
        let block = Block::from_type(definition.id);
        self.by_name.insert(definition.name.clone(), index);
        self.by_id.insert(definition.id, index);
        self.definitions.push(definition);
        Ok(block)
    }

    pub fn get_by_name(&self, name: &str) -> Option<Block> {
        self.by_name
            .get(name)
            .map(|&index| Block::from_type(self.definitions[index].id))
    }

    pub fn definition(&self, block: Block) -> Option<&BlockDefinition> {
        self.by_id
            .get(&block.block_type())
            .map(|&index| &self.definitions[index])
    }

    pub fn name_of(&self, block: Block) -> Option<&str> {
        self.definition(block).map(|definition| definition.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &BlockDefinition> {
        self.definitions.iter()
    }

    /// Includes air
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFINITIONS: &str = r#"[
        (id: 1, name: "stone", textures: Single("stone.png")),
        (id: 7, name: "log", textures: PerFace(top: "log_top.png", bottom: "log_top.png", side: "log_side.png")),
        (id: 8, name: "glass", textures: Invisible),
    ]"#;

    #[test]
    fn test_load_from_ron() {
        let registry = BlockRegistry::from_ron_str(DEFINITIONS).unwrap();
        assert_eq!(registry.len(), 4);
        assert_eq!(registry.get_by_name("air"), Some(Block::AIR));
        assert_eq!(registry.get_by_name("stone"), Some(Block::STONE));
        assert_eq!(registry.get_by_name("log"), Some(Block::from_type(7)));
        assert_eq!(registry.get_by_name("water"), None);
        assert_eq!(registry.name_of(Block::from_type(8)), Some("glass"));

        let log = registry.definition(Block::from_type(7)).unwrap();
        assert_eq!(log.textures.face_texture(Face::Top), Some("log_top.png"));
        assert_eq!(log.textures.face_texture(Face::Left), Some("log_side.png"));
        assert_eq!(
            registry
                .definition(Block::from_type(8))
                .unwrap()
                .textures
                .face_texture(Face::Top),
            None
        );
    }

    #[test]
    fn test_metadata_does_not_affect_lookup() {
        let registry = BlockRegistry::with_builtin_blocks();
        assert_eq!(
            registry.name_of(Block::from_type_metadata(3, 5)),
            Some("grass")
        );
    }

    #[test]
    fn test_builtin_blocks_cover_generated_terrain() {
        let registry = BlockRegistry::with_builtin_blocks();
        for block in [Block::STONE, Block::DIRT, Block::GRASS, Block::SAND] {
            assert!(registry.definition(block).is_some(), "{:?}", block);
        }
    }

    #[test]
    fn test_rejects_bad_definitions() {
        let duplicate_name = r#"[
            (id: 1, name: "stone", textures: Invisible),
            (id: 2, name: "stone", textures: Invisible),
        ]"#;
        assert!(matches!(
            BlockRegistry::from_ron_str(duplicate_name),
            Err(BlockRegistryError::DuplicateName(name)) if name == "stone"
        ));

        let duplicate_id = r#"[
            (id: 1, name: "stone", textures: Invisible),
            (id: 1, name: "granite", textures: Invisible),
        ]"#;
        assert!(matches!(
            BlockRegistry::from_ron_str(duplicate_id),
            Err(BlockRegistryError::DuplicateId(1))
        ));

        let reserved = r#"[(id: 0, name: "void", textures: Invisible)]"#;
        assert!(matches!(
            BlockRegistry::from_ron_str(reserved),
            Err(BlockRegistryError::ReservedId(_))
        ));

        let out_of_range = r#"[(id: 5000, name: "huge", textures: Invisible)]"#;
        assert!(matches!(
            BlockRegistry::from_ron_str(out_of_range),
            Err(BlockRegistryError::IdOutOfRange(5000))
        ));

        assert!(matches!(
            BlockRegistry::from_ron_str("[(id: 1"),
            Err(BlockRegistryError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = BlockRegistry::load(Path::new("does/not/exist/blocks.ron"));
        assert!(matches!(result, Err(BlockRegistryError::Io { .. })));
    }
}
