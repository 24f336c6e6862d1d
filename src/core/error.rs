use thiserror::Error;

use crate::core::types::{ActorClassId, ActorId, ResourceClassId, ResourceId, TerrainId, TilePos};

#[derive(Error, Debug)]
pub enum EcoError {
    #[error("Priority queue is empty")]
    EmptyQueue,

    #[error("Search stepped before start() was called")]
    NotInitialized,

    #[error("Position out of bounds: {0:?}")]
    OutOfBounds(TilePos),

    #[error("Actor not found: {0:?}")]
    UnknownActor(ActorId),

    #[error("Resource not found: {0:?}")]
    UnknownResource(ResourceId),

    #[error("Actor class not registered: {0:?}")]
    UnknownActorClass(ActorClassId),

    #[error("Resource class not registered: {0:?}")]
    UnknownResourceClass(ResourceClassId),

    #[error("Terrain not registered: {0:?}")]
    UnknownTerrain(TerrainId),

    #[error("Invalid actor class {name}: {reason}")]
    InvalidActorClass { name: String, reason: String },

    #[error("{class:?} cannot stand at {pos:?}")]
    Impassable { class: ActorClassId, pos: TilePos },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EcoError>;
