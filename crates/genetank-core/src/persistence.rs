//! Save/Load functionality for persisting tank state
//!
//! Uses bincode for a compact binary snapshot of the whole tank, including the
//! random generator, so a loaded tank continues exactly where the saved one was.
//! Bodies are stored by value; collision partners are stored by serial and
//! re-linked to the new entity handles on load.

use hecs::Entity;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::{Read, Write};

use crate::components::{Body, Scratch, Serial};
use crate::config::{ConfigError, TankConfig};
use crate::engine::Tank;
use crate::math::TankRng;

/// Version number for save file format (increment when format changes)
const SAVE_VERSION: u32 = 1;

/// Serializable snapshot of a tank
#[derive(Serialize, Deserialize)]
pub struct SaveData {
    /// Save format version
    pub version: u32,
    pub tick: u64,
    pub next_serial: u64,
    pub config: TankConfig,
    pub rng: TankRng,
    /// All bodies in spawn order
    pub bodies: Vec<SavedBody>,
}

/// A body plus the serial of its last collision partner
#[derive(Serialize, Deserialize)]
pub struct SavedBody {
    pub body: Body,
    pub last_collision: Option<Serial>,
}

/// Save the complete tank to a writer
pub fn save_tank<W: Write>(writer: W, tank: &Tank) -> Result<(), SaveError> {
    let entities = tank.entities();
    let serials: HashMap<Entity, Serial> = entities
        .iter()
        .map(|(entity, body)| (*entity, body.serial))
        .collect();

    let bodies = entities
        .into_iter()
        .map(|(_, body)| {
            let last_collision = body
                .scratch
                .last_collision
                .and_then(|partner| serials.get(&partner).copied());
            SavedBody { body, last_collision }
        })
        .collect();

    let save_data = SaveData {
        version: SAVE_VERSION,
        tick: tank.tick,
        next_serial: tank.next_serial,
        config: tank.config.clone(),
        rng: tank.rng.clone(),
        bodies,
    };

    bincode::serialize_into(writer, &save_data)?;
    Ok(())
}

/// Load a tank from a reader
pub fn load_tank<R: Read>(reader: R) -> Result<Tank, SaveError> {
    let save_data: SaveData = bincode::deserialize_from(reader)?;

    if save_data.version != SAVE_VERSION {
        return Err(SaveError::VersionMismatch {
            expected: SAVE_VERSION,
            found: save_data.version,
        });
    }

    let errors = save_data.config.validate();
    if !errors.is_empty() {
        log::warn!("Rejected saved tank with {} config errors", errors.len());
        return Err(SaveError::InvalidConfig(errors));
    }

    let mut tank = Tank::new(save_data.config);
    tank.rng = save_data.rng;
    tank.tick = save_data.tick;
    tank.next_serial = save_data.next_serial;

    let mut entities: HashMap<Serial, Entity> = HashMap::with_capacity(save_data.bodies.len());
    let mut partners = Vec::new();
    for saved in save_data.bodies {
        let serial = saved.body.serial;
        let entity = saved.body.spawn_into(&mut tank.world);
        entities.insert(serial, entity);
        if let Some(partner) = saved.last_collision {
            partners.push((entity, partner));
        }
    }

    for (entity, partner) in partners {
        let partner = entities.get(&partner).copied();
        if let Ok(mut scratch) = tank.world.get::<&mut Scratch>(entity) {
            scratch.last_collision = partner;
        }
    }

    log::info!(
        "Loaded tank at tick {} with {} bodies",
        tank.tick,
        tank.body_count()
    );
    Ok(tank)
}

/// Read a JSON tank configuration and validate it
pub fn load_config<R: Read>(reader: R) -> Result<TankConfig, SaveError> {
    let config: TankConfig = serde_json::from_reader(reader)?;
    let errors = config.validate();
    if errors.is_empty() {
        Ok(config)
    } else {
        Err(SaveError::InvalidConfig(errors))
    }
}

/// Write a tank configuration as pretty-printed JSON
pub fn save_config<W: Write>(writer: W, config: &TankConfig) -> Result<(), SaveError> {
    serde_json::to_writer_pretty(writer, config)?;
    Ok(())
}

/// Errors that can occur during save/load
#[derive(Debug)]
pub enum SaveError {
    Io(std::io::Error),
    Bincode(Box<bincode::ErrorKind>),
    Json(serde_json::Error),
    VersionMismatch { expected: u32, found: u32 },
    InvalidConfig(Vec<ConfigError>),
}

impl From<std::io::Error> for SaveError {
    fn from(e: std::io::Error) -> Self {
        SaveError::Io(e)
    }
}

impl From<Box<bincode::ErrorKind>> for SaveError {
    fn from(e: Box<bincode::ErrorKind>) -> Self {
        SaveError::Bincode(e)
    }
}

impl From<serde_json::Error> for SaveError {
    fn from(e: serde_json::Error) -> Self {
        SaveError::Json(e)
    }
}

impl std::fmt::Display for SaveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaveError::Io(e) => write!(f, "IO error: {}", e),
            SaveError::Bincode(e) => write!(f, "Serialization error: {}", e),
            SaveError::Json(e) => write!(f, "Config error: {}", e),
            SaveError::VersionMismatch { expected, found } => {
                write!(
                    f,
                    "Save version mismatch: expected {}, found {}",
                    expected, found
                )
            }
            SaveError::InvalidConfig(errors) => {
                let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
                write!(f, "Invalid config: {}", messages.join("; "))
            }
        }
    }
}

impl std::error::Error for SaveError {}
