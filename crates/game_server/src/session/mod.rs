//! Session state: rooms, players and the connections they belong to.
//!
//! [`Registry`] owns every [`Room`] and [`Player`] and keeps the mapping
//! between connections, players and rooms consistent. It performs no I/O;
//! the [`crate::coordinator::Coordinator`] wraps it with locking and
//! outbound messaging.

pub mod error;
pub mod player;
pub mod registry;
pub mod room;

pub use error::SessionError;
pub use player::{Changes, PinPresence, Pins, Player, PlayerPatch, PlayerSnapshot, PlayerState};
pub use registry::{
    Departure, Disconnect, JoinOutcome, PlayerUpdate, Registry, RegistryStats, StartOutcome,
    DEFAULT_MAX_NAME_LENGTH,
};
pub use room::{Room, RoomListing, RoomPhase, ROOM_CAPACITY};
