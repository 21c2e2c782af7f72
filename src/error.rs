use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::construct::Identifier;

/// The kind of entity an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Customer,
    Room,
    Booking,
}
impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EntityKind::Customer => write!(f, "Customer"),
            EntityKind::Room => write!(f, "Room"),
            EntityKind::Booking => write!(f, "Booking"),
        }
    }
}

/// A row that could not be restored. Collected during load, never fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{table}, line {line}: {reason}")]
pub struct MalformedRecord {
    pub table: &'static str,
    pub line: usize,
    pub reason: String,
}

#[derive(Error, Debug)]
pub enum InnkeeperError {
    #[error("{kind} {id} already exists")]
    DuplicateId { kind: EntityKind, id: Identifier },
    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: Identifier },
    #[error("Room {0} is already booked")]
    RoomAlreadyBooked(Identifier),
    #[error("Check-out {check_out} must be after check-in {check_in}")]
    InvalidDateRange {
        check_in: chrono::NaiveDate,
        check_out: chrono::NaiveDate,
    },
    #[error("Price must be positive, got {0}")]
    InvalidPrice(String),
    #[error("Customer {0} still has active bookings")]
    CustomerHasBookings(Identifier),
    #[error("Room {0} is currently booked")]
    RoomHasBooking(Identifier),
    #[error("Booking identifiers are exhausted")]
    IdentifiersExhausted,
    #[error("Persistence error on {}: {source}", .path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Config error: {0}")]
    Config(String),
    #[error("Malformed record: {0}")]
    Malformed(#[from] MalformedRecord),
}

impl InnkeeperError {
    pub fn customer_not_found(id: Identifier) -> Self {
        Self::NotFound { kind: EntityKind::Customer, id }
    }
    pub fn room_not_found(id: Identifier) -> Self {
        Self::NotFound { kind: EntityKind::Room, id }
    }
    pub fn booking_not_found(id: Identifier) -> Self {
        Self::NotFound { kind: EntityKind::Booking, id }
    }
}

pub type Result<T> = std::result::Result<T, InnkeeperError>;

// Helper conversions
impl From<config::ConfigError> for InnkeeperError {
    fn from(e: config::ConfigError) -> Self {
        Self::Config(e.to_string())
    }
}
