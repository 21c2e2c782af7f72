// used for persistence
use std::collections::{HashMap, HashSet};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::{debug, warn};

use crate::construct::{Booking, Customer, Identifier, Keeper, Keepsake, Room};
use crate::datatype::{format_date, parse_date, Price};
use crate::error::{InnkeeperError, MalformedRecord, Result};

// ------------- Tables -------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Customers,
    Rooms,
    Bookings,
}
impl Table {
    pub fn name(&self) -> &'static str {
        match self {
            Table::Customers => "customers",
            Table::Rooms => "rooms",
            Table::Bookings => "bookings",
        }
    }
}

/// A keepsake that can be written as, and read back from, one delimited row.
pub trait Record: Keepsake + Sized {
    const TABLE: Table;
    const HEADER: &'static str;
    const COLUMNS: usize;
    fn to_fields(&self) -> Vec<String>;
    fn from_fields(fields: &[&str]) -> std::result::Result<Self, String>;
}

// Numbers, dates and flags may be padded; text fields are kept as written.
fn parse_id(field: &str, column: &str) -> std::result::Result<Identifier, String> {
    field
        .trim()
        .parse::<Identifier>()
        .map_err(|_| format!("{} '{}' is not a number", column, field))
}

fn parse_day(field: &str, column: &str) -> std::result::Result<chrono::NaiveDate, String> {
    parse_date(field).ok_or_else(|| format!("{} '{}' is not a YYYY-MM-DD date", column, field))
}

impl Record for Customer {
    const TABLE: Table = Table::Customers;
    const HEADER: &'static str = "id,name,email,phone";
    const COLUMNS: usize = 4;
    fn to_fields(&self) -> Vec<String> {
        vec![
            self.id().to_string(),
            self.name().to_string(),
            self.email().to_string(),
            self.phone().to_string(),
        ]
    }
    fn from_fields(fields: &[&str]) -> std::result::Result<Self, String> {
        Ok(Customer::new(
            parse_id(fields[0], "id")?,
            fields[1].to_string(),
            fields[2].to_string(),
            fields[3].to_string(),
        ))
    }
}

impl Record for Room {
    const TABLE: Table = Table::Rooms;
    const HEADER: &'static str = "id,type,price,isBooked";
    const COLUMNS: usize = 4;
    fn to_fields(&self) -> Vec<String> {
        vec![
            self.id().to_string(),
            self.room_type().to_string(),
            self.price().to_string(),
            self.is_booked().to_string(),
        ]
    }
    fn from_fields(fields: &[&str]) -> std::result::Result<Self, String> {
        let id = parse_id(fields[0], "id")?;
        let price = Price::from_str(fields[2]).map_err(|e| e.to_string())?;
        let booked = fields[3]
            .trim()
            .parse::<bool>()
            .map_err(|_| format!("isBooked '{}' is neither true nor false", fields[3]))?;
        let mut room = Room::new(id, fields[1].to_string(), price);
        room.set_booked(booked);
        Ok(room)
    }
}

impl Record for Booking {
    const TABLE: Table = Table::Bookings;
    const HEADER: &'static str = "id,roomId,customerId,checkInDate,checkOutDate";
    const COLUMNS: usize = 5;
    fn to_fields(&self) -> Vec<String> {
        vec![
            self.id().to_string(),
            self.room_id().to_string(),
            self.customer_id().to_string(),
            format_date(&self.check_in()),
            format_date(&self.check_out()),
        ]
    }
    fn from_fields(fields: &[&str]) -> std::result::Result<Self, String> {
        Booking::new(
            parse_id(fields[0], "id")?,
            parse_id(fields[1], "roomId")?,
            parse_id(fields[2], "customerId")?,
            parse_day(fields[3], "checkInDate")?,
            parse_day(fields[4], "checkOutDate")?,
        )
        .map_err(|e| e.to_string())
    }
}

// ------------- Codec -------------
/// Header row followed by one row per keepsake, in ascending identifier order.
pub fn encode<T: Record>(keeper: &Keeper<T>) -> String {
    let mut text = String::with_capacity(T::HEADER.len() + 32 * keeper.len());
    text.push_str(T::HEADER);
    text.push('\n');
    for keepsake in keeper.all() {
        text.push_str(&keepsake.to_fields().join(","));
        text.push('\n');
    }
    text
}

#[derive(Debug)]
pub struct Decoded<T: Keepsake> {
    pub kept: Keeper<T>,
    pub malformed: Vec<MalformedRecord>,
}

fn malformed(table: Table, line: usize, reason: String) -> MalformedRecord {
    let record = MalformedRecord {
        table: table.name(),
        line,
        reason,
    };
    warn!(%record, "skipping malformed record");
    record
}

/// Parses everything below the header. Rows that cannot be parsed, or whose
/// identifier was already seen, are skipped and reported instead of failing.
pub fn decode<T: Record>(text: &str) -> Decoded<T> {
    decode_with(text, |_| Ok(()))
}

/// As [`decode`], but each parsed row must also pass `accept`, which sees rows
/// in file order and may reject them with a reason.
pub fn decode_with<T, F>(text: &str, mut accept: F) -> Decoded<T>
where
    T: Record,
    F: FnMut(&T) -> std::result::Result<(), String>,
{
    let mut kept = Vec::new();
    let mut seen = HashSet::new();
    let mut skipped = Vec::new();
    for (n, line) in text.lines().enumerate().skip(1) {
        if line.trim().is_empty() {
            continue;
        }
        let line_number = n + 1;
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() != T::COLUMNS {
            skipped.push(malformed(
                T::TABLE,
                line_number,
                format!("expected {} fields, found {}", T::COLUMNS, fields.len()),
            ));
            continue;
        }
        let keepsake = match T::from_fields(&fields) {
            Ok(keepsake) => keepsake,
            Err(reason) => {
                skipped.push(malformed(T::TABLE, line_number, reason));
                continue;
            }
        };
        if seen.contains(&keepsake.id()) {
            let reason = format!("{} {} appears more than once", T::KIND, keepsake.id());
            skipped.push(malformed(T::TABLE, line_number, reason));
            continue;
        }
        if let Err(reason) = accept(&keepsake) {
            skipped.push(malformed(T::TABLE, line_number, reason));
            continue;
        }
        seen.insert(keepsake.id());
        kept.push(keepsake);
    }
    Decoded {
        kept: Keeper::from_unique(kept),
        malformed: skipped,
    }
}

// ------------- Persistence -------------
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceMode {
    /// Nothing touches the disk; the last written text of each table is kept in memory.
    InMemory,
    /// One file per table inside this directory.
    Directory(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNames {
    pub customers: String,
    pub rooms: String,
    pub bookings: String,
}
impl Default for FileNames {
    fn default() -> Self {
        Self {
            customers: "customers.csv".to_string(),
            rooms: "rooms.csv".to_string(),
            bookings: "bookings.csv".to_string(),
        }
    }
}
impl FileNames {
    pub fn of(&self, table: Table) -> &str {
        match table {
            Table::Customers => &self.customers,
            Table::Rooms => &self.rooms,
            Table::Bookings => &self.bookings,
        }
    }
}

#[derive(Debug)]
pub struct Persistor {
    mode: PersistenceMode,
    files: FileNames,
    memory: HashMap<Table, String>,
}

impl Persistor {
    pub fn new(mode: PersistenceMode) -> Self {
        Self::with_files(mode, FileNames::default())
    }
    pub fn with_files(mode: PersistenceMode, files: FileNames) -> Self {
        Self {
            mode,
            files,
            memory: HashMap::new(),
        }
    }
    pub fn mode(&self) -> &PersistenceMode {
        &self.mode
    }
    pub fn path(&self, table: Table) -> PathBuf {
        match &self.mode {
            PersistenceMode::InMemory => PathBuf::from(self.files.of(table)),
            PersistenceMode::Directory(dir) => dir.join(self.files.of(table)),
        }
    }
    /// Replaces the stored text of a table, as if a previous session had written it.
    pub fn seed(&mut self, table: Table, text: &str) -> Result<()> {
        self.write(table, text.to_string())
    }
    /// The stored text of a table, if it has ever been written.
    pub fn stored(&self, table: Table) -> Result<Option<String>> {
        match &self.mode {
            PersistenceMode::InMemory => Ok(self.memory.get(&table).cloned()),
            PersistenceMode::Directory(_) => {
                let path = self.path(table);
                match fs::read_to_string(&path) {
                    Ok(text) => Ok(Some(text)),
                    Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
                    Err(source) => Err(InnkeeperError::Persistence { path, source }),
                }
            }
        }
    }
    fn write(&mut self, table: Table, text: String) -> Result<()> {
        match &self.mode {
            PersistenceMode::InMemory => {
                self.memory.insert(table, text);
            }
            PersistenceMode::Directory(dir) => {
                ensure_directory(dir)?;
                let path = self.path(table);
                fs::write(&path, text)
                    .map_err(|source| InnkeeperError::Persistence { path, source })?;
            }
        }
        Ok(())
    }
    pub fn persist<T: Record>(&mut self, keeper: &Keeper<T>) -> Result<()> {
        debug!(table = T::TABLE.name(), rows = keeper.len(), "flushing");
        self.write(T::TABLE, encode(keeper))
    }
    /// A table that was never written restores as empty.
    pub fn restore<T: Record>(&self) -> Result<Decoded<T>> {
        self.restore_with(|_| Ok(()))
    }
    pub fn restore_with<T, F>(&self, accept: F) -> Result<Decoded<T>>
    where
        T: Record,
        F: FnMut(&T) -> std::result::Result<(), String>,
    {
        match self.stored(T::TABLE)? {
            Some(text) => Ok(decode_with(&text, accept)),
            None => {
                debug!(table = T::TABLE.name(), "nothing stored yet");
                Ok(Decoded {
                    kept: Keeper::new(),
                    malformed: Vec::new(),
                })
            }
        }
    }
}

fn ensure_directory(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|source| InnkeeperError::Persistence {
        path: dir.to_path_buf(),
        source,
    })
}
