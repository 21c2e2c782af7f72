//! Innkeeper – the data and consistency layer of a small hotel desk.
//!
//! Innkeeper keeps three collections in memory and mirrors each of them to a
//! flat comma-delimited file:
//! * A [`construct::Customer`] is someone who can book; identified by a caller-assigned integer.
//! * A [`construct::Room`] has a type and a nightly [`datatype::Price`], plus a derived booked flag.
//! * A [`construct::Booking`] ties one customer to one room for a check-in/check-out date range.
//!
//! Each collection is owned by a [`construct::Keeper`], which enforces unique
//! identifiers and answers lookups by binary search over an identifier-sorted
//! index (see [`order`]). The index is rebuilt lazily after mutations, so
//! listings and persisted files always come out in identifier order.
//!
//! ## Modules
//! * [`construct`] – Entities, the booking identifier generator and the generic keeper.
//! * [`datatype`] – Prices, amounts and the `YYYY-MM-DD` date form.
//! * [`order`] – The identifier index behind lookups and ordered listings.
//! * [`persist`] – Row codec and the [`persist::Persistor`] that reads and writes tables.
//! * [`hotel`] – The [`hotel::Hotel`], which links bookings to rooms and customers and keeps
//!   every room's booked flag in step with the bookings.
//! * [`settings`] – Layered configuration of where the tables live.
//!
//! ## Consistency
//! A room is booked exactly when an active booking references it. Only
//! [`hotel::Hotel::create_booking`] and [`hotel::Hotel::cancel_booking`] change
//! that, and restoring re-derives the flag from the bookings on disk. Booking
//! identifiers are handed out in increasing order and never reused; after a
//! restart numbering resumes after the largest identifier found.
//!
//! ## Persistence
//! Every mutation flushes the tables it touched before returning. Rows that
//! cannot be read back are skipped and reported through
//! [`hotel::Hotel::load_warnings`] instead of failing the whole load.
//!
//! ## Quick Start
//! ```
//! use chrono::NaiveDate;
//! use innkeeper::construct::{Customer, Room};
//! use innkeeper::hotel::Hotel;
//! use innkeeper::persist::{PersistenceMode, Persistor};
//!
//! let mut hotel = Hotel::open(Persistor::new(PersistenceMode::InMemory)).unwrap();
//! hotel.add_room(Room::new(101, "Single".into(), "1200".parse().unwrap())).unwrap();
//! hotel.add_customer(Customer::new(1, "Alice".into(), "alice@example.com".into(), "5550100".into())).unwrap();
//! let day = |d| NaiveDate::from_ymd_opt(2024, 5, d).unwrap();
//! let charge = hotel.create_booking(1, 101, day(1), day(3)).unwrap();
//! assert_eq!(charge.nights, 2);
//! assert!(hotel.room(101).unwrap().is_booked());
//! ```

pub mod construct;
pub mod datatype;
pub mod error;
pub mod hotel;
pub mod order;
pub mod persist;
pub mod settings;

pub use construct::Keepsake;
pub use error::{EntityKind, InnkeeperError, MalformedRecord, Result};
