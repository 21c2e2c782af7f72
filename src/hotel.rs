//! The hotel wires the three keepers to a persistor and keeps them consistent.
//!
//! A room's booked flag is a materialized view of the booking collection: it is
//! true exactly when an active booking references the room. Nothing outside this
//! module can set it, and the only operations that change it are
//! [`Hotel::create_booking`] and [`Hotel::cancel_booking`], which update both
//! collections before returning. Restoring re-derives the flag from the bookings
//! rather than trusting the persisted column.
//!
//! Every mutation flushes the affected tables before returning. A failed flush is
//! reported but the in-memory change stands, so memory stays authoritative until
//! the next successful write.

use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::construct::{
    Booking, BookingGenerator, Charge, Customer, Identifier, Keeper, Keepsake, Room,
};
use crate::datatype::Amount;
use crate::error::{InnkeeperError, MalformedRecord, Result};
use crate::persist::{Persistor, Record};

// ------------- Hotel -------------
pub struct Hotel {
    customers: Keeper<Customer>,
    rooms: Keeper<Room>,
    bookings: Keeper<Booking>,
    booking_generator: BookingGenerator,
    // responsible for the persistence layer
    persistor: Persistor,
    load_warnings: Vec<MalformedRecord>,
}

impl Hotel {
    /// Restores whatever the persistor holds. Rooms and customers are restored
    /// first so that bookings can be linked to them.
    pub fn open(persistor: Persistor) -> Result<Hotel> {
        let mut hotel = Hotel {
            customers: Keeper::new(),
            rooms: Keeper::new(),
            bookings: Keeper::new(),
            booking_generator: BookingGenerator::new(),
            persistor,
            load_warnings: Vec::new(),
        };
        hotel.restore()?;
        Ok(hotel)
    }

    fn restore(&mut self) -> Result<()> {
        let customers = self.persistor.restore::<Customer>()?;
        let rooms = self.persistor.restore::<Room>()?;
        self.customers = customers.kept;
        self.rooms = rooms.kept;

        // When two rows claim the same room the earlier row wins. Files are
        // written in identifier order, so that is normally the older booking.
        let mut claimed: HashMap<Identifier, Identifier> = HashMap::new();
        let known_rooms = &self.rooms;
        let known_customers = &self.customers;
        let bookings = self.persistor.restore_with::<Booking, _>(|booking| {
            if !known_rooms.contains(booking.room_id()) {
                return Err(format!("refers to missing room {}", booking.room_id()));
            }
            if !known_customers.contains(booking.customer_id()) {
                return Err(format!("refers to missing customer {}", booking.customer_id()));
            }
            if let Some(holder) = claimed.get(&booking.room_id()) {
                return Err(format!(
                    "room {} is already held by booking {}",
                    booking.room_id(),
                    holder
                ));
            }
            claimed.insert(booking.room_id(), booking.id());
            Ok(())
        })?;
        for booking in bookings.kept.all() {
            self.booking_generator.retain(booking.id());
        }
        self.bookings = bookings.kept;
        self.load_warnings.extend(customers.malformed);
        self.load_warnings.extend(rooms.malformed);
        self.load_warnings.extend(bookings.malformed);

        // re-derive the booked flags
        let room_ids: Vec<Identifier> = self.rooms.all().map(|r| r.id()).collect();
        for room_id in room_ids {
            let booked = claimed.contains_key(&room_id);
            self.rooms.update(room_id, |room| {
                if room.is_booked() != booked {
                    warn!(room = room_id, stored = room.is_booked(), derived = booked, "correcting booked flag");
                    room.set_booked(booked);
                }
            })?;
        }
        info!(
            customers = self.customers.len(),
            rooms = self.rooms.len(),
            bookings = self.bookings.len(),
            skipped = self.load_warnings.len(),
            next_booking = ?self.booking_generator.peek(),
            "restored"
        );
        Ok(())
    }

    /// Rows that were skipped while restoring.
    pub fn load_warnings(&self) -> &[MalformedRecord] {
        &self.load_warnings
    }
    pub fn persistor(&self) -> &Persistor {
        &self.persistor
    }
    /// `None` once a stored booking holds the largest possible identifier.
    pub fn next_booking_id(&self) -> Option<Identifier> {
        self.booking_generator.peek()
    }

    fn persist<T: Record>(persistor: &mut Persistor, keeper: &Keeper<T>) -> Result<()> {
        persistor.persist(keeper).inspect_err(|e| {
            warn!(error = %e, "memory and storage are out of step until the next successful write");
        })
    }

    // Both tables are attempted even if the first write fails.
    fn persist_bookings_and_rooms(&mut self) -> Result<()> {
        let bookings = Self::persist(&mut self.persistor, &self.bookings);
        let rooms = Self::persist(&mut self.persistor, &self.rooms);
        bookings.and(rooms)
    }

    // ------------- Customers -------------
    pub fn add_customer(&mut self, customer: Customer) -> Result<()> {
        self.customers.add(customer)?;
        Self::persist(&mut self.persistor, &self.customers)
    }
    pub fn customer(&self, id: Identifier) -> Option<&Customer> {
        self.customers.find(id)
    }
    pub fn customers(&self) -> impl Iterator<Item = &Customer> {
        self.customers.all()
    }
    pub fn update_customer<F>(&mut self, id: Identifier, mutator: F) -> Result<()>
    where
        F: FnOnce(&mut Customer),
    {
        self.customers.update(id, mutator)?;
        Self::persist(&mut self.persistor, &self.customers)
    }
    /// Customers with active bookings cannot be deleted; cancel their bookings first.
    pub fn delete_customer(&mut self, id: Identifier) -> Result<Customer> {
        if !self.customers.contains(id) {
            return Err(InnkeeperError::customer_not_found(id));
        }
        if self.bookings_of(id).next().is_some() {
            return Err(InnkeeperError::CustomerHasBookings(id));
        }
        let customer = self
            .customers
            .delete(id)
            .ok_or_else(|| InnkeeperError::customer_not_found(id))?;
        Self::persist(&mut self.persistor, &self.customers)?;
        Ok(customer)
    }

    // ------------- Rooms -------------
    /// Rooms always enter the hotel available, whatever flag they carry.
    pub fn add_room(&mut self, mut room: Room) -> Result<()> {
        room.set_booked(false);
        self.rooms.add(room)?;
        Self::persist(&mut self.persistor, &self.rooms)
    }
    pub fn room(&self, id: Identifier) -> Option<&Room> {
        self.rooms.find(id)
    }
    pub fn rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.all()
    }
    /// Only the type and price are reachable through a room's public setters.
    pub fn update_room<F>(&mut self, id: Identifier, mutator: F) -> Result<()>
    where
        F: FnOnce(&mut Room),
    {
        self.rooms.update(id, mutator)?;
        Self::persist(&mut self.persistor, &self.rooms)
    }
    pub fn delete_room(&mut self, id: Identifier) -> Result<Room> {
        match self.rooms.find(id) {
            None => return Err(InnkeeperError::room_not_found(id)),
            Some(room) if room.is_booked() => return Err(InnkeeperError::RoomHasBooking(id)),
            Some(_) => (),
        }
        let room = self
            .rooms
            .delete(id)
            .ok_or_else(|| InnkeeperError::room_not_found(id))?;
        Self::persist(&mut self.persistor, &self.rooms)?;
        Ok(room)
    }
    /// Available rooms whose type matches, ignoring case, in identifier order.
    pub fn available_rooms_of_type<'h>(
        &'h self,
        room_type: &'h str,
    ) -> impl Iterator<Item = &'h Room> + 'h {
        self.rooms
            .all()
            .filter(move |r| !r.is_booked() && r.room_type().eq_ignore_ascii_case(room_type))
    }

    // ------------- Bookings -------------
    /// Books a room for a customer. Checks run in order (room exists, customer
    /// exists, room available, dates ordered) and nothing changes unless all pass.
    pub fn create_booking(
        &mut self,
        customer_id: Identifier,
        room_id: Identifier,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> Result<Charge> {
        let room = self
            .rooms
            .find(room_id)
            .ok_or_else(|| InnkeeperError::room_not_found(room_id))?;
        if !self.customers.contains(customer_id) {
            return Err(InnkeeperError::customer_not_found(customer_id));
        }
        if room.is_booked() {
            return Err(InnkeeperError::RoomAlreadyBooked(room_id));
        }
        // peek, so a rejected date range does not consume an identifier
        let id = self
            .booking_generator
            .peek()
            .ok_or(InnkeeperError::IdentifiersExhausted)?;
        let booking = Booking::new(
            id,
            room_id,
            customer_id,
            check_in,
            check_out,
        )?;
        let charge = Charge::new(booking.clone(), room);

        self.booking_generator.generate()?;
        self.bookings.add(booking)?;
        self.rooms.update(room_id, |room| room.set_booked(true))?;
        info!(booking = charge.booking.id(), room = room_id, customer = customer_id, nights = charge.nights, "booked");

        self.persist_bookings_and_rooms()?;
        Ok(charge)
    }

    /// Cancels a booking and frees its room.
    pub fn cancel_booking(&mut self, booking_id: Identifier) -> Result<Booking> {
        let booking = self
            .bookings
            .delete(booking_id)
            .ok_or_else(|| InnkeeperError::booking_not_found(booking_id))?;
        self.rooms
            .update(booking.room_id(), |room| room.set_booked(false))?;
        info!(booking = booking_id, room = booking.room_id(), "cancelled");

        self.persist_bookings_and_rooms()?;
        Ok(booking)
    }

    pub fn booking(&self, id: Identifier) -> Option<&Booking> {
        self.bookings.find(id)
    }
    pub fn bookings(&self) -> impl Iterator<Item = &Booking> {
        self.bookings.all()
    }
    pub fn bookings_of(&self, customer_id: Identifier) -> impl Iterator<Item = &Booking> {
        self.bookings
            .all()
            .filter(move |b| b.customer_id() == customer_id)
    }
    /// Bookings by check-in date; bookings starting the same day keep identifier order.
    pub fn bookings_by_check_in(&self) -> Vec<&Booking> {
        let mut bookings: Vec<&Booking> = self.bookings.all().collect();
        bookings.sort_by_key(|b| b.check_in());
        bookings
    }

    /// Everything a customer owes for their active bookings.
    pub fn bill_for(&self, customer_id: Identifier) -> Result<Bill<'_>> {
        if !self.customers.contains(customer_id) {
            return Err(InnkeeperError::customer_not_found(customer_id));
        }
        Ok(Bill {
            hotel: self,
            customer_id,
        })
    }
}

// ------------- Bill -------------
pub struct Bill<'h> {
    hotel: &'h Hotel,
    customer_id: Identifier,
}

impl<'h> Bill<'h> {
    pub fn customer_id(&self) -> Identifier {
        self.customer_id
    }
    /// One charge per booking, computed as the walk proceeds.
    pub fn charges(&self) -> impl Iterator<Item = Charge> + use<'h> {
        let hotel = self.hotel;
        hotel.bookings_of(self.customer_id).filter_map(move |booking| {
            hotel
                .rooms
                .find(booking.room_id())
                .map(|room| Charge::new(booking.clone(), room))
        })
    }
    pub fn total(&self) -> Amount {
        self.charges().map(|charge| charge.cost).sum()
    }
}
