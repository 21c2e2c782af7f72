// used for stay dates
use chrono::NaiveDate;

// used to print out readable forms of a construct
use std::fmt;

// our own stuff that we need
use crate::datatype::{self, Amount, Price};
use crate::error::{EntityKind, InnkeeperError, Result};
use crate::order::IdentifierIndex;

// ------------- Identifier -------------
pub type Identifier = u32;

pub const GENESIS: Identifier = 0;

/// Anything a [`Keeper`] can keep: it must carry a stable identifier.
pub trait Keepsake {
    const KIND: EntityKind;
    fn id(&self) -> Identifier;
}

// ------------- Customer -------------
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    id: Identifier,
    name: String,
    email: String,
    phone: String,
}

impl Customer {
    pub fn new(id: Identifier, name: String, email: String, phone: String) -> Self {
        Self {
            id,
            name,
            email,
            phone,
        }
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn email(&self) -> &str {
        &self.email
    }
    pub fn phone(&self) -> &str {
        &self.phone
    }
    pub fn set_name(&mut self, name: String) {
        self.name = name;
    }
    pub fn set_email(&mut self, email: String) {
        self.email = email;
    }
    pub fn set_phone(&mut self, phone: String) {
        self.phone = phone;
    }
}
impl Keepsake for Customer {
    const KIND: EntityKind = EntityKind::Customer;
    fn id(&self) -> Identifier {
        self.id
    }
}
impl fmt::Display for Customer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Customer {}: {} <{}> {}", self.id, self.name, self.email, self.phone)
    }
}

// ------------- Room -------------
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    id: Identifier,
    room_type: String,
    price: Price,
    booked: bool, // derived from the bookings, see Hotel
}

impl Room {
    pub fn new(id: Identifier, room_type: String, price: Price) -> Self {
        Self {
            id,
            room_type,
            price,
            booked: false,
        }
    }
    pub fn room_type(&self) -> &str {
        &self.room_type
    }
    pub fn price(&self) -> &Price {
        &self.price
    }
    pub fn is_booked(&self) -> bool {
        self.booked
    }
    pub fn set_room_type(&mut self, room_type: String) {
        self.room_type = room_type;
    }
    pub fn set_price(&mut self, price: Price) {
        self.price = price;
    }
    // The booked flag mirrors the booking collection and may only be
    // touched by the code that keeps the two in step.
    pub(crate) fn set_booked(&mut self, booked: bool) {
        self.booked = booked;
    }
}
impl Keepsake for Room {
    const KIND: EntityKind = EntityKind::Room;
    fn id(&self) -> Identifier {
        self.id
    }
}
impl fmt::Display for Room {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Room {}: {} at {}/night ({})",
            self.id,
            self.room_type,
            self.price,
            if self.booked { "booked" } else { "available" }
        )
    }
}

// ------------- Booking -------------
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booking {
    id: Identifier,
    room_id: Identifier,
    customer_id: Identifier,
    check_in: NaiveDate,
    check_out: NaiveDate, // exclusive
}

impl Booking {
    pub(crate) fn new(
        id: Identifier,
        room_id: Identifier,
        customer_id: Identifier,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> Result<Self> {
        if check_out <= check_in {
            return Err(InnkeeperError::InvalidDateRange {
                check_in,
                check_out,
            });
        }
        Ok(Self {
            id,
            room_id,
            customer_id,
            check_in,
            check_out,
        })
    }
    pub fn room_id(&self) -> Identifier {
        self.room_id
    }
    pub fn customer_id(&self) -> Identifier {
        self.customer_id
    }
    pub fn check_in(&self) -> NaiveDate {
        self.check_in
    }
    pub fn check_out(&self) -> NaiveDate {
        self.check_out
    }
    pub fn nights(&self) -> i64 {
        datatype::nights(&self.check_in, &self.check_out)
    }
}
impl Keepsake for Booking {
    const KIND: EntityKind = EntityKind::Booking;
    fn id(&self) -> Identifier {
        self.id
    }
}
impl fmt::Display for Booking {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Booking #{}: Room {} for customer {} from {} to {}",
            self.id, self.room_id, self.customer_id, self.check_in, self.check_out
        )
    }
}

// ------------- Charge -------------
/// A booking together with what it costs at the booked room's price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Charge {
    pub booking: Booking,
    pub nights: i64,
    pub cost: Amount,
}
impl Charge {
    pub fn new(booking: Booking, room: &Room) -> Self {
        let nights = booking.nights();
        let cost = room.price().times(nights);
        Self {
            booking,
            nights,
            cost,
        }
    }
}

// ------------- BookingGenerator -------------
// Booking identifiers only ever grow, so a cancelled booking's
// identifier is never handed out again.
#[derive(Debug)]
pub struct BookingGenerator {
    lower_bound: Identifier,
}

impl BookingGenerator {
    pub fn new() -> Self {
        Self {
            lower_bound: GENESIS,
        }
    }
    // Needed when restoring, so that the next booking continues after
    // the largest identifier found on disk.
    pub fn retain(&mut self, id: Identifier) {
        if id > self.lower_bound {
            self.lower_bound = id;
        }
    }
    /// The identifier the next call to `generate` hands out, or `None` once
    /// the largest identifier has been used.
    pub fn peek(&self) -> Option<Identifier> {
        self.lower_bound.checked_add(1)
    }
    pub fn generate(&mut self) -> Result<Identifier> {
        self.lower_bound = self.peek().ok_or(InnkeeperError::IdentifiersExhausted)?;
        Ok(self.lower_bound)
    }
}

impl Default for BookingGenerator {
    fn default() -> Self {
        Self::new()
    }
}

// ------------- Keeper -------------
/// Owns a collection of keepsakes, guarantees their identifiers are unique and
/// serves lookups and listings in identifier order.
#[derive(Debug)]
pub struct Keeper<T: Keepsake> {
    kept: Vec<T>,
    index: IdentifierIndex,
}

impl<T: Keepsake> Keeper<T> {
    pub fn new() -> Self {
        Self {
            kept: Vec::new(),
            index: IdentifierIndex::new(),
        }
    }
    fn position(&self, id: Identifier) -> Option<usize> {
        self.index.position(&self.kept, &id, |t| t.id())
    }
    /// Takes over keepsakes whose identifiers are already known to be unique.
    /// The index is sorted once, on the first lookup.
    pub(crate) fn from_unique(kept: Vec<T>) -> Self {
        let index = IdentifierIndex::new();
        index.invalidate();
        Self { kept, index }
    }
    /// The duplicate check leaves the index fresh, so the new keepsake is
    /// slotted into it rather than forcing a full sort on the next lookup.
    pub fn add(&mut self, keepsake: T) -> Result<&T> {
        let id = keepsake.id();
        let slot = match self.index.search(&self.kept, &id, |t| t.id()) {
            Ok(_) => return Err(InnkeeperError::DuplicateId { kind: T::KIND, id }),
            Err(slot) => slot,
        };
        self.kept.push(keepsake);
        let position = self.kept.len() - 1;
        self.index.insert(slot, position);
        Ok(&self.kept[position])
    }
    pub fn find(&self, id: Identifier) -> Option<&T> {
        self.position(id).map(|p| &self.kept[p])
    }
    pub fn contains(&self, id: Identifier) -> bool {
        self.position(id).is_some()
    }
    /// Applies `mutator` in place. Identifiers are not reachable through
    /// the keepsakes' public setters, so the index stays valid.
    pub fn update<F, R>(&mut self, id: Identifier, mutator: F) -> Result<R>
    where
        F: FnOnce(&mut T) -> R,
    {
        match self.position(id) {
            Some(p) => Ok(mutator(&mut self.kept[p])),
            None => Err(InnkeeperError::NotFound { kind: T::KIND, id }),
        }
    }
    pub fn delete(&mut self, id: Identifier) -> Option<T> {
        let p = self.position(id)?;
        let deleted = self.kept.remove(p);
        self.index.invalidate();
        Some(deleted)
    }
    /// Lazily walks the keepsakes in ascending identifier order. The walk can be
    /// restarted simply by calling this again; the sort is reused until a mutation.
    pub fn all(&self) -> Kept<'_, T> {
        Kept {
            kept: &self.kept,
            order: self.index.ordered(&self.kept, |t| t.id()),
            next: 0,
        }
    }
    pub fn len(&self) -> usize {
        self.kept.len()
    }
    pub fn is_empty(&self) -> bool {
        self.kept.is_empty()
    }
}

impl<T: Keepsake> Default for Keeper<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// The keepsakes of a [`Keeper`] in identifier order, see [`Keeper::all`].
pub struct Kept<'k, T> {
    kept: &'k [T],
    order: std::cell::Ref<'k, [usize]>,
    next: usize,
}
impl<'k, T> Iterator for Kept<'k, T> {
    type Item = &'k T;
    fn next(&mut self) -> Option<&'k T> {
        let p = *self.order.get(self.next)?;
        self.next += 1;
        let kept = self.kept;
        Some(&kept[p])
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.order.len() - self.next;
        (remaining, Some(remaining))
    }
}
impl<'k, T> ExactSizeIterator for Kept<'k, T> {}
