use chrono::NaiveDate;
use innkeeper::Keepsake;
use innkeeper::construct::{Customer, Room};
use innkeeper::datatype::Amount;
use innkeeper::hotel::Hotel;
use innkeeper::persist::{PersistenceMode, Persistor};
use innkeeper::{EntityKind, InnkeeperError};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
}

fn empty() -> Hotel {
    Hotel::open(Persistor::new(PersistenceMode::InMemory)).expect("hotel")
}

fn setup() -> Hotel {
    let mut hotel = empty();
    hotel
        .add_room(Room::new(101, "Single".to_string(), "1200".parse().unwrap()))
        .unwrap();
    hotel
        .add_room(Room::new(102, "Double".to_string(), "2000".parse().unwrap()))
        .unwrap();
    hotel
        .add_customer(Customer::new(
            1,
            "Alice".to_string(),
            "alice@email.com".to_string(),
            "5550101".to_string(),
        ))
        .unwrap();
    hotel
}

#[test]
fn booking_on_empty_store_reports_missing_room_first() {
    let mut hotel = empty();
    let err = hotel.create_booking(1, 101, day(1), day(3)).unwrap_err();
    assert!(matches!(
        err,
        InnkeeperError::NotFound { kind: EntityKind::Room, id: 101 }
    ));
    assert_eq!(hotel.bookings().count(), 0);
}

#[test]
fn booking_for_unknown_customer_fails() {
    let mut hotel = setup();
    let err = hotel.create_booking(9, 101, day(1), day(3)).unwrap_err();
    assert!(matches!(
        err,
        InnkeeperError::NotFound { kind: EntityKind::Customer, id: 9 }
    ));
    assert!(!hotel.room(101).unwrap().is_booked());
}

#[test]
fn booking_charges_nights_times_price() {
    let mut hotel = setup();
    let charge = hotel.create_booking(1, 101, day(1), day(3)).expect("booked");
    assert_eq!(charge.nights, 2);
    assert_eq!(charge.cost, Amount::from(2400));
    assert_eq!(charge.booking.id(), 1);
    assert!(hotel.room(101).unwrap().is_booked());
    assert!(!hotel.room(102).unwrap().is_booked());
}

#[test]
fn booked_room_cannot_be_booked_again() {
    let mut hotel = setup();
    hotel.create_booking(1, 101, day(1), day(3)).unwrap();
    let err = hotel.create_booking(1, 101, day(10), day(12)).unwrap_err();
    assert!(matches!(err, InnkeeperError::RoomAlreadyBooked(101)));
    assert_eq!(hotel.bookings().count(), 1);
    assert!(hotel.room(101).unwrap().is_booked());
    assert_eq!(hotel.next_booking_id(), Some(2));
}

#[test]
fn check_out_must_follow_check_in() {
    let mut hotel = setup();
    let err = hotel.create_booking(1, 101, day(3), day(1)).unwrap_err();
    assert!(matches!(err, InnkeeperError::InvalidDateRange { .. }));
    let err = hotel.create_booking(1, 101, day(3), day(3)).unwrap_err();
    assert!(matches!(err, InnkeeperError::InvalidDateRange { .. }));
    assert_eq!(hotel.bookings().count(), 0);
    assert!(!hotel.room(101).unwrap().is_booked());
    // rejected attempts do not consume identifiers
    assert_eq!(hotel.next_booking_id(), Some(1));
}

#[test]
fn cancelling_frees_the_room_once() {
    let mut hotel = setup();
    let charge = hotel.create_booking(1, 101, day(1), day(3)).unwrap();
    let cancelled = hotel.cancel_booking(charge.booking.id()).expect("cancelled");
    assert_eq!(cancelled, charge.booking);
    assert!(!hotel.room(101).unwrap().is_booked());
    assert!(hotel.bookings().all(|b| b.id() != charge.booking.id()));
    let err = hotel.cancel_booking(charge.booking.id()).unwrap_err();
    assert!(matches!(
        err,
        InnkeeperError::NotFound { kind: EntityKind::Booking, .. }
    ));
}

#[test]
fn identifiers_are_never_reused_after_cancel() {
    let mut hotel = setup();
    let first = hotel.create_booking(1, 101, day(1), day(3)).unwrap();
    hotel.cancel_booking(first.booking.id()).unwrap();
    let second = hotel.create_booking(1, 101, day(4), day(5)).unwrap();
    let third = hotel.create_booking(1, 102, day(4), day(5)).unwrap();
    assert_eq!(first.booking.id(), 1);
    assert_eq!(second.booking.id(), 2);
    assert_eq!(third.booking.id(), 3);
}

#[test]
fn booked_flag_tracks_active_bookings() {
    let mut hotel = setup();
    let a = hotel.create_booking(1, 101, day(1), day(2)).unwrap();
    let b = hotel.create_booking(1, 102, day(1), day(2)).unwrap();
    hotel.cancel_booking(a.booking.id()).unwrap();
    for room in hotel.rooms() {
        let referenced = hotel.bookings().any(|bk| bk.room_id() == room.id());
        assert_eq!(room.is_booked(), referenced, "room {}", room.id());
    }
    assert_eq!(hotel.booking(b.booking.id()).unwrap().room_id(), 102);
}

#[test]
fn bill_totals_every_booking_of_a_customer() {
    let mut hotel = setup();
    hotel.create_booking(1, 101, day(1), day(3)).unwrap();
    hotel.create_booking(1, 102, day(5), day(8)).unwrap();
    let bill = hotel.bill_for(1).expect("bill");
    let charges: Vec<_> = bill.charges().collect();
    assert_eq!(charges.len(), 2);
    assert_eq!(charges[0].cost, Amount::from(2400));
    assert_eq!(charges[1].nights, 3);
    assert_eq!(charges[1].cost, Amount::from(6000));
    assert_eq!(bill.total(), Amount::from(8400));
}

#[test]
fn bill_for_customer_without_bookings_is_empty() {
    let hotel = setup();
    let bill = hotel.bill_for(1).expect("bill");
    assert_eq!(bill.charges().count(), 0);
    assert_eq!(bill.total(), Amount::zero());
    assert!(matches!(
        hotel.bill_for(2),
        Err(InnkeeperError::NotFound { kind: EntityKind::Customer, id: 2 })
    ));
}
