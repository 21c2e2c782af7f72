//! Opens the hotel described by the settings and prints what it holds.
//!
//! Usage: `innkeeper [settings.toml]`. Without an argument an optional
//! `innkeeper.toml` in the working directory is used, and `INNKEEPER_*`
//! environment variables override either.

use std::path::PathBuf;
use std::process::ExitCode;

use tracing::warn;
use tracing_subscriber::EnvFilter;

use innkeeper::hotel::Hotel;
use innkeeper::settings::Settings;

fn run() -> innkeeper::Result<()> {
    let settings_path = std::env::args().nth(1).map(PathBuf::from);
    let settings = Settings::load(settings_path.as_deref())?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let hotel = Hotel::open(settings.persistor())?;
    for skipped in hotel.load_warnings() {
        warn!(%skipped, "not restored");
    }

    println!("--- Rooms ---");
    for room in hotel.rooms() {
        println!("{}", room);
    }
    println!("--- Customers ---");
    for customer in hotel.customers() {
        println!("{}", customer);
    }
    println!("--- Bookings ---");
    for booking in hotel.bookings() {
        let cost = hotel
            .room(booking.room_id())
            .map(|room| room.price().times(booking.nights()).to_string())
            .unwrap_or_default();
        println!("{} ({} nights, {})", booking, booking.nights(), cost);
    }
    match hotel.next_booking_id() {
        Some(id) => println!("Next booking number: {}", id),
        None => println!("No booking numbers left"),
    }
    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("innkeeper: {}", e);
            ExitCode::FAILURE
        }
    }
}
