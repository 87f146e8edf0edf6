//! Modelos del sistema
//!
//! Este módulo contiene los modelos de datos que mapean al schema PostgreSQL.

pub mod booking;
pub mod bus;
pub mod trip;
pub mod user;

pub use booking::{Booking, BookingDetails, NewBooking};
pub use bus::{Bus, NewBus, DEFAULT_BUS_CAPACITY};
pub use trip::{NewTrip, Trip, TripFilters, TripStatus};
pub use user::{NewUser, User};
