//! Servicios de negocio
//!
//! La lógica con estado compartido: asignación de asientos, borrado de
//! reservas y cancelación de viajes.

pub mod seat_allocator;

pub use seat_allocator::{Allocation, BookingError, SeatAllocator};
