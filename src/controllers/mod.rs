pub mod auth_controller;
pub mod booking_controller;
pub mod trip_controller;
