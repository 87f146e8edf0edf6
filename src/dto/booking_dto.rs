use serde::Deserialize;

// Request para reservar; sin seat_number el asiento se auto-asigna
#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub trip_id: Option<i32>,
    pub seat_number: Option<i32>,
}

impl CreateBookingRequest {
    /// `trip_id` ausente o 0 cuentan como no informado
    pub fn trip_id(&self) -> Option<i32> {
        self.trip_id.filter(|&id| id != 0)
    }
}
