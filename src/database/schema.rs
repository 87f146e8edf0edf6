//! Schema de la base de datos
//!
//! Las tablas se crean en orden de dependencia.
//! Las restricciones únicas de bookings son el punto de serialización de
//! las reservas concurrentes; sus nombres deben coincidir con los que
//! reconocen los repositorios.

use sqlx::PgPool;
use tracing::info;

const CREATE_STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id SERIAL PRIMARY KEY,
        email VARCHAR(100) NOT NULL,
        first_name VARCHAR(50) NOT NULL,
        last_name VARCHAR(50) NOT NULL,
        password VARCHAR(200) NOT NULL,
        is_admin BOOLEAN NOT NULL DEFAULT false,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        CONSTRAINT users_email_key UNIQUE (email)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS buses (
        id SERIAL PRIMARY KEY,
        number_plate VARCHAR(20) NOT NULL,
        manufacturer VARCHAR(50) NOT NULL,
        model VARCHAR(50) NOT NULL,
        year VARCHAR(4) NOT NULL,
        capacity INTEGER NOT NULL DEFAULT 36 CHECK (capacity > 0),
        CONSTRAINT buses_number_plate_key UNIQUE (number_plate)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS trips (
        id SERIAL PRIMARY KEY,
        bus_id INTEGER NOT NULL REFERENCES buses(id),
        origin VARCHAR(100) NOT NULL,
        destination VARCHAR(100) NOT NULL,
        trip_date DATE NOT NULL,
        fare DOUBLE PRECISION NOT NULL,
        status VARCHAR(20) NOT NULL DEFAULT 'active'
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS bookings (
        id SERIAL PRIMARY KEY,
        trip_id INTEGER NOT NULL REFERENCES trips(id),
        user_id INTEGER NOT NULL REFERENCES users(id),
        seat_number INTEGER NOT NULL CHECK (seat_number >= 1),
        created_on TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        CONSTRAINT bookings_trip_id_user_id_key UNIQUE (trip_id, user_id),
        CONSTRAINT bookings_trip_id_seat_number_key UNIQUE (trip_id, seat_number)
    )
    "#,
    // Bases de datos creadas sin la restricción de asiento
    r#"
    DO $$
    BEGIN
        IF NOT EXISTS (
            SELECT 1 FROM pg_constraint WHERE conname = 'bookings_trip_id_seat_number_key'
        ) THEN
            ALTER TABLE bookings
                ADD CONSTRAINT bookings_trip_id_seat_number_key UNIQUE (trip_id, seat_number);
        END IF;
    END $$
    "#,
    "CREATE INDEX IF NOT EXISTS idx_bookings_user_id ON bookings (user_id)",
];

/// Crear todas las tablas si no existen
pub async fn create_tables(pool: &PgPool) -> Result<(), sqlx::Error> {
    for statement in CREATE_STATEMENTS {
        sqlx::query(statement).execute(pool).await?;
    }
    info!("📋 Tablas creadas/verificadas");
    Ok(())
}
