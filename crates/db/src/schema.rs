use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

// Postgres rejects several commands in one prepared statement, so each runs on its own.
const INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_availabilities_trainer_date ON availabilities(trainer_id, date)",
    "CREATE INDEX IF NOT EXISTS idx_slots_trainer_date ON slots(trainer_id, date, start_time)",
    "CREATE INDEX IF NOT EXISTS idx_slots_availability_id ON slots(availability_id)",
    "CREATE INDEX IF NOT EXISTS idx_bookings_trainer_id ON bookings(trainer_id)",
    "CREATE INDEX IF NOT EXISTS idx_bookings_trainee_id ON bookings(trainee_id)",
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_bookings_one_confirmed_per_slot \
     ON bookings(slot_id) WHERE status = 'confirmed'",
];

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create availabilities table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS availabilities (
            id UUID PRIMARY KEY,
            trainer_id UUID NOT NULL,
            date DATE NOT NULL,
            start_time TIME NOT NULL,
            end_time TIME NOT NULL,
            slot_duration_minutes INTEGER NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_window CHECK (end_time > start_time),
            CONSTRAINT valid_slot_duration CHECK (slot_duration_minutes BETWEEN 15 AND 60)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create slots table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS slots (
            id UUID PRIMARY KEY,
            availability_id UUID NOT NULL REFERENCES availabilities(id),
            trainer_id UUID NOT NULL,
            date DATE NOT NULL,
            start_time TIME NOT NULL,
            end_time TIME NOT NULL,
            status VARCHAR(16) NOT NULL DEFAULT 'available',
            booking_id UUID NULL,
            CONSTRAINT valid_slot_range CHECK (end_time > start_time),
            CONSTRAINT valid_slot_status CHECK (status IN ('available', 'booked', 'canceled')),
            CONSTRAINT booking_iff_booked CHECK ((status = 'booked') = (booking_id IS NOT NULL))
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create bookings table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS bookings (
            id UUID PRIMARY KEY,
            trainer_id UUID NOT NULL,
            trainee_id UUID NOT NULL,
            slot_id UUID NOT NULL REFERENCES slots(id),
            status VARCHAR(16) NOT NULL DEFAULT 'confirmed',
            notes TEXT NULL,
            cancel_reason TEXT NULL,
            canceled_by VARCHAR(16) NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_booking_status CHECK (status IN ('confirmed', 'canceled', 'completed')),
            CONSTRAINT valid_canceled_by CHECK (canceled_by IS NULL OR canceled_by IN ('trainer', 'trainee')),
            CONSTRAINT reason_iff_canceled CHECK ((status = 'canceled') = (cancel_reason IS NOT NULL))
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes
    for statement in INDEXES {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}
