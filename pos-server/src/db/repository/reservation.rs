//! Reservation Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Reservation, ReservationCreate, ReservationUpdate};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "reservation";

#[derive(Clone)]
pub struct ReservationRepository {
    base: BaseRepository,
}

impl ReservationRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all reservations ordered by reservation time
    pub async fn find_all(&self) -> RepoResult<Vec<Reservation>> {
        let reservations: Vec<Reservation> = self
            .base
            .db()
            .query("SELECT * FROM reservation ORDER BY reservationTime")
            .await?
            .take(0)?;
        Ok(reservations)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Reservation>> {
        let Ok(record_id) = id.parse::<RecordId>() else {
            return Ok(None);
        };
        let reservation: Option<Reservation> = self.base.db().select(record_id).await?;
        Ok(reservation)
    }

    /// Create a new reservation
    pub async fn create(&self, data: ReservationCreate) -> RepoResult<Reservation> {
        let reservation = Reservation {
            id: None,
            table_id: data.table_id,
            customer_name: data.customer_name,
            customer_phone: data.customer_phone,
            reservation_time: data.reservation_time,
            guests: data.guests,
            status: data.status,
            notes: data.notes,
            source: data.source,
        };

        let created: Option<Reservation> = self.base.db().create(TABLE).content(reservation).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create reservation".to_string()))
    }

    /// Update a reservation (status transitions included)
    pub async fn update(&self, id: &str, data: ReservationUpdate) -> RepoResult<Reservation> {
        let record_id: RecordId = id
            .parse()
            .map_err(|_| RepoError::NotFound(format!("Invalid reservation ID format: {}", id)))?;
        let mut result = self
            .base
            .db()
            .query("UPDATE $id MERGE $data RETURN AFTER")
            .bind(("id", record_id))
            .bind(("data", data))
            .await?;
        let reservations: Vec<Reservation> = result.take(0)?;
        reservations
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Reservation {} not found", id)))
    }
}
