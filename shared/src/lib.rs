//! Shared types for the POS backend
//!
//! Client-facing contract types used across crates: response envelope,
//! permission matching, and the wire enums for orders, tables, members,
//! reservations and stock movements.

pub mod models;
pub mod response;
pub mod types;

// Re-exports
pub use models::{
    MemberType, MovementType, OrderStatus, OrderType, ReservationStatus, TableStatus,
};
pub use response::{API_CODE_SUCCESS, ApiResponse};
pub use types::{Permission, Timestamp};
