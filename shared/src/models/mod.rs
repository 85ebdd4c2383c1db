//! Wire enums shared between server and clients
//!
//! 订单、餐桌、会员、预订与库存变动在 API 上使用的枚举值。

pub mod member;
pub mod order;
pub mod reservation;
pub mod stock;
pub mod table;

// Re-exports
pub use member::MemberType;
pub use order::{OrderStatus, OrderType};
pub use reservation::ReservationStatus;
pub use stock::MovementType;
pub use table::TableStatus;
