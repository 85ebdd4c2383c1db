//! Database models
//!
//! Model/Create/Update triples per entity. Ids use SurrealDB `RecordId`
//! serialized as `"table:id"` strings on the wire; wire field names are
//! camelCase.
//!
//! 注意：新代码统一使用 `RecordId` + `serde_helpers`，不再手工拼接
//! "table:id" 字符串。

pub mod serde_helpers;

pub mod category;
pub mod dining_table;
pub mod member;
pub mod order;
pub mod product;
pub mod reservation;
pub mod stock_movement;
pub mod supplier;
pub mod system_user;

// Re-exports
pub use category::{Category, CategoryCreate, CategoryUpdate};
pub use dining_table::{DiningTable, DiningTableCreate, DiningTableUpdate};
pub use member::{Member, MemberCreate};
pub use order::{DailySummary, Order, OrderCreate, OrderLine, OrderLineCreate, OrderWithLines};
pub use product::{Product, ProductCreate, ProductUpdate};
pub use reservation::{Reservation, ReservationCreate, ReservationUpdate};
pub use stock_movement::{StockMovement, StockMovementCreate};
pub use supplier::{Supplier, SupplierCreate};
pub use system_user::{SystemUser, UserInfo};
