pub mod context;
pub mod identity;
pub mod order;
pub mod protocol;
pub mod repository;
pub mod seat;

pub use context::RequestContext;
pub use order::{Order, OrderStatus};
pub use seat::{Seat, SeatClass};
