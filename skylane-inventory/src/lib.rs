pub mod allocator;
pub mod policy;

pub use allocator::{AllocationError, ClaimOutcome, SeatAllocationEngine};
pub use policy::ClaimPolicy;
