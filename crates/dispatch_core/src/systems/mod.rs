pub mod locking;
pub mod reassignment;
pub mod release;
pub mod snapshot;
