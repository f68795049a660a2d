//! Rentals domain module.
//!
//! The rental lifecycle: checkout opens a rental, return closes it. Closing
//! stamps the return time, prices the rental, and releases the copy back to
//! stock. Domain logic here is deterministic; IO goes through the store ports.

pub mod checkout;
pub mod fee;
pub mod lookup;
pub mod rental;
pub mod returns;
pub mod store;

pub use checkout::{CheckoutError, CheckoutProcessor};
pub use fee::billable_days;
pub use lookup::RentalLookup;
pub use rental::{CustomerSnapshot, MovieSnapshot, Rental};
pub use returns::{ReturnError, ReturnProcessor};
pub use store::RentalStore;
