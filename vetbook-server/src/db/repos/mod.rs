//! Repository implementations for database access
//!
//! Each repository follows these patterns:
//! - Parameterized queries only, no string-built SQL
//! - JOINs/aggregates for list operations (no N+1)
//! - Transactions for multi-step operations
//! - Update/delete map zero affected rows to `DbError::NotFound`

pub mod appointments;
pub mod reviews;
pub mod services;
pub mod users;
pub mod vet_profiles;
pub mod vet_services;

pub use appointments::{
    Appointment, AppointmentRepo, AppointmentWithNames, DepositBooking, NewAppointment,
};
pub use reviews::{NewReview, Review, ReviewRepo};
pub use services::{Service, ServiceRepo};
pub use users::{DbError, NewUser, StoredUser, User, UserRepo};
pub use vet_profiles::{ProfileFilters, VetProfileDetail, VetProfileFields, VetProfileRepo};
pub use vet_services::{VetServiceRepo, VetWithServices};
