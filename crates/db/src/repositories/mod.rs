pub mod reference_repo;
pub mod session_repo;
pub mod trip_repo;
pub mod user_repo;

pub use reference_repo::ReferenceRepo;
pub use session_repo::SessionRepo;
pub use trip_repo::TripRepo;
pub use user_repo::UserRepo;
