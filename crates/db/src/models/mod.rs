pub mod reference;
pub mod session;
pub mod trip;
pub mod user;
