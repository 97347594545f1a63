//! Database repository layer

pub mod category_repo;
pub mod plant_repo;
pub mod user_repo;

pub use category_repo::*;
pub use plant_repo::*;
pub use user_repo::*;
