pub mod registration;
pub mod schema;
