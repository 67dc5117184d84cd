pub mod activate;
pub mod autofill;
pub mod team;
pub mod validate;
