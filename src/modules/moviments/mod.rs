pub mod models;

pub use models::{Category, Moviment, MovimentType};
