pub mod moviment;

pub use moviment::{Category, Moviment, MovimentType};
