pub mod evaluate;
pub mod risk;
pub mod summary;
