pub mod edit;
pub mod energy;
pub mod info;
