pub mod data;
pub mod nat_gateway;
pub mod state;
pub mod vpc;
