pub mod audit;
pub mod block_types;
pub mod guard;
pub mod registry;
