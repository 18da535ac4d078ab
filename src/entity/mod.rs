pub mod food;
pub mod pigeon;
pub mod pigeonhole;
pub mod predator;

pub use food::Food;
pub use pigeon::Pigeon;
pub use pigeonhole::Pigeonhole;
pub use predator::Predator;
