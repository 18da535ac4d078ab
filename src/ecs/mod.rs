//! ECS-style world storage

pub mod world;

pub use world::World;
