pub mod build;
pub mod params;

pub use build::build_world;
pub use params::DispatchParams;
