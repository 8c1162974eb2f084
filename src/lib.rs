pub mod client;
pub mod model;
pub mod protocol;
pub mod wire;

pub use client::{ClientConfig, ClientError, SimulatorClient};
pub use model::{DipoleVector, Matrix};
