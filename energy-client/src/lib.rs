pub mod db;
pub mod domain;
pub mod session;

pub use domain::{EnergyReading, ReadingRange};
pub use session::{DashboardSession, ReadingFilter};
