pub mod config;
pub mod dashboard;
pub mod error;
pub mod points;
pub mod reference;
pub mod rng;
pub mod selection;
pub mod session;
pub mod view;
pub mod web;

pub use config::{ConfigLoader, DashboardConfig};
pub use dashboard::{Dashboard, DashboardSettings, DashboardView};
pub use error::{DashboardError, DashboardResult};
pub use reference::{Governorate, Sector};
