pub mod account;
pub mod classification;
pub mod config;
pub mod error;
pub mod reading;

pub use account::*;
pub use classification::*;
pub use config::Config;
pub use error::*;
pub use reading::*;
