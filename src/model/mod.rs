pub mod tracker;
pub mod category;
pub mod record;
pub mod weekday;
pub mod config;

pub use tracker::*;
pub use category::*;
pub use record::*;
pub use weekday::*;
pub use config::*;
