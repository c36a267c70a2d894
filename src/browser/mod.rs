//! Browser automation module
//!
//! Session lifecycle, the driver seam over the automation runtime, and the
//! status page scraper.

pub mod cdp;
pub mod driver;
mod scraper;
mod session;

pub use cdp::CdpDriver;
pub use driver::{Driver, DriverSession};
pub use scraper::PageScraper;
pub use session::SessionManager;
