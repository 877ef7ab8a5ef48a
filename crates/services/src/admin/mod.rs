//! Content administration: the authorized service and the panel presenter
//! built on top of it.

mod panel;
mod service;

pub use panel::{AdminPanel, Banner, Navigation};
pub use service::AdminService;
