//! Domain entities - normalized results and records produced per request

mod mobility_event;
mod place;
mod provider_status;
mod route;

pub use mobility_event::{EventSeverity, MobilityEvent};
pub use place::{PlaceSource, ResolvedPlace};
pub use provider_status::{ProviderDetail, ProviderStatus};
pub use route::{RouteResult, RouteStep};
