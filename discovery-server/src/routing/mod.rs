//! Multi-modal routing.
//!
//! Fetches single-leg alternatives for the drive, walk and transit modes,
//! ranks transit itineraries, and stitches multi-stop courses out of
//! independently fetched legs.

mod composer;
mod config;
mod rank;

pub use composer::{MultiModalRouteComposer, RouteError};
pub use config::RouteConfig;
pub use rank::{ItinerarySelection, SelectionOutOfRange, rank_itineraries};
