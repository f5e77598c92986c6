pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use adapters::storage::{LocalStorage, MemoryStorage};
pub use config::AppConfig;
pub use crate::core::controller::{
    IntentOutcome, PageIntent, PagePhase, PageSettings, PageView, ProfilePageController,
    SaveStatus,
};
pub use crate::core::date_range::{DateRangePolicy, SelectionRejection};
pub use crate::core::profile_store::KvProfileStore;
pub use domain::model::{
    DateSelection, ImageRef, Itinerary, ItineraryId, ProfileDefaults, SearchState, SortMode,
    UserProfile,
};
pub use domain::ports::{KeyValueStore, ProfileStore};
pub use utils::error::{MyPageError, Result};
