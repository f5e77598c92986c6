pub mod controller;
pub mod date_range;
pub mod itinerary_filter;
pub mod profile_image;
pub mod profile_store;

pub use crate::domain::model::{
    DateSelection, ImageRef, Itinerary, ItineraryId, ProfileDefaults, SearchState, SortMode,
    UserProfile,
};
pub use crate::domain::ports::{KeyValueStore, ProfileStore};
pub use crate::utils::error::Result;
