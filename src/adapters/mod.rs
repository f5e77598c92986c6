// Adapters layer: concrete implementations for external systems (key-value storage, itinerary files).

pub mod itinerary_source;
pub mod storage;
