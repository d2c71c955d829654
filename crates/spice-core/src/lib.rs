pub mod analysis;
pub mod catalog;
pub mod derive;
pub mod error;
pub mod selection;
pub mod state;
pub mod storage;

pub use catalog::{Catalog, Category, ItemId, ItemSummary, Method, Product, Spice};
pub use derive::{derive, CategorySets, Derived};
pub use error::{Error, Result};
pub use selection::Selection;
pub use state::{AppState, StateSnapshot, SubscriptionId, TagState, ToggleOutcome};
pub use storage::{FileStore, MemoryStore, PersistedState, Settings, StateStore, TextStyle};
