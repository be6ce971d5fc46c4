pub mod policy;
pub mod selector;
pub mod state;

pub use policy::{average_cost, PolicyFactory, PolicyKind, SelectionPolicy};
pub use selector::{ProviderSelector, SelectionContext};
pub use state::{SelectorState, DEFAULT_USER_KEY, DEFAULT_WEIGHT, MAX_WEIGHT, MIN_WEIGHT};
