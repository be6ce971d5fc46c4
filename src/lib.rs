pub mod config;
pub mod divergence;
pub mod error;
pub mod selection;

pub use divergence::{DivergenceAnalyzer, DivergenceLevel, DivergenceReport};
pub use error::{SecondOpinionError, SecondOpinionResult};
pub use selection::{ProviderSelector, SelectionContext};
