//! Evowheel Game Engine
//!
//! Platform-agnostic core logic for the Evowheel trait-evolution game.
//! Players assemble creatures from four trait categories, spin a wheel that
//! draws an environmental hazard, and creatures carrying the affected trait
//! lose health. This crate provides the catalog, roster, wheel, and session
//! state machine without UI or platform-specific dependencies.

pub mod catalog;
pub mod creature;
pub mod round;
pub mod session;
pub mod wheel;

// Re-export commonly used types
pub use catalog::{Catalog, CatalogError, Environment, TraitCategory, TraitOption, TraitOptionId};
pub use creature::{BASE_HEALTH, Creature};
pub use round::{AFFECTED_HEALTH_DELTA, RoundOutcome, RoundOutcomes, resolve_round};
pub use session::{
    GamePhase, GameSession, MAX_ROSTER_SIZE, MIN_ROSTER_SIZE, SessionError,
};
pub use wheel::{WheelRng, spin};

/// Trait for abstracting catalog loading operations.
/// Platform-specific implementations should provide this.
pub trait CatalogSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the trait/environment catalog from the platform-specific source.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog data cannot be loaded.
    fn load_catalog(&self) -> Result<Catalog, Self::Error>;
}

/// Main entry point for creating game sessions over a loaded catalog.
pub struct GameEngine<S>
where
    S: CatalogSource,
{
    source: S,
}

impl<S> GameEngine<S>
where
    S: CatalogSource,
{
    /// Create a new engine with the provided catalog source.
    pub const fn new(source: S) -> Self {
        Self { source }
    }

    /// Load and validate the catalog, returning a session at the main menu.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded or fails
    /// validation.
    pub fn create_session(&self) -> Result<GameSession, anyhow::Error> {
        let catalog = self.source.load_catalog()?;
        catalog.validate()?;
        Ok(GameSession::new(catalog))
    }
}

/// Catalog source backed by the built-in data set.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinCatalog;

impl CatalogSource for BuiltinCatalog {
    type Error = std::convert::Infallible;

    fn load_catalog(&self) -> Result<Catalog, Self::Error> {
        Ok(Catalog::default_catalog())
    }
}
