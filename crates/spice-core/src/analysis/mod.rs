//! Prose generators that explain a selection.
//!
//! [`CompatibilityAnalyzer`] covers pairwise notes, cooking processes, spice
//! chemistry and recommendations. [`ComprehensiveAnalyzer`] wraps it and adds
//! an overview, mixture scoring and the scientific basis.

pub mod compatibility;
pub mod compounds;
pub mod comprehensive;
pub mod detailed;
pub mod mixture;
pub mod science;

pub use compatibility::{
    ChemicalReaction, CompatibilityAnalyzer, CompatibilityNote, CookingProcess, Priority,
    ReactionType, Recommendation, RecommendationKind, SelectionAnalysis, SynergyPair,
};
pub use comprehensive::{
    CompleteAnalysis, Complexity, ComprehensiveAnalyzer, Cuisine, Difficulty, Explanation,
    FlavorBalance, FlavorProfile, Overview,
};
pub use mixture::{ConflictingPair, Interaction, MixtureAnalysis, MixtureProfile};
pub use science::ScientificBasis;
