//! Effects - side effects declared by the reducer

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Resolve the Pokemon record through the repository
    FetchPokemon { id: u32 },
    /// Download and decode the artwork
    LoadArtwork { url: String },
}
