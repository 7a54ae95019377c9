use clockins_core::PlayerSource;
use clockins_store::StoreError;
use thiserror::Error;

/// Reasons a single player's validation stopped early.
///
/// None of these are fatal: the tick logs them and moves on to the next player.
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("could not locate player {player}")]
    MissingPlayer { player: PlayerSource },

    #[error("could not locate player data for {player}")]
    MissingPlayerData { player: PlayerSource },

    #[error("could not locate a job for player {player}")]
    MissingJob { player: PlayerSource },

    #[error("job for player {player} has no name")]
    MissingJobName { player: PlayerSource },

    #[error("could not resolve an identifier for player {player}")]
    MissingIdentifier { player: PlayerSource },

    /// Writing the shift change failed.
    #[error("shift store error: {0}")]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, ReconcileError>;
