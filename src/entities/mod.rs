// Entity Models
// "Identity persists, values change"
//
// Each entity has:
// - Stable external identity (team_id, game_id) that NEVER changes
// - Values filled in by the feed merger as feeds arrive

pub mod team;
pub mod game;

pub use team::Team;
pub use game::{Game, GameRating, Side};
