//! Game session engine

pub mod chameleon;
pub mod code;
pub mod error;
pub mod registry;
pub mod roster;
pub mod round;
pub mod session;

pub use error::GameError;
pub use registry::GameRegistry;
pub use round::RoundParams;
pub use session::{GameRules, Player, PlayerId, RoundPhase, Session, SessionOptions};
