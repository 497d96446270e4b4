pub mod envelope;
pub mod game;
pub mod time;
pub mod timer;
pub mod types;

pub use envelope::ActionEnvelope;
pub use game::{Game, TerminalOutcome};
pub use time::Millis;
pub use timer::{Countdown, TimerId, TimerQueue};
pub use types::{ActionId, ControllerId, Tick};
