mod scenario;

pub use scenario::{MAX_TURNOUT_FACTOR, MIN_TURNOUT_FACTOR, PartyDelta, SwingScenario};
