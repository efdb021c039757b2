//! Host abstraction layer
//!
//! Everything the simulation consumes from the outside world:
//! - Wall time (`SystemClock`)
//! - Input commands (`InputSource` and its backends, `KeyboardInput` for play)

pub mod input;
pub mod keyboard;
pub mod time;

pub use input::{AutoPilot, InputSource, ScriptedInput};
pub use keyboard::KeyboardInput;
pub use time::SystemClock;
