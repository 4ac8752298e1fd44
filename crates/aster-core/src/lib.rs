pub mod clock;
pub mod config;
pub mod error;
pub mod game_loop;
pub mod input;
pub mod timestep;
pub mod window;

pub use clock::{Clock, SystemClock, Timer};
pub use config::EngineConfig;
pub use error::EngineError;
pub use game_loop::{GameLogic, GameLoop};
pub use input::{InputState, Key};
pub use timestep::FixedTimestep;
pub use window::EngineWindow;
