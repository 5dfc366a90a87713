//! VGS0 frontend glue
//!
//! Everything between a loaded game package and the console core: booting the
//! package into the core, save storage, joypad bits, frame composition and
//! 60 Hz pacing. Window, audio device and input backends stay with the host.

pub mod console;
pub mod display;
pub mod error;
pub mod joypad;
pub mod pacer;
pub mod save_store;
pub mod session;

pub use console::{ConsoleCore, DISPLAY_HEIGHT, DISPLAY_WIDTH, SaveHooks, halted_while_di};
pub use display::{FrameBuffer, Overlay, ScanlineMasks, bit5_to_8, rgb555_to_rgbx};
pub use error::FrontendError;
pub use joypad::{Button, JoypadState};
pub use pacer::{FramePacer, WAIT_PATTERN_US};
pub use save_store::FileSaveHooks;
pub use session::{FrameInput, FrameOutcome, Session, SessionConfig};
