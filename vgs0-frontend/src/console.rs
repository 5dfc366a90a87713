//! Console core collaborator interface
//!
//! The console core (CPU, sound chip, video) is an external engine. The
//! frontend drives it only through [`ConsoleCore`]; persistent saves flow the
//! other way, from the core into an injected [`SaveHooks`].

use std::io;

/// Width of the core's display in pixels
pub const DISPLAY_WIDTH: usize = 240;

/// Height of the core's display in pixels
pub const DISPLAY_HEIGHT: usize = 192;

/// Persistent save storage, called by the core.
pub trait SaveHooks {
    /// Persist `data` in full.
    fn save(&mut self, data: &[u8]) -> io::Result<()>;

    /// Fill `buf` from storage. Data shorter than `buf` leaves the rest zeroed.
    fn load(&mut self, buf: &mut [u8]) -> io::Result<()>;
}

/// The emulator engine hosted by the frontend.
pub trait ConsoleCore {
    fn load_rom(&mut self, rom: &[u8]);

    /// Only called when the package carries music.
    fn load_bgm(&mut self, bgm: &[u8]);

    /// Only called when the package carries sound effects.
    fn load_sound_effect(&mut self, se: &[u8]);

    fn set_bgm_volume(&mut self, volume: u8);

    fn set_se_volume(&mut self, volume: u8);

    /// Hand the core its save storage.
    fn attach_save_hooks(&mut self, hooks: Box<dyn SaveHooks + Send>);

    /// Run one frame with the given joypad bits.
    fn tick(&mut self, joypad: u8);

    /// Current frame, [`DISPLAY_WIDTH`] × [`DISPLAY_HEIGHT`] RGB555 pixels.
    fn display(&self) -> &[u16];

    /// Render `len` bytes of 16-bit mono PCM.
    fn tick_sound(&mut self, len: usize) -> &[u8];

    fn reset(&mut self);

    /// The CPU is halted with interrupts disabled and can never resume.
    ///
    /// Cores exposing a Z80-style IFF register can answer with
    /// [`halted_while_di`].
    fn halted_with_interrupts_disabled(&self) -> bool;
}

/// IFF bit set while the CPU sits in HALT
pub const IFF_HALT: u8 = 0x80;

/// IFF bit set while maskable interrupts are enabled
pub const IFF_IE: u8 = 0x01;

/// Whether an IFF register value means HALT with interrupts disabled.
pub fn halted_while_di(iff: u8) -> bool {
    iff & IFF_HALT != 0 && iff & IFF_IE == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_halted_while_di() {
        assert!(halted_while_di(0x80));
        assert!(halted_while_di(0xFE));
        assert!(!halted_while_di(0x81));
        assert!(!halted_while_di(0x01));
        assert!(!halted_while_di(0x00));
    }
}
