//! Booting a game package into a console core and driving it frame by frame

use tracing::{debug, info, warn};
use vgs0_common::GamePackage;

use crate::console::{ConsoleCore, SaveHooks};
use crate::error::FrontendError;

/// Upper bound of the master volume settings
pub const MAX_VOLUME: u8 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Music volume, 0..=100
    pub bgm_volume: u8,
    /// Sound effect volume, 0..=100
    pub se_volume: u8,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            bgm_volume: MAX_VOLUME,
            se_volume: MAX_VOLUME,
        }
    }
}

/// Host state sampled once per frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameInput {
    /// Keyboard and controller bits, already merged
    pub joypad: u8,
    /// A controller is currently attached
    pub pad_connected: bool,
    /// A platform overlay (e.g. a store UI) covers the game
    pub overlay_active: bool,
    /// The reset key was pressed this frame
    pub reset: bool,
}

/// What the host should do with the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// The core ran; blit its display.
    Ran,
    /// The core did not run; present the previous frame.
    Paused,
    /// The controller was just unplugged; draw the disconnect image once.
    /// Frames stay paused until it is plugged back in.
    ShowDisconnect,
    /// The game can never continue; end the session.
    Halted,
}

/// A running game: the core plus the frontend's own per-session state.
pub struct Session<C: ConsoleCore> {
    core: C,
    frames: u64,
    pad_was_connected: bool,
    waiting_for_pad: bool,
    halted: bool,
}

impl<C: ConsoleCore> Session<C> {
    /// Parse `package` and load its segments into `core`.
    ///
    /// Music and sound effects are only handed to the core when the package
    /// carries them; the ROM always goes last.
    pub fn boot(
        mut core: C,
        package: &[u8],
        config: SessionConfig,
        save_hooks: Option<Box<dyn SaveHooks + Send>>,
    ) -> Result<Self, FrontendError> {
        let pkg = GamePackage::parse(package)?;
        info!(
            "Booting package: rom={} bytes, bgm={}, se={}",
            pkg.rom.len(),
            describe(pkg.bgm),
            describe(pkg.se)
        );

        if let Some(hooks) = save_hooks {
            core.attach_save_hooks(hooks);
        }
        if let Some(bgm) = pkg.bgm {
            core.load_bgm(bgm);
        }
        if let Some(se) = pkg.se {
            core.load_sound_effect(se);
        }
        core.load_rom(pkg.rom);

        let bgm_volume = config.bgm_volume.min(MAX_VOLUME);
        let se_volume = config.se_volume.min(MAX_VOLUME);
        debug!("Volumes: bgm={} se={}", bgm_volume, se_volume);
        core.set_bgm_volume(bgm_volume);
        core.set_se_volume(se_volume);

        Ok(Self {
            core,
            frames: 0,
            pad_was_connected: false,
            waiting_for_pad: false,
            halted: false,
        })
    }

    /// Advance one frame.
    ///
    /// A reset is applied first. Losing the controller pauses the game until
    /// it comes back; playing without ever connecting one is allowed. The core
    /// is not ticked while an overlay is shown.
    pub fn frame(&mut self, input: FrameInput) -> FrameOutcome {
        if self.halted {
            return FrameOutcome::Halted;
        }
        if input.reset {
            self.reset();
        }

        if input.pad_connected {
            if !self.pad_was_connected {
                info!("Joypad connected");
            }
            self.pad_was_connected = true;
            self.waiting_for_pad = false;
        } else if self.pad_was_connected {
            warn!("Joypad disconnected (waiting for resume...)");
            self.pad_was_connected = false;
            self.waiting_for_pad = true;
            return FrameOutcome::ShowDisconnect;
        } else if self.waiting_for_pad {
            return FrameOutcome::Paused;
        }

        if input.overlay_active {
            return FrameOutcome::Paused;
        }

        self.frames += 1;
        self.core.tick(input.joypad);
        if self.core.halted_with_interrupts_disabled() {
            warn!("Detected HALT while interrupts are disabled");
            self.halted = true;
            return FrameOutcome::Halted;
        }
        FrameOutcome::Ran
    }

    /// Latest frame from the core, RGB555.
    pub fn display(&self) -> &[u16] {
        self.core.display()
    }

    pub fn audio(&mut self, len: usize) -> &[u8] {
        self.core.tick_sound(len)
    }

    pub fn reset(&mut self) {
        info!("Reset");
        self.core.reset();
    }

    /// Frames the core has run since boot.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn core(&self) -> &C {
        &self.core
    }

    pub fn into_core(self) -> C {
        self.core
    }
}

fn describe(segment: Option<&[u8]>) -> String {
    match segment {
        Some(data) => format!("{} bytes", data.len()),
        None => "none".to_string(),
    }
}
