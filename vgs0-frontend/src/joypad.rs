//! Joypad bit layout and press/release tracking

/// Bit masks of the joypad byte passed to [`crate::ConsoleCore::tick`].
pub mod bits {
    pub const UP: u8 = 0b1000_0000;
    pub const DOWN: u8 = 0b0100_0000;
    pub const LEFT: u8 = 0b0010_0000;
    pub const RIGHT: u8 = 0b0001_0000;
    pub const START: u8 = 0b0000_1000;
    pub const SELECT: u8 = 0b0000_0100;
    pub const T1: u8 = 0b0000_0010;
    pub const T2: u8 = 0b0000_0001;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Up,
    Down,
    Left,
    Right,
    Start,
    Select,
    /// Primary trigger (A)
    T1,
    /// Secondary trigger (B)
    T2,
}

impl Button {
    pub const ALL: [Button; 8] = [
        Button::Up,
        Button::Down,
        Button::Left,
        Button::Right,
        Button::Start,
        Button::Select,
        Button::T1,
        Button::T2,
    ];

    pub fn mask(self) -> u8 {
        match self {
            Button::Up => bits::UP,
            Button::Down => bits::DOWN,
            Button::Left => bits::LEFT,
            Button::Right => bits::RIGHT,
            Button::Start => bits::START,
            Button::Select => bits::SELECT,
            Button::T1 => bits::T1,
            Button::T2 => bits::T2,
        }
    }
}

/// Keyboard-held buttons.
///
/// Presses set bits and releases clear them, so key repeat or a release
/// without a matching press never flips a bit the wrong way.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JoypadState {
    bits: u8,
}

impl JoypadState {
    pub fn press(&mut self, button: Button) {
        self.bits |= button.mask();
    }

    pub fn release(&mut self, button: Button) {
        self.bits &= !button.mask();
    }

    pub fn is_pressed(&self, button: Button) -> bool {
        self.bits & button.mask() != 0
    }

    pub fn bits(&self) -> u8 {
        self.bits
    }

    /// Combine with another input source (e.g. a controller) for this frame.
    pub fn merged(&self, other: u8) -> u8 {
        self.bits | other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masks_are_distinct() {
        let all = Button::ALL.iter().fold(0u8, |acc, b| {
            assert_eq!(acc & b.mask(), 0, "{:?} overlaps", b);
            acc | b.mask()
        });
        assert_eq!(all, 0xFF);
    }

    #[test]
    fn test_press_release() {
        let mut pad = JoypadState::default();
        pad.press(Button::Left);
        pad.press(Button::T1);
        assert_eq!(pad.bits(), bits::LEFT | bits::T1);

        pad.release(Button::Left);
        assert!(!pad.is_pressed(Button::Left));
        assert!(pad.is_pressed(Button::T1));
    }

    #[test]
    fn test_repeat_and_stray_release() {
        let mut pad = JoypadState::default();
        pad.press(Button::Start);
        pad.press(Button::Start);
        assert_eq!(pad.bits(), bits::START);

        pad.release(Button::Down);
        pad.release(Button::Start);
        pad.release(Button::Start);
        assert_eq!(pad.bits(), 0);
    }

    #[test]
    fn test_merged() {
        let mut pad = JoypadState::default();
        pad.press(Button::Up);
        assert_eq!(pad.merged(bits::T2), bits::UP | bits::T2);
        assert_eq!(pad.bits(), bits::UP);
    }
}
