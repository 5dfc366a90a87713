//! Frame buffer composition: 2× blit of the core display and overlays

use crate::console::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use crate::error::FrontendError;
use crate::session::FrameOutcome;

/// Integer scale of the core display inside the frame buffer
pub const SCALE: usize = 2;

/// Width of the scaled display
pub const SCALED_WIDTH: usize = DISPLAY_WIDTH * SCALE;

/// Height of the scaled display
pub const SCALED_HEIGHT: usize = DISPLAY_HEIGHT * SCALE;

/// Expand a 5-bit colour channel to 8 bits, replicating the high bits.
pub const fn bit5_to_8(v: u8) -> u8 {
    let v = v & 0x1F;
    (v << 3) | (v >> 2)
}

/// Convert an RGB555 pixel to a packed `R<<24 | G<<16 | B<<8` word.
pub const fn rgb555_to_rgbx(pixel: u16) -> u32 {
    let r = bit5_to_8(((pixel >> 10) & 0x1F) as u8) as u32;
    let g = bit5_to_8(((pixel >> 5) & 0x1F) as u8) as u32;
    let b = bit5_to_8((pixel & 0x1F) as u8) as u32;
    (r << 24) | (g << 16) | (b << 8)
}

/// Per-subpixel masks for each 2×2 block. Top-left is always unmasked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanlineMasks {
    pub top_right: u32,
    pub bottom_left: u32,
    pub bottom_right: u32,
}

impl ScanlineMasks {
    pub const NONE: Self = Self {
        top_right: 0xFFFF_FFFF,
        bottom_left: 0xFFFF_FFFF,
        bottom_right: 0xFFFF_FFFF,
    };

    pub const SCANLINE: Self = Self {
        top_right: 0xF0F0_F0F0,
        bottom_left: 0x8F8F_8F8F,
        bottom_right: 0x8080_8080,
    };

    pub fn new(scanlines: bool) -> Self {
        if scanlines { Self::SCANLINE } else { Self::NONE }
    }
}

/// A borrowed image to draw over the frame (e.g. a generated `img_*` table).
#[derive(Debug, Clone, Copy)]
pub struct Overlay<'a> {
    pub width: usize,
    pub height: usize,
    pub pixels: &'a [u32],
}

impl<'a> From<&'a vgs0_common::PixelTable> for Overlay<'a> {
    fn from(table: &'a vgs0_common::PixelTable) -> Self {
        Self {
            width: table.width as usize,
            height: table.height as usize,
            pixels: &table.pixels,
        }
    }
}

/// Host frame buffer sized to the window's aspect, with the scaled display
/// centred inside it.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    offset_x: usize,
    offset_y: usize,
    pixels: Vec<u32>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Result<Self, FrontendError> {
        if width < SCALED_WIDTH || height < SCALED_HEIGHT {
            return Err(FrontendError::InvalidScreen {
                width: width as u32,
                height: height as u32,
            });
        }
        Ok(Self {
            width,
            height,
            offset_x: (width - SCALED_WIDTH) / 2,
            offset_y: (height - SCALED_HEIGHT) / 2,
            pixels: vec![0; width * height],
        })
    }

    /// Frame buffer for a window of `screen_width` × `screen_height`.
    ///
    /// The window is scaled down until the 2× display just fits, keeping the
    /// window's aspect ratio.
    pub fn for_screen(screen_width: u32, screen_height: u32) -> Result<Self, FrontendError> {
        if screen_width == 0 || screen_height == 0 {
            return Err(FrontendError::InvalidScreen {
                width: screen_width,
                height: screen_height,
            });
        }
        let sx = screen_width as f64 / SCALED_WIDTH as f64;
        let sy = screen_height as f64 / SCALED_HEIGHT as f64;
        let scale = sx.min(sy);
        let width = (screen_width as f64 / scale) as usize;
        let height = (screen_height as f64 / scale) as usize;
        Self::new(width.max(SCALED_WIDTH), height.max(SCALED_HEIGHT))
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn offset(&self) -> (usize, usize) {
        (self.offset_x, self.offset_y)
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Draw the core's RGB555 display at 2×.
    pub fn blit(&mut self, display: &[u16], masks: ScanlineMasks) -> Result<(), FrontendError> {
        let needed = DISPLAY_WIDTH * DISPLAY_HEIGHT;
        if display.len() < needed {
            return Err(FrontendError::DisplayTooSmall {
                len: display.len(),
                needed,
            });
        }

        for (y, row) in display.chunks_exact(DISPLAY_WIDTH).take(DISPLAY_HEIGHT).enumerate() {
            let top = (self.offset_y + y * SCALE) * self.width + self.offset_x;
            let bottom = top + self.width;
            for (x, &pixel) in row.iter().enumerate() {
                let rgb = rgb555_to_rgbx(pixel);
                let col = x * SCALE;
                self.pixels[top + col] = rgb;
                self.pixels[top + col + 1] = rgb & masks.top_right;
                self.pixels[bottom + col] = rgb & masks.bottom_left;
                self.pixels[bottom + col + 1] = rgb & masks.bottom_right;
            }
        }
        Ok(())
    }

    /// Update the frame for a session step. Returns whether it changed.
    ///
    /// `disconnect` is drawn over the last frame when the controller is lost.
    pub fn render(
        &mut self,
        outcome: FrameOutcome,
        display: &[u16],
        masks: ScanlineMasks,
        disconnect: Overlay<'_>,
    ) -> Result<bool, FrontendError> {
        match outcome {
            FrameOutcome::Ran => {
                self.blit(display, masks)?;
                Ok(true)
            }
            FrameOutcome::ShowDisconnect => {
                self.draw_overlay(disconnect);
                Ok(true)
            }
            FrameOutcome::Paused | FrameOutcome::Halted => Ok(false),
        }
    }

    /// Copy `overlay` into the centre of the frame, clipped to its bounds.
    pub fn draw_overlay(&mut self, overlay: Overlay<'_>) {
        let ox = self.width.saturating_sub(overlay.width) / 2;
        let oy = self.height.saturating_sub(overlay.height) / 2;
        let cols = overlay.width.min(self.width);
        let rows = overlay.height.min(self.height);

        for (y, src) in overlay.pixels.chunks(overlay.width.max(1)).take(rows).enumerate() {
            let dst = (oy + y) * self.width + ox;
            let n = cols.min(src.len());
            self.pixels[dst..dst + n].copy_from_slice(&src[..n]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_display(pixel: u16) -> Vec<u16> {
        vec![pixel; DISPLAY_WIDTH * DISPLAY_HEIGHT]
    }

    #[test]
    fn test_bit5_to_8() {
        assert_eq!(bit5_to_8(0), 0);
        assert_eq!(bit5_to_8(0x1F), 0xFF);
        assert_eq!(bit5_to_8(0x10), 0x84);
        assert_eq!(bit5_to_8(0x01), 0x08);
    }

    #[test]
    fn test_rgb555_expansion() {
        assert_eq!(rgb555_to_rgbx(0x7C00), 0xFF00_0000);
        assert_eq!(rgb555_to_rgbx(0x03E0), 0x00FF_0000);
        assert_eq!(rgb555_to_rgbx(0x001F), 0x0000_FF00);
        assert_eq!(rgb555_to_rgbx(0x7FFF), 0xFFFF_FF00);
    }

    #[test]
    fn test_blit_without_scanlines() {
        let mut fb = FrameBuffer::new(SCALED_WIDTH, SCALED_HEIGHT).unwrap();
        fb.blit(&solid_display(0x7FFF), ScanlineMasks::new(false)).unwrap();
        assert!(fb.pixels().iter().all(|&p| p == 0xFFFF_FF00));
    }

    #[test]
    fn test_blit_scanline_masks() {
        let mut fb = FrameBuffer::new(SCALED_WIDTH, SCALED_HEIGHT).unwrap();
        fb.blit(&solid_display(0x7FFF), ScanlineMasks::new(true)).unwrap();
        let w = fb.width();
        let px = fb.pixels();
        assert_eq!(px[0], 0xFFFF_FF00);
        assert_eq!(px[1], 0xF0F0_F000);
        assert_eq!(px[w], 0x8F8F_8F00);
        assert_eq!(px[w + 1], 0x8080_8000);
    }

    #[test]
    fn test_blit_is_centred() {
        let mut fb = FrameBuffer::new(SCALED_WIDTH + 20, SCALED_HEIGHT + 10).unwrap();
        assert_eq!(fb.offset(), (10, 5));
        fb.blit(&solid_display(0x7C00), ScanlineMasks::NONE).unwrap();

        let w = fb.width();
        assert_eq!(fb.pixels()[5 * w + 9], 0);
        assert_eq!(fb.pixels()[5 * w + 10], 0xFF00_0000);
        assert_eq!(fb.pixels()[4 * w + 10], 0);
        assert_eq!(fb.pixels()[(5 + SCALED_HEIGHT) * w - 1], 0);
    }

    #[test]
    fn test_blit_rejects_short_display() {
        let mut fb = FrameBuffer::new(SCALED_WIDTH, SCALED_HEIGHT).unwrap();
        let err = fb.blit(&[0u16; 100], ScanlineMasks::NONE).unwrap_err();
        assert!(matches!(err, FrontendError::DisplayTooSmall { len: 100, .. }));
    }

    #[test]
    fn test_for_screen_keeps_aspect() {
        let fb = FrameBuffer::for_screen(960, 768).unwrap();
        assert_eq!((fb.width(), fb.height()), (SCALED_WIDTH, SCALED_HEIGHT));

        let wide = FrameBuffer::for_screen(1920, 1080).unwrap();
        assert_eq!(wide.height(), SCALED_HEIGHT);
        assert_eq!(wide.width(), 682);

        assert!(FrameBuffer::for_screen(0, 100).is_err());
    }

    #[test]
    fn test_overlay_centred() {
        let mut fb = FrameBuffer::new(SCALED_WIDTH, SCALED_HEIGHT).unwrap();
        let image = vec![0x1234_5600u32; 368 * 48];
        fb.draw_overlay(Overlay {
            width: 368,
            height: 48,
            pixels: &image,
        });

        let w = fb.width();
        let ox = (SCALED_WIDTH - 368) / 2;
        let oy = (SCALED_HEIGHT - 48) / 2;
        assert_eq!(fb.pixels()[oy * w + ox], 0x1234_5600);
        assert_eq!(fb.pixels()[(oy + 47) * w + ox + 367], 0x1234_5600);
        assert_eq!(fb.pixels()[oy * w + ox - 1], 0);
        assert_eq!(fb.pixels()[(oy - 1) * w + ox], 0);
    }

    #[test]
    fn test_overlay_from_pixel_table_clips() {
        let mut fb = FrameBuffer::new(SCALED_WIDTH, SCALED_HEIGHT).unwrap();
        let table = vgs0_common::PixelTable {
            width: 600,
            height: 2,
            pixels: vec![0xFF; 1200],
        };
        fb.draw_overlay(Overlay::from(&table));
        let row = (SCALED_HEIGHT - 2) / 2;
        let w = fb.width();
        assert!(fb.pixels()[row * w..(row + 1) * w].iter().all(|&p| p == 0xFF));
    }

    #[test]
    fn test_render_follows_outcome() {
        let mut fb = FrameBuffer::new(SCALED_WIDTH, SCALED_HEIGHT).unwrap();
        let display = solid_display(0x7FFF);
        let image = vec![0x00AB_CD00u32; 368 * 48];
        let err_joypad = Overlay {
            width: 368,
            height: 48,
            pixels: &image,
        };
        let centre = (SCALED_HEIGHT / 2) * fb.width() + SCALED_WIDTH / 2;
        let render = |fb: &mut FrameBuffer, outcome: FrameOutcome| {
            fb.render(outcome, &display, ScanlineMasks::NONE, err_joypad).unwrap()
        };

        assert!(!render(&mut fb, FrameOutcome::Paused));
        assert_eq!(fb.pixels()[centre], 0);

        assert!(render(&mut fb, FrameOutcome::Ran));
        assert_eq!(fb.pixels()[centre], 0xFFFF_FF00);

        assert!(render(&mut fb, FrameOutcome::ShowDisconnect));
        assert_eq!(fb.pixels()[centre], 0x00AB_CD00);
        assert_eq!(fb.pixels()[0], 0xFFFF_FF00);

        assert!(!render(&mut fb, FrameOutcome::Halted));
    }

    #[test]
    fn test_for_screen_truncates() {
        let fb = FrameBuffer::for_screen(1366, 768).unwrap();
        assert_eq!((fb.width(), fb.height()), (683, SCALED_HEIGHT));

        let fb = FrameBuffer::for_screen(1000, 700).unwrap();
        assert_eq!(fb.width(), 548);
        assert_eq!(fb.height(), SCALED_HEIGHT);
    }
}
