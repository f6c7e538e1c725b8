use anyhow::Result;
use embedded_graphics::{pixelcolor::Rgb565, prelude::*};
use embedded_graphics_simulator::{
    sdl2::Keycode, OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window,
};

use crate::{
    config::DisplayConfig,
    display::{self, ClockFrame, ClockLayout, Palette},
    input::UiEvent,
};

pub use fbdev::FbScreen;

/// Output surface for the clock. The framebuffer path drives the panel
/// directly; the window path exists for desks without one and doubles as the
/// fallback when the device cannot be opened.
pub enum Screen {
    Framebuffer(FbScreen),
    Window(WindowScreen),
}

impl Screen {
    pub fn new(config: &DisplayConfig, force_window: bool) -> Result<Self> {
        if force_window {
            log::info!("windowed mode requested");
            return Ok(Self::Window(WindowScreen::new(config)?));
        }
        match FbScreen::open(&config.fb_device) {
            Ok(fb) => {
                let (width, height) = fb.dimensions();
                log::info!(
                    "framebuffer {} is {}x{} at {} bpp",
                    config.fb_device,
                    width,
                    height,
                    fb.bits_per_pixel()
                );
                Ok(Self::Framebuffer(fb))
            }
            Err(err) => {
                log::warn!(
                    "framebuffer {} unavailable ({err:#}); falling back to windowed mode",
                    config.fb_device
                );
                Ok(Self::Window(WindowScreen::new(config)?))
            }
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            Self::Framebuffer(fb) => fb.dimensions(),
            Self::Window(win) => win.dimensions(),
        }
    }

    /// The framebuffer has no event pump of its own; taps and exit keys come
    /// from the input devices instead.
    pub fn needs_input_devices(&self) -> bool {
        matches!(self, Self::Framebuffer(_))
    }

    pub fn draw(
        &mut self,
        layout: &ClockLayout,
        palette: &Palette,
        frame: &ClockFrame,
    ) -> Result<()> {
        match self {
            Self::Framebuffer(fb) => {
                display::draw_frame(fb, layout, palette, frame)?;
                fb.flush()
            }
            Self::Window(win) => {
                display::draw_frame(&mut win.display, layout, palette, frame)?;
                win.present();
                Ok(())
            }
        }
    }

    pub fn poll_events(&mut self) -> Vec<UiEvent> {
        match self {
            Self::Framebuffer(_) => Vec::new(),
            Self::Window(win) => win.poll_events(),
        }
    }
}

pub struct WindowScreen {
    display: SimulatorDisplay<Rgb565>,
    window: Window,
}

impl WindowScreen {
    pub fn new(config: &DisplayConfig) -> Result<Self> {
        let display = SimulatorDisplay::new(Size::new(config.window_width, config.window_height));
        let output_settings = OutputSettingsBuilder::new().build();
        let mut window = Window::new("TFT Clock", &output_settings);
        // Present the blank display once so the window exists before the
        // first event poll.
        window.update(&display);
        Ok(Self { display, window })
    }

    fn dimensions(&self) -> (u32, u32) {
        let size = self.display.size();
        (size.width, size.height)
    }

    fn present(&mut self) {
        self.window.update(&self.display);
    }

    fn poll_events(&mut self) -> Vec<UiEvent> {
        self.window.events().filter_map(map_window_event).collect()
    }
}

fn map_window_event(event: SimulatorEvent) -> Option<UiEvent> {
    match event {
        SimulatorEvent::Quit => Some(UiEvent::Quit),
        SimulatorEvent::MouseButtonDown { .. } => Some(UiEvent::Tap),
        SimulatorEvent::KeyDown { keycode, .. } => match keycode {
            Keycode::Escape | Keycode::Q => Some(UiEvent::ExitKey),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(target_os = "linux")]
mod fbdev {
    use anyhow::{anyhow, bail, Result};
    use embedded_graphics::{pixelcolor::Rgb565, prelude::*, Pixel};
    use framebuffer::{Framebuffer, KdMode};

    /// Linux fbdev surface. Drawing lands in an RGB565 back buffer; `flush`
    /// converts to the device's pixel format and writes the whole frame,
    /// honoring the line stride.
    pub struct FbScreen {
        fb: Framebuffer,
        width: u32,
        height: u32,
        line_length: u32,
        bytes_per_pixel: u32,
        back: Vec<u16>,
        out: Vec<u8>,
        restore_text_mode: bool,
    }

    impl FbScreen {
        pub fn open(device: &str) -> Result<Self> {
            let fb =
                Framebuffer::new(device).map_err(|err| anyhow!("opening {device}: {err:?}"))?;
            let width = fb.var_screen_info.xres;
            let height = fb.var_screen_info.yres;
            let bits_per_pixel = fb.var_screen_info.bits_per_pixel;
            let line_length = fb.fix_screen_info.line_length;

            if width == 0 || height == 0 {
                bail!("{device} reports a zero-sized mode");
            }
            if bits_per_pixel != 16 && bits_per_pixel != 32 {
                bail!("{device} reports {bits_per_pixel} bpp, expected 16 or 32");
            }

            // Stop the console cursor from drawing over the clock. Fails
            // without a controlling tty, which is fine.
            let restore_text_mode = match Framebuffer::set_kd_mode(KdMode::Graphics) {
                Ok(_) => true,
                Err(err) => {
                    log::debug!("console graphics mode unavailable: {err:?}");
                    false
                }
            };

            let back = vec![0u16; (width as usize) * (height as usize)];
            let out = vec![0u8; (line_length as usize) * (height as usize)];
            Ok(Self {
                fb,
                width,
                height,
                line_length,
                bytes_per_pixel: bits_per_pixel / 8,
                back,
                out,
                restore_text_mode,
            })
        }

        pub fn dimensions(&self) -> (u32, u32) {
            (self.width, self.height)
        }

        pub fn bits_per_pixel(&self) -> u32 {
            self.bytes_per_pixel * 8
        }

        pub fn flush(&mut self) -> Result<()> {
            let width = self.width as usize;
            let stride = self.line_length as usize;
            match self.bytes_per_pixel {
                2 => {
                    for y in 0..self.height as usize {
                        let row = &self.back[y * width..(y + 1) * width];
                        let line = &mut self.out[y * stride..y * stride + width * 2];
                        for (x, &px) in row.iter().enumerate() {
                            let bytes = px.to_le_bytes();
                            line[x * 2] = bytes[0];
                            line[x * 2 + 1] = bytes[1];
                        }
                    }
                }
                _ => {
                    // 32 bpp XRGB: expand each RGB565 channel to 8 bits.
                    for y in 0..self.height as usize {
                        let row = &self.back[y * width..(y + 1) * width];
                        let line = &mut self.out[y * stride..y * stride + width * 4];
                        for (x, &px) in row.iter().enumerate() {
                            let r5 = (px >> 11) & 0x1f;
                            let g6 = (px >> 5) & 0x3f;
                            let b5 = px & 0x1f;
                            line[x * 4] = ((b5 << 3) | (b5 >> 2)) as u8;
                            line[x * 4 + 1] = ((g6 << 2) | (g6 >> 4)) as u8;
                            line[x * 4 + 2] = ((r5 << 3) | (r5 >> 2)) as u8;
                            line[x * 4 + 3] = 0;
                        }
                    }
                }
            }
            self.fb.write_frame(&self.out);
            Ok(())
        }
    }

    impl Drop for FbScreen {
        fn drop(&mut self) {
            if self.restore_text_mode {
                let _ = Framebuffer::set_kd_mode(KdMode::Text);
            }
        }
    }

    impl OriginDimensions for FbScreen {
        fn size(&self) -> Size {
            Size::new(self.width, self.height)
        }
    }

    impl DrawTarget for FbScreen {
        type Color = Rgb565;
        type Error = core::convert::Infallible;

        fn draw_iter<I>(&mut self, pixels: I) -> core::result::Result<(), Self::Error>
        where
            I: IntoIterator<Item = Pixel<Self::Color>>,
        {
            for Pixel(point, color) in pixels {
                if point.x >= 0
                    && point.y >= 0
                    && (point.x as u32) < self.width
                    && (point.y as u32) < self.height
                {
                    let idx = point.y as usize * self.width as usize + point.x as usize;
                    self.back[idx] = color.into_storage();
                }
            }
            Ok(())
        }
    }
}

#[cfg(not(target_os = "linux"))]
mod fbdev {
    use anyhow::{bail, Result};
    use embedded_graphics::{pixelcolor::Rgb565, prelude::*, Pixel};

    /// Framebuffer devices only exist on Linux; opening always fails here so
    /// callers take the windowed path.
    pub struct FbScreen;

    impl FbScreen {
        pub fn open(_device: &str) -> Result<Self> {
            bail!("framebuffer output requires Linux")
        }

        pub fn dimensions(&self) -> (u32, u32) {
            (0, 0)
        }

        pub fn bits_per_pixel(&self) -> u32 {
            0
        }

        pub fn flush(&mut self) -> Result<()> {
            Ok(())
        }
    }

    impl OriginDimensions for FbScreen {
        fn size(&self) -> Size {
            Size::zero()
        }
    }

    impl DrawTarget for FbScreen {
        type Color = Rgb565;
        type Error = core::convert::Infallible;

        fn draw_iter<I>(&mut self, _pixels: I) -> core::result::Result<(), Self::Error>
        where
            I: IntoIterator<Item = Pixel<Self::Color>>,
        {
            Ok(())
        }
    }
}
