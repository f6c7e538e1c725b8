use std::{
    thread,
    time::{Duration, Instant},
};

use anyhow::Result;
use chrono::Local;

use crate::{
    cli::Cli,
    clock::DateStyle,
    config::ClockConfig,
    display::{ClockFrame, ClockLayout, Palette},
    input::{self, TouchPad, UiEvent},
    screen::Screen,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Terminated,
}

impl RunState {
    /// Performs the running to terminated transition. Returns true only for
    /// the call that actually performed it, so any further exit events are
    /// absorbed silently.
    pub fn terminate(&mut self) -> bool {
        if *self == RunState::Running {
            *self = RunState::Terminated;
            true
        } else {
            false
        }
    }
}

/// Computes when the next frame is due. After an overrun the schedule
/// resumes from now instead of replaying missed ticks, so the display never
/// lags the wall clock by more than one period.
pub fn next_deadline(previous: Instant, period: Duration, now: Instant) -> Instant {
    let next = previous + period;
    if next <= now {
        now + period
    } else {
        next
    }
}

pub struct App {
    config: ClockConfig,
    date_style: DateStyle,
    palette: Palette,
    layout: ClockLayout,
    screen: Screen,
    touch: Option<TouchPad>,
    state: RunState,
}

impl App {
    pub fn new(cli: Cli) -> Result<Self> {
        let mut config = ClockConfig::load(&cli.config)?;
        if let Some(device) = cli.fb {
            config.display.fb_device = device;
        }

        let date_style = match DateStyle::parse(&config.format.date_style) {
            Some(style) => style,
            None => {
                log::warn!(
                    "unrecognized date_style {:?}; the date line stays hidden",
                    config.format.date_style
                );
                DateStyle::None
            }
        };

        input::install_signal_hooks();

        let screen = Screen::new(&config.display, cli.windowed)?;
        let (width, height) = screen.dimensions();
        let layout = ClockLayout::from_dimensions(width, height);
        let palette = Palette::from_colors(&config.colors);
        let touch = if screen.needs_input_devices() {
            Some(TouchPad::new()?)
        } else {
            None
        };

        log::info!(
            "clock ready: {}x{}, {} time, date style {}",
            width,
            height,
            if config.format.clock_24hr { "24h" } else { "12h" },
            date_style.name()
        );

        Ok(Self {
            config,
            date_style,
            palette,
            layout,
            screen,
            touch,
            state: RunState::Running,
        })
    }

    pub fn run(mut self) -> Result<()> {
        let period = Duration::from_millis(self.config.display.tick_ms);
        let mut deadline = Instant::now();

        loop {
            let now = Local::now().naive_local();
            let frame = ClockFrame::compose(&self.config, self.date_style, now);
            self.screen.draw(&self.layout, &self.palette, &frame)?;

            if input::quit_requested() {
                self.dispatch(UiEvent::Quit);
            }
            for event in self.screen.poll_events() {
                self.dispatch(event);
            }
            let device_events = match self.touch.as_mut() {
                Some(pad) => pad.poll(),
                None => Vec::new(),
            };
            for event in device_events {
                self.dispatch(event);
            }

            if self.state == RunState::Terminated {
                log::info!("clock stopped");
                return Ok(());
            }

            deadline = next_deadline(deadline, period, Instant::now());
            let now = Instant::now();
            if deadline > now {
                thread::sleep(deadline - now);
            }
        }
    }

    fn dispatch(&mut self, event: UiEvent) {
        if self.state.terminate() {
            match event {
                UiEvent::Tap => log::info!("tap received; exiting"),
                UiEvent::ExitKey => log::info!("exit key pressed; exiting"),
                UiEvent::Quit => log::info!("quit requested; exiting"),
            }
        }
    }
}
