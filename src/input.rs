use std::sync::atomic::{AtomicBool, Ordering};

/// Events that end the clock. Every variant causes the same transition; they
/// are distinguished only for the shutdown log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEvent {
    Tap,
    ExitKey,
    Quit,
}

static QUIT_FLAG: AtomicBool = AtomicBool::new(false);

/// Set from the SIGINT/SIGTERM handler and polled once per tick.
pub fn quit_requested() -> bool {
    QUIT_FLAG.load(Ordering::SeqCst)
}

#[cfg(target_os = "linux")]
extern "C" fn on_quit_signal(_signum: libc::c_int) {
    QUIT_FLAG.store(true, Ordering::SeqCst);
}

#[cfg(target_os = "linux")]
pub fn install_signal_hooks() {
    unsafe {
        libc::signal(libc::SIGINT, on_quit_signal as libc::sighandler_t);
        libc::signal(libc::SIGTERM, on_quit_signal as libc::sighandler_t);
    }
}

#[cfg(not(target_os = "linux"))]
pub fn install_signal_hooks() {}

#[cfg(target_os = "linux")]
mod platform {
    use std::io;
    use std::os::unix::io::AsRawFd;

    use anyhow::Result;
    use evdev::{Device, InputEventKind, Key};

    use super::UiEvent;

    /// Touch panels report taps as BTN_TOUCH, mice as button presses, and
    /// keyboards deliver the exit keys. Any device that can produce one of
    /// those is worth polling.
    fn wants_device(device: &Device) -> bool {
        device.supported_keys().map_or(false, |keys| {
            keys.contains(Key::BTN_TOUCH)
                || keys.contains(Key::BTN_LEFT)
                || keys.contains(Key::KEY_ESC)
                || keys.contains(Key::KEY_Q)
        })
    }

    fn set_nonblocking(device: &Device) -> io::Result<()> {
        let fd = device.as_raw_fd();
        let flags = unsafe { libc::fcntl(fd, libc::F_GETFL) };
        if flags < 0 {
            return Err(io::Error::last_os_error());
        }
        let rc = unsafe { libc::fcntl(fd, libc::F_SETFL, flags | libc::O_NONBLOCK) };
        if rc < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    fn map_key(key: Key, value: i32) -> Option<UiEvent> {
        // value 1 is a press; releases (0) and autorepeat (2) are ignored.
        if value != 1 {
            return None;
        }
        if key == Key::BTN_TOUCH || key == Key::BTN_LEFT || key == Key::BTN_RIGHT {
            Some(UiEvent::Tap)
        } else if key == Key::KEY_ESC || key == Key::KEY_Q {
            Some(UiEvent::ExitKey)
        } else {
            None
        }
    }

    pub struct TouchPad {
        devices: Vec<Device>,
    }

    impl TouchPad {
        pub fn new() -> Result<Self> {
            let mut devices = Vec::new();
            for (path, device) in evdev::enumerate() {
                if !wants_device(&device) {
                    continue;
                }
                if let Err(err) = set_nonblocking(&device) {
                    log::debug!("skipping {}: {}", path.display(), err);
                    continue;
                }
                log::info!(
                    "input device {} ({})",
                    path.display(),
                    device.name().unwrap_or("unnamed")
                );
                devices.push(device);
            }
            if devices.is_empty() {
                log::warn!("no touch or key input devices found; exit via signal only");
            }
            Ok(Self { devices })
        }

        /// Drains pending events from every device without blocking. Devices
        /// that error out (unplugged) are dropped from the poll set.
        pub fn poll(&mut self) -> Vec<UiEvent> {
            let mut events = Vec::new();
            let mut dead = Vec::new();
            for (idx, device) in self.devices.iter_mut().enumerate() {
                match device.fetch_events() {
                    Ok(batch) => {
                        for event in batch {
                            if let InputEventKind::Key(key) = event.kind() {
                                if let Some(ui) = map_key(key, event.value()) {
                                    events.push(ui);
                                }
                            }
                        }
                    }
                    Err(err) if err.kind() == io::ErrorKind::WouldBlock => {}
                    Err(err) => {
                        log::debug!("input device read failed: {}", err);
                        dead.push(idx);
                    }
                }
            }
            for idx in dead.into_iter().rev() {
                self.devices.remove(idx);
            }
            events
        }
    }
}

#[cfg(not(target_os = "linux"))]
mod platform {
    use anyhow::Result;

    use super::UiEvent;

    pub struct TouchPad;

    impl TouchPad {
        pub fn new() -> Result<Self> {
            Ok(Self)
        }

        pub fn poll(&mut self) -> Vec<UiEvent> {
            Vec::new()
        }
    }
}

pub use platform::TouchPad;
