//! Side channels the presentation layer pokes after a tap is stored.

use std::{
    io::{self, Write},
    time::Duration,
};

use log::debug;

pub trait Haptics: Send + Sync {
    fn pulse(&self, duration: Duration);
}

pub trait Notifier: Send + Sync {
    fn show(&self, message: &str, duration: Duration);
}

/// Terminal stand-in for a vibration motor: rings the bell.
pub struct TerminalBell;

impl Haptics for TerminalBell {
    fn pulse(&self, duration: Duration) {
        debug!("haptic pulse for {}ms", duration.as_millis());
        let mut stderr = io::stderr();
        let _ = stderr.write_all(b"\x07");
        let _ = stderr.flush();
    }
}

/// Prints notices on their own line; the terminal keeps them on screen until
/// the next redraw.
pub struct TerminalNotice;

impl Notifier for TerminalNotice {
    fn show(&self, message: &str, duration: Duration) {
        debug!("notice for {}s: {message}", duration.as_secs());
        println!("» {message}");
    }
}
