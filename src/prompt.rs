use chrono::{DateTime, Local, TimeZone};

const YELLOW: &str = "\x1b[1;33m";
const RED: &str = "\x1b[1;31m";
const RESET: &str = "\x1b[0m";

/// Decorated two-line prompt: a timestamped header, then an input marker.
#[derive(Debug, Clone, Copy)]
pub struct Prompt {
    color: bool,
}

impl Prompt {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// Header line for the current local time, without a trailing newline.
    pub fn header(&self) -> String {
        self.header_at(&Local::now())
    }

    pub fn header_at<Tz: TimeZone>(&self, time: &DateTime<Tz>) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        let stamp = time.format("%a %b %e %H:%M:%S %Y");
        if self.color {
            format!("🐚{YELLOW} {stamp}{RED} CSEShell{RESET}")
        } else {
            format!("🐚 {stamp} CSEShell")
        }
    }

    /// Text shown right before the cursor.
    pub fn marker(&self) -> &'static str {
        "↳ "
    }
}
