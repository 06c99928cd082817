//! Code entry and the resend countdown of the verification step.

use std::time::Duration;

pub const OTP_LENGTH: usize = 6;

/// Six single-digit slots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OtpInput {
    slots: [Option<char>; OTP_LENGTH],
}

impl OtpInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the last digit of `text` in slot `index`; non-digits are
    /// dropped. Returns the slot to focus next, if any.
    pub fn set_digit(&mut self, index: usize, text: &str) -> Option<usize> {
        if index >= OTP_LENGTH {
            return None;
        }

        let digit = text.chars().filter(char::is_ascii_digit).last();
        self.slots[index] = digit;

        match digit {
            Some(_) if index + 1 < OTP_LENGTH => Some(index + 1),
            _ => None,
        }
    }

    /// Backspace on slot `index`. An empty slot moves focus back one.
    pub fn backspace(&mut self, index: usize) -> Option<usize> {
        if index >= OTP_LENGTH {
            return None;
        }
        if self.slots[index].take().is_none() && index > 0 {
            return Some(index - 1);
        }
        None
    }

    /// Fills slots from the digits of a pasted code, starting at slot 0.
    pub fn paste(&mut self, text: &str) {
        self.slots = Default::default();
        for (slot, digit) in self
            .slots
            .iter_mut()
            .zip(text.chars().filter(char::is_ascii_digit))
        {
            *slot = Some(digit);
        }
    }

    pub fn code(&self) -> String {
        self.slots.iter().flatten().collect()
    }

    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    pub fn clear(&mut self) {
        self.slots = Default::default();
    }
}

/// Seconds remaining until a new code may be requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResendCountdown {
    duration_secs: u32,
    remaining: u32,
    can_resend: bool,
}

impl ResendCountdown {
    pub fn new(duration_secs: u32) -> Self {
        Self {
            duration_secs,
            remaining: duration_secs,
            can_resend: duration_secs == 0,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn can_resend(&self) -> bool {
        self.can_resend
    }

    /// `mm:ss` for display.
    pub fn formatted(&self) -> String {
        format!("{:02}:{:02}", self.remaining / 60, self.remaining % 60)
    }

    /// Advances one second.
    pub fn tick(&mut self) {
        if self.remaining <= 1 {
            self.remaining = 0;
            self.can_resend = true;
        } else {
            self.remaining -= 1;
        }
    }

    /// Restarts the countdown. Returns false while resending is locked.
    pub fn resend(&mut self) -> bool {
        if !self.can_resend {
            return false;
        }
        self.remaining = self.duration_secs;
        self.can_resend = self.duration_secs == 0;
        true
    }

    /// Ticks every `period` until resending unlocks.
    pub async fn run(&mut self, period: Duration) {
        let mut interval = tokio::time::interval(period);
        // First tick completes immediately
        interval.tick().await;
        while !self.can_resend {
            interval.tick().await;
            self.tick();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_digit_moves_focus() {
        let mut input = OtpInput::new();
        assert_eq!(input.set_digit(0, "1"), Some(1));
        assert_eq!(input.set_digit(1, "a"), None);
        assert_eq!(input.code(), "1");
        assert_eq!(input.set_digit(1, "x9"), Some(2));
        assert_eq!(input.set_digit(5, "4"), None);
        assert_eq!(input.code(), "194");
        assert!(!input.is_complete());
        assert_eq!(input.set_digit(6, "1"), None);
    }

    #[test]
    fn test_backspace_moves_back_on_empty_slot() {
        let mut input = OtpInput::new();
        input.set_digit(0, "1");
        input.set_digit(1, "2");

        assert_eq!(input.backspace(1), None);
        assert_eq!(input.code(), "1");
        assert_eq!(input.backspace(1), Some(0));
        assert_eq!(input.backspace(0), None);
        assert_eq!(input.code(), "");
    }

    #[test]
    fn test_paste_fills_slots() {
        let mut input = OtpInput::new();
        input.paste("12 34-56789");
        assert_eq!(input.code(), "123456");
        assert!(input.is_complete());

        input.clear();
        assert_eq!(input.code(), "");
    }

    #[test]
    fn test_countdown_unlocks_at_zero() {
        let mut countdown = ResendCountdown::new(3);
        assert!(!countdown.can_resend());
        assert!(!countdown.resend());
        assert_eq!(countdown.formatted(), "00:03");

        countdown.tick();
        countdown.tick();
        assert_eq!(countdown.remaining(), 1);
        assert!(!countdown.can_resend());

        countdown.tick();
        assert_eq!(countdown.remaining(), 0);
        assert!(countdown.can_resend());

        assert!(countdown.resend());
        assert_eq!(countdown.remaining(), 3);
        assert!(!countdown.can_resend());
    }

    #[test]
    fn test_default_duration_format() {
        assert_eq!(ResendCountdown::new(900).formatted(), "15:00");
    }

    #[tokio::test]
    async fn test_run_completes() {
        let mut countdown = ResendCountdown::new(3);
        countdown.run(Duration::from_millis(1)).await;
        assert!(countdown.can_resend());
        assert_eq!(countdown.remaining(), 0);
    }
}
