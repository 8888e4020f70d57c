//! Single-character operator commands

/// Commands accepted from the console while idle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Print ball position and platform angles
    ShowPosition,
    /// Print platform angular rates
    ShowRates,
    /// Enter a duty cycle for motor 1
    SetDutyMotor1,
    /// Enter a duty cycle for motor 2
    SetDutyMotor2,
    /// Start recording samples
    StartRecording,
    /// Stop recording and dump the samples
    StopRecording,
    /// Enter the six cascade gains
    EnterGains,
    /// Toggle closed-loop control
    ToggleClosedLoop,
    /// Print the command summary
    Help,
    /// Terminate the scheduler (Ctrl-C)
    Abort,
}

// Wire format values
const KEY_ABORT: u8 = 0x03;

impl Command {
    /// Parse a command from a received byte
    ///
    /// Motor selection is case sensitive; every other letter is not.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'p' | b'P' => Some(Command::ShowPosition),
            b'v' | b'V' => Some(Command::ShowRates),
            b'm' => Some(Command::SetDutyMotor1),
            b'M' => Some(Command::SetDutyMotor2),
            b'g' | b'G' => Some(Command::StartRecording),
            b's' | b'S' => Some(Command::StopRecording),
            b'k' | b'K' => Some(Command::EnterGains),
            b'w' | b'W' => Some(Command::ToggleClosedLoop),
            b'h' | b'H' => Some(Command::Help),
            KEY_ABORT => Some(Command::Abort),
            _ => None,
        }
    }
}

/// Command summary printed at start-up and on `h`
pub const HELP_TEXT: &str = "\
---------------------------------------------\r\n\
Welcome to the platform wizard!\r\n\
---------------------------------------------\r\n\
Press P to print current position of the ball.\r\n\
Press V to print angular velocities of platform.\r\n\
Press m to enter duty cycle for motor 1.\r\n\
Press M to enter duty cycle for motor 2.\r\n\
Press G to collect data for 10s.\r\n\
Press S to stop data collection.\r\n\
Press K to set closed-loop gain(s).\r\n\
Press W to toggle closed-loop control.\r\n\
Press H to print this help.\r\n\
Press Ctrl-C to terminate.\r\n\
---------------------------------------------\r\n";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive_commands() {
        assert_eq!(Command::from_byte(b'p'), Some(Command::ShowPosition));
        assert_eq!(Command::from_byte(b'P'), Some(Command::ShowPosition));
        assert_eq!(Command::from_byte(b'w'), Some(Command::ToggleClosedLoop));
        assert_eq!(Command::from_byte(b'W'), Some(Command::ToggleClosedLoop));
    }

    #[test]
    fn test_motor_selection_is_case_sensitive() {
        assert_eq!(Command::from_byte(b'm'), Some(Command::SetDutyMotor1));
        assert_eq!(Command::from_byte(b'M'), Some(Command::SetDutyMotor2));
    }

    #[test]
    fn test_ctrl_c_aborts() {
        assert_eq!(Command::from_byte(0x03), Some(Command::Abort));
    }

    #[test]
    fn test_help_lists_every_key() {
        let mut keys = 0;
        for line in HELP_TEXT.split("\r\n") {
            let Some(rest) = line.strip_prefix("Press ") else {
                continue;
            };
            if rest.starts_with("Ctrl") {
                continue;
            }
            let key = rest.as_bytes()[0];
            assert!(Command::from_byte(key).is_some(), "no command for {}", key as char);
            keys += 1;
        }
        // P V m M G S K W H
        assert_eq!(keys, 9);
        assert_eq!(Command::from_byte(b'H'), Some(Command::Help));
    }

    #[test]
    fn test_unknown_command() {
        assert!(Command::from_byte(b'x').is_none());
        assert!(Command::from_byte(b'\r').is_none());
        assert!(Command::from_byte(0xFF).is_none());
    }
}
