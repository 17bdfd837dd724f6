//! Thread stop reasons and their integer encoding

use std::fmt;
use std::str::FromStr;

use crate::common::{Error, Result};

/// Why a thread of the inferior halted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopReason {
    Invalid,
    None,
    Trace,
    Breakpoint,
    Watchpoint,
    Signal,
    Exception,
    PlanComplete,
}

impl StopReason {
    pub const ALL: [StopReason; 8] = [
        StopReason::Invalid,
        StopReason::None,
        StopReason::Trace,
        StopReason::Breakpoint,
        StopReason::Watchpoint,
        StopReason::Signal,
        StopReason::Exception,
        StopReason::PlanComplete,
    ];

    /// Integer encoding used by the engine
    pub fn code(self) -> i32 {
        match self {
            StopReason::Invalid => 0,
            StopReason::None => 1,
            StopReason::Trace => 2,
            StopReason::Breakpoint => 3,
            StopReason::Watchpoint => 4,
            StopReason::Signal => 5,
            StopReason::Exception => 6,
            StopReason::PlanComplete => 7,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            StopReason::Invalid => "Invalid",
            StopReason::None => "None",
            StopReason::Trace => "Trace",
            StopReason::Breakpoint => "Breakpoint",
            StopReason::Watchpoint => "Watchpoint",
            StopReason::Signal => "Signal",
            StopReason::Exception => "Exception",
            StopReason::PlanComplete => "PlanComplete",
        }
    }

    pub fn from_code(code: i32) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|reason| reason.code() == code)
            .ok_or(Error::UnknownStopReasonCode(code))
    }

    /// Look up a stop reason by its exact symbolic name
    pub fn from_name(name: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|reason| reason.name() == name)
            .ok_or_else(|| Error::UnknownStopReasonName(name.to_string()))
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StopReason {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s)
    }
}

impl TryFrom<i32> for StopReason {
    type Error = Error;

    fn try_from(code: i32) -> Result<Self> {
        Self::from_code(code)
    }
}

impl From<StopReason> for i32 {
    fn from(reason: StopReason) -> i32 {
        reason.code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions_are_inverse() {
        for (expected_code, reason) in StopReason::ALL.into_iter().enumerate() {
            let code = reason.code();
            assert_eq!(code, expected_code as i32);
            assert_eq!(StopReason::from_code(code).unwrap(), reason);
            assert_eq!(StopReason::from_name(reason.name()).unwrap(), reason);
        }
    }

    #[test]
    fn test_known_encodings() {
        assert_eq!(StopReason::from_name("Breakpoint").unwrap().code(), 3);
        assert_eq!(StopReason::from_code(7).unwrap().name(), "PlanComplete");
        assert_eq!("Signal".parse::<StopReason>().unwrap(), StopReason::Signal);
        assert_eq!(StopReason::try_from(0).unwrap(), StopReason::Invalid);
    }

    #[test]
    fn test_unknown_values_fault() {
        assert!(matches!(
            StopReason::from_name("breakpoint"),
            Err(Error::UnknownStopReasonName(_))
        ));
        assert!(matches!(
            StopReason::from_name(""),
            Err(Error::UnknownStopReasonName(_))
        ));
        assert!(matches!(
            StopReason::from_code(8),
            Err(Error::UnknownStopReasonCode(8))
        ));
        assert!(matches!(
            StopReason::from_code(-1),
            Err(Error::UnknownStopReasonCode(-1))
        ));
    }
}
