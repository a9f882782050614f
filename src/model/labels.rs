//! Fixed lookup tables for serie tiers and round outcomes.
//!
//! Unrecognized labels map to `Unknown` (code -1) instead of failing, so new
//! vocabulary in the feed never blocks ingestion.

const UNKNOWN_CODE: i64 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    S,
    A,
    B,
    C,
    D,
    Unknown,
}

impl Tier {
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "s" => Tier::S,
            "a" => Tier::A,
            "b" => Tier::B,
            "c" => Tier::C,
            "d" => Tier::D,
            _ => Tier::Unknown,
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            Tier::S => 1,
            Tier::A => 2,
            Tier::B => 3,
            Tier::C => 4,
            Tier::D => 5,
            Tier::Unknown => UNKNOWN_CODE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoundOutcome {
    Exploded,
    Defused,
    Timeout,
    Eliminated,
    Unknown,
}

impl RoundOutcome {
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "exploded" => RoundOutcome::Exploded,
            "defused" => RoundOutcome::Defused,
            "timeout" => RoundOutcome::Timeout,
            "eliminated" => RoundOutcome::Eliminated,
            _ => RoundOutcome::Unknown,
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            RoundOutcome::Exploded => 1,
            RoundOutcome::Defused => 2,
            RoundOutcome::Timeout => 3,
            RoundOutcome::Eliminated => 4,
            RoundOutcome::Unknown => UNKNOWN_CODE,
        }
    }
}
