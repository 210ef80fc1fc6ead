// ── Datapath identifiers ──
//
// A switch is identified by its 64-bit OpenFlow datapath id. The controller
// reports it as 16 hex digits; operators type it either way. Everything
// inside the crate uses the integer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical switch identifier.
///
/// Displays as 16 zero-padded lowercase hex digits, the same form the
/// controller uses in topology responses.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SwitchId(u64);

impl SwitchId {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// The integer value sent in flow-entry request bodies.
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Decode a dpid as reported by the controller.
    ///
    /// Controller strings are always hexadecimal, with or without leading
    /// zeros, so `"0000000000000010"` is 16, not 10.
    pub fn from_controller(raw: &str) -> Result<Self, DpidParseError> {
        let trimmed = raw.trim();
        let digits = strip_hex_prefix(trimmed).unwrap_or(trimmed);
        parse_digits(trimmed, digits, Radix::Hexadecimal)
    }

    /// Last four hex digits, used as a node label.
    pub fn short(self) -> String {
        render_short(self)
    }
}

impl From<u64> for SwitchId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for SwitchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

impl FromStr for SwitchId {
    type Err = DpidParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_dpid(s)
    }
}

// ── Parsing ─────────────────────────────────────────────────────────

/// Number base a DPID was interpreted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Radix {
    Decimal,
    Hexadecimal,
}

impl Radix {
    const fn base(self) -> u32 {
        match self {
            Self::Decimal => 10,
            Self::Hexadecimal => 16,
        }
    }
}

/// Text that could not be turned into a [`SwitchId`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DpidParseError {
    #[error("DPID is empty")]
    Empty,

    #[error("'{input}' is not a valid {radix} DPID")]
    InvalidDigit { input: String, radix: Radix },

    #[error("'{input}' does not fit in 64 bits")]
    Overflow { input: String },
}

/// Parse an operator-supplied DPID.
///
/// A `0x`/`0X` prefix or any hex letter selects base 16; plain digit
/// strings are decimal. `"26"` is 26 while `"1A"` and `"0x1A"` are both 26.
pub fn parse_dpid(text: &str) -> Result<SwitchId, DpidParseError> {
    let trimmed = text.trim();
    if let Some(digits) = strip_hex_prefix(trimmed) {
        return parse_digits(trimmed, digits, Radix::Hexadecimal);
    }
    let radix = if trimmed.bytes().any(is_hex_letter) {
        Radix::Hexadecimal
    } else {
        Radix::Decimal
    };
    parse_digits(trimmed, trimmed, radix)
}

fn is_hex_letter(b: u8) -> bool {
    matches!(b, b'a'..=b'f' | b'A'..=b'F')
}

fn strip_hex_prefix(s: &str) -> Option<&str> {
    s.strip_prefix("0x").or_else(|| s.strip_prefix("0X"))
}

fn parse_digits(input: &str, digits: &str, radix: Radix) -> Result<SwitchId, DpidParseError> {
    if input.is_empty() {
        return Err(DpidParseError::Empty);
    }
    // `from_str_radix` accepts a leading `+`, which is not a DPID digit.
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix.base())) {
        return Err(DpidParseError::InvalidDigit {
            input: input.to_owned(),
            radix,
        });
    }
    u64::from_str_radix(digits, radix.base())
        .map(SwitchId)
        .map_err(|_| DpidParseError::Overflow {
            input: input.to_owned(),
        })
}

// ── Short labels ────────────────────────────────────────────────────

/// Last four characters of the display form.
pub fn render_short(id: SwitchId) -> String {
    format_short(&id.to_string()).to_owned()
}

/// Last four characters of `s`, or `s` itself when it is shorter.
pub fn format_short(s: &str) -> &str {
    match s.char_indices().rev().nth(3) {
        Some((idx, _)) => &s[idx..],
        None => s,
    }
}
