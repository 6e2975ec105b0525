//! 128-bit interface identifiers.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A 128-bit interface identifier in COM-style layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Guid {
    pub data1: u32,
    pub data2: u16,
    pub data3: u16,
    pub data4: [u8; 8],
}

/// The guid string does not match the canonical 36-character form.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("not a valid guid")]
pub struct GuidParseError;

impl Guid {
    pub const NIL: Guid = Guid {
        data1: 0,
        data2: 0,
        data3: 0,
        data4: [0; 8],
    };

    pub fn is_nil(&self) -> bool {
        *self == Guid::NIL
    }
}

fn hex_field(text: &str) -> Result<u64, GuidParseError> {
    u64::from_str_radix(text, 16).map_err(|_| GuidParseError)
}

impl FromStr for Guid {
    type Err = GuidParseError;

    /// Parses the canonical dashed form
    /// `XXXXXXXX-XXXX-XXXX-XXXX-XXXXXXXXXXXX` (hex digits, either case).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.len() != 36 {
            return Err(GuidParseError);
        }
        for (i, b) in bytes.iter().enumerate() {
            let ok = match i {
                8 | 13 | 18 | 23 => *b == b'-',
                _ => b.is_ascii_hexdigit(),
            };
            if !ok {
                return Err(GuidParseError);
            }
        }

        let mut data4 = [0u8; 8];
        data4[0] = hex_field(&s[19..21])? as u8;
        data4[1] = hex_field(&s[21..23])? as u8;
        for (i, slot) in data4[2..].iter_mut().enumerate() {
            let start = 24 + i * 2;
            *slot = hex_field(&s[start..start + 2])? as u8;
        }

        Ok(Guid {
            data1: hex_field(&s[0..8])? as u32,
            data2: hex_field(&s[9..13])? as u16,
            data3: hex_field(&s[14..18])? as u16,
            data4,
        })
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:08x}-{:04x}-{:04x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}",
            self.data1,
            self.data2,
            self.data3,
            self.data4[0],
            self.data4[1],
            self.data4[2],
            self.data4[3],
            self.data4[4],
            self.data4[5],
            self.data4[6],
            self.data4[7],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canonical() {
        let guid: Guid = "01234567-89ab-cdef-0123-456789abcdef".parse().unwrap();
        assert_eq!(guid.data1, 0x0123_4567);
        assert_eq!(guid.data2, 0x89ab);
        assert_eq!(guid.data3, 0xcdef);
        assert_eq!(guid.data4, [0x01, 0x23, 0x45, 0x67, 0x89, 0xab, 0xcd, 0xef]);
    }

    #[test]
    fn test_parse_uppercase() {
        let guid: Guid = "6921AC75-BCE9-490C-B003-8C5274C8364B".parse().unwrap();
        assert_eq!(guid.data1, 0x6921_ac75);
        assert_eq!(guid.data4[7], 0x4b);
    }

    #[test]
    fn test_display_round_trip() {
        let text = "01234567-89ab-cdef-0123-456789abcdef";
        let guid: Guid = text.parse().unwrap();
        assert_eq!(guid.to_string(), text);
    }

    #[test]
    fn test_reject_wrong_length() {
        assert!("0123".parse::<Guid>().is_err());
        assert!("01234567-89ab-cdef-0123-456789abcdef0"
            .parse::<Guid>()
            .is_err());
    }

    #[test]
    fn test_reject_misplaced_dashes() {
        assert!("0123456789-ab-cdef-0123-456789abcdef"
            .parse::<Guid>()
            .is_err());
    }

    #[test]
    fn test_reject_non_hex() {
        assert!("0123456g-89ab-cdef-0123-456789abcdef"
            .parse::<Guid>()
            .is_err());
    }

    #[test]
    fn test_nil() {
        assert!(Guid::NIL.is_nil());
        let guid: Guid = "01234567-89ab-cdef-0123-456789abcdef".parse().unwrap();
        assert!(!guid.is_nil());
    }
}
