//! Flag names and values as they appear in `config.h`

use std::fmt;

use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// What a recognized flag expects as its replacement text
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlagKind {
    /// Only whether the name is defined matters
    Presence,
    /// An integer literal
    Integer,
    /// A string literal
    String,
}

/// Flags the keymap configuration understands.
///
/// Anything else found in a `config.h` is kept verbatim and handed to the firmware framework.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum KnownFlag {
    OryxConfigurator,
    IgnoreModTapInterrupt,
    UsbSuspendWakeupDelay,
    CapsLockStatus,
    FirmwareVersion,
    RawUsagePage,
    RawUsageId,
    #[strum(serialize = "LAYER_STATE_8BIT")]
    LayerState8Bit,
    #[strum(serialize = "LAYER_STATE_16BIT")]
    LayerState16Bit,
    #[strum(serialize = "LAYER_STATE_32BIT")]
    LayerState32Bit,
    DoubleReport,
}

impl KnownFlag {
    pub fn kind(&self) -> FlagKind {
        match self {
            KnownFlag::UsbSuspendWakeupDelay | KnownFlag::RawUsagePage | KnownFlag::RawUsageId => FlagKind::Integer,
            KnownFlag::FirmwareVersion => FlagKind::String,
            _ => FlagKind::Presence,
        }
    }

    pub fn name(&self) -> &'static str {
        self.into()
    }

    /// Look up a flag by its `config.h` name
    pub fn from_name(name: &str) -> Option<Self> {
        name.parse().ok()
    }
}

/// Radix of an integer literal
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Radix {
    Binary,
    Octal,
    Decimal,
    Hexadecimal,
}

impl Radix {
    pub fn base(&self) -> u32 {
        match self {
            Radix::Binary => 2,
            Radix::Octal => 8,
            Radix::Decimal => 10,
            Radix::Hexadecimal => 16,
        }
    }
}

/// An integer literal that remembers how it was written.
///
/// `0xFF60` and `65376` have the same value but are different literals, so code that
/// emits source text renders [`IntLiteral::text`] rather than the bare value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IntLiteral {
    value: u64,
    radix: Radix,
    text: String,
}

impl IntLiteral {
    pub fn decimal(value: u64) -> Self {
        Self {
            value,
            radix: Radix::Decimal,
            text: value.to_string(),
        }
    }

    /// Hex literal with uppercase digits, e.g. `0xFF60`
    pub fn hex(value: u64) -> Self {
        Self {
            value,
            radix: Radix::Hexadecimal,
            text: format!("{value:#X}"),
        }
    }

    /// Parse a C integer literal, including `u`/`l` suffixes.
    ///
    /// Returns `None` if the text isn't an integer literal or doesn't fit in `u64`.
    pub fn parse(text: &str) -> Option<Self> {
        let digits = text.trim_end_matches(['u', 'U', 'l', 'L']);
        let (radix, digits) = if let Some(d) = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
            (Radix::Hexadecimal, d)
        } else if let Some(d) = digits.strip_prefix("0b").or_else(|| digits.strip_prefix("0B")) {
            (Radix::Binary, d)
        } else if digits.len() > 1 && digits.starts_with('0') {
            (Radix::Octal, &digits[1..])
        } else {
            (Radix::Decimal, digits)
        };
        if digits.is_empty() {
            return None;
        }
        let value = u64::from_str_radix(digits, radix.base()).ok()?;
        Some(Self {
            value,
            radix,
            text: text.to_string(),
        })
    }

    pub fn value(&self) -> u64 {
        self.value
    }

    pub fn radix(&self) -> Radix {
        self.radix
    }

    /// The literal as written
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for IntLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Encoding prefix of a C string literal
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumString, IntoStaticStr)]
pub enum EncodingPrefix {
    #[strum(serialize = "u8")]
    Utf8,
    #[strum(serialize = "u")]
    Utf16,
    #[strum(serialize = "U")]
    Utf32,
    #[strum(serialize = "L")]
    Wide,
}

/// A string literal, stored unescaped
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StrLiteral {
    pub value: String,
    pub prefix: Option<EncodingPrefix>,
}

impl StrLiteral {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            prefix: None,
        }
    }

    pub fn utf8(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            prefix: Some(EncodingPrefix::Utf8),
        }
    }

    /// Unescape the body of a string literal (the text between the quotes).
    ///
    /// Only simple escapes are understood; anything else, e.g. `\x41`, returns `None`
    /// and the caller keeps the whole value as an opaque expression.
    pub fn unescape(body: &str) -> Option<String> {
        let mut out = String::with_capacity(body.len());
        let mut chars = body.chars();
        while let Some(c) = chars.next() {
            if c != '\\' {
                out.push(c);
                continue;
            }
            let escaped = match chars.next()? {
                '\\' => '\\',
                '"' => '"',
                '\'' => '\'',
                'n' => '\n',
                't' => '\t',
                'r' => '\r',
                '0' => '\0',
                _ => return None,
            };
            out.push(escaped);
        }
        Some(out)
    }

    fn escape(value: &str) -> String {
        let mut out = String::with_capacity(value.len());
        for c in value.chars() {
            match c {
                '\\' => out.push_str("\\\\"),
                '"' => out.push_str("\\\""),
                '\n' => out.push_str("\\n"),
                '\t' => out.push_str("\\t"),
                '\r' => out.push_str("\\r"),
                '\0' => out.push_str("\\0"),
                c => out.push(c),
            }
        }
        out
    }
}

impl fmt::Display for StrLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(prefix) = self.prefix {
            write!(f, "{prefix}")?;
        }
        write!(f, "\"{}\"", Self::escape(&self.value))
    }
}

/// Replacement text of a defined flag
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FlagValue {
    Integer(IntLiteral),
    String(StrLiteral),
    /// Any other replacement text, kept verbatim
    Expr(String),
}

impl FlagValue {
    pub fn as_integer(&self) -> Option<&IntLiteral> {
        match self {
            FlagValue::Integer(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&StrLiteral> {
        match self {
            FlagValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for FlagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlagValue::Integer(i) => write!(f, "{i}"),
            FlagValue::String(s) => write!(f, "{s}"),
            FlagValue::Expr(e) => f.write_str(e),
        }
    }
}

/// A single `#define`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Flag {
    pub name: String,
    pub value: Option<FlagValue>,
}

impl Flag {
    pub fn known(&self) -> Option<KnownFlag> {
        KnownFlag::from_name(&self.name)
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "#define {} {}", self.name, value),
            None => write!(f, "#define {}", self.name),
        }
    }
}
