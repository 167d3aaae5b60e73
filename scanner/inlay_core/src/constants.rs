//! Codepoints and literal tables shared by every scanner.
//!
//! All structural characters of the supported formats are ASCII, so they are
//! expressed as bytes. A multi-byte UTF-8 sequence never contains a byte
//! below `0x80`, which is what lets the scanners compare raw bytes without
//! ever splitting a code point.

pub const SPACE: u8 = b' ';
pub const TAB: u8 = b'\t';
pub const LINE_FEED: u8 = b'\n';
pub const CARRIAGE_RETURN: u8 = b'\r';
pub const FORM_FEED: u8 = 0x0C;

pub const COLON: u8 = b':';
pub const HASH: u8 = b'#';
pub const DASH: u8 = b'-';
pub const COMMA: u8 = b',';
pub const DOT: u8 = b'.';
pub const EQUALS: u8 = b'=';
pub const BANG: u8 = b'!';
pub const DOLLAR: u8 = b'$';
pub const AT: u8 = b'@';
pub const SLASH: u8 = b'/';
pub const BACKSLASH: u8 = b'\\';
pub const PIPE: u8 = b'|';
pub const PERCENT: u8 = b'%';
pub const UNDERSCORE: u8 = b'_';
pub const QUESTION: u8 = b'?';

pub const SINGLE_QUOTE: u8 = b'\'';
pub const DOUBLE_QUOTE: u8 = b'"';
pub const BACKTICK: u8 = b'`';

pub const LEFT_BRACKET: u8 = b'[';
pub const RIGHT_BRACKET: u8 = b']';
pub const LEFT_BRACE: u8 = b'{';
pub const RIGHT_BRACE: u8 = b'}';
pub const LEFT_PAREN: u8 = b'(';
pub const RIGHT_PAREN: u8 = b')';
pub const LESS_THAN: u8 = b'<';
pub const GREATER_THAN: u8 = b'>';

/// Opening and closing line of a front matter block.
pub const FRONT_MATTER_DELIMITER: &str = "---";

/// Plain scalars read as YAML null.
pub const YAML_NULL_LITERALS: [&str; 4] = ["null", "~", "Null", "NULL"];

/// Plain scalars read as YAML booleans, in lower, Title and UPPER case.
pub const YAML_BOOLEAN_LITERALS: [&str; 18] = [
    "true", "True", "TRUE", "false", "False", "FALSE", "yes", "Yes", "YES", "no", "No", "NO",
    "on", "On", "ON", "off", "Off", "OFF",
];

/// Special float spellings read as YAML numbers.
pub const YAML_SPECIAL_FLOATS: [&str; 9] = [
    ".inf", ".Inf", ".INF", "-.inf", "-.Inf", "-.INF", ".nan", ".NaN", ".NAN",
];

/// Space or tab. Line breaks are deliberately excluded.
#[inline]
pub const fn is_inline_whitespace(b: u8) -> bool {
    b == SPACE || b == TAB
}

/// `\n` or `\r`.
#[inline]
pub const fn is_line_break(b: u8) -> bool {
    b == LINE_FEED || b == CARRIAGE_RETURN
}

/// ASCII whitespace including line breaks and form feed.
#[inline]
pub const fn is_whitespace(b: u8) -> bool {
    is_inline_whitespace(b) || is_line_break(b) || b == FORM_FEED
}
