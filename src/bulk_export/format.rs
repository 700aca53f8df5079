//! printf-style column format patterns
//!
//! A pattern is applied to exactly one value. Supported specifiers:
//!
//! ```text
//! %[argument_index$][flags][width][.precision]conversion
//!
//! flags:       - 0 + ' ' , ( #
//! conversions: s S  d  x X o  f e E  b B  c C  %  n
//! ```
//!
//! Patterns are parsed once, when the run configuration is loaded, so a bad
//! pattern is reported before any vertex executes. Applying a conversion to a
//! value of the wrong kind fails at execution time.

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

use crate::traversal::PathValue;

const SPECIFIER_PATTERN: &str = r"%(?:(\d+)\$)?([-#+ 0,(]*)(\d+)?(?:\.(\d+))?([a-zA-Z%])";

static SPECIFIER: OnceLock<Regex> = OnceLock::new();

fn specifier_regex() -> Result<&'static Regex, FormatError> {
    if let Some(re) = SPECIFIER.get() {
        return Ok(re);
    }
    let re = Regex::new(SPECIFIER_PATTERN).map_err(|e| FormatError::Syntax(e.to_string()))?;
    Ok(SPECIFIER.get_or_init(|| re))
}

/// Errors raised while parsing or applying a format pattern
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("unknown conversion '%{0}'")]
    UnknownConversion(char),

    #[error("pattern requests argument {0} but only one value is supplied")]
    MissingArgument(usize),

    #[error("dangling '%' at offset {0}")]
    DanglingPercent(usize),

    #[error("flags {flags:?} are not valid for '%{conversion}'")]
    InvalidFlags { flags: String, conversion: char },

    #[error("precision is not valid for '%{0}'")]
    InvalidPrecision(char),

    #[error("'%{conversion}' cannot format a {value_type} value")]
    Mismatch {
        conversion: char,
        value_type: &'static str,
    },

    #[error("invalid specifier: {0}")]
    Syntax(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Conversion {
    String,
    Decimal,
    Hex,
    Octal,
    Fixed,
    Scientific,
    Boolean,
    Char,
    Percent,
    Newline,
}

impl Conversion {
    fn consumes_argument(self) -> bool {
        !matches!(self, Conversion::Percent | Conversion::Newline)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Flags {
    left: bool,
    zero: bool,
    plus: bool,
    space: bool,
    group: bool,
    paren: bool,
    alternate: bool,
}

impl Flags {
    fn parse(raw: &str) -> Self {
        let mut flags = Flags::default();
        for c in raw.chars() {
            match c {
                '-' => flags.left = true,
                '0' => flags.zero = true,
                '+' => flags.plus = true,
                ' ' => flags.space = true,
                ',' => flags.group = true,
                '(' => flags.paren = true,
                '#' => flags.alternate = true,
                _ => {}
            }
        }
        flags
    }

    fn any_numeric(&self) -> bool {
        self.zero || self.plus || self.space || self.group || self.paren
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Specifier {
    raw_flags: String,
    flags: Flags,
    width: Option<usize>,
    precision: Option<usize>,
    conversion: Conversion,
    /// Conversion character as written, case preserved
    symbol: char,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Specifier(Specifier),
}

/// A parsed, validated format pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatPattern {
    source: String,
    segments: Vec<Segment>,
}

impl FormatPattern {
    /// Parse and validate `source`
    pub fn parse(source: &str) -> Result<Self, FormatError> {
        let re = specifier_regex()?;
        let mut segments = Vec::new();
        let mut last = 0;
        let mut next_argument = 1;

        for caps in re.captures_iter(source) {
            let Some(whole) = caps.get(0) else { continue };
            push_literal(&mut segments, &source[last..whole.start()], last)?;

            let symbol = caps
                .get(5)
                .and_then(|m| m.as_str().chars().next())
                .ok_or_else(|| FormatError::Syntax(whole.as_str().to_string()))?;
            let conversion = conversion_for(symbol)?;
            let raw_flags = caps.get(2).map_or("", |m| m.as_str()).to_string();
            let width = parse_number(caps.get(3))?;
            let precision = parse_number(caps.get(4))?;

            if conversion.consumes_argument() {
                let index = match parse_number(caps.get(1))? {
                    Some(index) => index,
                    None => {
                        let index = next_argument;
                        next_argument += 1;
                        index
                    }
                };
                if index != 1 {
                    return Err(FormatError::MissingArgument(index));
                }
            }

            let spec = Specifier {
                flags: Flags::parse(&raw_flags),
                raw_flags,
                width,
                precision,
                conversion,
                symbol,
            };
            spec.validate()?;
            segments.push(Segment::Specifier(spec));
            last = whole.end();
        }

        push_literal(&mut segments, &source[last..], last)?;

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    /// The pattern as written
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Apply the pattern to a single value
    pub fn apply(&self, value: &PathValue) -> Result<String, FormatError> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Specifier(spec) => out.push_str(&spec.render(value)?),
            }
        }
        Ok(out)
    }
}

fn push_literal(segments: &mut Vec<Segment>, text: &str, offset: usize) -> Result<(), FormatError> {
    if let Some(pos) = text.find('%') {
        return Err(FormatError::DanglingPercent(offset + pos));
    }
    if !text.is_empty() {
        segments.push(Segment::Literal(text.to_string()));
    }
    Ok(())
}

fn parse_number(m: Option<regex::Match<'_>>) -> Result<Option<usize>, FormatError> {
    m.map(|m| {
        m.as_str()
            .parse::<usize>()
            .map_err(|e| FormatError::Syntax(format!("{}: {}", m.as_str(), e)))
    })
    .transpose()
}

fn conversion_for(symbol: char) -> Result<Conversion, FormatError> {
    Ok(match symbol {
        's' | 'S' => Conversion::String,
        'd' => Conversion::Decimal,
        'x' | 'X' => Conversion::Hex,
        'o' => Conversion::Octal,
        'f' => Conversion::Fixed,
        'e' | 'E' => Conversion::Scientific,
        'b' | 'B' => Conversion::Boolean,
        'c' | 'C' => Conversion::Char,
        '%' => Conversion::Percent,
        'n' => Conversion::Newline,
        other => return Err(FormatError::UnknownConversion(other)),
    })
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

impl Specifier {
    fn invalid_flags(&self) -> FormatError {
        FormatError::InvalidFlags {
            flags: self.raw_flags.clone(),
            conversion: self.symbol,
        }
    }

    fn validate(&self) -> Result<(), FormatError> {
        let f = &self.flags;

        if (f.left || f.zero) && self.width.is_none() {
            return Err(self.invalid_flags());
        }
        if (f.left && f.zero) || (f.plus && f.space) {
            return Err(self.invalid_flags());
        }

        match self.conversion {
            Conversion::String | Conversion::Boolean => {
                if f.any_numeric() || f.alternate {
                    return Err(self.invalid_flags());
                }
            }
            Conversion::Char => {
                if f.any_numeric() || f.alternate {
                    return Err(self.invalid_flags());
                }
                if self.precision.is_some() {
                    return Err(FormatError::InvalidPrecision(self.symbol));
                }
            }
            Conversion::Decimal => {
                if f.alternate {
                    return Err(self.invalid_flags());
                }
                if self.precision.is_some() {
                    return Err(FormatError::InvalidPrecision(self.symbol));
                }
            }
            Conversion::Hex | Conversion::Octal => {
                if f.plus || f.space || f.group || f.paren {
                    return Err(self.invalid_flags());
                }
                if self.precision.is_some() {
                    return Err(FormatError::InvalidPrecision(self.symbol));
                }
            }
            Conversion::Fixed => {
                if f.alternate {
                    return Err(self.invalid_flags());
                }
            }
            Conversion::Scientific => {
                if f.group || f.alternate {
                    return Err(self.invalid_flags());
                }
            }
            Conversion::Percent => {
                if f.any_numeric() || f.alternate {
                    return Err(self.invalid_flags());
                }
                if self.precision.is_some() {
                    return Err(FormatError::InvalidPrecision(self.symbol));
                }
            }
            Conversion::Newline => {
                if !self.raw_flags.is_empty() || self.width.is_some() {
                    return Err(self.invalid_flags());
                }
                if self.precision.is_some() {
                    return Err(FormatError::InvalidPrecision(self.symbol));
                }
            }
        }
        Ok(())
    }

    fn mismatch(&self, value: &PathValue) -> FormatError {
        FormatError::Mismatch {
            conversion: self.symbol,
            value_type: value.type_name(),
        }
    }

    fn upper(&self) -> bool {
        self.symbol.is_ascii_uppercase()
    }

    fn truncate(&self, text: String) -> String {
        match self.precision {
            Some(p) => text.chars().take(p).collect(),
            None => text,
        }
    }

    fn signed(&self, negative: bool, digits: String) -> String {
        if negative {
            if self.flags.paren {
                format!("({})", digits)
            } else {
                format!("-{}", digits)
            }
        } else if self.flags.plus {
            format!("+{}", digits)
        } else if self.flags.space {
            format!(" {}", digits)
        } else {
            digits
        }
    }

    fn pad(&self, body: String, numeric: bool) -> String {
        let Some(width) = self.width else {
            return body;
        };
        let len = body.chars().count();
        if len >= width {
            return body;
        }
        let fill = width - len;

        if self.flags.left {
            format!("{}{}", body, " ".repeat(fill))
        } else if self.flags.zero && numeric {
            let mut prefix = body
                .chars()
                .take_while(|c| matches!(c, '+' | '-' | ' ' | '('))
                .count();
            let rest = &body[prefix..];
            if rest.starts_with("0x") || rest.starts_with("0X") {
                prefix += 2;
            }
            format!("{}{}{}", &body[..prefix], "0".repeat(fill), &body[prefix..])
        } else {
            format!("{}{}", " ".repeat(fill), body)
        }
    }

    fn render(&self, value: &PathValue) -> Result<String, FormatError> {
        let (body, numeric) = match self.conversion {
            Conversion::Newline => return Ok("\n".to_string()),
            Conversion::Percent => ("%".to_string(), false),
            Conversion::String => (self.truncate(value.to_string()), false),
            Conversion::Boolean => {
                let truth = match value {
                    PathValue::Null => false,
                    PathValue::Bool(b) => *b,
                    _ => true,
                };
                (self.truncate(truth.to_string()), false)
            }
            Conversion::Char => {
                let c = match value {
                    PathValue::Null => None,
                    PathValue::String(s) if s.chars().count() == 1 => s.chars().next(),
                    PathValue::Int(n) => {
                        let c = u32::try_from(*n).ok().and_then(char::from_u32);
                        Some(c.ok_or_else(|| self.mismatch(value))?)
                    }
                    _ => return Err(self.mismatch(value)),
                };
                (c.map_or_else(|| "null".to_string(), |c| c.to_string()), false)
            }
            Conversion::Decimal => match value {
                PathValue::Null => ("null".to_string(), false),
                PathValue::Int(n) => {
                    let digits = n.unsigned_abs().to_string();
                    let digits = if self.flags.group {
                        group_thousands(&digits)
                    } else {
                        digits
                    };
                    (self.signed(*n < 0, digits), true)
                }
                _ => return Err(self.mismatch(value)),
            },
            Conversion::Hex => match value {
                PathValue::Null => ("null".to_string(), false),
                PathValue::Int(n) => {
                    let digits = format!("{:x}", *n as u64);
                    let digits = if self.flags.alternate {
                        format!("0x{}", digits)
                    } else {
                        digits
                    };
                    (digits, true)
                }
                _ => return Err(self.mismatch(value)),
            },
            Conversion::Octal => match value {
                PathValue::Null => ("null".to_string(), false),
                PathValue::Int(n) => {
                    let digits = format!("{:o}", *n as u64);
                    let digits = if self.flags.alternate {
                        format!("0{}", digits)
                    } else {
                        digits
                    };
                    (digits, true)
                }
                _ => return Err(self.mismatch(value)),
            },
            Conversion::Fixed => match value {
                PathValue::Null => ("null".to_string(), false),
                PathValue::Float(v) if !v.is_finite() => (non_finite(*v), false),
                PathValue::Float(v) => {
                    let digits = fixed_digits(v.abs(), self.precision.unwrap_or(6));
                    let digits = if self.flags.group {
                        match digits.split_once('.') {
                            Some((int, frac)) => format!("{}.{}", group_thousands(int), frac),
                            None => group_thousands(&digits),
                        }
                    } else {
                        digits
                    };
                    (self.signed(v.is_sign_negative(), digits), true)
                }
                _ => return Err(self.mismatch(value)),
            },
            Conversion::Scientific => match value {
                PathValue::Null => ("null".to_string(), false),
                PathValue::Float(v) if !v.is_finite() => (non_finite(*v), false),
                PathValue::Float(v) => {
                    let (mantissa, exponent) =
                        scientific_digits(v.abs(), self.precision.unwrap_or(6));
                    let sign = if exponent < 0 { '-' } else { '+' };
                    let digits = format!("{}e{}{:02}", mantissa, sign, exponent.abs());
                    (self.signed(v.is_sign_negative(), digits), true)
                }
                _ => return Err(self.mismatch(value)),
            },
        };

        let body = self.pad(body, numeric);
        Ok(if self.upper() { body.to_uppercase() } else { body })
    }
}

/// Shortest round-trip decimal digits of a finite, non-negative value
///
/// Returns `(digits, exponent)` where the value is `d₀.d₁d₂… × 10^exponent`.
fn shortest_digits(value: f64) -> (Vec<u8>, i32) {
    let raw = format!("{:e}", value);
    let (mantissa, exponent) = raw.split_once('e').unwrap_or((raw.as_str(), "0"));
    let digits = mantissa
        .bytes()
        .filter(u8::is_ascii_digit)
        .map(|b| b - b'0')
        .collect();
    (digits, exponent.parse().unwrap_or(0))
}

/// Keep the first `keep` digits, rounding half up
///
/// Returns true when the carry produced a new leading digit.
fn round_half_up(digits: &mut Vec<u8>, keep: usize) -> bool {
    if digits.len() <= keep {
        digits.resize(keep, 0);
        return false;
    }
    let round_up = digits[keep] >= 5;
    digits.truncate(keep);
    if !round_up {
        return false;
    }
    for d in digits.iter_mut().rev() {
        if *d == 9 {
            *d = 0;
        } else {
            *d += 1;
            return false;
        }
    }
    digits.insert(0, 1);
    true
}

fn push_digits(out: &mut String, digits: &[u8]) {
    out.extend(digits.iter().map(|d| char::from(b'0' + d)));
}

/// `%f` body: `precision` fraction digits, ties rounded away from zero
fn fixed_digits(value: f64, precision: usize) -> String {
    let (mut digits, exponent) = shortest_digits(value);

    let mut int_len = exponent + 1;
    if int_len < 1 {
        let mut padded = vec![0; (1 - int_len) as usize];
        padded.append(&mut digits);
        digits = padded;
        int_len = 1;
    }
    let mut int_len = int_len as usize;
    if round_half_up(&mut digits, int_len + precision) {
        int_len += 1;
    }

    let (int, frac) = digits.split_at(int_len);
    let mut out = String::with_capacity(digits.len() + 1);
    push_digits(&mut out, int);
    if precision > 0 {
        out.push('.');
        push_digits(&mut out, frac);
    }
    out
}

/// `%e` mantissa and exponent, ties rounded away from zero
fn scientific_digits(value: f64, precision: usize) -> (String, i32) {
    let (mut digits, mut exponent) = shortest_digits(value);
    if round_half_up(&mut digits, precision + 1) {
        digits.truncate(precision + 1);
        exponent += 1;
    }

    let mut mantissa = String::with_capacity(precision + 2);
    push_digits(&mut mantissa, &digits[..1]);
    if precision > 0 {
        mantissa.push('.');
        push_digits(&mut mantissa, &digits[1..]);
    }
    (mantissa, exponent)
}

fn non_finite(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v > 0.0 {
        "Infinity".to_string()
    } else {
        "-Infinity".to_string()
    }
}
