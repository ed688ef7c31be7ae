//! Tokenizer for calculator input.

use super::CalcError;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,
    LParen,
    RParen,
    Comma,
    Assign,
}

impl Token {
    /// Source-like rendering used in error messages.
    pub(crate) fn describe(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Ident(name) => name.clone(),
            Self::Plus => "+".into(),
            Self::Minus => "-".into(),
            Self::Star => "*".into(),
            Self::Slash => "/".into(),
            Self::Percent => "%".into(),
            Self::Caret => "^".into(),
            Self::LParen => "(".into(),
            Self::RParen => ")".into(),
            Self::Comma => ",".into(),
            Self::Assign => "=".into(),
        }
    }
}

pub(crate) fn tokenize(input: &str) -> Result<Vec<Token>, CalcError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        if ch.is_whitespace() {
            i += 1;
            continue;
        }
        if let Some(radix) = radix_prefix(&chars, i) {
            let (number, next) = scan_radix_number(&chars, i, radix)?;
            tokens.push(Token::Number(number));
            i = next;
            continue;
        }
        if ch.is_ascii_digit() || ch == '.' {
            let (number, next) = scan_number(&chars, i)?;
            tokens.push(Token::Number(number));
            i = next;
            continue;
        }
        if ch.is_alphabetic() || ch == '_' {
            let start = i;
            while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            tokens.push(Token::Ident(chars[start..i].iter().collect()));
            continue;
        }
        let token = match ch {
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            '%' => Token::Percent,
            '^' => Token::Caret,
            '(' => Token::LParen,
            ')' => Token::RParen,
            ',' => Token::Comma,
            '=' => Token::Assign,
            other => return Err(CalcError::UnexpectedChar(other)),
        };
        tokens.push(token);
        i += 1;
    }

    Ok(tokens)
}

/// Radix selected by a `0x`, `0o` or `0b` prefix (either case) at `at`.
fn radix_prefix(chars: &[char], at: usize) -> Option<u32> {
    if chars.get(at) != Some(&'0') {
        return None;
    }
    match chars.get(at + 1)? {
        'x' | 'X' => Some(16),
        'o' | 'O' => Some(8),
        'b' | 'B' => Some(2),
        _ => None,
    }
}

/// Scan a prefixed integer literal such as `0xff`, `0o17` or `0b1010`.
fn scan_radix_number(
    chars: &[char],
    start: usize,
    radix: u32,
) -> Result<(f64, usize), CalcError> {
    let mut i = start + 2;
    while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_' || chars[i] == '.')
    {
        i += 1;
    }
    let text: String = chars[start..i].iter().collect();
    let digits = &text[2..];
    if digits.is_empty() {
        return Err(CalcError::InvalidNumber(text));
    }
    u64::from_str_radix(digits, radix)
        .map(|n| (n as f64, i))
        .map_err(|_| CalcError::InvalidNumber(text))
}

/// Scan `digits [. digits] [e [+-] digits]` starting at `start`.
fn scan_number(chars: &[char], start: usize) -> Result<(f64, usize), CalcError> {
    let mut i = start;
    let digits = |i: &mut usize| {
        while *i < chars.len() && chars[*i].is_ascii_digit() {
            *i += 1;
        }
    };

    digits(&mut i);
    if i < chars.len() && chars[i] == '.' {
        i += 1;
        digits(&mut i);
    }
    if i < chars.len() && matches!(chars[i], 'e' | 'E') {
        let mut j = i + 1;
        if j < chars.len() && matches!(chars[j], '+' | '-') {
            j += 1;
        }
        if j < chars.len() && chars[j].is_ascii_digit() {
            i = j;
            digits(&mut i);
        }
    }
    // A number glued to letters (`12abc`) is malformed, not implicit multiplication.
    if i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '.' || chars[i] == '_') {
        while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '.' || chars[i] == '_')
        {
            i += 1;
        }
        return Err(CalcError::InvalidNumber(chars[start..i].iter().collect()));
    }

    let text: String = chars[start..i].iter().collect();
    text.parse::<f64>()
        .map(|n| (n, i))
        .map_err(|_| CalcError::InvalidNumber(text))
}
