use crate::error::ExpressionError;

#[derive(Debug, Clone, PartialEq)]
pub(super) enum TokenKind {
    Number(f64),
    Str(String),
    Ident(String),

    // Punctuation
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Dot,
    Colon,
    Question,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Bang,
    EqEq,
    BangEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    AndAnd,
    OrOr,

    Eof,
}

impl TokenKind {
    pub(super) fn describe(&self) -> String {
        match self {
            TokenKind::Number(n) => format!("number {}", n),
            TokenKind::Str(s) => format!("string {:?}", s),
            TokenKind::Ident(name) => format!("'{}'", name),
            TokenKind::Eof => "end of expression".to_string(),
            other => format!("'{}'", other.symbol()),
        }
    }

    fn symbol(&self) -> &'static str {
        match self {
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::Comma => ",",
            TokenKind::Dot => ".",
            TokenKind::Colon => ":",
            TokenKind::Question => "?",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::Bang => "!",
            TokenKind::EqEq => "==",
            TokenKind::BangEq => "!=",
            TokenKind::Lt => "<",
            TokenKind::LtEq => "<=",
            TokenKind::Gt => ">",
            TokenKind::GtEq => ">=",
            TokenKind::AndAnd => "&&",
            TokenKind::OrOr => "||",
            TokenKind::Number(_) | TokenKind::Str(_) | TokenKind::Ident(_) | TokenKind::Eof => "",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(super) struct Token {
    pub kind: TokenKind,
    /// Character offset of the token's first character.
    pub position: usize,
}

/// Splits expression source into tokens. Positions are character offsets.
pub(super) fn tokenize(source: &str) -> Result<Vec<Token>, ExpressionError> {
    let chars: Vec<char> = source.chars().collect();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < chars.len() {
        let c = chars[pos];
        if c.is_whitespace() {
            pos += 1;
            continue;
        }

        let start = pos;
        let kind = match c {
            '0'..='9' => {
                let (number, next) = read_number(&chars, pos)?;
                pos = next;
                TokenKind::Number(number)
            }
            '.' if chars.get(pos + 1).is_some_and(|n| n.is_ascii_digit()) => {
                let (number, next) = read_number(&chars, pos)?;
                pos = next;
                TokenKind::Number(number)
            }
            '"' | '\'' => {
                let (text, next) = read_string(&chars, pos)?;
                pos = next;
                TokenKind::Str(text)
            }
            c if is_ident_start(c) => {
                while pos < chars.len() && is_ident_continue(chars[pos]) {
                    pos += 1;
                }
                TokenKind::Ident(chars[start..pos].iter().collect())
            }
            _ => {
                let (kind, width) = read_operator(&chars, pos)?;
                pos += width;
                kind
            }
        };
        tokens.push(Token {
            kind,
            position: start,
        });
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        position: chars.len(),
    });
    Ok(tokens)
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

fn read_number(chars: &[char], start: usize) -> Result<(f64, usize), ExpressionError> {
    let mut pos = start;
    while pos < chars.len() && chars[pos].is_ascii_digit() {
        pos += 1;
    }
    if pos < chars.len() && chars[pos] == '.' {
        pos += 1;
        while pos < chars.len() && chars[pos].is_ascii_digit() {
            pos += 1;
        }
    }
    if pos < chars.len() && (chars[pos] == 'e' || chars[pos] == 'E') {
        let mut exp = pos + 1;
        if exp < chars.len() && (chars[exp] == '+' || chars[exp] == '-') {
            exp += 1;
        }
        if exp < chars.len() && chars[exp].is_ascii_digit() {
            pos = exp;
            while pos < chars.len() && chars[pos].is_ascii_digit() {
                pos += 1;
            }
        }
    }

    let text: String = chars[start..pos].iter().collect();
    text.parse::<f64>()
        .map(|n| (n, pos))
        .map_err(|_| ExpressionError::Parse {
            message: format!("invalid number '{}'", text),
            position: start,
        })
}

fn read_string(chars: &[char], start: usize) -> Result<(String, usize), ExpressionError> {
    let quote = chars[start];
    let mut pos = start + 1;
    let mut text = String::new();

    while pos < chars.len() {
        let c = chars[pos];
        if c == quote {
            return Ok((text, pos + 1));
        }
        if c == '\\' {
            let escaped = chars.get(pos + 1).ok_or_else(|| unterminated(start))?;
            text.push(match escaped {
                'n' => '\n',
                't' => '\t',
                'r' => '\r',
                '0' => '\0',
                other => *other,
            });
            pos += 2;
        } else {
            text.push(c);
            pos += 1;
        }
    }

    Err(unterminated(start))
}

fn unterminated(start: usize) -> ExpressionError {
    ExpressionError::Parse {
        message: "unterminated string literal".to_string(),
        position: start,
    }
}

fn read_operator(chars: &[char], pos: usize) -> Result<(TokenKind, usize), ExpressionError> {
    let c = chars[pos];
    let next = chars.get(pos + 1).copied();
    let after = chars.get(pos + 2).copied();

    let token = match (c, next) {
        // `===` and `!==` are accepted as spellings of `==` and `!=`.
        ('=', Some('=')) if after == Some('=') => (TokenKind::EqEq, 3),
        ('!', Some('=')) if after == Some('=') => (TokenKind::BangEq, 3),
        ('=', Some('=')) => (TokenKind::EqEq, 2),
        ('!', Some('=')) => (TokenKind::BangEq, 2),
        ('<', Some('=')) => (TokenKind::LtEq, 2),
        ('>', Some('=')) => (TokenKind::GtEq, 2),
        ('&', Some('&')) => (TokenKind::AndAnd, 2),
        ('|', Some('|')) => (TokenKind::OrOr, 2),
        ('(', _) => (TokenKind::LParen, 1),
        (')', _) => (TokenKind::RParen, 1),
        ('[', _) => (TokenKind::LBracket, 1),
        (']', _) => (TokenKind::RBracket, 1),
        ('{', _) => (TokenKind::LBrace, 1),
        ('}', _) => (TokenKind::RBrace, 1),
        (',', _) => (TokenKind::Comma, 1),
        ('.', _) => (TokenKind::Dot, 1),
        (':', _) => (TokenKind::Colon, 1),
        ('?', _) => (TokenKind::Question, 1),
        ('+', _) => (TokenKind::Plus, 1),
        ('-', _) => (TokenKind::Minus, 1),
        ('*', _) => (TokenKind::Star, 1),
        ('/', _) => (TokenKind::Slash, 1),
        ('%', _) => (TokenKind::Percent, 1),
        ('!', _) => (TokenKind::Bang, 1),
        ('<', _) => (TokenKind::Lt, 1),
        ('>', _) => (TokenKind::Gt, 1),
        ('=', _) => {
            return Err(ExpressionError::Parse {
                message: "assignment is not supported, use '==' to compare".to_string(),
                position: pos,
            });
        }
        (other, _) => {
            return Err(ExpressionError::Parse {
                message: format!("unexpected character '{}'", other),
                position: pos,
            });
        }
    };
    Ok(token)
}
