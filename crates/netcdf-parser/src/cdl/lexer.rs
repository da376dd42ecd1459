//! Tokenizer for CDL text as printed by `ncdump -h`.

use crate::error::{NetCdfError, NetCdfResult};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    /// Identifier, keyword or numeric literal. Backslash escapes are resolved.
    Word(String),
    /// Quoted string with escapes resolved.
    Str(String),
    LBrace,
    RBrace,
    LParen,
    RParen,
    Comma,
    Semi,
    Equals,
    Colon,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Spanned {
    pub token: Token,
    pub line: usize,
    /// Whether whitespace separated this token from the previous one.
    pub spaced: bool,
}

pub(crate) fn tokenize(input: &str) -> NetCdfResult<Vec<Spanned>> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();
    let mut line = 1;
    let mut spaced = true;

    while let Some(&c) = chars.peek() {
        match c {
            '\n' => {
                line += 1;
                spaced = true;
                chars.next();
            }
            c if c.is_whitespace() => {
                spaced = true;
                chars.next();
            }
            '/' if is_comment_start(&chars) => {
                // Skip to end of line; the newline itself is handled above.
                while let Some(&n) = chars.peek() {
                    if n == '\n' {
                        break;
                    }
                    chars.next();
                }
                spaced = true;
            }
            '"' | '\'' => {
                let quote = c;
                let start_line = line;
                chars.next();
                let mut text = String::new();
                loop {
                    match chars.next() {
                        None => {
                            return Err(NetCdfError::syntax(start_line, "unterminated string"))
                        }
                        Some(ch) if ch == quote => break,
                        Some('\\') => {
                            let escaped = chars
                                .next()
                                .ok_or_else(|| NetCdfError::syntax(line, "dangling escape"))?;
                            text.push(unescape(escaped));
                        }
                        Some('\n') => {
                            line += 1;
                            text.push('\n');
                        }
                        Some(ch) => text.push(ch),
                    }
                }
                tokens.push(Spanned {
                    token: Token::Str(text),
                    line: start_line,
                    spaced,
                });
                spaced = false;
            }
            '{' | '}' | '(' | ')' | ',' | ';' | '=' | ':' => {
                chars.next();
                let token = match c {
                    '{' => Token::LBrace,
                    '}' => Token::RBrace,
                    '(' => Token::LParen,
                    ')' => Token::RParen,
                    ',' => Token::Comma,
                    ';' => Token::Semi,
                    '=' => Token::Equals,
                    _ => Token::Colon,
                };
                tokens.push(Spanned {
                    token,
                    line,
                    spaced,
                });
                spaced = false;
            }
            _ => {
                let mut word = String::new();
                while let Some(&n) = chars.peek() {
                    if n.is_whitespace() || "{}(),;=:\"'".contains(n) {
                        break;
                    }
                    if n == '/' && is_comment_start(&chars) {
                        break;
                    }
                    chars.next();
                    if n == '\\' {
                        if let Some(escaped) = chars.next() {
                            word.push(escaped);
                        }
                    } else {
                        word.push(n);
                    }
                }
                tokens.push(Spanned {
                    token: Token::Word(word),
                    line,
                    spaced,
                });
                spaced = false;
            }
        }
    }

    Ok(tokens)
}

fn is_comment_start(chars: &std::iter::Peekable<std::str::Chars<'_>>) -> bool {
    let mut lookahead = chars.clone();
    lookahead.next() == Some('/') && lookahead.next() == Some('/')
}

fn unescape(c: char) -> char {
    match c {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        '0' => '\0',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(input: &str) -> Vec<Token> {
        tokenize(input)
            .unwrap()
            .into_iter()
            .map(|s| s.token)
            .collect()
    }

    #[test]
    fn test_attribute_statement() {
        assert_eq!(
            words("sst:_FillValue = -32767s ;"),
            vec![
                Token::Word("sst".into()),
                Token::Colon,
                Token::Word("_FillValue".into()),
                Token::Equals,
                Token::Word("-32767s".into()),
                Token::Semi,
            ]
        );
    }

    #[test]
    fn test_comments_and_strings() {
        let tokens = words("time = UNLIMITED ; // (4 currently)\n:title = \"a \\\"b\\\"\" ;");
        assert_eq!(tokens[2], Token::Word("UNLIMITED".into()));
        assert_eq!(tokens[3], Token::Semi);
        assert_eq!(tokens[7], Token::Str("a \"b\"".into()));
    }

    #[test]
    fn test_escaped_word_characters() {
        assert_eq!(
            words("float sea\\ surface(x) ;")[1],
            Token::Word("sea surface".into())
        );
    }

    #[test]
    fn test_spacing_and_lines() {
        let tokens = tokenize("variables:\n\tlat:units = \"deg\" ;").unwrap();
        assert_eq!(tokens[0].line, 1);
        assert!(!tokens[1].spaced);
        assert_eq!(tokens[2].line, 2);
        assert!(tokens[2].spaced);
        assert!(!tokens[3].spaced);
    }

    #[test]
    fn test_unterminated_string_is_error() {
        assert!(tokenize(":title = \"oops ;").is_err());
    }
}
