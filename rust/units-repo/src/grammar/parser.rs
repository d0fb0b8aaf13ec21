//! Recursive descent parser from tokens to variables.

use std::collections::HashSet;

use super::MAX_DEPTH;
use super::tokenizer::{Spanned, Token};
use crate::error::SyntaxError;
use crate::reference::{GrammarRef, Reference};
use crate::registry::RegistryRef;
use crate::variable::{Composite, Variable};

/// A token-stream parser.
pub(super) struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
    depth: usize,
    /// Offset reported for errors at the end of input
    end: usize,
    grammar: GrammarRef,
    registry: RegistryRef,
}

impl Parser {
    pub(super) fn new(
        tokens: Vec<Spanned>,
        end: usize,
        grammar: GrammarRef,
        registry: RegistryRef,
    ) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
            end,
            grammar,
            registry,
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|spanned| &spanned.token)
    }

    fn advance(&mut self) -> Option<Spanned> {
        let spanned = self.tokens.get(self.pos).cloned();
        if spanned.is_some() {
            self.pos += 1;
        }
        spanned
    }

    fn offset(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map(|spanned| spanned.offset)
            .unwrap_or(self.end)
    }

    /// Consume the next token if it is `token`.
    fn eat(&mut self, token: &Token) -> bool {
        if self.peek() == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: Token) -> Result<(), SyntaxError> {
        if self.eat(&token) {
            Ok(())
        } else {
            Err(self.expected(token.to_string()))
        }
    }

    fn expected(&self, expected: impl Into<String>) -> SyntaxError {
        SyntaxError::Expected {
            expected: expected.into(),
            found: self
                .peek()
                .map(Token::to_string)
                .unwrap_or_else(|| "end of input".into()),
            offset: self.offset(),
        }
    }

    /// Parse a whole specification: exactly one variable.
    pub(super) fn parse_spec(mut self) -> Result<Variable, SyntaxError> {
        let variable = self.parse_variable()?;
        if self.peek().is_some() {
            return Err(self.expected("end of input"));
        }
        Ok(variable)
    }

    fn parse_variable(&mut self) -> Result<Variable, SyntaxError> {
        if self.depth >= MAX_DEPTH {
            return Err(SyntaxError::TooDeep {
                limit: MAX_DEPTH,
                offset: self.offset(),
            });
        }
        self.depth += 1;
        let variable = self.parse_node();
        self.depth -= 1;
        variable
    }

    fn parse_node(&mut self) -> Result<Variable, SyntaxError> {
        match self.peek() {
            Some(Token::Text(_)) => match self.advance() {
                Some(Spanned {
                    token: Token::Text(text),
                    ..
                }) => Ok(Variable::Text(text)),
                _ => unreachable!(),
            },
            Some(Token::Word(_)) => match self.advance() {
                Some(Spanned {
                    token: Token::Word(word),
                    offset,
                }) => self.parse_word(word, offset),
                _ => unreachable!(),
            },
            Some(Token::OpenBracket) => {
                self.advance();
                let items = self.parse_sequence(Token::CloseBracket)?;
                Ok(Variable::Array(items))
            }
            Some(Token::OpenBrace) => {
                self.advance();
                self.parse_dictionary()
            }
            _ => Err(self.expected("variable")),
        }
    }

    fn parse_word(&mut self, word: String, offset: usize) -> Result<Variable, SyntaxError> {
        if is_integer(&word) {
            return word
                .parse()
                .map(Variable::Integer)
                .map_err(|_| SyntaxError::IntegerOverflow {
                    literal: word,
                    offset,
                });
        }
        match word.as_str() {
            "true" => return Ok(Variable::Boolean(true)),
            "false" => return Ok(Variable::Boolean(false)),
            _ => {}
        }
        if matches!(self.peek(), Some(Token::Dot | Token::OpenParen)) {
            return self.parse_composite(word);
        }

        Reference::new(self.grammar.clone(), word)
            .map(Variable::Reference)
            .map_err(|source| SyntaxError::InvalidName { offset, source })
    }

    fn parse_composite(&mut self, first: String) -> Result<Variable, SyntaxError> {
        let mut type_name = first;
        while self.eat(&Token::Dot) {
            let Some(Token::Word(segment)) = self.peek().cloned() else {
                return Err(self.expected("type name"));
            };
            self.pos += 1;
            type_name.push('.');
            type_name.push_str(&segment);
        }
        self.expect(Token::OpenParen)?;
        let arguments = self.parse_sequence(Token::CloseParen)?;

        Ok(Variable::Composite(Composite::new(
            self.registry.clone(),
            type_name,
            arguments,
        )))
    }

    /// Comma separated variables up to `close`, trailing comma allowed. The
    /// opening token has already been consumed.
    fn parse_sequence(&mut self, close: Token) -> Result<Vec<Variable>, SyntaxError> {
        let mut items = Vec::new();
        loop {
            if self.eat(&close) {
                return Ok(items);
            }
            items.push(self.parse_variable()?);
            if !self.eat(&Token::Comma) {
                self.expect(close)?;
                return Ok(items);
            }
        }
    }

    fn parse_dictionary(&mut self) -> Result<Variable, SyntaxError> {
        let mut entries = Vec::new();
        let mut keys = HashSet::new();
        loop {
            if self.eat(&Token::CloseBrace) {
                break;
            }
            let offset = self.offset();
            let key = match self.peek() {
                Some(Token::Text(_)) => match self.advance() {
                    Some(Spanned {
                        token: Token::Text(key),
                        ..
                    }) => key,
                    _ => unreachable!(),
                },
                _ => return Err(self.expected("text key")),
            };
            if !keys.insert(key.clone()) {
                return Err(SyntaxError::DuplicateKey { key, offset });
            }
            self.expect(Token::Colon)?;
            entries.push((key, self.parse_variable()?));
            if !self.eat(&Token::Comma) {
                self.expect(Token::CloseBrace)?;
                break;
            }
        }
        Ok(Variable::Dictionary(entries))
    }
}

/// Whether `word` is an optionally negative run of digits.
fn is_integer(word: &str) -> bool {
    let digits = word.strip_prefix('-').unwrap_or(word);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use crate::error::SyntaxError;
    use crate::grammar::{Grammar, MAX_DEPTH, UnitGrammar};
    use crate::registry::Registry;
    use crate::variable::Variable;
    use pretty_assertions::assert_eq;

    fn parse(text: &str) -> Result<Variable, SyntaxError> {
        UnitGrammar::new(Registry::records()).parse(text)
    }

    #[test]
    fn it_parses_scalars() {
        assert_eq!(parse("42").unwrap(), Variable::Integer(42));
        assert_eq!(parse(" -7 ").unwrap(), Variable::Integer(-7));
        assert_eq!(parse("true").unwrap(), Variable::Boolean(true));
        assert_eq!(parse("false").unwrap(), Variable::Boolean(false));
        assert_eq!(parse("\"hi\"").unwrap(), Variable::Text("hi".into()));
        assert_eq!(
            parse("-9223372036854775808").unwrap(),
            Variable::Integer(i64::MIN)
        );
    }

    #[test]
    fn it_treats_other_words_as_references() {
        for word in ["build", "1-2", "--5", "-", "_", "truely"] {
            match parse(word).unwrap() {
                Variable::Reference(reference) => assert_eq!(reference.as_text(), word),
                other => panic!("expected a reference for {word}, got {other:?}"),
            }
        }
    }

    #[test]
    fn it_parses_nested_structures() {
        let variable = parse(
            r#"{
                "name": "release",   # comment
                "steps": [build, test, shell.Step("make", 2,),],
                "dry": false,
            }"#,
        )
        .unwrap();

        assert_eq!(
            variable.as_text(),
            r#"{"name": "release", "steps": [build, test, shell.Step("make", 2)], "dry": false}"#
        );
    }

    #[test]
    fn it_parses_empty_collections() {
        assert_eq!(parse("[]").unwrap(), Variable::Array(vec![]));
        assert_eq!(parse("{ }").unwrap(), Variable::Dictionary(vec![]));
        assert_eq!(parse("x.Y()").unwrap().as_text(), "x.Y()");
    }

    #[test]
    fn it_round_trips_canonical_text() {
        let grammar = UnitGrammar::new(Registry::records());
        for text in [
            r#"[a, "b \"c\"", -3, true, {"k": x.Y(z, [1])}]"#,
            r#"pipeline.Release({"a\tb": [], "c": {}}, next-unit)"#,
        ] {
            let variable = grammar.parse(text).unwrap();
            assert_eq!(variable.as_text(), text);
            assert_eq!(grammar.parse(&variable.as_text()).unwrap(), variable);
        }
    }

    #[test]
    fn it_reports_offsets_of_unexpected_tokens() {
        assert_eq!(
            parse("[a b]"),
            Err(SyntaxError::Expected {
                expected: "']'".into(),
                found: "'b'".into(),
                offset: 3,
            })
        );
        assert_eq!(
            parse("[a,"),
            Err(SyntaxError::Expected {
                expected: "variable".into(),
                found: "end of input".into(),
                offset: 3,
            })
        );
        assert_eq!(
            parse("a b"),
            Err(SyntaxError::Expected {
                expected: "end of input".into(),
                found: "'b'".into(),
                offset: 2,
            })
        );
        assert_eq!(
            parse(""),
            Err(SyntaxError::Expected {
                expected: "variable".into(),
                found: "end of input".into(),
                offset: 0,
            })
        );
    }

    #[test]
    fn it_rejects_malformed_composites() {
        assert_eq!(
            parse("shell.(1)"),
            Err(SyntaxError::Expected {
                expected: "type name".into(),
                found: "'('".into(),
                offset: 6,
            })
        );
        assert_eq!(
            parse("shell.Step"),
            Err(SyntaxError::Expected {
                expected: "'('".into(),
                found: "end of input".into(),
                offset: 10,
            })
        );
    }

    #[test]
    fn it_rejects_bad_dictionaries() {
        assert_eq!(
            parse(r#"{"a": 1, "a": 2}"#),
            Err(SyntaxError::DuplicateKey {
                key: "a".into(),
                offset: 9,
            })
        );
        assert_eq!(
            parse("{a: 1}"),
            Err(SyntaxError::Expected {
                expected: "text key".into(),
                found: "'a'".into(),
                offset: 1,
            })
        );
    }

    #[test]
    fn it_rejects_integer_overflow() {
        assert_eq!(
            parse("[99999999999999999999]"),
            Err(SyntaxError::IntegerOverflow {
                literal: "99999999999999999999".into(),
                offset: 1,
            })
        );
    }

    #[test]
    fn it_limits_nesting() {
        let within = format!("{}{}", "[".repeat(MAX_DEPTH), "]".repeat(MAX_DEPTH));
        assert!(parse(&within).is_ok());

        let beyond = format!("{}{}", "[".repeat(MAX_DEPTH + 1), "]".repeat(MAX_DEPTH + 1));
        assert_eq!(
            parse(&beyond),
            Err(SyntaxError::TooDeep {
                limit: MAX_DEPTH,
                offset: MAX_DEPTH,
            })
        );
    }
}
