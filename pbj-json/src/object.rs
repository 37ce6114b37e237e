// SPDX-License-Identifier: Apache-2.0

use crate::{JsonError, JsonLexer, JsonResult, Token};

/// Drives `lexer` through a JSON object, calling `on_field(key, lexer)` once
/// per member with the lexer positioned right after that member's `:` --
/// the callback consumes exactly the tokens its value needs (one token for
/// a scalar, a nested `parse_object`/`parse_array` call for a message or
/// repeated field). Field dispatch by key stays in the generated codec;
/// this only owns object punctuation.
pub fn parse_object(
    lexer: &mut JsonLexer,
    mut on_field: impl FnMut(&str, &mut JsonLexer) -> JsonResult<()>,
) -> JsonResult<()> {
    match lexer.next_token()? {
        Token::ObjectStart => {}
        _ => return Err(JsonError::InvalidValueForType),
    }
    loop {
        match lexer.next_token()? {
            Token::ObjectEnd => return Ok(()),
            Token::Str(key) => {
                match lexer.next_token()? {
                    Token::Colon => {}
                    _ => return Err(JsonError::InvalidValueForType),
                }
                on_field(&key, lexer)?;
                match lexer.next_token()? {
                    Token::Comma => continue,
                    Token::ObjectEnd => return Ok(()),
                    _ => return Err(JsonError::InvalidValueForType),
                }
            }
            _ => return Err(JsonError::InvalidValueForType),
        }
    }
}

/// Drives `lexer` through a JSON array (or `null`, accepted as an empty
/// array per the canonical mapping), calling `on_element(lexer)` once per
/// element. Returns whether an array was present at all (`false` for
/// `null`), so the caller can distinguish "absent" from "present but
/// empty" where that matters.
pub fn parse_array(
    lexer: &mut JsonLexer,
    mut on_element: impl FnMut(&mut JsonLexer) -> JsonResult<()>,
) -> JsonResult<bool> {
    match lexer.next_token()? {
        Token::Null => return Ok(false),
        Token::ArrayStart => {}
        _ => return Err(JsonError::InvalidValueForType),
    }
    if lexer.peek_byte_is(b']') {
        lexer.next_token()?;
        return Ok(true);
    }
    loop {
        on_element(lexer)?;
        match lexer.next_token()? {
            Token::Comma => continue,
            Token::ArrayEnd => return Ok(true),
            _ => return Err(JsonError::InvalidValueForType),
        }
    }
}
