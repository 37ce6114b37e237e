// SPDX-License-Identifier: Apache-2.0

/// Converts a proto `snake_case` field name to the `lowerCamelCase` JSON key
/// the canonical mapping uses when a field has no explicit `json_name`.
pub fn to_lower_camel_case(snake: &str) -> String {
    let mut out = String::with_capacity(snake.len());
    let mut capitalize_next = false;
    for ch in snake.chars() {
        if ch == '_' {
            capitalize_next = true;
        } else if capitalize_next {
            out.extend(ch.to_uppercase());
            capitalize_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}
