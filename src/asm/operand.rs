use std::collections::HashMap;

/// Outcome of parsing an operand token.
#[derive(Debug, Eq, PartialEq)]
pub enum Value {
  Number(i64),
  /// A well-formed identifier with no binding yet.
  Unbound,
  Invalid,
}

/// True for `[A-Z_][A-Z0-9_]*` on upper-cased text.
pub fn is_identifier(s: &str) -> bool {
  let mut chars = s.chars();
  match chars.next() {
    Some(c) if c.is_ascii_uppercase() || c == '_' => (),
    _ => return false,
  }
  chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

/// Parse unsigned digits in `radix`. Neither prefixed form takes a sign.
fn radix(digits: &str, radix: u32) -> Value {
  if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
    return Value::Invalid;
  }
  match i64::from_str_radix(digits, radix) {
    Ok(n) => Value::Number(n),
    Err(_) => Value::Invalid,
  }
}

/// Parse an upper-cased operand token: hex (`0X`, `$`), binary (`0B`, `%`),
/// label, or decimal.
pub fn parse(token: &str, labels: &HashMap<String, u16>) -> Value {
  let token = token.trim();

  let hex = token.strip_prefix("0X").or_else(|| token.strip_prefix('$'));
  if let Some(hex) = hex {
    return radix(hex, 16);
  }
  let bin = token.strip_prefix("0B").or_else(|| token.strip_prefix('%'));
  if let Some(bin) = bin {
    return radix(bin, 2);
  }
  if let Some(&addr) = labels.get(token) {
    return Value::Number(i64::from(addr));
  }
  if is_identifier(token) {
    return Value::Unbound;
  }

  let digits = token
    .strip_prefix(|c: char| c == '-' || c == '+')
    .unwrap_or(token);
  if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
    return Value::Invalid;
  }
  match token.parse::<i64>() {
    Ok(n) => Value::Number(n),
    Err(_) => Value::Invalid,
  }
}
