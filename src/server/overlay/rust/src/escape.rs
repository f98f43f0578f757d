/* src/server/overlay/rust/src/escape.rs */

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

/// Bytes that cannot appear in a header value as-is. Reserved URL characters
/// stay literal.
const HEADER_UNSAFE: &AsciiSet = &CONTROLS.add(b' ');

/// Rewrite non-ASCII characters inside JSON strings as `\uXXXX` escapes so the
/// text can travel in an HTTP header. Astral characters become surrogate pairs.
pub fn ascii_escape_json(json: &str) -> String {
  let mut out = String::with_capacity(json.len());
  let mut in_string = false;
  let mut escaped = false;

  for ch in json.chars() {
    if !in_string {
      in_string = ch == '"';
      out.push(ch);
      continue;
    }
    if escaped {
      escaped = false;
      out.push(ch);
      continue;
    }
    match ch {
      '\\' => {
        escaped = true;
        out.push(ch);
      }
      '"' => {
        in_string = false;
        out.push(ch);
      }
      c if c.is_ascii() => out.push(c),
      c => {
        let mut units = [0u16; 2];
        for unit in c.encode_utf16(&mut units) {
          out.push_str(&format!("\\u{unit:04x}"));
        }
      }
    }
  }
  out
}

/// Percent-encode bytes outside visible ASCII so a URL is a valid header value.
pub fn header_safe_url(url: &str) -> String {
  utf8_percent_encode(url, HEADER_UNSAFE).to_string()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn ascii_passthrough() {
    let input = r#"{"size":"lg","closable":true}"#;
    assert_eq!(ascii_escape_json(input), input);
  }

  #[test]
  fn escapes_non_ascii_values() {
    let input = "{\"title\":\"\u{e9}dition\"}";
    assert_eq!(ascii_escape_json(input), r#"{"title":"\u00e9dition"}"#);
  }

  #[test]
  fn surrogate_pair_for_astral() {
    let input = "{\"icon\":\"\u{1F600}\"}";
    assert_eq!(ascii_escape_json(input), r#"{"icon":"\ud83d\ude00"}"#);
  }

  #[test]
  fn escaped_quote_does_not_end_string() {
    let input = "{\"a\":\"say \\\"h\u{e9}\\\"\"}";
    assert_eq!(ascii_escape_json(input), r#"{"a":"say \"h\u00e9\""}"#);
  }

  #[test]
  fn url_passthrough() {
    assert_eq!(header_safe_url("/users?page=2&sort=name"), "/users?page=2&sort=name");
  }

  #[test]
  fn url_non_ascii_percent_encoded() {
    assert_eq!(header_safe_url("/caf\u{e9}"), "/caf%C3%A9");
    assert_eq!(header_safe_url("/a b"), "/a%20b");
  }

  #[test]
  fn url_controls_encoded_reserved_kept() {
    assert_eq!(header_safe_url("/a\nb\t"), "/a%0Ab%09");
    assert_eq!(header_safe_url("/p/%41?q=a+b#frag"), "/p/%41?q=a+b#frag");
  }
}
