/* src/server/overlay/rust/src/codec.rs */

//! Reads and rewrites the page payload embedded as an attribute value on the
//! root element of a rendered page, leaving every other byte untouched.
//!
//! The scanner walks start tags and their attributes only. Comments, doctype
//! and end tags are skipped whole, and the bodies of raw-text elements
//! (`<script>`, `<style>`, ...) are never inspected, so a payload-looking
//! string inside a script cannot be mistaken for the attribute.

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
  #[error("attribute `{0}` not found")]
  NotFound(String),

  #[error("attribute `{attr}` appears {count} times")]
  Multiple { attr: String, count: usize },

  #[error("attribute value is not valid json: {0}")]
  Json(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quote {
  Double,
  Single,
}

/// Byte range of an attribute value, delimiters excluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttrSpan {
  pub start: usize,
  pub end: usize,
  pub quote: Quote,
}

const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "textarea", "title"];

// Accepted on decode. Encode emits only the first spelling of each character.
const ENTITIES: &[(&str, char)] = &[
  ("&amp;", '&'),
  ("&lt;", '<'),
  ("&gt;", '>'),
  ("&quot;", '"'),
  ("&#039;", '\''),
  ("&#39;", '\''),
  ("&#x27;", '\''),
  ("&apos;", '\''),
  ("&#34;", '"'),
  ("&#034;", '"'),
  ("&#x22;", '"'),
];

#[derive(Debug, Clone)]
pub struct MarkupCodec {
  attr: String,
}

impl MarkupCodec {
  pub fn new(attr: impl Into<String>) -> Self {
    Self { attr: attr.into() }
  }

  pub fn attr(&self) -> &str {
    &self.attr
  }

  /// Find the single quoted occurrence of the payload attribute.
  pub fn locate(&self, markup: &str) -> Result<AttrSpan, CodecError> {
    let spans = scan_attr(markup, &self.attr);
    match spans.as_slice() {
      [] => Err(CodecError::NotFound(self.attr.clone())),
      [span] => Ok(*span),
      _ => Err(CodecError::Multiple { attr: self.attr.clone(), count: spans.len() }),
    }
  }

  pub fn extract(&self, markup: &str) -> Result<Value, CodecError> {
    let span = self.locate(markup)?;
    let decoded = decode_entities(&markup[span.start..span.end]);
    serde_json::from_str(&decoded).map_err(|e| CodecError::Json(e.to_string()))
  }

  /// Replace the attribute value with `payload`. The original delimiters stay
  /// in place; the encoded value never contains either quote character.
  pub fn reembed(&self, markup: &str, payload: &Value) -> Result<String, CodecError> {
    let span = self.locate(markup)?;
    let encoded = encode_entities(&payload.to_string());
    let mut out = String::with_capacity(markup.len() - (span.end - span.start) + encoded.len());
    out.push_str(&markup[..span.start]);
    out.push_str(&encoded);
    out.push_str(&markup[span.end..]);
    Ok(out)
  }
}

pub fn encode_entities(text: &str) -> String {
  let mut out = String::with_capacity(text.len() + text.len() / 4);
  for ch in text.chars() {
    match ch {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      '"' => out.push_str("&quot;"),
      '\'' => out.push_str("&#039;"),
      c => out.push(c),
    }
  }
  out
}

/// Decode the attribute-safe entity set. Unknown entities pass through as-is.
pub fn decode_entities(text: &str) -> String {
  let mut out = String::with_capacity(text.len());
  let mut rest = text;
  while let Some(pos) = rest.find('&') {
    out.push_str(&rest[..pos]);
    rest = &rest[pos..];
    let hit = ENTITIES
      .iter()
      .find(|(entity, _)| rest.get(..entity.len()).is_some_and(|p| p.eq_ignore_ascii_case(entity)));
    match hit {
      Some((entity, ch)) => {
        out.push(*ch);
        rest = &rest[entity.len()..];
      }
      None => {
        out.push('&');
        rest = &rest[1..];
      }
    }
  }
  out.push_str(rest);
  out
}

fn scan_attr(markup: &str, attr: &str) -> Vec<AttrSpan> {
  let bytes = markup.as_bytes();
  let len = bytes.len();
  let mut spans = Vec::new();
  let mut i = 0;

  while let Some(lt) = find_byte(bytes, i, b'<') {
    i = lt + 1;
    if bytes[i..].starts_with(b"!--") {
      i = find_seq(bytes, i + 3, b"-->").map_or(len, |p| p + 3);
      continue;
    }
    match bytes.get(i) {
      Some(b) if b.is_ascii_alphabetic() => {}
      Some(b'!' | b'?' | b'/') => {
        i = find_byte(bytes, i, b'>').map_or(len, |p| p + 1);
        continue;
      }
      _ => continue,
    }

    let name_start = i;
    while i < len && !is_tag_delim(bytes[i]) {
      i += 1;
    }
    let tag = &markup[name_start..i];

    i = match scan_attributes(markup, i, attr, &mut spans) {
      Some(end) => end,
      None => break,
    };

    if let Some(raw) = RAW_TEXT_ELEMENTS.iter().find(|t| tag.eq_ignore_ascii_case(t)) {
      i = find_closing_tag(bytes, i, raw).unwrap_or(len);
    }
  }
  spans
}

/// Walk the attribute list of one start tag. Returns the offset just past
/// its `>`, or `None` when the tag never closes.
fn scan_attributes(
  markup: &str,
  mut i: usize,
  attr: &str,
  spans: &mut Vec<AttrSpan>,
) -> Option<usize> {
  let bytes = markup.as_bytes();
  let len = bytes.len();
  loop {
    while i < len && (bytes[i].is_ascii_whitespace() || bytes[i] == b'/') {
      i += 1;
    }
    if *bytes.get(i)? == b'>' {
      return Some(i + 1);
    }

    let name_start = i;
    while i < len && !matches!(bytes[i], b'=' | b'>' | b'/') && !bytes[i].is_ascii_whitespace() {
      i += 1;
    }
    if i == name_start {
      // stray '='
      i += 1;
      continue;
    }
    let name = &markup[name_start..i];

    while i < len && bytes[i].is_ascii_whitespace() {
      i += 1;
    }
    if bytes.get(i) != Some(&b'=') {
      continue;
    }
    i += 1;
    while i < len && bytes[i].is_ascii_whitespace() {
      i += 1;
    }

    match *bytes.get(i)? {
      q @ (b'"' | b'\'') => {
        let start = i + 1;
        let end = find_byte(bytes, start, q)?;
        if name.eq_ignore_ascii_case(attr) {
          let quote = if q == b'"' { Quote::Double } else { Quote::Single };
          spans.push(AttrSpan { start, end, quote });
        }
        i = end + 1;
      }
      _ => {
        while i < len && !bytes[i].is_ascii_whitespace() && bytes[i] != b'>' {
          i += 1;
        }
      }
    }
  }
}

fn is_tag_delim(b: u8) -> bool {
  b.is_ascii_whitespace() || b == b'>' || b == b'/'
}

fn find_byte(bytes: &[u8], from: usize, needle: u8) -> Option<usize> {
  bytes.get(from..)?.iter().position(|&b| b == needle).map(|p| p + from)
}

fn find_seq(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
  bytes.get(from..)?.windows(needle.len()).position(|w| w == needle).map(|p| p + from)
}

/// Offset of the `<` that opens `</tag`, matched case-insensitively.
fn find_closing_tag(bytes: &[u8], mut from: usize, tag: &str) -> Option<usize> {
  let tag = tag.as_bytes();
  loop {
    let pos = find_seq(bytes, from, b"</")?;
    let name_start = pos + 2;
    let name_end = name_start + tag.len();
    let name_matches =
      bytes.get(name_start..name_end).is_some_and(|name| name.eq_ignore_ascii_case(tag));
    let terminated = bytes.get(name_end).is_none_or(|b| is_tag_delim(*b));
    if name_matches && terminated {
      return Some(pos);
    }
    from = name_start;
  }
}
