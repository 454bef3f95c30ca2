/// Escapes `&`, `<` and `>`, plus quotes when `quote` is set.
pub fn escape(text: &str, quote: bool) -> String {
  let mut out = String::with_capacity(text.len());
  for ch in text.chars() {
    match ch {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      '"' if quote => out.push_str("&quot;"),
      '\'' if quote => out.push_str("&#x27;"),
      _ => out.push(ch),
    }
  }
  out
}

/// Reverses [`escape`]. Unknown entities are left as they are.
pub fn unescape(text: &str) -> String {
  const ENTITIES: [(&str, char); 6] = [
    ("&amp;", '&'),
    ("&lt;", '<'),
    ("&gt;", '>'),
    ("&quot;", '"'),
    ("&#x27;", '\''),
    ("&#39;", '\''),
  ];

  let mut out = String::with_capacity(text.len());
  let mut rest = text;
  while let Some(index) = rest.find('&') {
    out.push_str(&rest[..index]);
    rest = &rest[index..];
    match ENTITIES
      .iter()
      .find(|(entity, _)| rest.starts_with(entity))
    {
      Some((entity, ch)) => {
        out.push(*ch);
        rest = &rest[entity.len()..];
      },
      None => {
        out.push('&');
        rest = &rest[1..];
      },
    }
  }
  out.push_str(rest);
  out
}
