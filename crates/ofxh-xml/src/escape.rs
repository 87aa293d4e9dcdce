use crate::error::XmlError;

/// Escapes `s` for use as XML element/attribute content.
///
/// Exactly five characters are escaped by the XML grammar itself; on top
/// of those, every C0 control (`0x01..=0x1F`) and C1 control (`0x7F..=0x9F`)
/// is escaped as a numeric character reference, because a raw whitespace
/// control character would otherwise be silently normalized to a plain
/// space on reparse (§4.C; ported from `ofxhXml.h::escape`).
#[must_use]
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if is_control_to_escape(c) => {
                out.push_str(&format!("&#x{:02X};", c as u32));
            }
            c => out.push(c),
        }
    }
    out
}

fn is_control_to_escape(c: char) -> bool {
    let code = c as u32;
    (0x01..=0x1F).contains(&code) || (0x7F..=0x9F).contains(&code)
}

/// Reverses [`escape`]. Handles the five named entities and both decimal
/// (`&#10;`) and hexadecimal (`&#xA;`) numeric character references.
pub fn unescape(s: &str) -> Result<String, XmlError> {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.char_indices().peekable();
    let bytes = s.as_bytes();

    while let Some((i, c)) = chars.next() {
        if c != '&' {
            out.push(c);
            continue;
        }
        let rest = &s[i..];
        let end = rest
            .find(';')
            .ok_or(XmlError::UnterminatedCharRef)?;
        let entity = &rest[1..end];
        let decoded = match entity {
            "lt" => '<',
            "gt" => '>',
            "amp" => '&',
            "quot" => '"',
            "apos" => '\'',
            other if other.starts_with("#x") || other.starts_with("#X") => {
                let code = u32::from_str_radix(&other[2..], 16)
                    .map_err(|_| XmlError::InvalidCharRef(entity.to_string()))?;
                char::from_u32(code).ok_or_else(|| XmlError::InvalidCharRef(entity.to_string()))?
            }
            other if other.starts_with('#') => {
                let code = other[1..]
                    .parse::<u32>()
                    .map_err(|_| XmlError::InvalidCharRef(entity.to_string()))?;
                char::from_u32(code).ok_or_else(|| XmlError::InvalidCharRef(entity.to_string()))?
            }
            other => {
                return Err(XmlError::InvalidCharRef(other.to_string()));
            }
        };
        out.push(decoded);
        // Advance the outer iterator past the consumed entity.
        let consumed_end = i + end + 1;
        while let Some(&(j, _)) = chars.peek() {
            if j < consumed_end {
                chars.next();
            } else {
                break;
            }
        }
        let _ = bytes;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_the_five_xml_characters() {
        assert_eq!(escape("<a & b> \"c\" 'd'"), "&lt;a &amp; b&gt; &quot;c&quot; &apos;d&apos;");
    }

    #[test]
    fn escapes_c0_and_c1_controls() {
        assert_eq!(escape("\n"), "&#x0A;");
        assert_eq!(escape("\t"), "&#x09;");
        assert_eq!(escape("\u{7F}"), "&#x7F;");
        assert_eq!(escape("\u{9F}"), "&#x9F;");
    }

    #[test]
    fn leaves_ordinary_text_alone() {
        assert_eq!(escape("plain text 123"), "plain text 123");
    }

    #[test]
    fn round_trips_through_escape_and_unescape() {
        let original = "a<b>&\"c'\n\t";
        let escaped = escape(original);
        assert_eq!(unescape(&escaped).unwrap(), original);
    }

    #[test]
    fn decodes_named_and_numeric_entities() {
        assert_eq!(unescape("&lt;&gt;&amp;&quot;&apos;").unwrap(), "<>&\"'");
        assert_eq!(unescape("&#x41;").unwrap(), "A");
        assert_eq!(unescape("&#65;").unwrap(), "A");
    }
}
