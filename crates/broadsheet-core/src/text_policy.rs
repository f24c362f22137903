//! Markup stripping for page bodies shown as plain text.

const HTML_ENTITY_BYTES: usize = 10;

#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
pub enum MarkupError {
    #[error("tag opened at byte {0} is never closed")]
    UnterminatedTag(usize),
}

/// Drop tags, decode entities and collapse whitespace runs into single spaces.
///
/// Tags act as word boundaries. A `<` that cannot open a tag is kept as text.
/// The result is trimmed.
pub fn strip_markup(source: &str) -> Result<String, MarkupError> {
    let mut out = String::with_capacity(source.len());
    let mut last_was_space = true;
    let mut cursor = 0usize;
    let bytes = source.as_bytes();

    while cursor < bytes.len() {
        match bytes[cursor] {
            b'<' if opens_tag(bytes.get(cursor + 1).copied()) => {
                let Some(tag_len) = source[cursor + 1..].find('>') else {
                    return Err(MarkupError::UnterminatedTag(cursor));
                };
                cursor += tag_len + 2;
                push_normalized_char(&mut out, ' ', &mut last_was_space);
            }
            b'&' => {
                let (decoded, consumed) = decode_entity_at(&source[cursor..]);
                push_normalized_char(&mut out, decoded, &mut last_was_space);
                cursor += consumed;
            }
            _ => {
                let Some(ch) = source[cursor..].chars().next() else {
                    break;
                };
                push_normalized_char(&mut out, ch, &mut last_was_space);
                cursor += ch.len_utf8();
            }
        }
    }

    let trimmed_len = out.trim_end().len();
    out.truncate(trimmed_len);
    Ok(out)
}

fn opens_tag(next: Option<u8>) -> bool {
    matches!(next, Some(byte) if byte.is_ascii_alphabetic() || matches!(byte, b'/' | b'!' | b'?'))
}

fn push_normalized_char(out: &mut String, ch: char, last_was_space: &mut bool) {
    if ch.is_whitespace() {
        if !*last_was_space {
            out.push(' ');
            *last_was_space = true;
        }
        return;
    }
    out.push(ch);
    *last_was_space = false;
}

/// Decode the entity starting at `&`. Anything that is not a well-formed,
/// known entity is kept as a literal `&`.
fn decode_entity_at(source: &str) -> (char, usize) {
    let body = &source[1..];
    let end = body
        .bytes()
        .take(HTML_ENTITY_BYTES + 1)
        .position(|byte| byte == b';');

    match end {
        Some(end) if end > 0 => match decode_html_entity(&body[..end]) {
            Some(ch) => (ch, end + 2),
            None => ('&', 1),
        },
        _ => ('&', 1),
    }
}

fn decode_html_entity(entity: &str) -> Option<char> {
    let named = match entity.to_ascii_lowercase().as_str() {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" | "ldquo" | "rdquo" | "laquo" | "raquo" => '"',
        "apos" | "lsquo" | "rsquo" => '\'',
        "nbsp" => ' ',
        "ndash" | "mdash" => '-',
        "hellip" => '…',
        "aacute" => 'á',
        "eacute" => 'é',
        "iacute" => 'í',
        "oacute" => 'ó',
        "uacute" => 'ú',
        "atilde" => 'ã',
        "otilde" => 'õ',
        "ccedil" => 'ç',
        "ntilde" => 'ñ',
        _ => return decode_numeric_entity(entity),
    };
    Some(named)
}

fn decode_numeric_entity(entity: &str) -> Option<char> {
    let digits = entity.strip_prefix('#')?;
    let value = match digits.strip_prefix(['x', 'X']) {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => digits.parse::<u32>().ok()?,
    };
    char::from_u32(value)
}
