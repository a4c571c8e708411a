pub const UTF8_BOM: [u8; 3] = [0xef, 0xbb, 0xbf];

pub fn truncate_with_ellipsis(input: &str, max_chars: usize) -> String {
    if max_chars == 0 {
        return String::new();
    }

    let chars: Vec<char> = input.chars().collect();
    if chars.len() <= max_chars {
        return input.to_string();
    }
    if max_chars == 1 {
        return ".".to_string();
    }

    let mut out = chars[..max_chars - 1].iter().collect::<String>();
    out.push('…');
    out
}

/// Prefix the UTF-8 byte order mark so Windows PowerShell 5 reads the file as UTF-8.
pub fn with_utf8_bom(text: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(UTF8_BOM.len() + text.len());
    bytes.extend_from_slice(&UTF8_BOM);
    bytes.extend_from_slice(text.as_bytes());
    bytes
}

/// Replace non-breaking and figure spaces with plain spaces and turn CRLF into LF.
pub fn normalize_script_text(text: &str) -> String {
    text.replace(['\u{00A0}', '\u{2007}', '\u{202F}'], " ")
        .replace("\r\n", "\n")
}
