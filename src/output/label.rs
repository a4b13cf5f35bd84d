// label.rs - Fixed-width labels accepted by PHYLIP-style tree software

/// Width of a distance-matrix label.
pub const LABEL_WIDTH: usize = 10;

fn replacement(c: char) -> Option<&'static str> {
    let replaced = match c {
        ' ' | ':' | ';' | ',' => "_",
        '(' | '[' => "{",
        ')' | ']' => "}",
        'ä' => "ae",
        'ö' => "oe",
        'ü' => "ue",
        'Ä' => "Ae",
        'Ö' => "Oe",
        'Ü' => "Ue",
        'ß' => "ss",
        _ => return None,
    };
    Some(replaced)
}

/// Turn a free-text name into an ASCII label of exactly [`LABEL_WIDTH`]
/// characters.
///
/// Separators and brackets are replaced, German umlauts transliterated and
/// any other non-ASCII character dropped. Short labels are left-padded with
/// `_`, long ones truncated.
pub fn to_label(name: &str) -> String {
    let mut label = String::with_capacity(LABEL_WIDTH);
    for c in name.chars() {
        if let Some(replaced) = replacement(c) {
            label.push_str(replaced);
        } else if c.is_ascii() {
            label.push(c);
        }
    }

    if label.len() < LABEL_WIDTH {
        format!("{:_>width$}", label, width = LABEL_WIDTH)
    } else {
        label.truncate(LABEL_WIDTH);
        label
    }
}
