//! Name derivation helpers shared by the analyzer.

use smol_str::SmolStr;

/// Capitalize the first character of a derived name (`address` → `Address`).
///
/// Concept names are capitalized regardless of how the source spelled them;
/// property names are kept as written.
pub fn capitalize(name: &str) -> SmolStr {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if !first.is_uppercase() => {
            let mut out = String::with_capacity(name.len());
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
            SmolStr::new(out)
        }
        _ => SmolStr::new(name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("address"), "Address");
        assert_eq!(capitalize("Address"), "Address");
        assert_eq!(capitalize("x"), "X");
        assert_eq!(capitalize(""), "");
    }
}
