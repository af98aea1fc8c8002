/// Convert spaces to hyphens. Remove characters that aren't alphanumerics,
/// underscores, or hyphens. Convert to lowercase. Also strip leading and
/// trailing whitespace.
pub fn slugify(string: &str) -> String {
    let mut output = String::with_capacity(string.len());

    let mut need_dash = false;
    for ch in string.chars() {
        // Control characters transliterate to nothing but still split words.
        let ascii = if ch.is_whitespace() || ch.is_control() {
            "-"
        } else {
            deunicode::deunicode_char(ch).unwrap_or("-")
        };

        for b in ascii.bytes() {
            match b {
                b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'_' => {
                    if need_dash {
                        output.push('-');
                        need_dash = false;
                    }

                    output.push(b.to_ascii_lowercase() as char);
                }
                _ => {
                    // All runs of characters that are not alphanumeric or `_`
                    // collapse into one `-`.
                    need_dash = !output.is_empty();
                }
            }
        }
    }

    output
}

/// The inverse-ish of [`slugify()`] for display: hyphens become spaces.
pub fn deslug(string: &str) -> String {
    string.replace('-', " ")
}

/// Returns `true` if `url` points off-site: it carries a scheme (`https:`,
/// `ftp:`, ...) followed by `//`, or is protocol-relative.
pub fn is_external_url(url: &str) -> bool {
    if url.starts_with("//") {
        return true;
    }

    match url.split_once("://") {
        Some((scheme, _)) => !scheme.is_empty() && scheme.bytes().all(|b| {
            b.is_ascii_alphanumeric() || matches!(b, b'+' | b'-' | b'.')
        }),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("My Test String!!!1!1"), "my-test-string-1-1");
        assert_eq!(slugify("test\nit   now!"), "test-it-now");
        assert_eq!(slugify("  --test_-_cool- -  "), "test_-_cool");
        assert_eq!(slugify("Æúű--cool?"), "aeuu-cool");
        assert_eq!(slugify("You & Me"), "you-me");
        assert_eq!(slugify("Hi"), "hi");
        assert_eq!(slugify("Foo\tBar"), "foo-bar");
        assert_eq!(slugify("\tleading\r\n"), "leading");
    }

    #[test]
    fn test_deslug() {
        assert_eq!(deslug("getting-started"), "getting started");
        assert_eq!(deslug("plain"), "plain");
    }

    #[test]
    fn test_external_urls() {
        assert!(is_external_url("https://example.com"));
        assert!(is_external_url("http://example.com/a?b"));
        assert!(is_external_url("ftp://files.example.com"));
        assert!(is_external_url("//cdn.example.com/x.js"));

        assert!(!is_external_url("/intro/setup"));
        assert!(!is_external_url("setup"));
        assert!(!is_external_url("#section"));
        assert!(!is_external_url("mailto:me@example.com"));
        assert!(!is_external_url("./a://b"));
    }
}
