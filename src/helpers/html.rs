//! HTML helper functions

/// Generate an anchor tag
///
/// # Examples
/// ```ignore
/// link_to("https://example.com/hello/", "Hello & bye") // -> <a href="https://example.com/hello/">Hello &amp; bye</a>
/// ```
pub fn link_to(href: &str, text: &str) -> String {
    format!(
        r#"<a href="{}">{}</a>"#,
        html_escape(href),
        html_escape(text)
    )
}

/// Generate an image tag
///
/// `attrs` are appended verbatim after escaping their values, in order.
///
/// # Examples
/// ```ignore
/// image_tag("/images/cover.jpg", "", &[("width", "300")]) // -> <img src="/images/cover.jpg" alt="" width="300">
/// ```
pub fn image_tag(src: &str, alt: &str, attrs: &[(&str, &str)]) -> String {
    let mut tag = format!(
        r#"<img src="{}" alt="{}""#,
        html_escape(src),
        html_escape(alt)
    );
    for (name, value) in attrs {
        tag.push_str(&format!(r#" {}="{}""#, name, html_escape(value)));
    }
    tag.push('>');
    tag
}

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Reverse [`html_escape`] for text extracted from rendered HTML
pub fn unescape_html(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Strip HTML tags from a string
pub fn strip_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut in_tag = false;

    for c in s.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }

    result
}

/// Keep the first `words` words, collapsing whitespace
///
/// `more` is appended only when something was cut.
pub fn truncate_words(s: &str, words: usize, more: &str) -> String {
    let mut iter = s.split_whitespace();
    let kept: Vec<&str> = iter.by_ref().take(words).collect();
    let mut result = kept.join(" ");

    if iter.next().is_some() {
        result.push_str(more);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_to_escapes() {
        assert_eq!(
            link_to("/a?b=1&c=2", "Fish & <Chips>"),
            r#"<a href="/a?b=1&amp;c=2">Fish &amp; &lt;Chips&gt;</a>"#
        );
    }

    #[test]
    fn test_image_tag() {
        let tag = image_tag("/img/a.jpg", "", &[("width", "150"), ("class", "x")]);
        assert_eq!(tag, r#"<img src="/img/a.jpg" alt="" width="150" class="x">"#);
    }

    #[test]
    fn test_strip_html() {
        assert_eq!(strip_html("<p>Hello <b>World</b></p>"), "Hello World");
    }

    #[test]
    fn test_unescape_round_trip() {
        let raw = r#"Tom & "Jerry" <3 'cheese'"#;
        assert_eq!(unescape_html(&html_escape(raw)), raw);
    }

    #[test]
    fn test_truncate_words() {
        assert_eq!(truncate_words("one  two\nthree four", 2, "…"), "one two…");
        assert_eq!(truncate_words("one two", 2, "…"), "one two");
        assert_eq!(truncate_words("", 5, "…"), "");
    }
}
