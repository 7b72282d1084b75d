use std::collections::HashSet;

/// Render untrusted source text as plain display text.
///
/// The question service hands back third-party strings that may carry HTML
/// entities or outright markup. All markup is removed (empty tag allowlist),
/// then the entities the service commonly emits are decoded so the literal
/// text reads naturally. The result must always be rendered as text, never
/// interpreted as markup.
#[must_use]
pub fn display_text(input: &str) -> String {
    let stripped = ammonia::Builder::new()
        .tags(HashSet::new())
        .clean(input)
        .to_string();
    decode_entities(&stripped)
}

fn decode_entities(input: &str) -> String {
    input
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#039;", "'")
        .replace("&#39;", "'")
        .replace("&rsquo;", "\u{2019}")
        .replace("&lsquo;", "\u{2018}")
        .replace("&ldquo;", "\u{201c}")
        .replace("&rdquo;", "\u{201d}")
        .replace("&eacute;", "\u{e9}")
        .replace("&amp;", "&")
}
