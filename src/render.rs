use std::fmt::{self, Write};

use tracing::error;

const HEAD: &str = "<html><head><title></title></head><body>";
const TAIL: &str = "</body></html>";

/// Renders the page shown to the client
///
/// Three `div`s in fixed order: current IP, time zone and location. Values are
/// HTML-escaped, which leaves ordinary addresses and place names untouched.
pub fn render_page(ip: &str, timezone: &str, location: &str) -> String {
    let items = [
        ("Current IP Address: ", ip),
        ("Time Zone: ", timezone),
        ("Location: ", location),
    ];
    // writing into a String doesn't fail, the fallback is only a safety net
    match try_render(&items) {
        Ok(page) => page,
        Err(err) => {
            error!("Failed to execute html template: {err}");
            fallback_page(ip)
        }
    }
}

/// Renders the page for an address that couldn't be validated
pub fn render_invalid(raw: &str) -> String {
    format!("{HEAD}Invalid IP: {}{TAIL}", Escaped(raw))
}

fn try_render(items: &[(&str, &str)]) -> Result<String, fmt::Error> {
    let mut page = String::from(HEAD);
    for (label, value) in items {
        write!(page, "<div>{label}{}</div>", Escaped(value))?;
    }
    page.push_str(TAIL);
    Ok(page)
}

fn fallback_page(ip: &str) -> String {
    format!(
        "{HEAD}<div>Current IP Address: {ip}</div><div>Time Zone: NA</div><div>Location: NA</div>{TAIL}"
    )
}

/// Escapes text for an HTML text node
struct Escaped<'a>(&'a str);

impl fmt::Display for Escaped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rest = self.0;
        while let Some(pos) = rest.find(['"', '&', '\'', '+', '<', '>', '\0']) {
            f.write_str(&rest[..pos])?;
            let replacement = match rest.as_bytes()[pos] {
                b'"' => "&#34;",
                b'&' => "&amp;",
                b'\'' => "&#39;",
                b'+' => "&#43;",
                b'<' => "&lt;",
                b'>' => "&gt;",
                _ => "\u{FFFD}",
            };
            f.write_str(replacement)?;
            rest = &rest[pos + 1..];
        }
        f.write_str(rest)
    }
}
