//! String sanitization applied to registration input before validation.
//!
//! [`escape`] neutralizes characters that would be interpreted as markup when
//! stored values are later rendered into HTML. [`normalize_email`] maps
//! addresses that a provider delivers to the same mailbox onto one canonical
//! spelling, so the uniqueness check compares mailboxes rather than strings.

const ICLOUD_DOMAINS: &[&str] = &["icloud.com", "me.com"];

const OUTLOOK_DOMAINS: &[&str] = &[
    "hotmail.at", "hotmail.be", "hotmail.ca", "hotmail.cl", "hotmail.co.il", "hotmail.co.nz",
    "hotmail.co.th", "hotmail.co.uk", "hotmail.com", "hotmail.com.ar", "hotmail.com.au",
    "hotmail.com.br", "hotmail.com.gr", "hotmail.com.mx", "hotmail.com.pe", "hotmail.com.tr",
    "hotmail.com.vn", "hotmail.cz", "hotmail.de", "hotmail.dk", "hotmail.es", "hotmail.fr",
    "hotmail.hu", "hotmail.id", "hotmail.ie", "hotmail.in", "hotmail.it", "hotmail.jp",
    "hotmail.kr", "hotmail.lv", "hotmail.my", "hotmail.ph", "hotmail.pt", "hotmail.sa",
    "hotmail.sg", "hotmail.sk", "live.be", "live.co.uk", "live.com", "live.com.ar",
    "live.com.mx", "live.de", "live.es", "live.eu", "live.fr", "live.it", "live.nl", "msn.com",
    "outlook.at", "outlook.be", "outlook.cl", "outlook.co.il", "outlook.co.nz", "outlook.co.th",
    "outlook.com", "outlook.com.ar", "outlook.com.au", "outlook.com.br", "outlook.com.gr",
    "outlook.com.pe", "outlook.com.tr", "outlook.com.vn", "outlook.cz", "outlook.de",
    "outlook.dk", "outlook.es", "outlook.fr", "outlook.hu", "outlook.id", "outlook.ie",
    "outlook.in", "outlook.it", "outlook.jp", "outlook.kr", "outlook.lv", "outlook.my",
    "outlook.ph", "outlook.pt", "outlook.sa", "outlook.sg", "outlook.sk", "passport.com",
];

const YAHOO_DOMAINS: &[&str] = &[
    "rocketmail.com", "yahoo.ca", "yahoo.co.uk", "yahoo.com", "yahoo.de", "yahoo.fr",
    "yahoo.in", "yahoo.it", "ymail.com",
];

const YANDEX_DOMAINS: &[&str] = &["yandex.ru", "yandex.ua", "yandex.kz", "yandex.com", "yandex.by", "ya.ru"];

/// HTML-escape `&`, `<`, `>`, `"`, `'`, `/`, `\` and backtick.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '/' => out.push_str("&#x2F;"),
            '\\' => out.push_str("&#x5C;"),
            '`' => out.push_str("&#96;"),
            _ => out.push(c),
        }
    }
    out
}

/// Canonicalize an email address.
///
/// Returns `None` when the input has no `@`, an empty domain, or a local part
/// that becomes empty once the provider's alias rules are applied. The result
/// is a fixed point: normalizing it again returns the same string.
pub fn normalize_email(input: &str) -> Option<String> {
    let (local, domain) = input.trim().rsplit_once('@')?;
    let domain = domain.to_lowercase();
    if domain.is_empty() || local.is_empty() {
        return None;
    }

    let (local, domain) = match domain.as_str() {
        "gmail.com" | "googlemail.com" => {
            let local: String = strip_subaddress(local, '+').chars().filter(|c| *c != '.').collect();
            (local.to_lowercase(), "gmail.com".to_string())
        }
        d if ICLOUD_DOMAINS.contains(&d) || OUTLOOK_DOMAINS.contains(&d) => {
            (strip_subaddress(local, '+').to_lowercase(), domain)
        }
        d if YAHOO_DOMAINS.contains(&d) => (strip_subaddress(local, '-').to_lowercase(), domain),
        d if YANDEX_DOMAINS.contains(&d) => (local.to_lowercase(), "yandex.ru".to_string()),
        _ => (local.to_lowercase(), domain),
    };

    if local.is_empty() {
        return None;
    }
    Some(format!("{local}@{domain}"))
}

fn strip_subaddress(local: &str, separator: char) -> &str {
    local.split(separator).next().unwrap_or(local)
}
