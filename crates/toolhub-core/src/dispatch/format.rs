//! Response formatters.
//!
//! A formatter renders a successful result list into the text of the
//! normalized response. Tools without a dedicated formatter use
//! [`format_generic`].

use serde_json::Value;
use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::Arc;

use crate::domain::{ERROR_KEY, ResultItem};

/// Renders a result list for the named tool.
pub type ResponseFormatter = Arc<dyn Fn(&[ResultItem], &str) -> String + Send + Sync>;

/// Formatters installed on every new tool registry, keyed by tool name.
pub fn default_formatters() -> HashMap<String, ResponseFormatter> {
    let mut formatters: HashMap<String, ResponseFormatter> = HashMap::new();
    formatters.insert("crypto_price".to_string(), Arc::new(format_crypto_price));
    formatters.insert("crypto_news".to_string(), Arc::new(format_crypto_news));
    for search_tool in ["duckduckgo_search", "web_search"] {
        formatters.insert(search_tool.to_string(), Arc::new(format_search_results));
    }
    formatters
}

/// Render every key/value pair of every item as a labeled line.
pub fn format_generic(items: &[ResultItem], tool_name: &str) -> String {
    let mut text = format!("Results for {tool_name}:\n\n");
    for item in items {
        for (key, value) in item.fields() {
            if key == ERROR_KEY {
                continue;
            }
            let _ = writeln!(
                text,
                "   {}: {}",
                title_case(&key.replace('_', " ")),
                display_value(value)
            );
        }
        text.push('\n');
    }
    text.trim().to_string()
}

/// Cryptocurrency price quotes.
pub fn format_crypto_price(items: &[ResultItem], _tool_name: &str) -> String {
    let mut text = String::from("Cryptocurrency Price Data:\n\n");
    for (i, item) in items.iter().enumerate() {
        let coin = field_or(item, "coin_id", "Unknown");
        let _ = writeln!(text, "{}. **{}**", i + 1, title_case(&coin));
        let _ = writeln!(text, "   Price: ${}", money_field(item, "price"));
        let _ = writeln!(
            text,
            "   Currency: {}",
            field_or(item, "currency", "N/A").to_uppercase()
        );
        if item.get("include_market_data").is_some_and(is_truthy) {
            let _ = writeln!(text, "   Market Cap: ${}", money_field(item, "market_cap"));
            let _ = writeln!(text, "   24h Volume: ${}", money_field(item, "volume_24h"));
            let _ = writeln!(text, "   24h Change: {}%", field_or(item, "change_24h", "N/A"));
        }
        let _ = writeln!(
            text,
            "   Last Updated: {}\n",
            field_or(item, "last_updated", "N/A")
        );
    }
    text.trim().to_string()
}

/// Cryptocurrency news articles.
pub fn format_crypto_news(items: &[ResultItem], _tool_name: &str) -> String {
    let mut text = String::from("Cryptocurrency News:\n\n");
    for (i, item) in items.iter().enumerate() {
        let _ = writeln!(text, "{}. **{}**", i + 1, field_or(item, "title", "No title"));
        let _ = writeln!(text, "   Source: {}", field_or(item, "source", "Unknown source"));
        let _ = writeln!(
            text,
            "   Published: {}",
            field_or(item, "published_date", "Unknown date")
        );
        let _ = writeln!(text, "   Summary: {}", field_or(item, "snippet", "No description"));
        if item.get("sentiment").is_some_and(is_truthy) {
            let _ = writeln!(text, "   Sentiment: {}", field_or(item, "sentiment", "Unknown"));
        }
        text.push('\n');
    }
    text.trim().to_string()
}

/// Web search hits.
pub fn format_search_results(items: &[ResultItem], _tool_name: &str) -> String {
    let mut text = String::from("Search Results:\n\n");
    for (i, item) in items.iter().enumerate() {
        let _ = writeln!(text, "{}. **{}**", i + 1, field_or(item, "title", "No title"));
        let _ = writeln!(text, "   URL: {}", field_or(item, "link", "No link"));
        let _ = writeln!(text, "   Source: {}", field_or(item, "source", "Unknown source"));
        let _ = writeln!(
            text,
            "   Description: {}\n",
            field_or(item, "snippet", "No description")
        );
    }
    text.trim().to_string()
}

fn field_or(item: &ResultItem, key: &str, fallback: &str) -> String {
    match item.get(key) {
        None | Some(Value::Null) => fallback.to_string(),
        Some(value) => display_value(value),
    }
}

fn money_field(item: &ResultItem, key: &str) -> String {
    match item.get(key) {
        Some(Value::Number(n)) => group_thousands(&n.to_string()),
        None | Some(Value::Null) => "N/A".to_string(),
        Some(other) => display_value(other),
    }
}

/// Render a JSON value for humans: strings without quotes, null as `N/A`.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "N/A".to_string(),
        other => other.to_string(),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Insert `,` separators into the integer part of a decimal number.
fn group_thousands(number: &str) -> String {
    if number.contains(['e', 'E']) {
        return number.to_string();
    }
    let (sign, unsigned) = number
        .strip_prefix('-')
        .map_or(("", number), |rest| ("-", rest));
    let (int_part, frac_part) = unsigned
        .split_once('.')
        .map_or((unsigned, None), |(i, f)| (i, Some(f)));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Uppercase the first letter of every word, lowercase the rest.
///
/// A word starts at any letter that does not follow another letter, so
/// `24h volume` becomes `24H Volume`.
fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut prev_is_letter = false;
    for c in input.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }
    out
}
