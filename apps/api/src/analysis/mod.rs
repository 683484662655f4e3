// AI analysis: schema contracts, the three provider-backed operations, and
// their HTTP handlers. All model calls go through llm_client::Provider.

pub mod analyzer;
pub mod handlers;
pub mod prompts;
pub mod schemas;

/// Returns at most the first `max_chars` characters of `data`, cut on a
/// char boundary.
pub fn leading_sample(data: &str, max_chars: usize) -> &str {
    match data.char_indices().nth(max_chars) {
        Some((idx, _)) => &data[..idx],
        None => data,
    }
}
