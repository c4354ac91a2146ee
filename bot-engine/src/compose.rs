//! Reply body construction.

use pradon_core::QuoteSet;

/// Builds a reply: one uniformly drawn quote followed by a superscript
/// attribution link to the bot's own account.
pub fn compose_reply(quotes: &QuoteSet, attribution_handle: &str) -> String {
    let index = fastrand::usize(..quotes.len());
    let quote = &quotes.as_slice()[index];
    format!(
        "{}\n\n[^(source)](https://www.reddit.com/user/{})",
        quote, attribution_handle
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote_set() -> QuoteSet {
        QuoteSet::new(
            (0..10)
                .map(|i| format!("quote number {}", i))
                .collect::<Vec<_>>(),
        )
        .unwrap()
    }

    #[test]
    fn test_reply_contains_exactly_one_quote() {
        let quotes = quote_set();
        let reply = compose_reply(&quotes, "quotebot");
        let matched = quotes
            .as_slice()
            .iter()
            .filter(|q| reply.contains(q.as_str()))
            .count();
        assert_eq!(matched, 1);
    }

    #[test]
    fn test_reply_ends_with_attribution_footer() {
        let reply = compose_reply(&quote_set(), "quotebot");
        assert!(reply.ends_with("\n\n[^(source)](https://www.reddit.com/user/quotebot)"));
    }

    #[test]
    fn test_selection_covers_all_quotes() {
        fastrand::seed(0x5eed);
        let quotes = quote_set();
        let mut counts = [0usize; 10];
        for _ in 0..10_000 {
            let reply = compose_reply(&quotes, "quotebot");
            for (i, quote) in quotes.as_slice().iter().enumerate() {
                if reply.starts_with(quote.as_str()) {
                    counts[i] += 1;
                }
            }
        }
        // Uniform draws put each quote near 1000 of 10000. A bound of 800
        // is far outside normal variance.
        for count in counts {
            assert!(count > 800, "skewed selection: {:?}", counts);
        }
    }
}
