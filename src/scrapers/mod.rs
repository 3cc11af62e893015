//! Article retrieval and extraction.
//!
//! The fetcher works in two phases:
//!
//! 1. **Retrieval**: download the raw markup for a single URL
//! 2. **Extraction**: clean the markup and pull out the title and body text
//!
//! Cleaning ([`article::clean_html`]) and extraction ([`article::parse_article`])
//! are pure functions so they can be exercised without network access.

pub mod article;
