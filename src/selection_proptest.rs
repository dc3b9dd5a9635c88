//! Property-based tests for the selection language.
//!
//! These tests use proptest to generate random listings and inputs and check
//! that the selection invariants hold for all of them.

#[cfg(test)]
mod proptest_tests {
    use crate::forge::RepositoryRecord;
    use crate::output::OutputConfig;
    use crate::selection::{
        filter_by_language, parse_selection, select_dev, select_repositories, SelectionState,
    };
    use proptest::prelude::*;
    use std::io::Cursor;

    const LANGUAGES: &[&str] = &["Go", "Rust", "HTML", "css", "Python", "Unknown"];

    fn record_strategy() -> impl Strategy<Value = RepositoryRecord> {
        (
            "[a-z]{1,6}(-docs|-blog|-cli|awesome-x)?",
            "[a-zA-Z ]{0,20}",
            prop::sample::select(LANGUAGES),
            0u64..5000,
        )
            .prop_map(|(name, description, language, stars)| RepositoryRecord {
                clone_url: format!("https://github.com/octocat/{}.git", name),
                ssh_url: format!("git@github.com:octocat/{}.git", name),
                name,
                description,
                language: language.to_string(),
                stars,
                size: 0,
            })
    }

    /// Listings with unique names, as discovery guarantees.
    fn listing_strategy() -> impl Strategy<Value = Vec<RepositoryRecord>> {
        prop::collection::vec(record_strategy(), 0..12).prop_map(|records| {
            let mut state = SelectionState::new();
            for record in &records {
                state.add(record);
            }
            state.into_vec()
        })
    }

    fn run(repos: &[RepositoryRecord], input: &str) -> Vec<RepositoryRecord> {
        let mut reader = Cursor::new(input.as_bytes().to_vec());
        let mut out = Vec::new();
        select_repositories(repos, &mut reader, &mut out, &OutputConfig::without_color())
            .expect("selection over in-memory buffers cannot fail")
    }

    proptest! {
        /// Property: `all` returns the whole listing in order
        #[test]
        fn all_returns_entire_listing(repos in listing_strategy()) {
            prop_assert_eq!(run(&repos, "all\n"), repos);
        }

        /// Property: `dev` never returns docs-like repositories or html/css ones
        #[test]
        fn dev_excludes_non_dev_repositories(repos in listing_strategy()) {
            for repo in select_dev(&repos) {
                let name = repo.name.to_lowercase();
                let description = repo.description.to_lowercase();
                for keyword in ["docs", "documentation", "website", "blog", "awesome-"] {
                    prop_assert!(!name.contains(keyword));
                    prop_assert!(!description.contains(keyword));
                }
                let language = repo.language.to_lowercase();
                prop_assert!(language != "html" && language != "css");
            }
        }

        /// Property: `dev` keeps listing order
        #[test]
        fn dev_is_an_ordered_subsequence(repos in listing_strategy()) {
            let dev = select_dev(&repos);
            let mut remaining = repos.iter();
            for picked in &dev {
                prop_assert!(remaining.any(|repo| repo == picked));
            }
        }

        /// Property: a language filter only returns that language
        #[test]
        fn language_filter_matches_query(
            repos in listing_strategy(),
            language in prop::sample::select(LANGUAGES),
        ) {
            let query = language.to_uppercase();
            let filtered = filter_by_language(&repos, &query);
            prop_assert!(filtered.len() <= repos.len());
            for repo in &filtered {
                prop_assert_eq!(repo.language.to_lowercase(), language.to_lowercase());
            }
        }

        /// Property: parsed indices always address the listing
        #[test]
        fn parsed_indices_are_in_range(input in "[0-9,\\- ]{0,30}", len in 0usize..20) {
            for index in parse_selection(&input, len) {
                prop_assert!(index < len);
            }
        }

        /// Property: picking numbers never yields duplicates
        #[test]
        fn numeric_picks_are_unique(
            repos in listing_strategy(),
            picks in prop::collection::vec(1usize..15, 0..10),
        ) {
            let line = picks
                .iter()
                .map(|p| p.to_string())
                .collect::<Vec<_>>()
                .join(",");
            // Languages are never numerals here, so numbers are never shadowed
            let input = format!("{}\n{}\n\n", line, line);
            let picked = run(&repos, &input);

            let mut names: Vec<_> = picked.iter().map(|r| r.name.clone()).collect();
            let total = names.len();
            names.sort();
            names.dedup();
            prop_assert_eq!(names.len(), total);

            let expected = picks.iter().filter(|p| **p <= repos.len()).count();
            prop_assert!(total <= expected);
        }
    }
}
