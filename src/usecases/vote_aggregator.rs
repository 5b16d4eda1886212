//! Voter aggregation: page through every target option's voters and union
//! the user ids.
//!
//! - Rejects anonymous polls before the first fetch
//! - Cursor pagination is an explicit loop with an owned accumulator; pages
//!   within one option are strictly sequential
//! - A voter who chose two affirmative options is counted once (set union)

use crate::domain::{DomainError, PollMessage, PollOption};
use crate::ports::VotePageFetcher;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

/// Collects the voter-id union across a poll's target options.
pub struct VoteAggregator {
    fetcher: Arc<dyn VotePageFetcher>,
    page_size: i32,
}

impl VoteAggregator {
    pub fn new(fetcher: Arc<dyn VotePageFetcher>, page_size: i32) -> Self {
        Self { fetcher, page_size }
    }

    /// Union of voter ids over `targets`, in target order.
    ///
    /// Fails with [`DomainError::AnonymousPoll`] when the poll hides its
    /// voters; [`DomainError::VoteRequired`] from the fetcher propagates
    /// unchanged.
    pub async fn collect(
        &self,
        poll_msg: &PollMessage,
        targets: &[PollOption],
    ) -> Result<HashSet<i64>, DomainError> {
        if !poll_msg.poll.public_voters {
            return Err(DomainError::AnonymousPoll);
        }

        let mut voters: HashSet<i64> = HashSet::new();

        for target in targets {
            info!(option = %target.text, "loading votes");

            let mut offset: Option<String> = None;
            let mut pages = 0usize;
            loop {
                let page = self
                    .fetcher
                    .fetch_page(
                        poll_msg.message_id,
                        &target.option,
                        offset.as_deref(),
                        self.page_size,
                    )
                    .await?;

                pages += 1;
                voters.extend(page.voters);

                match page.next_offset {
                    Some(next) if !next.is_empty() => offset = Some(next),
                    _ => break,
                }
            }

            debug!(option = %target.text, pages, voters = voters.len(), "option exhausted");
        }

        Ok(voters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Poll, VotesPage};
    use std::sync::Mutex;

    /// Fixed page table keyed by option byte; serves `page_size`-sized slices
    /// with a numeric cursor, like the real API does.
    struct FixedPages {
        by_option: Vec<(u8, Vec<i64>)>,
        calls: Mutex<usize>,
    }

    impl FixedPages {
        fn new(by_option: Vec<(u8, Vec<i64>)>) -> Self {
            Self {
                by_option,
                calls: Mutex::new(0),
            }
        }
    }

    #[async_trait::async_trait]
    impl VotePageFetcher for FixedPages {
        async fn fetch_page(
            &self,
            _message_id: i32,
            option: &[u8],
            offset: Option<&str>,
            limit: i32,
        ) -> Result<VotesPage, DomainError> {
            *self.calls.lock().unwrap() += 1;
            let all = &self
                .by_option
                .iter()
                .find(|(key, _)| [*key] == option)
                .expect("unknown option")
                .1;
            let start: usize = offset.map(|o| o.parse().unwrap()).unwrap_or(0);
            let end = (start + limit as usize).min(all.len());
            let next = (end < all.len()).then(|| end.to_string());
            Ok(VotesPage {
                voters: all[start..end].to_vec(),
                next_offset: next,
            })
        }
    }

    struct AlwaysVoteRequired;

    #[async_trait::async_trait]
    impl VotePageFetcher for AlwaysVoteRequired {
        async fn fetch_page(
            &self,
            _message_id: i32,
            _option: &[u8],
            _offset: Option<&str>,
            _limit: i32,
        ) -> Result<VotesPage, DomainError> {
            Err(DomainError::VoteRequired)
        }
    }

    fn poll_msg(public_voters: bool) -> PollMessage {
        PollMessage {
            message_id: 10,
            date: 0,
            poll: Poll {
                question: "Кто придёт?".into(),
                options: vec![],
                public_voters,
            },
        }
    }

    fn opt(key: u8) -> PollOption {
        PollOption {
            text: format!("вариант {key}"),
            option: vec![key],
        }
    }

    #[tokio::test]
    async fn unions_voters_across_options() {
        let fetcher = Arc::new(FixedPages::new(vec![
            (0, vec![1, 2, 3]),
            (1, vec![3, 4]),
        ]));
        let agg = VoteAggregator::new(fetcher, 100);

        let voters = agg
            .collect(&poll_msg(true), &[opt(0), opt(1)])
            .await
            .unwrap();
        // Voter 3 chose both options; counted once.
        assert_eq!(voters, HashSet::from([1, 2, 3, 4]));
    }

    #[tokio::test]
    async fn result_is_independent_of_page_size() {
        let table = vec![(0u8, vec![1i64, 2, 3, 4, 5, 6, 7]), (1, vec![5, 6, 7, 8])];
        let mut results = Vec::new();
        for page_size in [1, 2, 3, 100] {
            let fetcher = Arc::new(FixedPages::new(table.clone()));
            let agg = VoteAggregator::new(fetcher, page_size);
            let voters = agg
                .collect(&poll_msg(true), &[opt(0), opt(1)])
                .await
                .unwrap();
            results.push(voters);
        }
        assert!(results.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(results[0].len(), 8);
    }

    #[tokio::test]
    async fn pages_through_cursor_until_exhausted() {
        let fetcher = Arc::new(FixedPages::new(vec![(0, (1..=25).collect())]));
        let agg = VoteAggregator::new(Arc::clone(&fetcher), 10);

        let voters = agg.collect(&poll_msg(true), &[opt(0)]).await.unwrap();
        assert_eq!(voters.len(), 25);
        // 10 + 10 + 5 → three pages.
        assert_eq!(*fetcher.calls.lock().unwrap(), 3);
    }

    #[tokio::test]
    async fn anonymous_poll_is_rejected_before_fetching() {
        let fetcher = Arc::new(FixedPages::new(vec![(0, vec![1])]));
        let agg = VoteAggregator::new(Arc::clone(&fetcher), 100);

        let err = agg.collect(&poll_msg(false), &[opt(0)]).await.unwrap_err();
        assert!(matches!(err, DomainError::AnonymousPoll));
        assert_eq!(*fetcher.calls.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn vote_required_propagates_unchanged() {
        let agg = VoteAggregator::new(Arc::new(AlwaysVoteRequired), 100);
        let err = agg.collect(&poll_msg(true), &[opt(0)]).await.unwrap_err();
        assert!(matches!(err, DomainError::VoteRequired));
    }
}
