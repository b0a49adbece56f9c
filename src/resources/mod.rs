//! Per-resource API clients
//!
//! Each client binds cache reads and coordinated mutations for one backend
//! resource. Reads go through [`crate::cache::QueryCache::get_or_fetch`];
//! writes go through the [`crate::mutation::MutationCoordinator`], which
//! invalidates the matching keys (or patches them optimistically) and raises
//! the transient notification when the write settles.

mod contact;
mod dialogues;
mod filter;
mod languages;
mod mock_tests;
mod rapid_reviews;
mod segments;
mod subscriptions;
mod transactions;
mod vocabulary;

pub use contact::ContactClient;
pub use dialogues::DialoguesClient;
pub use filter::search;
pub use languages::LanguagesClient;
pub use mock_tests::MockTestsClient;
pub use rapid_reviews::RapidReviewsClient;
pub use segments::SegmentsClient;
pub use subscriptions::SubscriptionsClient;
pub use transactions::TransactionsClient;
pub use vocabulary::VocabularyClient;
