// Screening core: signal extraction, skill gaps, inclusion audit, enrichment,
// scoring and ranking.
// Everything external (documents, NLP, similarity, lookups) is reached through
// the traits in `services`; nothing here talks to the network directly.

pub mod enrichment;
pub mod explanation;
pub mod handlers;
pub mod inclusion;
pub mod leaderboard;
pub mod pipeline;
pub mod scoring;
pub mod signals;
pub mod skill_gap;
pub mod vocabulary;
