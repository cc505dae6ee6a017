//! Text processing, scoring and matching

pub mod analyzer;
pub mod ats_scorer;
pub mod corpus;
pub mod embeddings;
pub mod formatting;
pub mod fuzzy;
pub mod hybrid_matcher;
pub mod phrase_extractor;
pub mod predictor;
pub mod skill_gap;
pub mod text_processor;
pub mod tfidf;
pub mod vocabulary;
