//! # news-tldr
//!
//! A CLI toolkit for quick news digests: fetch an article (by URL, local
//! file, or RSS/Atom feeds filtered by keyword) and produce a short TL;DR
//! plus a bounded list of bullet-point highlights from a pretrained
//! abstractive summarisation model.
//!
//! ## Features
//!
//! - **Three input modes**: a single URL, a local text file, or a keyword
//!   digest across a configured list of news feeds
//! - **Bounded output**: one TL;DR paragraph and at most five bullets,
//!   with a sentence-split fallback when the model ignores formatting
//! - **Model agnostic**: any backend implementing [`model::SummarisationModel`]
//!   can drive the summariser; a Hugging Face inference client is built in

pub mod config;
pub mod feed;
pub mod model;
pub mod scraper;
pub mod summariser;

pub use config::Config;
pub use feed::FeedItem;
pub use summariser::{Summariser, SummaryResult};
