//! Response processing and analytics aggregation for survey campaigns.
//!
//! Raw response rows go in, chart-ready summaries come out: yes/no counts,
//! NPS and satisfaction histograms, word frequencies, choice tallies and
//! demographic breakdowns, plus Markdown / HTML / JSON reports built from them.

pub mod analytics;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod report;
pub mod responses;
pub mod store;
pub mod survey;
pub mod util;
