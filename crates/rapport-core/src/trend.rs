//! Month-bucketed sentiment counts.
//!
//! Buckets are keyed by the month and year of each record's most recent
//! activity ([`Feedback::last_activity_at`]) in UTC, so an edited record moves
//! to the month it was last touched. Buckets are listed in the order their
//! first record is encountered, not chronologically.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::feedback::{Feedback, Sentiment};

/// Per-sentiment totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentCounts {
  pub positive: usize,
  pub neutral:  usize,
  pub negative: usize,
}

impl SentimentCounts {
  pub fn record(&mut self, sentiment: Sentiment) {
    match sentiment {
      Sentiment::Positive => self.positive += 1,
      Sentiment::Neutral => self.neutral += 1,
      Sentiment::Negative => self.negative += 1,
    }
  }

  pub fn tally<'a>(records: impl IntoIterator<Item = &'a Feedback>) -> Self {
    let mut counts = Self::default();
    for fb in records {
      counts.record(fb.sentiment);
    }
    counts
  }

  pub fn total(&self) -> usize { self.positive + self.neutral + self.negative }
}

/// Index-aligned series: `positive[i]` counts the records in bucket
/// `labels[i]`, and likewise for the other two.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentTrend {
  pub labels:   Vec<String>,
  pub positive: Vec<usize>,
  pub neutral:  Vec<usize>,
  pub negative: Vec<usize>,
}

impl SentimentTrend {
  pub fn is_empty(&self) -> bool { self.labels.is_empty() }
}

/// Bucket label, e.g. `"Jan 2024"`.
pub fn bucket_label(fb: &Feedback) -> String {
  fb.last_activity_at().format("%b %Y").to_string()
}

/// Group `records` into month buckets and count sentiments per bucket.
///
/// Empty input yields an empty series; no placeholder labels are produced.
pub fn compute_trend<'a>(
  records: impl IntoIterator<Item = &'a Feedback>,
) -> SentimentTrend {
  let mut order: Vec<(String, SentimentCounts)> = Vec::new();
  let mut index: HashMap<String, usize> = HashMap::new();

  for fb in records {
    let label = bucket_label(fb);
    let slot = *index.entry(label.clone()).or_insert_with(|| {
      order.push((label, SentimentCounts::default()));
      order.len() - 1
    });
    order[slot].1.record(fb.sentiment);
  }

  let mut trend = SentimentTrend::default();
  for (label, counts) in order {
    trend.labels.push(label);
    trend.positive.push(counts.positive);
    trend.neutral.push(counts.neutral);
    trend.negative.push(counts.negative);
  }
  trend
}
