//! Text histograms of measurement counts

use qalgo_core::Counts;
use std::fmt;

/// Horizontal bar chart, one row per bitstring
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    rows: Vec<(String, u64)>,
    total: u64,
    width: usize,
}

impl Histogram {
    /// Bars scaled so the largest count spans `width` characters
    ///
    /// Rows are sorted by descending count, ties by bitstring.
    pub fn from_counts(counts: &Counts, width: usize) -> Self {
        let mut rows: Vec<(String, u64)> = counts.iter().map(|(k, &v)| (k.clone(), v)).collect();
        rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        Self {
            total: rows.iter().map(|r| r.1).sum(),
            rows,
            width: width.max(1),
        }
    }

    /// Keep only the `n` most frequent rows
    pub fn top(mut self, n: usize) -> Self {
        self.rows.truncate(n);
        self
    }

    /// Rows in display order
    pub fn rows(&self) -> &[(String, u64)] {
        &self.rows
    }

    /// Bar length for `count`
    pub fn bar_len(&self, count: u64) -> usize {
        let max = self.rows.first().map(|r| r.1).unwrap_or(0);
        if max == 0 {
            return 0;
        }
        ((count as f64 / max as f64) * self.width as f64).round() as usize
    }
}

impl fmt::Display for Histogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label_width = self.rows.iter().map(|r| r.0.len()).max().unwrap_or(0);
        for (bs, count) in &self.rows {
            let pct = if self.total > 0 {
                100.0 * *count as f64 / self.total as f64
            } else {
                0.0
            };
            writeln!(
                f,
                "{:>lw$} | {:<w$} {} ({:.1}%)",
                bs,
                "#".repeat(self.bar_len(*count)),
                count,
                pct,
                lw = label_width,
                w = self.width
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts() -> Counts {
        let mut c = Counts::new();
        c.insert("0101".into(), 900);
        c.insert("0000".into(), 50);
        c.insert("1111".into(), 50);
        c
    }

    #[test]
    fn test_order_and_scaling() {
        let h = Histogram::from_counts(&counts(), 20);
        assert_eq!(h.rows()[0].0, "0101");
        assert_eq!(h.rows()[1].0, "0000");
        assert_eq!(h.bar_len(900), 20);
        assert_eq!(h.bar_len(50), 1);
    }

    #[test]
    fn test_render() {
        let text = Histogram::from_counts(&counts(), 10).to_string();
        let first = text.lines().next().unwrap();
        assert!(first.starts_with("0101 | ##########"));
        assert!(first.ends_with("900 (90.0%)"));
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn test_top_and_empty() {
        assert_eq!(Histogram::from_counts(&counts(), 10).top(1).rows().len(), 1);
        let empty = Histogram::from_counts(&Counts::new(), 10);
        assert_eq!(empty.to_string(), "");
    }
}
