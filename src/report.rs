//! Relative comparison of measured runs and the textual report.

use std::fmt;

use crate::measure::Measurement;

/// Relative deltas between a baseline run and a reference run.
///
/// Signs are meaningful: a positive `time_pct` means the reference was
/// faster than the baseline, negative means slower. Wording is derived
/// from the sign when rendering, never assumed.
#[derive(Debug, Clone)]
pub struct Comparison {
    pub baseline: &'static str,
    pub reference: &'static str,
    pub time_pct: f64,
    pub memory_pct: f64,
    pub round_trips_saved: i64,
    pub row_multiplier: Option<u64>,
}

/// Percentage improvement of `reference` over `baseline`, with the
/// degenerate-baseline guard: a zero or negative baseline yields 0, never
/// a division by zero or a non-finite value.
fn pct(baseline: f64, reference: f64) -> f64 {
    if baseline <= 0.0 {
        0.0
    } else {
        (baseline - reference) / baseline * 100.0
    }
}

/// Compare two measured runs.
pub fn compare(baseline: &Measurement, reference: &Measurement) -> Comparison {
    let row_multiplier = match (baseline.raw_row_count, reference.raw_row_count) {
        (Some(a), Some(b)) => {
            let larger = a.max(b).max(1) as f64;
            let smaller = a.min(b).max(1) as f64;
            Some(((larger / smaller).round() as u64).max(1))
        }
        _ => None,
    };

    Comparison {
        baseline: baseline.label,
        reference: reference.label,
        time_pct: pct(baseline.elapsed_ms, reference.elapsed_ms),
        memory_pct: pct(
            baseline.memory_delta_bytes as f64,
            reference.memory_delta_bytes as f64,
        ),
        round_trips_saved: baseline.round_trips as i64 - reference.round_trips as i64,
        row_multiplier,
    }
}

impl Comparison {
    /// One-line human summary with direction words chosen by sign; exact
    /// ties read as "same", not as a zero-percent improvement.
    pub fn summary(&self) -> String {
        let mut line = format!("{} vs {}: ", self.reference, self.baseline);

        if self.time_pct == 0.0 {
            line.push_str("same time");
        } else {
            let word = if self.time_pct > 0.0 { "faster" } else { "slower" };
            line.push_str(&format!("{:.1}% {}", self.time_pct.abs(), word));
        }

        if self.memory_pct == 0.0 {
            line.push_str(", same memory");
        } else {
            let word = if self.memory_pct > 0.0 { "less" } else { "more" };
            line.push_str(&format!(", {:.1}% {} memory", self.memory_pct.abs(), word));
        }

        match self.round_trips_saved {
            0 => line.push_str(", same round trips"),
            n if n > 0 => line.push_str(&format!(", {n} fewer round trips")),
            n => line.push_str(&format!(", {} more round trips", -n)),
        }

        if let Some(mult) = self.row_multiplier {
            if mult > 1 {
                line.push_str(&format!(", {mult}x row duplication"));
            }
        }

        line
    }
}

/// The full benchmark report: every measurement plus comparisons across
/// all ordered strategy pairs, in declared order.
#[derive(Debug, Clone)]
pub struct BenchReport {
    pub limit: usize,
    pub warmup_rounds: u32,
    pub measurements: Vec<Measurement>,
    pub comparisons: Vec<Comparison>,
}

impl BenchReport {
    pub fn new(limit: usize, warmup_rounds: u32, measurements: Vec<Measurement>) -> Self {
        let mut comparisons = Vec::new();
        for i in 0..measurements.len() {
            for j in (i + 1)..measurements.len() {
                comparisons.push(compare(&measurements[i], &measurements[j]));
            }
        }
        Self { limit, warmup_rounds, measurements, comparisons }
    }
}

impl fmt::Display for BenchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "row-set aggregation benchmark (limit {}, warmup {})",
            self.limit, self.warmup_rounds
        )?;
        writeln!(f)?;
        writeln!(
            f,
            "{:<22} {:>10} {:>12} {:>12} {:>7} {:>9} {:>10}",
            "strategy", "time (ms)", "mem delta", "peak bytes", "trips", "results", "raw rows"
        )?;
        for m in &self.measurements {
            writeln!(
                f,
                "{:<22} {:>10.3} {:>12} {:>12} {:>7} {:>9} {:>10}",
                m.label,
                m.elapsed_ms,
                m.memory_delta_bytes,
                m.peak_memory_bytes,
                m.round_trips,
                m.result_count,
                m.raw_row_count
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| "-".to_string()),
            )?;
        }
        writeln!(f)?;
        for c in &self.comparisons {
            writeln!(f, "{}", c.summary())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn measurement(label: &'static str, elapsed_ms: f64) -> Measurement {
        Measurement {
            label,
            elapsed_ms,
            memory_delta_bytes: 1_000,
            peak_memory_bytes: 2_000,
            round_trips: 1,
            result_count: 10,
            raw_row_count: None,
        }
    }

    /// A slower reference must come out with a negative percentage and the
    /// word "slower", never a misreported "faster".
    #[test]
    fn slower_reference_reads_slower() {
        let baseline = measurement("a", 100.0);
        let reference = measurement("b", 150.0);
        let cmp = compare(&baseline, &reference);
        assert!(cmp.time_pct < 0.0);
        assert!(cmp.summary().contains("slower"));
        assert!(!cmp.summary().contains("% faster"));
    }

    #[test]
    fn faster_reference_reads_faster() {
        let baseline = measurement("a", 100.0);
        let reference = measurement("b", 25.0);
        let cmp = compare(&baseline, &reference);
        assert_eq!(cmp.time_pct, 75.0);
        assert!(cmp.summary().contains("faster"));
    }

    /// Identical runs read as "same", never as a 0.0% improvement in
    /// either direction.
    #[test]
    fn exact_tie_reads_same() {
        let cmp = compare(&measurement("a", 100.0), &measurement("b", 100.0));
        let line = cmp.summary();
        assert!(line.contains("same time"));
        assert!(line.contains("same memory"));
        assert!(!line.contains("faster"));
        assert!(!line.contains("slower"));
    }

    /// Zero baseline duration yields 0, not an error or infinity.
    #[test]
    fn zero_baseline_guard() {
        let baseline = measurement("a", 0.0);
        let reference = measurement("b", 42.0);
        let cmp = compare(&baseline, &reference);
        assert_eq!(cmp.time_pct, 0.0);
        assert!(cmp.time_pct.is_finite());
    }

    #[test]
    fn negative_memory_baseline_guard() {
        let mut baseline = measurement("a", 10.0);
        baseline.memory_delta_bytes = -5;
        let reference = measurement("b", 10.0);
        let cmp = compare(&baseline, &reference);
        assert_eq!(cmp.memory_pct, 0.0);
    }

    /// Multiplier is larger over smaller, rounded, floored at 1, and only
    /// present when both sides report raw rows.
    #[test]
    fn row_multiplier_rules() {
        let mut a = measurement("a", 10.0);
        let mut b = measurement("b", 10.0);

        a.raw_row_count = Some(1500);
        b.raw_row_count = Some(100);
        assert_eq!(compare(&a, &b).row_multiplier, Some(15));
        // Direction-agnostic: swapping sides gives the same factor.
        assert_eq!(compare(&b, &a).row_multiplier, Some(15));

        a.raw_row_count = Some(100);
        b.raw_row_count = Some(100);
        assert_eq!(compare(&a, &b).row_multiplier, Some(1));

        b.raw_row_count = None;
        assert_eq!(compare(&a, &b).row_multiplier, None);
    }

    #[test]
    fn round_trip_delta_is_signed() {
        let mut a = measurement("a", 10.0);
        let mut b = measurement("b", 10.0);
        a.round_trips = 3;
        b.round_trips = 10;
        let cmp = compare(&a, &b);
        assert_eq!(cmp.round_trips_saved, -7);
        assert!(cmp.summary().contains("7 more round trips"));
    }
}
