use crate::reference::ReferenceBuffer;
use crate::table::{CharacterTable, Classification};

/// Characters per word when converting keystrokes to words per minute.
pub const CHARS_PER_WORD: f64 = 5.0;

/// Derived typing figures at one point in time. Computed on demand, never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stats {
    pub elapsed_seconds: u64,
    pub correct: usize,
    pub errors: usize,
    pub wpm: f64,
}

/// Count correct cells and errors and turn them into a wpm figure.
///
/// A mistyped single space is left out of `errors`; it still renders as a
/// mistake. Zero elapsed time yields a wpm of zero.
pub fn get_stats(
    elapsed_seconds: u64,
    reference: &ReferenceBuffer,
    table: &CharacterTable,
) -> Stats {
    let correct = table.count(Classification::Correct);
    let errors = table
        .iter()
        .zip(reference.iter())
        .filter(|(state, ch)| state.classification == Classification::Incorrect && !ch.is_space())
        .count();

    Stats {
        elapsed_seconds,
        correct,
        errors,
        wpm: wpm(correct, elapsed_seconds),
    }
}

pub fn wpm(correct: usize, elapsed_seconds: u64) -> f64 {
    if elapsed_seconds == 0 {
        return 0.0;
    }
    (correct as f64 / CHARS_PER_WORD) / (elapsed_seconds as f64 / 60.0)
}

/// Share of typed cells that were correct, as a rounded percentage.
pub fn accuracy(table: &CharacterTable) -> f64 {
    let correct = table.count(Classification::Correct);
    let typed = correct + table.count(Classification::Incorrect);
    if typed == 0 {
        return 0.0;
    }
    ((correct as f64 / typed as f64) * 100.0).round()
}

/// wpm observed at the end of one countdown second
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WpmSample {
    pub second: u64,
    pub wpm: f64,
}

impl From<WpmSample> for (f64, f64) {
    fn from(s: WpmSample) -> Self {
        (s.second as f64, s.wpm)
    }
}

/// Population standard deviation of the sampled wpm values.
///
/// Lower is steadier. Fewer than two samples give 0.
pub fn consistency(samples: &[WpmSample]) -> f64 {
    if samples.len() < 2 {
        return 0.0;
    }
    let count = samples.len() as f64;
    let mean = samples.iter().map(|s| s.wpm).sum::<f64>() / count;
    let variance = samples
        .iter()
        .map(|s| {
            let diff = mean - s.wpm;
            diff * diff
        })
        .sum::<f64>()
        / count;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::CursorController;

    fn typed(reference: &str, keys: &str) -> (ReferenceBuffer, CharacterTable) {
        let reference = ReferenceBuffer::from_text(reference);
        let mut table = CharacterTable::new(reference.len());
        let mut cursor = CursorController::new();
        for c in keys.chars() {
            let _ = cursor.on_character(&reference, &mut table, c);
        }
        (reference, table)
    }

    fn sample(second: u64, wpm: f64) -> WpmSample {
        WpmSample { second, wpm }
    }

    #[test]
    fn zero_elapsed_forces_zero_wpm() {
        let (reference, table) = typed("hello world", "hello world");
        let stats = get_stats(0, &reference, &table);
        assert_eq!(stats.correct, 11);
        assert_eq!(stats.wpm, 0.0);
        assert!(!stats.wpm.is_nan());
    }

    #[test]
    fn wpm_is_five_chars_per_word() {
        assert_eq!(wpm(10, 60), 2.0);
        assert_eq!(wpm(50, 30), 20.0);
        assert_eq!(wpm(0, 45), 0.0);
    }

    #[test]
    fn mistyped_space_is_not_an_error() {
        let (reference, table) = typed(" a", "xa");
        let stats = get_stats(1, &reference, &table);
        assert_eq!(stats.errors, 0);
        assert_eq!(stats.correct, 1);
        assert_eq!(table.count(Classification::Incorrect), 1);
    }

    #[test]
    fn mistyped_letters_and_newlines_are_errors() {
        let (reference, table) = typed("ab\nc", "xy c");
        let stats = get_stats(12, &reference, &table);
        assert_eq!(stats.errors, 3);
        assert_eq!(stats.correct, 1);
        assert_eq!(stats.elapsed_seconds, 12);
    }

    #[test]
    fn accuracy_counts_only_typed_cells() {
        let (_, table) = typed("test", "tx");
        assert_eq!(accuracy(&table), 50.0);

        let (_, untouched) = typed("test", "");
        assert_eq!(accuracy(&untouched), 0.0);
    }

    #[test]
    fn consistency_needs_two_samples() {
        assert_eq!(consistency(&[]), 0.0);
        assert_eq!(consistency(&[sample(1, 40.0)]), 0.0);
        assert_eq!(consistency(&[sample(1, 5.0), sample(2, 5.0)]), 0.0);
    }

    #[test]
    fn consistency_is_population_std_dev() {
        let samples = [sample(1, 10.0), sample(2, 20.0), sample(3, 30.0)];
        assert!((consistency(&samples) - 8.16496580927726).abs() < 1e-10);
    }

    #[test]
    fn sample_converts_to_chart_point() {
        let point: (f64, f64) = sample(3, 42.5).into();
        assert_eq!(point, (3.0, 42.5));
    }
}
