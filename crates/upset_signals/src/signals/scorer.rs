use super::detectors::DetectedSignals;

// Weights in hundredths so sums stay exact and threshold comparisons never
// suffer from float drift.
const HURT_CUE_WEIGHT: u32 = 45;
const NEGATION_WEIGHT: u32 = 15;
const REPEATED_PUNCTUATION_WEIGHT: u32 = 15;
const EMOJI_WEIGHT: u32 = 10;
const ELLIPSIS_WEIGHT: u32 = 8;
const WITHDRAWAL_WEIGHT: u32 = 25;
const DRY_REPLY_WEIGHT: u32 = 22;
const MISSING_SOFTENER_WEIGHT: u32 = 5;

const MAX_SCORE: u32 = 100;

/// Confidence in [0, 1] that a message is upset.
///
/// Every fired detector adds its fixed weight; overlapping signals stack and
/// the total is capped at 1.0. Accusatory language dominates, the absence of
/// softeners only breaks ties.
pub fn hostility_score(detected: &DetectedSignals) -> f64 {
    let weighted = [
        (detected.hurt_cue, HURT_CUE_WEIGHT),
        (detected.negation, NEGATION_WEIGHT),
        (detected.repeated_punctuation, REPEATED_PUNCTUATION_WEIGHT),
        (detected.emoji_count > 0, EMOJI_WEIGHT),
        (detected.ellipsis, ELLIPSIS_WEIGHT),
        (detected.withdrawal, WITHDRAWAL_WEIGHT),
        (detected.dry_reply, DRY_REPLY_WEIGHT),
        (detected.missing_softener, MISSING_SOFTENER_WEIGHT),
    ];

    let total: u32 = weighted
        .iter()
        .filter(|(fired, _)| *fired)
        .map(|(_, weight)| weight)
        .sum();

    f64::from(total.min(MAX_SCORE)) / 100.0
}

/// Convenience wrapper running detection and scoring on raw text
pub fn score_text(text: &str) -> f64 {
    hostility_score(&DetectedSignals::detect(text))
}
