/// Constants used by the weighted item sampler.
pub mod sampler {
    /// Minimum effective weight so every candidate keeps a nonzero chance.
    pub const WEIGHT_FLOOR: f64 = 0.1;
    /// Weighted draws attempted per pick before falling back to a uniform pick.
    pub const MAX_REDRAWS: usize = 10;
}

/// Constants used when deriving candidates from question banks.
pub mod pool {
    /// Weight assigned to topics missing from the frequency table.
    pub const UNKNOWN_TOPIC_WEIGHT: f64 = 0.5;
    /// Separator between question id and 1-based choice number in item ids.
    pub const ITEM_ID_DELIMITER: &str = "::";
    /// Minimum number of choices for a question to yield statements.
    pub const MIN_CHOICES: usize = 2;
    /// Prompt fragments marking a question that asks for the wrong statement.
    pub const INCORRECT_PROMPT_MARKERS: &[&str] = &[
        "誤って",
        "誤り",
        "適切でない",
        "不適切",
        "違反する",
        "incorrect",
    ];
    /// Negated forms of the markers above ("誤りのないもの" asks for a true
    /// statement). Removed from the prompt before marker matching.
    pub const NEGATED_INCORRECT_MARKERS: &[&str] = &[
        "誤りのない",
        "誤りがない",
        "誤っていない",
        "違反しない",
    ];
    /// Prompt fragments marking count (個数問題) and combination (組合せ問題)
    /// questions, whose keyed choice is not one of the statements.
    pub const AGGREGATE_PROMPT_MARKERS: &[&str] = &[
        "いくつ",
        "何個",
        "個数",
        "組合せ",
        "組み合わせ",
        "組合わせ",
    ];
}

/// Constants used by quiz assembly.
pub mod quiz {
    /// Number of true/false items in a quiz when the caller does not ask.
    pub const DEFAULT_ITEM_COUNT: usize = 10;
}
