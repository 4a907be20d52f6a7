use std::sync::LazyLock;

use regex::{Regex, RegexSet};

/// Any hit here means the user declined; nothing else is evaluated.
static REJECTION_PATTERNS: LazyLock<RegexSet> = LazyLock::new(|| {
    compile_set(&[
        r"\bno\s+(?:me\s+)?interesa\b",
        r"\bno\s+estoy\s+interesad[oa]s?\b",
        r"\bno,?\s+gracias\b",
        r"\bya\s+no\s+(?:l[oa]s?\s+)?(?:quiero|necesito|ocupo)\b",
        r"\bno\s+(?:l[oa]s?\s+)?(?:quiero|necesito|ocupo)\b",
        r"\bno\s+(?:l[oa]s?\s+)?voy\s+a\s+comprar\b",
        r"\bya\s+(?:l[oa]s?\s+)?compr[eé]\b",
        r"\bya\s+encontr[eé]\b",
        r"\bdej(?:a|an|ar|e|en)\s+de\s+(?:escribir|mandar|enviar)",
        r"\bno\s+me\s+(?:escribas|escriban|molestes|molesten)\b",
    ])
});

/// Explicit buying or wanting verbs.
static INTEREST_PATTERNS: LazyLock<RegexSet> = LazyLock::new(|| {
    compile_set(&[
        r"\bme\s+interesa\b",
        r"\binteresad[oa]s?\b",
        r"\b(?:l[oa]s?)\s+(?:quiero|compro|aparto|pido|ocupo)\b",
        r"\bquiero\s+(?:comprar|pedir|ordenar|uno|una|el|la|ese|esa|este|esta)\b",
        r"\b(?:voy|vamos)\s+a\s+(?:comprar|pedir|ordenar)\b",
        r"\b(?:l[oa]s?)\s+(?:voy|vamos)\s+a\s+(?:comprar|pedir)\b",
        r"\bme\s+(?:l[oa]s?)\s+llevo\b",
        r"\bme\s+gustar[ií]a\b",
        r"\bquisiera\b",
        r"\bcomprar[ií]a\b",
        r"\b(?:pienso|planeo|quiero)\s+comprar",
    ])
});

/// "pero …" style hedges: hesitation now, interest later.
static CONTRAST_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"\bpero\b|\bsin\s+embargo\b|\baunque\b|\bno\s+obstante\b")
});

pub(super) fn is_rejection(normalized: &str) -> bool {
    REJECTION_PATTERNS.is_match(normalized)
}

pub(super) fn has_interest_signal(normalized: &str) -> bool {
    INTEREST_PATTERNS.is_match(normalized)
}

pub(super) fn has_contrast(normalized: &str) -> bool {
    CONTRAST_PATTERN.is_match(normalized)
}

#[allow(
    clippy::expect_used,
    reason = "patterns are compile-time literals covered by the extractor tests"
)]
fn compile_set(patterns: &[&str]) -> RegexSet {
    RegexSet::new(patterns).expect("intent pattern set must compile")
}

#[allow(
    clippy::expect_used,
    reason = "pattern is a compile-time literal covered by the extractor tests"
)]
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("intent pattern must compile")
}
