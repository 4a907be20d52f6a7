use std::sync::LazyLock;

use regex::Regex;

use super::TimeframeKind;
use super::resolver::{DAY_DAYS, FORTNIGHT_DAYS, MONTH_DAYS, WEEK_DAYS};

/// One row of the timeframe table. Rules whose kind needs a quantity read it
/// from the `n` capture group.
#[derive(Debug)]
pub struct TimeframeRule {
    pub pattern: Regex,
    pub kind: TimeframeKind,
    pub label: &'static str,
}

const MONTH_NAMES: [(&str, u32); 12] = [
    ("enero", 1),
    ("febrero", 2),
    ("marzo", 3),
    ("abril", 4),
    ("mayo", 5),
    ("junio", 6),
    ("julio", 7),
    ("agosto", 8),
    ("septiembre", 9),
    ("octubre", 10),
    ("noviembre", 11),
    ("diciembre", 12),
];

const IN_OR_WITHIN: &str = r"\b(?:en|dentro\s+de)\s+";
/// Digits or a spelled-out number from dos to doce.
const QUANTITY: &str =
    r"(?P<n>\d{1,3}|dos|tres|cuatro|cinco|seis|siete|ocho|nueve|diez|once|doce)";

/// Ordered, first match wins: specific phrasings sit above general ones.
pub static TIMEFRAME_RULES: LazyLock<Vec<TimeframeRule>> = LazyLock::new(build_rules);

#[allow(
    clippy::expect_used,
    reason = "patterns are compile-time literals covered by the timeframe tests"
)]
fn rule(pattern: &str, kind: TimeframeKind, label: &'static str) -> TimeframeRule {
    TimeframeRule {
        pattern: Regex::new(pattern).expect("timeframe pattern must compile"),
        kind,
        label,
    }
}

fn build_rules() -> Vec<TimeframeRule> {
    let mut rules = vec![
        rule(
            r"\ben\s+un\s+par\s+de\s+meses\b",
            TimeframeKind::Fixed(60),
            "un par de meses",
        ),
        rule(
            r"\ben\s+un\s+par\s+de\s+semanas\b",
            TimeframeKind::Fixed(14),
            "un par de semanas",
        ),
        rule(
            &format!(r"{IN_OR_WITHIN}{QUANTITY}\s+semanas?\b"),
            TimeframeKind::Multiplier(WEEK_DAYS),
            "n semanas",
        ),
        rule(
            &format!(r"{IN_OR_WITHIN}{QUANTITY}\s+quincenas?\b"),
            TimeframeKind::Multiplier(FORTNIGHT_DAYS),
            "n quincenas",
        ),
        rule(
            &format!(r"{IN_OR_WITHIN}{QUANTITY}\s+mes(?:es)?\b"),
            TimeframeKind::Multiplier(MONTH_DAYS),
            "n meses",
        ),
        rule(
            &format!(r"{IN_OR_WITHIN}{QUANTITY}\s+d[ií]as?\b"),
            TimeframeKind::Multiplier(DAY_DAYS),
            "n dias",
        ),
        rule(
            &format!(r"{IN_OR_WITHIN}una\s+semana\b"),
            TimeframeKind::Fixed(WEEK_DAYS),
            "una semana",
        ),
        rule(
            &format!(r"{IN_OR_WITHIN}un\s+mes\b"),
            TimeframeKind::Fixed(MONTH_DAYS),
            "un mes",
        ),
        rule(
            r"\ben\s+una\s+quincena\b|\bla\s+pr[oó]xima\s+quincena\b|\ben\s+quince\s+d[ií]as\b",
            TimeframeKind::Fixed(FORTNIGHT_DAYS),
            "una quincena",
        ),
        rule(
            r"\bpr[oó]xima\s+semana\b|\bsemana\s+(?:que\s+viene|que\s+entra|entrante)\b|\bla\s+otra\s+semana\b",
            TimeframeKind::Fixed(WEEK_DAYS),
            "proxima semana",
        ),
        rule(
            r"\bpr[oó]ximo\s+mes\b|\bmes\s+(?:que\s+viene|que\s+entra|entrante)\b|\bel\s+otro\s+mes\b",
            TimeframeKind::Fixed(MONTH_DAYS),
            "proximo mes",
        ),
        rule(
            r"\ben\s+unos\s+d[ií]as\b",
            TimeframeKind::Fixed(3),
            "unos dias",
        ),
        rule(
            r"\bpasado\s+ma[ñn]ana\b",
            TimeframeKind::Fixed(2),
            "pasado manana",
        ),
        rule(r"\bma[ñn]ana\b", TimeframeKind::Fixed(1), "manana"),
        rule(
            r"\bfin(?:al|ales)?\s+del?\s+a[ñn]o\b",
            TimeframeKind::EndOfYear,
            "fin de ano",
        ),
        rule(
            r"\bdespu[eé]s\s+de\s+navidad\b",
            TimeframeKind::AfterHoliday { month: 12, day: 26 },
            "despues de navidad",
        ),
        rule(
            r"\bdespu[eé]s\s+del?\s+a[ñn]o\s+nuevo\b",
            TimeframeKind::AfterHoliday { month: 1, day: 2 },
            "despues de ano nuevo",
        ),
        rule(
            r"\bdespu[eé]s\s+de\s+(?:los\s+)?reyes\b|\bdespu[eé]s\s+de\s+(?:las\s+)?fiestas\b|\bpasando\s+(?:las\s+)?fiestas\b",
            TimeframeKind::AfterHoliday { month: 1, day: 7 },
            "despues de las fiestas",
        ),
    ];
    rules.extend(MONTH_NAMES.iter().map(|&(name, month)| {
        rule(
            &format!(r"\b(?:en|para|a\s+partir\s+de)\s+(?:el\s+mes\s+de\s+)?{name}\b"),
            TimeframeKind::NamedMonth(month),
            name,
        )
    }));
    rules
}
