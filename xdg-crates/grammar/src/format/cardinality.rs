use std::fmt::Display;

use serde::Deserialize;
use serde::Serialize;

use crate::GrammarError;

/// The number of arcs with one label a node may have in one direction: `lo..=hi`, unbounded when
/// `hi` is `None`.
///
/// In a grammar file a cardinality is written as `"!"` (exactly one), `"?"` (at most one), `"*"`
/// (any number), `"+"` (at least one), `"n+"` (at least `n`), an integer `n` or a range
/// `[lo, hi]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "CardinalitySource", into = "CardinalitySource")]
pub struct Cardinality {
    pub lo: u32,
    pub hi: Option<u32>,
}

impl Cardinality {
    pub const NONE: Cardinality = Cardinality::exactly(0);
    pub const ONE: Cardinality = Cardinality::exactly(1);
    pub const OPTIONAL: Cardinality = Cardinality {
        lo: 0,
        hi: Some(1),
    };
    pub const ANY: Cardinality = Cardinality { lo: 0, hi: None };
    pub const SOME: Cardinality = Cardinality { lo: 1, hi: None };

    pub const fn exactly(n: u32) -> Cardinality {
        Cardinality { lo: n, hi: Some(n) }
    }

    /// Whether the range is empty.
    pub fn is_empty(&self) -> bool {
        self.hi.is_some_and(|hi| hi < self.lo)
    }

    /// The range as a closed interval, with unbounded and large upper ends capped at `cap`.
    pub fn capped(&self, cap: u32) -> (u32, u32) {
        (self.lo, self.hi.map_or(cap, |hi| hi.min(cap)))
    }
}

impl Display for Cardinality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.hi {
            Some(hi) => write!(f, "{}..{}", self.lo, hi),
            None => write!(f, "{}..", self.lo),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum CardinalitySource {
    Count(u32),
    Range([u32; 2]),
    Symbol(String),
}

impl TryFrom<CardinalitySource> for Cardinality {
    type Error = GrammarError;

    fn try_from(source: CardinalitySource) -> Result<Self, Self::Error> {
        match source {
            CardinalitySource::Count(n) => Ok(Cardinality::exactly(n)),
            // Inverted ranges are accepted here and rejected per entry.
            CardinalitySource::Range([lo, hi]) => Ok(Cardinality { lo, hi: Some(hi) }),
            CardinalitySource::Symbol(symbol) => match symbol.as_str() {
                "!" => Ok(Cardinality::ONE),
                "?" => Ok(Cardinality::OPTIONAL),
                "*" => Ok(Cardinality::ANY),
                "+" => Ok(Cardinality::SOME),
                _ => {
                    let parsed = match symbol.strip_suffix('+') {
                        Some(lo) => lo.parse().map(|lo| Cardinality { lo, hi: None }),
                        None => symbol.parse().map(Cardinality::exactly),
                    };
                    parsed.map_err(|_| GrammarError::InvalidCardinality(symbol))
                }
            },
        }
    }
}

impl From<Cardinality> for CardinalitySource {
    fn from(cardinality: Cardinality) -> Self {
        match cardinality {
            Cardinality { lo, hi: Some(hi) } if lo == hi => CardinalitySource::Count(lo),
            Cardinality { lo, hi: Some(hi) } => CardinalitySource::Range([lo, hi]),
            Cardinality { lo, hi: None } => CardinalitySource::Symbol(format!("{lo}+")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Cardinality;

    fn parse(json: &str) -> Cardinality {
        serde_json::from_str(json).expect("valid cardinality")
    }

    #[test]
    fn symbols() {
        assert_eq!(parse("\"!\""), Cardinality::ONE);
        assert_eq!(parse("\"?\""), Cardinality::OPTIONAL);
        assert_eq!(parse("\"*\""), Cardinality::ANY);
        assert_eq!(parse("\"+\""), Cardinality::SOME);
        assert_eq!(parse("\"0\""), Cardinality::NONE);
        assert_eq!(parse("\"2+\""), Cardinality { lo: 2, hi: None });
    }

    #[test]
    fn counts_and_ranges() {
        assert_eq!(parse("3"), Cardinality::exactly(3));
        assert_eq!(parse("[1, 2]"), Cardinality { lo: 1, hi: Some(2) });
        assert!(parse("[2, 1]").is_empty());
    }

    #[test]
    fn unknown_symbols_are_rejected() {
        assert!(serde_json::from_str::<Cardinality>("\"many\"").is_err());
    }

    #[test]
    fn unbounded_ranges_are_capped() {
        assert_eq!(Cardinality::SOME.capped(4), (1, 4));
        assert_eq!(Cardinality::exactly(9).capped(4), (9, 4));
    }

    #[test]
    fn serialization_is_readable_again() {
        for cardinality in [Cardinality::ANY, Cardinality::OPTIONAL, Cardinality::exactly(2)] {
            let json = serde_json::to_string(&cardinality).expect("serializable");
            assert_eq!(parse(&json), cardinality);
        }
    }
}
