//! Ordered text-matching rules for each route field.
//!
//! Every field owns a [`RuleChain`]: a list of named regex rules paired with
//! an extractor. Chains are evaluated against lower-cased page text and the
//! first rule producing a value wins; later rules are not consulted.
//!
//! A rule whose pattern matches but whose captures cannot be turned into a
//! value (empty after trimming, out-of-range time, ...) counts as a
//! non-match, so evaluation moves on to the next occurrence and then to the
//! next rule.

use std::fmt;

use regex::{Captures, Regex};

use crate::error::{AppError, Result};
use crate::utils::text::title_case;

/// Turns the captures of one pattern match into a field value.
pub type Extractor<T> = fn(&Captures<'_>) -> Option<T>;

/// A named pattern and the extractor applied to its captures.
pub struct Rule<T> {
    name: &'static str,
    pattern: Regex,
    extract: Extractor<T>,
}

impl<T> Rule<T> {
    /// Compile a rule.
    pub fn new(name: &'static str, pattern: &str, extract: Extractor<T>) -> Result<Self> {
        let pattern = Regex::new(pattern).map_err(|e| AppError::pattern(name, e))?;
        Ok(Self {
            name,
            pattern,
            extract,
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Value of the first occurrence whose captures extract cleanly.
    pub fn apply(&self, text: &str) -> Option<T> {
        self.pattern
            .captures_iter(text)
            .find_map(|caps| (self.extract)(&caps))
    }
}

impl<T> fmt::Debug for Rule<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("pattern", &self.pattern.as_str())
            .finish()
    }
}

/// Value produced by a chain, with the rule that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matched<T> {
    pub rule: &'static str,
    pub value: T,
}

/// Ordered, first-match-wins list of rules for one field.
#[derive(Debug)]
pub struct RuleChain<T> {
    field: &'static str,
    rules: Vec<Rule<T>>,
}

impl<T> RuleChain<T> {
    pub fn new(field: &'static str) -> Self {
        Self {
            field,
            rules: Vec::new(),
        }
    }

    /// Append a rule at the lowest priority.
    pub fn rule(mut self, name: &'static str, pattern: &str, extract: Extractor<T>) -> Result<Self> {
        self.rules.push(Rule::new(name, pattern, extract)?);
        Ok(self)
    }

    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn rule_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(Rule::name)
    }

    /// Evaluate rules in order and return the first value produced.
    pub fn first_match(&self, text: &str) -> Option<Matched<T>> {
        let matched = self.rules.iter().find_map(|rule| {
            rule.apply(text).map(|value| Matched {
                rule: rule.name,
                value,
            })
        });

        match &matched {
            Some(m) => log::debug!("{}: matched by rule '{}'", self.field, m.rule),
            None => log::debug!("{}: no rule matched", self.field),
        }
        matched
    }
}

/// Route endpoints as rendered in the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub source: String,
    pub destination: String,
}

/// First and last departure; either side may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperatingHours {
    pub first: Option<String>,
    pub last: Option<String>,
}

// Building blocks, applied to lower-cased text.

/// A place name of one or more words; hyphens only join letters.
const PLACE: &str = r"[a-z](?:[a-z'&]|-[a-z])*(?:\s+[a-z](?:[a-z'&]|-[a-z])*)*?";

/// A place name of at most four words on one line, for rules without a
/// leading anchor.
const SHORT_PLACE: &str = r"[a-z](?:[a-z'&]|-[a-z])*(?:[ \t]+[a-z](?:[a-z'&]|-[a-z])*){0,3}?";

/// What may follow a destination: a connective word, any character that
/// cannot continue a place name, or the end of the line. A hyphen continues
/// the name only when a letter follows it directly.
const PLACE_END: &str = r"(?:\s+(?:every|via|first|last|frequency|daily|timings?|fare|bus|buses|route|and|runs?|operates?|service)\b|\s*(?:[^a-z'&\s-]|-(?:[^a-z]|$))|\s*$)";

const MINUTES: &str = r"\s*(?:minutes?|mins?)\b";

const TIME: &str = r"(\d{1,2}:\d{2})";

const RUPEE: &str = r"(?:\brs\b\.?|₹|\binr\b)";

/// The compiled rule chains for every extracted field.
#[derive(Debug)]
pub struct PatternLibrary {
    pub endpoints: RuleChain<Endpoints>,
    pub frequency: RuleChain<String>,
    /// `first bus HH:MM`
    pub first_departure: RuleChain<String>,
    /// `last bus HH:MM`
    pub last_departure: RuleChain<String>,
    /// Unlabelled `HH:MM - HH:MM`, consulted only when no label matches.
    pub time_range: RuleChain<OperatingHours>,
    pub fare: RuleChain<String>,
    /// Authoritative coverage area stated on the page.
    pub category: RuleChain<String>,
}

impl PatternLibrary {
    /// Compile the baseline rules. `categories` are the coverage areas the
    /// page may name explicitly.
    pub fn new(categories: &[String]) -> Result<Self> {
        Ok(Self {
            endpoints: endpoint_rules()?,
            frequency: frequency_rules()?,
            first_departure: departure_rules("first_departure", "first")?,
            last_departure: departure_rules("last_departure", "last")?,
            time_range: time_range_rules()?,
            fare: fare_rules()?,
            category: category_rules(categories)?,
        })
    }

    /// First and last departure found in `text`.
    ///
    /// Each labelled side is filled on its own. The unlabelled range only
    /// applies when neither label produced a valid time.
    pub fn hours(&self, text: &str) -> OperatingHours {
        let first = self.first_departure.first_match(text).map(|m| m.value);
        let last = self.last_departure.first_match(text).map(|m| m.value);
        if first.is_some() || last.is_some() {
            return OperatingHours { first, last };
        }
        self.time_range
            .first_match(text)
            .map(|m| m.value)
            .unwrap_or_default()
    }
}

fn endpoint_rules() -> Result<RuleChain<Endpoints>> {
    RuleChain::new("endpoints")
        .rule(
            "from-to",
            &format!(r"(?m)\bfrom\s+({PLACE})\s+to\s+({PLACE}){PLACE_END}"),
            endpoints,
        )?
        .rule(
            "arrow",
            &format!(r"(?m)\b({SHORT_PLACE})\s*(?:→|->|⟶|⇒|»)\s*({PLACE}){PLACE_END}"),
            endpoints,
        )?
        .rule(
            "hyphen-pair",
            &format!(r"(?m)\b({SHORT_PLACE})\s+[-–]\s+({PLACE}){PLACE_END}"),
            endpoints,
        )
}

fn frequency_rules() -> Result<RuleChain<String>> {
    RuleChain::new("frequency")
        .rule("every", &format!(r"\bevery\s+(\d+){MINUTES}"), minutes)?
        .rule(
            "labelled",
            &format!(r"\bfrequency[:\s]*(\d+){MINUTES}"),
            minutes,
        )?
        .rule(
            "interval",
            &format!(r"\b(\d+){MINUTES}\s*(?:interval|headway|gap)"),
            minutes,
        )
}

fn departure_rules(field: &'static str, label: &str) -> Result<RuleChain<String>> {
    RuleChain::new(field).rule(
        "labelled",
        &format!(r"\b{label}\s+bus\b[:\s]*(?:at\s+)?{TIME}"),
        |caps| time_at(caps, 1),
    )
}

fn time_range_rules() -> Result<RuleChain<OperatingHours>> {
    RuleChain::new("time_range").rule(
        "range",
        &format!(r"{TIME}\s*(?:-|–|to)\s*{TIME}"),
        |caps| {
            Some(OperatingHours {
                first: Some(time_at(caps, 1)?),
                last: Some(time_at(caps, 2)?),
            })
        },
    )
}

fn fare_rules() -> Result<RuleChain<String>> {
    RuleChain::new("fare_range")
        .rule(
            "labelled-range",
            &format!(r"\b(?:fares?|ticket)\D{{0,12}}?(\d+)\s*(?:/-)?\s*(?:-|–|to)\s*{RUPEE}?\s*(\d+)"),
            fare_range,
        )?
        .rule(
            "currency-range",
            &format!(r"{RUPEE}\s*(\d+)\s*(?:/-)?\s*(?:-|–|to)\s*{RUPEE}?\s*(\d+)"),
            fare_range,
        )?
        .rule(
            "labelled-single",
            r"\b(?:fares?|ticket)\D{0,12}?(\d+)",
            |caps| Some(format!("₹{}", number_at(caps, 1)?)),
        )
}

fn category_rules(categories: &[String]) -> Result<RuleChain<String>> {
    let chain = RuleChain::new("category");
    if categories.is_empty() {
        return Ok(chain);
    }

    let names = categories
        .iter()
        .map(|c| {
            c.to_lowercase()
                .split_whitespace()
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(r"\s+")
        })
        .collect::<Vec<_>>()
        .join("|");

    chain.rule(
        "named-area",
        &format!(r"\b(?:coverage\s+area|service\s+area|region|zone|area)\s*[:\-]?\s*({names})\b"),
        |caps| group(caps, 1),
    )
}

// Extractors.

/// Trimmed, non-empty capture group.
fn group(caps: &Captures<'_>, i: usize) -> Option<String> {
    let text = caps.get(i)?.as_str().trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn endpoints(caps: &Captures<'_>) -> Option<Endpoints> {
    let source = title_case(&group(caps, 1)?);
    let destination = title_case(&group(caps, 2)?);
    if source == destination {
        return None;
    }
    Some(Endpoints {
        source,
        destination,
    })
}

fn number_at(caps: &Captures<'_>, i: usize) -> Option<u32> {
    group(caps, i)?.parse().ok()
}

fn minutes(caps: &Captures<'_>) -> Option<String> {
    let n = number_at(caps, 1)?;
    (n > 0).then(|| format!("{n} minutes"))
}

fn time_at(caps: &Captures<'_>, i: usize) -> Option<String> {
    let time = group(caps, i)?;
    let (hours, minutes) = time.split_once(':')?;
    let hours: u32 = hours.parse().ok()?;
    let minutes: u32 = minutes.parse().ok()?;
    (hours <= 24 && minutes <= 59).then_some(time)
}

fn fare_range(caps: &Captures<'_>) -> Option<String> {
    let low = number_at(caps, 1)?;
    let high = number_at(caps, 2)?;
    (low <= high).then(|| format!("₹{low}-{high}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn library() -> PatternLibrary {
        let categories = vec!["Western Suburbs".to_string(), "Navi Mumbai".to_string()];
        PatternLibrary::new(&categories).unwrap()
    }

    fn endpoints_of(text: &str) -> Option<(String, String, &'static str)> {
        library()
            .endpoints
            .first_match(text)
            .map(|m| (m.value.source, m.value.destination, m.rule))
    }

    #[test]
    fn test_from_to() {
        let (source, destination, rule) =
            endpoints_of("route from andheri to churchgate every 15 minutes, first bus 05:30")
                .unwrap();
        assert_eq!(source, "Andheri");
        assert_eq!(destination, "Churchgate");
        assert_eq!(rule, "from-to");
    }

    #[test]
    fn test_from_to_multi_word() {
        let (source, destination, _) =
            endpoints_of("runs from andheri station west to cst depot via dadar").unwrap();
        assert_eq!(source, "Andheri Station West");
        assert_eq!(destination, "Cst Depot");
    }

    #[test]
    fn test_arrow() {
        let (source, destination, rule) = endpoints_of("bus 7ltd: kurla → mira-bhayandar").unwrap();
        assert_eq!(source, "Kurla");
        assert_eq!(destination, "Mira-Bhayandar");
        assert_eq!(rule, "arrow");
    }

    #[test]
    fn test_hyphen_pair() {
        let (source, destination, rule) = endpoints_of("route 84: colaba depot - worli.").unwrap();
        assert_eq!(source, "Colaba Depot");
        assert_eq!(destination, "Worli");
        assert_eq!(rule, "hyphen-pair");
    }

    #[test]
    fn test_from_to_wins_over_arrow() {
        let (_, destination, rule) =
            endpoints_of("ghatkopar → powai. also runs from bandra to juhu").unwrap();
        assert_eq!(rule, "from-to");
        assert_eq!(destination, "Juhu");
    }

    #[test]
    fn test_from_to_destination_ends_at_any_separator() {
        for text in [
            "route from andheri to churchgate - ac service",
            "route from andheri to churchgate / colaba",
            "route from andheri to churchgate \"",
            "route from andheri to churchgate — every day",
            "route from andheri to churchgate*",
        ] {
            let (source, destination, rule) = endpoints_of(text).unwrap();
            assert_eq!(rule, "from-to", "{text}");
            assert_eq!(source, "Andheri", "{text}");
            assert_eq!(destination, "Churchgate", "{text}");
        }
    }

    #[test]
    fn test_from_to_keeps_hyphenated_destination() {
        let (_, destination, _) = endpoints_of("from kurla to mira-bhayandar - fast").unwrap();
        assert_eq!(destination, "Mira-Bhayandar");
    }

    #[test]
    fn test_no_endpoints() {
        assert!(endpoints_of("timetable unavailable 404").is_none());
    }

    #[test]
    fn test_frequency_first_match_wins() {
        let text = "buses every 10 minutes. peak: 20 min interval";
        let m = library().frequency.first_match(text).unwrap();
        assert_eq!(m.value, "10 minutes");
        assert_eq!(m.rule, "every");
    }

    #[test]
    fn test_frequency_variants() {
        let lib = library();
        assert_eq!(
            lib.frequency.first_match("frequency: 12 mins").unwrap().value,
            "12 minutes"
        );
        assert_eq!(
            lib.frequency.first_match("8 min headway").unwrap().value,
            "8 minutes"
        );
        assert!(lib.frequency.first_match("every 0 minutes").is_none());
    }

    #[test]
    fn test_hours_both_labels() {
        let lib = library();
        let hours = lib.hours("first bus: 05:30 ... last bus at 23:15");
        assert_eq!(hours.first.as_deref(), Some("05:30"));
        assert_eq!(hours.last.as_deref(), Some("23:15"));

        let hours = lib.hours("last bus 22:40, first bus 6:00");
        assert_eq!(hours.first.as_deref(), Some("6:00"));
        assert_eq!(hours.last.as_deref(), Some("22:40"));
    }

    #[test]
    fn test_hours_single_label_ignores_range() {
        let hours = library().hours("first bus 05:30. timings 06:00 - 22:00");
        assert_eq!(hours.first.as_deref(), Some("05:30"));
        assert_eq!(hours.last, None);
    }

    #[test]
    fn test_hours_sides_recover_independently() {
        let hours = library().hours("first bus 05:30 ... last bus 99:99 ... last bus 23:00");
        assert_eq!(hours.first.as_deref(), Some("05:30"));
        assert_eq!(hours.last.as_deref(), Some("23:00"));
    }

    #[test]
    fn test_hours_range() {
        let hours = library().hours("operates 05:45 - 23:30 daily");
        assert_eq!(hours.first.as_deref(), Some("05:45"));
        assert_eq!(hours.last.as_deref(), Some("23:30"));
    }

    #[test]
    fn test_malformed_time_is_non_match() {
        let lib = library();
        assert_eq!(lib.hours("first bus 77:99"), OperatingHours::default());
        assert_eq!(lib.hours("runs 05:00 - 25:10"), OperatingHours::default());
    }

    #[test]
    fn test_fare() {
        let lib = library();
        assert_eq!(
            lib.fare.first_match("fare: ₹10 - ₹25").unwrap().value,
            "₹10-25"
        );
        assert_eq!(lib.fare.first_match("rs. 5 to rs 20").unwrap().value, "₹5-20");
        assert_eq!(lib.fare.first_match("ticket price ₹15").unwrap().value, "₹15");
    }

    #[test]
    fn test_category_rule() {
        let lib = library();
        let m = lib.category.first_match("coverage area: navi  mumbai").unwrap();
        assert_eq!(m.value, "navi  mumbai");
        assert!(lib.category.first_match("region: goa").is_none());
    }

    #[test]
    fn test_empty_categories_yield_empty_chain() {
        let lib = PatternLibrary::new(&[]).unwrap();
        assert!(lib.category.is_empty());
        assert!(lib.category.first_match("region: thane").is_none());
    }

    #[test]
    fn test_rule_order() {
        let lib = library();
        let names: Vec<_> = lib.endpoints.rule_names().collect();
        assert_eq!(names, ["from-to", "arrow", "hyphen-pair"]);
        assert_eq!(lib.first_departure.len(), 1);
        assert_eq!(lib.time_range.len(), 1);
    }

    #[test]
    fn test_invalid_pattern_reports_rule() {
        let err = RuleChain::<String>::new("x")
            .rule("broken", "(unclosed", |_| None)
            .unwrap_err();
        assert!(matches!(err, AppError::Pattern { ref rule, .. } if rule == "broken"));
    }
}
