// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Rule-based natural-language date recognition.
//!
//! [`find_dates`] scans normalized (lowercased) text for absolute, partial and
//! relative date expressions and resolves each to a calendar date against a
//! reference date. Spans that look like dates but name an impossible day
//! ("february 30 2024") are consumed and dropped.

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};
use regex::{Captures, Regex};
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateMatch {
    /// Byte offsets into the scanned text.
    pub start: usize,
    pub end: usize,
    pub text: String,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pattern {
    Iso,
    DayFirstNumeric,
    DayMonth,
    MonthDay,
    MonthYear,
    QualifiedMonth,
    QualifiedRelativeMonth,
    RelativeDay,
    InOffset,
    OffsetFromNow,
    NextPeriod,
    Weekday,
}

const MONTH: &str = r"(jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)";
const QUALIFIER: &str = r"(early|beginning of|start of|mid|middle of|late|end of)";
const AMOUNT: &str = r"(\d{1,3}|a|an|one|two|three|four|five|six|seven|eight|nine|ten|eleven|twelve)";
const UNIT: &str = r"(day|week|month|year)s?";

fn patterns() -> &'static [(Pattern, Regex)] {
    static PATTERNS: OnceLock<Vec<(Pattern, Regex)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        let sources = [
            (Pattern::Iso, r"\b(\d{4})[-/](\d{1,2})[-/](\d{1,2})\b".to_string()),
            (
                Pattern::DayFirstNumeric,
                r"\b(\d{1,2})[./-](\d{1,2})[./-](\d{4}|\d{2})\b".to_string(),
            ),
            (
                Pattern::DayMonth,
                format!(r"\b(?:the\s+)?(\d{{1,2}})(?:st|nd|rd|th)?\s+(?:of\s+)?{MONTH}\b\.?(?:,?\s+(\d{{4}})\b)?"),
            ),
            (
                Pattern::MonthDay,
                format!(r"\b{MONTH}\.?\s+(?:the\s+)?(\d{{1,2}})(st|nd|rd|th)?\b(?:,?\s+(\d{{4}})\b)?"),
            ),
            (
                Pattern::MonthYear,
                format!(r"\b(?:{QUALIFIER}[\s-]+)?(?:the\s+)?{MONTH}\.?\s+(\d{{4}})\b"),
            ),
            (
                Pattern::QualifiedMonth,
                format!(r"\b{QUALIFIER}[\s-]+(?:the\s+)?(?:month\s+of\s+)?{MONTH}\b"),
            ),
            (
                Pattern::QualifiedRelativeMonth,
                format!(r"\b{QUALIFIER}[\s-]+(?:the\s+|this\s+)?(next\s+)?month\b"),
            ),
            (
                Pattern::RelativeDay,
                r"\b(?:the\s+)?(day after tomorrow|today|tomorrow|yesterday)\b".to_string(),
            ),
            (Pattern::InOffset, format!(r"\bin\s+{AMOUNT}\s+{UNIT}\b")),
            (
                Pattern::OffsetFromNow,
                format!(r"\b{AMOUNT}\s+{UNIT}\s+from\s+(?:now|today)\b"),
            ),
            (Pattern::NextPeriod, r"\bnext\s+(week|month|year)\b".to_string()),
            (
                Pattern::Weekday,
                r"\b(?:(next|this|coming)\s+)?(monday|tuesday|wednesday|thursday|friday|saturday|sunday)\b"
                    .to_string(),
            ),
        ];
        sources
            .into_iter()
            .map(|(pattern, src)| (pattern, Regex::new(&src).expect("valid date pattern")))
            .collect()
    })
}

struct Candidate {
    start: usize,
    end: usize,
    priority: usize,
    date: Option<NaiveDate>,
}

/// Finds every date expression in `text`, in source order.
///
/// Overlapping matches resolve to the earliest, then longest span. An
/// unresolvable span (impossible calendar day) still claims its text.
pub fn find_dates(text: &str, reference: NaiveDate) -> Vec<DateMatch> {
    let mut candidates = Vec::new();
    for (priority, (pattern, re)) in patterns().iter().enumerate() {
        for caps in re.captures_iter(text) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            if *pattern == Pattern::MonthDay && is_modal_may(text, whole.start(), &caps) {
                continue;
            }
            candidates.push(Candidate {
                start: whole.start(),
                end: whole.end(),
                priority,
                date: resolve(*pattern, &caps, reference),
            });
        }
    }

    candidates.sort_by(|a, b| {
        a.start
            .cmp(&b.start)
            .then((b.end - b.start).cmp(&(a.end - a.start)))
            .then(a.priority.cmp(&b.priority))
    });

    let mut matches = Vec::new();
    let mut last_end = 0;
    for c in candidates {
        if c.start < last_end {
            continue;
        }
        last_end = c.end;
        match c.date {
            Some(date) => matches.push(DateMatch {
                start: c.start,
                end: c.end,
                text: text[c.start..c.end].to_string(),
                date,
            }),
            None => log::debug!(
                "[Dates] dropping unresolvable date '{}'",
                &text[c.start..c.end]
            ),
        }
    }
    matches
}

fn resolve(pattern: Pattern, caps: &Captures, reference: NaiveDate) -> Option<NaiveDate> {
    let num = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());
    let text = |i: usize| caps.get(i).map(|m| m.as_str());

    match pattern {
        Pattern::Iso => NaiveDate::from_ymd_opt(num(1)? as i32, num(2)?, num(3)?),
        Pattern::DayFirstNumeric => {
            let year = text(3)?;
            let year = match year.len() {
                2 => 2000 + year.parse::<i32>().ok()?,
                _ => year.parse::<i32>().ok()?,
            };
            NaiveDate::from_ymd_opt(year, num(2)?, num(1)?)
        }
        Pattern::DayMonth => day_month(num(1)?, month_number(text(2)?)?, num(3), reference),
        Pattern::MonthDay => day_month(num(2)?, month_number(text(1)?)?, num(4), reference),
        Pattern::MonthYear => {
            let month = month_number(text(2)?)?;
            qualified_day(text(1), num(3)? as i32, month)
        }
        Pattern::QualifiedMonth => {
            let month = month_number(text(2)?)?;
            let this_year = qualified_day(text(1), reference.year(), month)?;
            if this_year >= reference {
                Some(this_year)
            } else {
                qualified_day(text(1), reference.year() + 1, month)
            }
        }
        Pattern::QualifiedRelativeMonth => {
            let base = if text(2).is_some() {
                reference.checked_add_months(Months::new(1))?
            } else {
                reference
            };
            qualified_day(text(1), base.year(), base.month())
        }
        Pattern::RelativeDay => match text(1)? {
            "today" => Some(reference),
            "tomorrow" => reference.checked_add_days(Days::new(1)),
            "yesterday" => reference.checked_sub_days(Days::new(1)),
            "day after tomorrow" => reference.checked_add_days(Days::new(2)),
            _ => None,
        },
        Pattern::InOffset | Pattern::OffsetFromNow => {
            offset(reference, amount(text(1)?)?, text(2)?)
        }
        Pattern::NextPeriod => offset(reference, 1, text(1)?),
        Pattern::Weekday => {
            let target: Weekday = text(2)?.parse().ok()?;
            let ahead = (7 + target.num_days_from_monday()
                - reference.weekday().num_days_from_monday())
                % 7;
            let ahead = if ahead == 0 && text(1) == Some("next") {
                7
            } else {
                ahead
            };
            reference.checked_add_days(Days::new(ahead as u64))
        }
    }
}

/// "may 2" only names a date with an ordinal, a year, or a leading "on"/"the";
/// otherwise it reads as the verb ("you may 2 times add").
fn is_modal_may(text: &str, start: usize, caps: &Captures) -> bool {
    let bare = caps.get(1).map(|m| m.as_str()) == Some("may")
        && caps.get(3).is_none()
        && caps.get(4).is_none();
    bare && !matches!(text[..start].split_whitespace().next_back(), Some("on" | "the"))
}

/// Day and month with an optional year. Without a year the next occurrence on
/// or after `reference` is used; February 29 may need to look several years ahead.
fn day_month(day: u32, month: u32, year: Option<u32>, reference: NaiveDate) -> Option<NaiveDate> {
    if let Some(year) = year {
        return NaiveDate::from_ymd_opt(year as i32, month, day);
    }
    (0..=8).find_map(|ahead| {
        NaiveDate::from_ymd_opt(reference.year() + ahead, month, day).filter(|d| *d >= reference)
    })
}

fn qualified_day(qualifier: Option<&str>, year: i32, month: u32) -> Option<NaiveDate> {
    match qualifier {
        Some("mid") | Some("middle of") => NaiveDate::from_ymd_opt(year, month, 15),
        Some("late") | Some("end of") => last_day_of_month(year, month),
        _ => NaiveDate::from_ymd_opt(year, month, 1),
    }
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)?
        .checked_add_months(Months::new(1))?
        .pred_opt()
}

fn offset(reference: NaiveDate, amount: u32, unit: &str) -> Option<NaiveDate> {
    match unit {
        "day" => reference.checked_add_days(Days::new(amount as u64)),
        "week" => reference.checked_add_days(Days::new(amount as u64 * 7)),
        "month" => reference.checked_add_months(Months::new(amount)),
        "year" => reference.checked_add_months(Months::new(amount * 12)),
        _ => None,
    }
}

fn amount(s: &str) -> Option<u32> {
    let n = match s {
        "a" | "an" | "one" => 1,
        "two" => 2,
        "three" => 3,
        "four" => 4,
        "five" => 5,
        "six" => 6,
        "seven" => 7,
        "eight" => 8,
        "nine" => 9,
        "ten" => 10,
        "eleven" => 11,
        "twelve" => 12,
        digits => digits.parse().ok()?,
    };
    Some(n)
}

fn month_number(name: &str) -> Option<u32> {
    let month = match name.get(..3)? {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}
