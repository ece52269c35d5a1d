//! Japanese era (nengo) rendering for report headers.
//!
//! Timestamps are shifted to JST before the era lookup. The year is rendered
//! in kanji numerals with 元 for an era's first year.

use chrono::{DateTime, Datelike, Duration, Utc};

/// One era of the table. `years` bounds the lookup range; open-ended eras
/// use a generous span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Era {
    pub name: &'static str,
    pub kanji_name: &'static str,
    pub base_year: i32,
    pub years: i32,
}

/// Newest first: the lookup takes the first era whose range contains the
/// year, so Reiwa shadows the tail of the Heisei span.
pub static ERAS: [Era; 2] = [
    Era {
        name: "reiwa",
        kanji_name: "令和",
        base_year: 2019,
        years: 30,
    },
    Era {
        name: "heisei",
        kanji_name: "平成",
        base_year: 1989,
        years: 30,
    },
];

/// A resolved era year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NengoYear {
    pub era: &'static Era,
    /// 1-based year within the era.
    pub year: i32,
    /// Kanji rendering including the 年 suffix, 元年 for year one.
    pub kanji: String,
}

impl NengoYear {
    /// Full display string, e.g. `令和三年`.
    #[must_use]
    pub fn display(&self) -> String {
        format!("{}{}", self.era.kanji_name, self.kanji)
    }
}

/// Resolves the era year for a UTC instant. `None` for dates before the
/// table's coverage.
#[must_use]
pub fn nengo_for(instant: DateTime<Utc>) -> Option<NengoYear> {
    let jst = instant + Duration::hours(9);
    let mut year = jst.year();
    // Through April the previous year's era assignment still applies; the
    // source data only rolls the era table over in May.
    if jst.month() <= 4 {
        year -= 1;
    }

    let era = ERAS
        .iter()
        .find(|era| era.base_year <= year && year < era.base_year + era.years)?;
    let era_year = year - era.base_year + 1;
    Some(NengoYear {
        era,
        year: era_year,
        kanji: kanji_year(era_year),
    })
}

const KANJI_DIGITS: [char; 10] = [' ', '一', '二', '三', '四', '五', '六', '七', '八', '九'];

/// Renders a 1-based era year in kanji numerals with the 年 suffix.
/// Handles 1..=99, which comfortably covers the era table.
fn kanji_year(year: i32) -> String {
    if year == 1 {
        return "元年".to_owned();
    }

    let mut kanji = String::new();
    let tens = (year / 10) as usize;
    let ones = (year % 10) as usize;
    if year >= 10 {
        if tens >= 2 {
            kanji.push(KANJI_DIGITS[tens.min(9)]);
        }
        kanji.push('十');
    }
    if ones != 0 {
        kanji.push(KANJI_DIGITS[ones]);
    }
    kanji.push('年');
    kanji
}

#[cfg(test)]
#[path = "nengo_test.rs"]
mod tests;
