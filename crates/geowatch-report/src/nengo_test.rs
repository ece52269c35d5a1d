use chrono::TimeZone;

use super::*;

fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
}

#[test]
fn reiwa_first_year_renders_gannen() {
    let nengo = nengo_for(at(2019, 6, 1)).unwrap();
    assert_eq!(nengo.era.name, "reiwa");
    assert_eq!(nengo.year, 1);
    assert_eq!(nengo.kanji, "元年");
    assert_eq!(nengo.display(), "令和元年");
}

#[test]
fn reiwa_third_year_renders_kanji_digit() {
    let nengo = nengo_for(at(2021, 6, 1)).unwrap();
    assert_eq!(nengo.year, 3);
    assert_eq!(nengo.display(), "令和三年");
}

#[test]
fn early_months_still_use_the_previous_years_era() {
    // March 2019 is before the rollover, so the lookup year is 2018:
    // Heisei 30.
    let nengo = nengo_for(at(2019, 3, 1)).unwrap();
    assert_eq!(nengo.era.name, "heisei");
    assert_eq!(nengo.year, 30);
    assert_eq!(nengo.kanji, "三十年");
}

#[test]
fn jst_shift_can_move_the_calendar_year() {
    // 2021-12-31 20:00 UTC is 2022-01-01 05:00 JST, but January is before
    // the rollover, so the lookup year steps back to 2021.
    let nengo = nengo_for(Utc.with_ymd_and_hms(2021, 12, 31, 20, 0, 0).unwrap()).unwrap();
    assert_eq!(nengo.era.name, "reiwa");
    assert_eq!(nengo.year, 3);
}

#[test]
fn tenth_year_renders_the_tens_marker() {
    let nengo = nengo_for(at(1998, 6, 1)).unwrap();
    assert_eq!(nengo.era.name, "heisei");
    assert_eq!(nengo.year, 10);
    assert_eq!(nengo.kanji, "十年");
}

#[test]
fn twenty_first_year_combines_tens_and_ones() {
    let nengo = nengo_for(at(2009, 6, 1)).unwrap();
    assert_eq!(nengo.era.name, "heisei");
    assert_eq!(nengo.year, 21);
    assert_eq!(nengo.kanji, "二十一年");
}

#[test]
fn dates_before_the_table_are_none() {
    assert!(nengo_for(at(1980, 6, 1)).is_none());
}
