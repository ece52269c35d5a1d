use super::*;

const GLOBAL_URL: &str = "https://example.test/en/volcano";
const REGION_URL: &str = "https://example.test/en/volcano/map_4.html";

fn global_page() -> String {
    r##"<html><body>
      <table class="infotable"><tr><td>navigation, not alerts</td></tr></table>
      <table class="infotable">
        <tr><th>Warning</th><th>Keyword</th><th>Volcano</th><th>Issued</th></tr>
        <tr>
          <td><a href="./STOC50_20210214.html">VOLC-03</a></td>
          <td>Level 3 (Do not approach the volcano)</td>
          <td>Sakurajima</td>
          <td>14 Feb 2021 05:00 JST</td>
        </tr>
        <tr>
          <td><a href="./STOC51_20210213.html">VOLC-07</a></td>
          <td>Warning in the sea area around the volcano</td>
          <td>Fukutoku-Oka-no-Ba</td>
          <td>13 Feb 2021 11:30 JST</td>
        </tr>
      </table>
    </body></html>"##
        .to_owned()
}

fn region_page() -> String {
    r##"<html><body>
      <table class="infotable">
        <tr><th>Volcano</th><th>Keyword</th></tr>
        <tr><td>Sakurajima</td><td>Level 3 (Do not approach the volcano)</td></tr>
        <tr><td>Kuchinoerabujima</td><td>Near-crater warning</td></tr>
      </table>
    </body></html>"##
        .to_owned()
}

// ---------------------------------------------------------------------------
// Table parsing
// ---------------------------------------------------------------------------

#[test]
fn global_rows_come_from_the_last_infotable() {
    let rows = parse_global_alert_rows(&global_page(), GLOBAL_URL).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].code, "VOLC-03");
    assert_eq!(rows[0].keyword, "Level 3 (Do not approach the volcano)");
    assert_eq!(rows[0].issued_to, "Sakurajima");
    assert_eq!(rows[0].issued_at, "14 Feb 2021 05:00 JST");
    assert_eq!(rows[0].info_href, "./STOC50_20210214.html");
    assert_eq!(rows[1].issued_to, "Fukutoku-Oka-no-Ba");
}

#[test]
fn global_page_without_infotable_is_a_shape_error() {
    let err = parse_global_alert_rows("<html><body></body></html>", GLOBAL_URL).unwrap_err();
    assert!(matches!(err, ScraperError::PageShape { .. }));
}

#[test]
fn short_global_row_fails_loudly() {
    let html = r##"<table class="infotable">
        <tr><td><a href="x.html">c</a></td><td>only two</td></tr>
    </table>"##;
    let err = parse_global_alert_rows(html, GLOBAL_URL).unwrap_err();
    assert!(
        matches!(&err, ScraperError::PageShape { detail, .. } if detail.contains("expected 4")),
        "got {err:?}"
    );
}

#[test]
fn global_row_without_info_link_is_a_shape_error() {
    let html = r##"<table class="infotable">
        <tr><td>no link</td><td>k</td><td>v</td><td>t</td></tr>
    </table>"##;
    assert!(parse_global_alert_rows(html, GLOBAL_URL).is_err());
}

#[test]
fn region_rows_carry_name_and_keyword_only() {
    let rows = parse_region_alert_rows(&region_page(), REGION_URL).unwrap();
    assert_eq!(
        rows,
        vec![
            RegionAlertRow {
                issued_to: "Sakurajima".to_owned(),
                keyword: "Level 3 (Do not approach the volcano)".to_owned(),
            },
            RegionAlertRow {
                issued_to: "Kuchinoerabujima".to_owned(),
                keyword: "Near-crater warning".to_owned(),
            },
        ]
    );
}

#[test]
fn info_text_preserves_break_driven_lines() {
    let html = r##"<div class="textframe">
      <b>Volcanic Warning</b><br>Alert level raised to 3.<br/>Stay away from the crater.
    </div>"##;
    let text = parse_info_text(html, "u").unwrap();
    assert!(text.contains("Volcanic Warning\nAlert level raised to 3.\nStay away"));
}

#[test]
fn info_page_without_textframe_is_a_shape_error() {
    let err = parse_info_text("<html><body></body></html>", "u").unwrap_err();
    assert!(matches!(err, ScraperError::PageShape { .. }));
}

// ---------------------------------------------------------------------------
// Keyword classification
// ---------------------------------------------------------------------------

#[test]
fn level_keywords_map_to_volcanic_levels() {
    for (text, level) in [
        ("Level 1 (Potential for increased activity)", VolcanicAlertLevel::PotentialActivity),
        ("Level 2 (Do not approach the crater)", VolcanicAlertLevel::DoNotApproachTheCrater),
        ("Level 3 (Do not approach the volcano)", VolcanicAlertLevel::DoNotApproachTheVolcano),
        ("Level 4 (Prepare to evacuate)", VolcanicAlertLevel::PrepareToEvacuate),
        ("Level 5 (Evacuate)", VolcanicAlertLevel::Evacuate),
    ] {
        let classified = classify_alert(text).unwrap();
        assert_eq!(classified.kind, VolcanoKind::Volcano);
        assert_eq!(classified.alert, AlertLevel::Volcanic(level), "text {text:?}");
    }
}

#[test]
fn level_check_wins_over_other_keywords() {
    // Carries both "level" and "potential for increased activity"; the level
    // branch decides.
    let classified = classify_alert("Level 1 (Potential for increased activity)").unwrap();
    assert_eq!(
        classified.alert,
        AlertLevel::Volcanic(VolcanicAlertLevel::PotentialActivity)
    );
}

#[test]
fn level_without_digit_stays_unclassified() {
    assert_eq!(classify_alert("Alert level under review"), None);
}

#[test]
fn crater_warnings_pick_residential_qualifiers() {
    let near = classify_alert("Near-crater warning").unwrap();
    assert_eq!(
        near.alert,
        AlertLevel::NonVolcanic(NonVolcanicAlertLevel::NearCraterWarning)
    );

    let non_residential = classify_alert(
        "Crater warning covering non-residential areas near the crater",
    )
    .unwrap();
    assert_eq!(
        non_residential.alert,
        AlertLevel::NonVolcanic(NonVolcanicAlertLevel::NonResidentialWarning)
    );

    let residential = classify_alert("Crater warning extended to residential areas").unwrap();
    assert_eq!(
        residential.alert,
        AlertLevel::NonVolcanic(NonVolcanicAlertLevel::ResidentialWarning)
    );
}

#[test]
fn warning_without_crater_stays_unclassified() {
    assert_eq!(classify_alert("General warning"), None);
}

#[test]
fn sea_keywords_classify_as_submarine() {
    let classified = classify_alert("Warning in the sea area around the volcano").unwrap();
    assert_eq!(classified.kind, VolcanoKind::SubmarineVolcano);
    assert_eq!(
        classified.alert,
        AlertLevel::Submarine(SubmarineWarningLevel::VolcanicWarning)
    );
}

#[test]
fn potential_activity_without_level_classifies_as_non_volcanic() {
    let classified = classify_alert("Potential for increased activity").unwrap();
    assert_eq!(classified.kind, VolcanoKind::Volcano);
    assert_eq!(
        classified.alert,
        AlertLevel::NonVolcanic(NonVolcanicAlertLevel::PotentialActivity)
    );
}

#[test]
fn classification_is_case_insensitive_and_trims() {
    let classified = classify_alert("  LEVEL 2 (do not approach the crater)  ").unwrap();
    assert_eq!(
        classified.alert,
        AlertLevel::Volcanic(VolcanicAlertLevel::DoNotApproachTheCrater)
    );
}

#[test]
fn unknown_keyword_is_none_not_an_error() {
    assert_eq!(classify_alert("Forecast: calm"), None);
    assert_eq!(classify_alert(""), None);
}
