use chrono::{TimeZone, Utc};

use geowatch_core::{AlertClassification, AlertLevel, VolcanicAlertLevel, VolcanoKind};

use super::*;

fn volcano(name: &str, id: Option<u32>) -> VolcanoRecord {
    VolcanoRecord {
        id,
        region: Some("kagoshima".to_owned()),
        area: Area::Kyushu,
        name: name.to_owned(),
        last_update: Utc.with_ymd_and_hms(2021, 2, 13, 14, 12, 0).unwrap(),
        location: "Kyushu".to_owned(),
        craters: Vec::new(),
        metadata: VolcanoMetadata {
            image_url: None,
            memo: None,
            page: format!("https://example.test/{name}.htm"),
        },
        alerts: None,
    }
}

fn level3(issued_to: &str, issued_at: Option<&str>) -> SourcedAlert {
    SourcedAlert {
        alert: VolcanoAlert {
            issued_to: issued_to.to_owned(),
            issued_at: issued_at.map(str::to_owned),
            classification: Some(AlertClassification {
                kind: VolcanoKind::Volcano,
                alert: AlertLevel::Volcanic(VolcanicAlertLevel::DoNotApproachTheVolcano),
            }),
            raw: RawAlert {
                keyword: "Level 3 (Do not approach the volcano)".to_owned(),
                code: Some("VOLC-03".to_owned()),
                info: None,
            },
        },
        stamped: Utc.with_ymd_and_hms(2021, 2, 14, 5, 0, 0).unwrap(),
    }
}

#[test]
fn first_alert_creates_a_history_stamped_with_the_map_time() {
    let mut records = vec![volcano("Sakurajima", Some(506))];
    let alert = level3("Sakurajima", Some("14 Feb 2021 05:00 JST"));

    let changed = merge_alerts(&mut records, &[alert.clone()]);

    assert_eq!(changed, vec![0]);
    let history = records[0].alerts.as_ref().unwrap();
    assert_eq!(history.entries.len(), 1);
    assert_eq!(history.last_update, alert.stamped);
}

#[test]
fn exact_name_match_wins_over_substring_match() {
    // "Usu" is a substring of "Usuzan"; the exact record must win.
    let mut records = vec![volcano("Usu", Some(1)), volcano("Usuzan", Some(2))];
    let changed = merge_alerts(&mut records, &[level3("Usuzan", None)]);

    assert_eq!(changed, vec![1]);
    assert!(records[0].alerts.is_none());
}

#[test]
fn superstring_issued_to_matches_by_containment() {
    let mut records = vec![volcano("Kuchinoerabujima", Some(509))];
    let changed = merge_alerts(
        &mut records,
        &[level3("Kuchinoerabujima (Shindake)", None)],
    );

    assert_eq!(changed, vec![0]);
}

#[test]
fn unmatched_alerts_are_skipped_without_error() {
    let mut records = vec![volcano("Sakurajima", Some(506))];
    let changed = merge_alerts(&mut records, &[level3("Unknown Volcano", None)]);

    assert!(changed.is_empty());
    assert!(records[0].alerts.is_none());
}

#[test]
fn duplicate_alert_with_different_issue_time_does_not_grow_history() {
    let mut records = vec![volcano("Sakurajima", Some(506))];
    let first = level3("Sakurajima", Some("14 Feb 2021 05:00 JST"));
    assert_eq!(merge_alerts(&mut records, &[first]), vec![0]);

    // Same content, later issue timestamp.
    let mut repeat = level3("Sakurajima", Some("15 Feb 2021 09:00 JST"));
    repeat.stamped = Utc.with_ymd_and_hms(2021, 2, 15, 9, 0, 0).unwrap();
    let changed = merge_alerts(&mut records, &[repeat]);

    assert!(changed.is_empty());
    let history = records[0].alerts.as_ref().unwrap();
    assert_eq!(history.entries.len(), 1);
    // The duplicate does not even advance the history timestamp.
    assert_eq!(
        history.last_update,
        Utc.with_ymd_and_hms(2021, 2, 14, 5, 0, 0).unwrap()
    );
}

#[test]
fn novel_alert_content_is_appended() {
    let mut records = vec![volcano("Sakurajima", Some(506))];
    merge_alerts(&mut records, &[level3("Sakurajima", None)]);

    let mut escalated = level3("Sakurajima", None);
    escalated.alert.raw.keyword = "Level 4 (Prepare to evacuate)".to_owned();
    escalated.alert.classification = Some(AlertClassification {
        kind: VolcanoKind::Volcano,
        alert: AlertLevel::Volcanic(VolcanicAlertLevel::PrepareToEvacuate),
    });
    let changed = merge_alerts(&mut records, &[escalated]);

    assert_eq!(changed, vec![0]);
    assert_eq!(records[0].alerts.as_ref().unwrap().entries.len(), 2);
}

#[test]
fn one_record_changed_once_even_with_multiple_new_alerts() {
    let mut records = vec![volcano("Sakurajima", Some(506))];

    let mut second = level3("Sakurajima", None);
    second.alert.raw.keyword = "Near-crater warning".to_owned();
    second.alert.classification = None;

    let changed = merge_alerts(&mut records, &[level3("Sakurajima", None), second]);

    assert_eq!(changed, vec![0]);
    assert_eq!(records[0].alerts.as_ref().unwrap().entries.len(), 2);
}
