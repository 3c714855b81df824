//! Roster parser tests: column mapping, time buckets, absence threshold.

use cronocat_core::{
    roster::{self, parse, parse_roster},
    types::{EffectiveTime, Skill, TimeSlot},
};

const HEADER: &str = "Asesor,Horario,Franja CAT,Presta,Variables,Tutor,S1,S2,S3,Target,\
Disca,Presta,Tutor,Meds,Auth,Cobranzas,Varios,Lun,Mar,Mie,Jue,Vie,Total";

/// A full row with five day columns. `total` goes in the last column.
fn row(name: &str, horario: &str, franja: &str, total: u32) -> String {
    let absent = total.min(5) as usize;
    let days: Vec<&str> = (0..5).map(|i| if i < absent { "1" } else { "0" }).collect();
    format!(
        "{name},{horario},{franja},x,,X,Tutor,Cobranzas,Varios,,1,2,3,4,5,6,7,{},{total}",
        days.join(",")
    )
}

fn csv(rows: &[String]) -> String {
    let mut text = String::from(HEADER);
    for r in rows {
        text.push('\n');
        text.push_str(r);
    }
    text
}

#[test]
fn columns_map_onto_record_fields() {
    let agents = parse(&csv(&[row("Gomez Ana", "9", "", 0)]));
    assert_eq!(agents.len(), 1);
    let a = &agents[0];

    assert_eq!(a.name, "Gomez Ana");
    assert_eq!(a.id, a.name);
    assert_eq!(a.schedule_time, "9");
    assert_eq!(a.real_time, "");
    assert_eq!(a.effective_time, EffectiveTime::Slot(TimeSlot::Nine));
    assert!(a.is_presta_qualified);
    assert!(a.is_tutor_qualified, "flag check must be case-insensitive");
    assert_eq!(a.weeks_history.weeks(), &["Tutor".to_string(), "Cobranzas".into(), "Varios".into()]);
    assert_eq!(a.weeks_history.most_recent(), "Varios");
    assert_eq!(a.target_week_fixed, None);

    assert_eq!(a.counters.discapacidad, 1);
    assert_eq!(a.counters.prestadores, 2);
    assert_eq!(a.counters.tutor, 3);
    assert_eq!(a.counters.medicamentos, 4);
    assert_eq!(a.counters.autorizaciones, 5);
    assert_eq!(a.counters.cobranzas, 6);
    assert_eq!(a.counters.varios, 7);
    assert_eq!(a.counters.for_skill(&Skill::Tutor), 3);

    assert_eq!(a.absence_marks.len(), 5);
    assert_eq!(a.total_absences, 0);
    assert!(!a.is_fully_absent);
    assert_eq!(a.assigned_skill, None);
    assert_eq!(a.assignment_reason, None);
}

#[test]
fn real_time_wins_over_schedule_time() {
    let agents = parse(&csv(&[
        row("Uno", "9", "15 a 20", 0),
        row("Dos", "10:00", "", 0),
        row("Tres", "9", "9:30", 0),
    ]));
    assert_eq!(agents[0].effective_time, EffectiveTime::Slot(TimeSlot::Fifteen));
    assert_eq!(agents[1].effective_time, EffectiveTime::Slot(TimeSlot::Ten));
    assert_eq!(agents[2].effective_time, EffectiveTime::Slot(TimeSlot::NineThirty));
}

#[test]
fn time_bucket_literal_cases() {
    assert_eq!(roster::normalize_time("9"), EffectiveTime::Slot(TimeSlot::Nine));
    assert_eq!(roster::normalize_time("9:30"), EffectiveTime::Slot(TimeSlot::NineThirty));
    assert_eq!(roster::normalize_time("15 a 20"), EffectiveTime::Slot(TimeSlot::Fifteen));
    assert_eq!(roster::normalize_time("14:05"), EffectiveTime::Slot(TimeSlot::Fourteen));
    assert_eq!(roster::normalize_time("11:45"), EffectiveTime::Freeform("11:45".into()));
}

#[test]
fn variable_is_lowercased_and_target_kept() {
    let line = "Lopez Juan,14,,,Comercial Senior,,,,,Tutor,0,0,0,0,0,0,0,0";
    let agents = parse(&csv(&[line.to_string()]));
    assert_eq!(agents.len(), 1);
    assert_eq!(agents[0].variable, "comercial senior");
    assert_eq!(agents[0].target_week_fixed.as_deref(), Some("Tutor"));
    assert!(!agents[0].is_presta_qualified);
    assert!(!agents[0].is_tutor_qualified);
}

#[test]
fn short_rows_are_skipped_and_counted() {
    let text = csv(&[
        "Solo,9,,x".to_string(),
        row("Valido", "9", "", 0),
        "Otro,9,,x,,x,,,,,1,2,3,4".to_string(), // 14 columns
    ]);
    let parsed = parse_roster(&text);
    assert_eq!(parsed.agents.len(), 1);
    assert_eq!(parsed.agents[0].name, "Valido");
    assert_eq!(parsed.skipped_rows, 2);
}

#[test]
fn fifteen_columns_is_enough() {
    // Last column doubles as the total-absences field.
    let line = "Corto,10,,x,,,,,,,1,2,3,4,2";
    let agents = parse(&csv(&[line.to_string()]));
    assert_eq!(agents.len(), 1);
    let a = &agents[0];
    assert_eq!(a.counters.autorizaciones, 2);
    assert_eq!(a.counters.cobranzas, 0);
    assert_eq!(a.counters.varios, 0);
    assert_eq!(a.total_absences, 2);
    assert!(a.absence_marks.is_empty());
    assert!(!a.is_fully_absent, "default week is 5 days");
}

#[test]
fn header_only_or_empty_input_gives_empty_roster() {
    assert!(parse("").is_empty());
    assert!(parse(HEADER).is_empty());
    assert!(parse("\n\n   \n").is_empty());
}

#[test]
fn blank_lines_and_crlf_are_ignored() {
    let text = format!("{HEADER}\r\n\r\n{}\r\n   \r\n{}\r\n", row("A", "9", "", 0), row("B", "10", "", 0));
    let agents = parse(&text);
    assert_eq!(agents.len(), 2);
    assert_eq!(agents[1].effective_time, EffectiveTime::Slot(TimeSlot::Ten));
}

#[test]
fn non_numeric_fields_default_to_zero() {
    let line = "Raro,9,,,,,,,,,uno,,3x,-,?,,,0,0,0,0,0,n/a";
    let agents = parse(&csv(&[line.to_string()]));
    let a = &agents[0];
    assert_eq!(a.counters.discapacidad, 0);
    assert_eq!(a.counters.prestadores, 0);
    assert_eq!(a.counters.tutor, 3);
    assert_eq!(a.counters.medicamentos, 0);
    assert_eq!(a.total_absences, 0);
}

#[test]
fn full_week_of_absences_is_fully_absent() {
    let agents = parse(&csv(&[row("Ausente", "9", "", 5), row("Parcial", "9", "", 4)]));
    assert!(agents[0].is_fully_absent);
    assert!(!agents[1].is_fully_absent);
}

#[test]
fn short_week_override() {
    // Three trailing columns: two day markers plus the total.
    let two_days = "Corta,9,,,,,,,,,0,0,0,0,0,0,0,1,1,2";
    // Four trailing columns: three day markers plus the total.
    let three_days_all = "Tres,9,,,,,,,,,0,0,0,0,0,0,0,1,1,1,3";
    let three_days_two = "Dos,9,,,,,,,,,0,0,0,0,0,0,0,1,1,0,2";
    let agents = parse(&csv(&[
        two_days.to_string(),
        three_days_all.to_string(),
        three_days_two.to_string(),
    ]));

    assert_eq!(agents[0].absence_marks.len(), 2);
    assert!(agents[0].is_fully_absent);
    assert!(agents[1].is_fully_absent);
    assert!(!agents[2].is_fully_absent);
}

#[test]
fn threshold_helper_matches_parser() {
    // 17 fixed columns, N day columns, 1 total column.
    assert!(roster::fully_absent(5, 17 + 5 + 1));
    assert!(!roster::fully_absent(4, 17 + 5 + 1));
    assert!(roster::fully_absent(3, 17 + 3 + 1));
    assert!(roster::fully_absent(3, 17 + 1 + 1));
    assert!(!roster::fully_absent(4, 15), "no day columns falls back to 5 days");
    assert!(roster::fully_absent(5, 15));
}
