use chrono::{Datelike, Months, NaiveDate, Weekday};

use crate::models::DateOption;

fn weekday_abbrev(day: Weekday) -> &'static str {
    match day {
        Weekday::Sun => "Dom",
        Weekday::Mon => "Seg",
        Weekday::Tue => "Ter",
        Weekday::Wed => "Qua",
        Weekday::Thu => "Qui",
        Weekday::Fri => "Sex",
        Weekday::Sat => "Sáb",
    }
}

fn label_for(date: NaiveDate, today: NaiveDate) -> String {
    match (date - today).num_days() {
        0 => "Hoje".to_string(),
        1 => "Amanhã".to_string(),
        _ => format!("{}, {:02}/{:02}", weekday_abbrev(date.weekday()), date.day(), date.month()),
    }
}

/// Every day from `today` (inclusive) up to `today + months` (exclusive).
pub fn booking_window(today: NaiveDate, months: u32) -> Vec<DateOption> {
    let end = today.checked_add_months(Months::new(months)).unwrap_or(today);

    today
        .iter_days()
        .take_while(|day| *day < end)
        .map(|date| DateOption {
            label: label_for(date, today),
            value: date.format("%Y-%m-%d").to_string(),
            date,
        })
        .collect()
}
