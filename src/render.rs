//! Turning decided batches into webhook messages.

use calwatch_core::Event;
use calwatch_core::policy::NotificationBatch;
use calwatch_core::snapshot::DayEvents;

use crate::notify::{Embed, EmbedField, OutboundMessage};

const COLOR_SCHEDULE: u32 = 52479;
const COLOR_ADDED: u32 = 65280;
const COLOR_REMOVED: u32 = 16711680;

pub fn render_batch(
    batch: &NotificationBatch,
    mention: Option<&str>,
    username: Option<&str>,
) -> OutboundMessage {
    let (text, embeds) = match batch {
        NotificationBatch::Schedule { week_id, days } => (
            format!("\u{1F4CC} Schedule for week {week_id}:"),
            day_embeds(days, COLOR_SCHEDULE, ""),
        ),
        NotificationBatch::Added { week_id, days } => (
            format!("\u{1F4E3} Events added in week {week_id}:"),
            day_embeds(days, COLOR_ADDED, "Added "),
        ),
        NotificationBatch::Removed { week_id, days } => (
            format!("\u{274C} Events removed from week {week_id}:"),
            day_embeds(days, COLOR_REMOVED, "Removed "),
        ),
        NotificationBatch::NoEvents { week_id } => (
            format!("\u{2139}\u{FE0F} No events scheduled for week {week_id}."),
            vec![],
        ),
    };

    let content = match mention {
        Some(mention) => format!("{mention} {text}"),
        None => text,
    };

    OutboundMessage {
        content,
        username: username.map(String::from),
        embeds,
    }
}

// One embed per day, one field per event.
fn day_embeds(days: &DayEvents, color: u32, title_prefix: &str) -> Vec<Embed> {
    days.iter()
        .filter(|(_, events)| !events.is_empty())
        .map(|(date, events)| Embed {
            title: format!("{title_prefix}{}", date.format("%A %d %B %Y")),
            color,
            fields: events.iter().map(event_field).collect(),
        })
        .collect()
}

fn event_field(event: &Event) -> EmbedField {
    let mut value = format!(
        "{} to {}",
        event.start.format("%H:%M"),
        event.end.format("%H:%M")
    );
    if let Some(location) = &event.location {
        value.push('\n');
        value.push_str("in ");
        value.push_str(location);
    }

    EmbedField {
        name: event.summary.clone(),
        value,
        inline: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, NaiveDate};
    use std::collections::BTreeMap;

    fn event(summary: &str, start: &str, location: Option<&str>) -> Event {
        let start = DateTime::parse_from_rfc3339(start).unwrap();
        Event {
            summary: summary.to_string(),
            start,
            end: start + chrono::Duration::hours(2),
            location: location.map(String::from),
        }
    }

    fn days(events: Vec<Event>) -> DayEvents {
        let mut days: DayEvents = BTreeMap::new();
        for event in events {
            days.entry(event.day()).or_default().push(event);
        }
        days
    }

    #[test]
    fn added_batch_renders_day_embeds() {
        let batch = NotificationBatch::Added {
            week_id: 10,
            days: days(vec![event(
                "Maths",
                "2024-03-04T09:00:00+01:00",
                Some("Room 12"),
            )]),
        };

        let message = render_batch(&batch, None, None);
        assert!(message.content.contains("Events added in week 10"));
        assert_eq!(message.embeds.len(), 1);

        let embed = &message.embeds[0];
        assert_eq!(embed.title, "Added Monday 04 March 2024");
        assert_eq!(embed.color, COLOR_ADDED);
        assert_eq!(embed.fields[0].name, "Maths");
        assert_eq!(embed.fields[0].value, "09:00 to 11:00\nin Room 12");
    }

    #[test]
    fn location_less_events_render_without_a_location_line() {
        let batch = NotificationBatch::Removed {
            week_id: 10,
            days: days(vec![event("Sport", "2024-03-05T14:00:00+01:00", None)]),
        };

        let message = render_batch(&batch, None, None);
        assert_eq!(message.embeds[0].color, COLOR_REMOVED);
        assert_eq!(message.embeds[0].fields[0].value, "14:00 to 16:00");
    }

    #[test]
    fn no_events_batch_has_no_embeds() {
        let message = render_batch(&NotificationBatch::NoEvents { week_id: 10 }, None, None);
        assert!(message.content.contains("No events scheduled for week 10"));
        assert!(message.embeds.is_empty());
    }

    #[test]
    fn mention_and_username_are_applied() {
        let message = render_batch(
            &NotificationBatch::NoEvents { week_id: 10 },
            Some("@everyone"),
            Some("Calendar Bot"),
        );
        assert!(message.content.starts_with("@everyone "));
        assert_eq!(message.username.as_deref(), Some("Calendar Bot"));
    }

    #[test]
    fn empty_day_buckets_are_skipped() {
        let mut map = days(vec![event("Maths", "2024-03-04T09:00:00+01:00", None)]);
        map.insert(NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(), vec![]);

        let batch = NotificationBatch::Schedule {
            week_id: 10,
            days: map,
        };
        let message = render_batch(&batch, None, None);
        assert_eq!(message.embeds.len(), 1);
    }
}
