#[cfg(test)]
mod tests {
    use crate::logic::{
        availability_query, booking_event, CreateBookingRequest, Slot, EMAIL_REMINDER_MINUTES,
        POPUP_REMINDER_MINUTES, PROBE_WINDOW_MINUTES,
    };
    use crate::service::to_google_event;
    use chrono::{DateTime, Duration, SecondsFormat, Utc};
    use proptest::prelude::*;

    // 2000-01-01 .. 2100-01-01
    fn timestamp() -> impl Strategy<Value = DateTime<Utc>> {
        (946_684_800i64..4_102_444_800i64)
            .prop_map(|secs| DateTime::from_timestamp(secs, 0).unwrap())
    }

    proptest! {
        #[test]
        fn probe_window_always_spans_thirty_minutes(start in timestamp()) {
            let window = Slot::probe(start);
            prop_assert_eq!(window.start(), start);
            prop_assert_eq!(window.end() - window.start(), Duration::minutes(PROBE_WINDOW_MINUTES));

            let query = availability_query(&window);
            prop_assert!(query.single_events);
            prop_assert_eq!(query.max_results, Some(1));
        }

        #[test]
        fn slot_accepts_only_positive_lengths(start in timestamp(), offset in -86_400i64..86_400) {
            let end = start + Duration::seconds(offset);
            prop_assert_eq!(Slot::new(start, end).is_ok(), offset > 0);
        }

        #[test]
        fn booked_event_never_invites_the_contact(
            summary in "[A-Za-z][A-Za-z ]{0,40}",
            email in "[a-z]{1,10}@[a-z]{1,10}\\.com",
            start in timestamp(),
            minutes in 1i64..600,
        ) {
            let end = start + Duration::minutes(minutes);
            let request = CreateBookingRequest {
                summary: Some(summary),
                start_date_time_iso: Some(start.to_rfc3339_opts(SecondsFormat::Secs, true)),
                end_date_time_iso: Some(end.to_rfc3339_opts(SecondsFormat::Secs, true)),
                description: None,
                email: Some(email),
            };
            let booking = request.validate().unwrap();
            let event = booking_event(&booking, chrono_tz::Europe::Zurich);

            prop_assert_eq!(event.start_time, start);
            prop_assert_eq!(event.end_time, end);
            prop_assert!(!event.use_default_reminders);
            let minutes_before: Vec<i32> = event
                .reminder_overrides
                .iter()
                .map(|reminder| reminder.minutes_before)
                .collect();
            prop_assert_eq!(minutes_before, vec![EMAIL_REMINDER_MINUTES, POPUP_REMINDER_MINUTES]);
            prop_assert!(to_google_event(&event).attendees.is_none());
        }
    }
}
