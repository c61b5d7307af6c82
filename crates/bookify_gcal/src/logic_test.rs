#[cfg(test)]
mod tests {
    use crate::logic::*;
    use crate::service::mock::{Failure, MockCalendarService};
    use bookify_common::services::ReminderMethod;
    use bookify_common::HttpStatusCode;
    use chrono::{Duration, TimeZone, Utc};

    const CALENDAR: &str = "team@group.calendar.google.com";

    fn at(hour: u32, minute: u32) -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, hour, minute, 0).unwrap()
    }

    fn booking(summary: &str, start: &str, end: &str) -> CreateBookingRequest {
        CreateBookingRequest {
            summary: Some(summary.to_string()),
            start_date_time_iso: Some(start.to_string()),
            end_date_time_iso: Some(end.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn probe_window_is_thirty_minutes() {
        let window = Slot::probe(at(10, 0));
        assert_eq!(window.start(), at(10, 0));
        assert_eq!(window.end(), at(10, 30));
    }

    #[test]
    fn slot_requires_end_after_start() {
        assert!(Slot::new(at(10, 0), at(10, 30)).is_ok());
        assert!(matches!(
            Slot::new(at(10, 0), at(10, 0)),
            Err(BookingError::Validation(_))
        ));
        assert!(Slot::new(at(11, 0), at(10, 0)).is_err());
    }

    #[test]
    fn availability_query_expands_recurring_and_limits_to_one() {
        let query = availability_query(&Slot::probe(at(10, 0)));
        assert_eq!(query.time_min, at(10, 0));
        assert_eq!(query.time_max, at(10, 30));
        assert!(query.single_events);
        assert!(query.order_by_start_time);
        assert_eq!(query.max_results, Some(1));
    }

    #[test]
    fn check_request_without_start_is_a_validation_error() {
        let err = CheckAvailabilityRequest::default().validate().unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.public_message(), "Missing required field: startDateTimeISO");

        let blank = CheckAvailabilityRequest {
            start_date_time_iso: Some("  ".to_string()),
        };
        assert!(matches!(blank.validate(), Err(BookingError::Validation(_))));
    }

    #[test]
    fn check_request_with_garbage_timestamp_is_rejected() {
        let request = CheckAvailabilityRequest {
            start_date_time_iso: Some("next tuesday".to_string()),
        };
        let err = request.validate().unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert!(err.public_message().contains("startDateTimeISO"));
    }

    #[test]
    fn offsets_are_normalized_to_utc() {
        let request = CheckAvailabilityRequest {
            start_date_time_iso: Some("2024-06-01T12:00:00+02:00".to_string()),
        };
        assert_eq!(request.validate().unwrap(), at(10, 0));
    }

    #[test]
    fn create_request_lists_every_missing_field() {
        let err = CreateBookingRequest::default().validate().unwrap_err();
        assert_eq!(
            err.public_message(),
            "Missing required fields: summary, startDateTimeISO, endDateTimeISO"
        );

        let err = CreateBookingRequest {
            summary: Some("Consult".to_string()),
            start_date_time_iso: Some("2024-06-01T10:00:00Z".to_string()),
            ..Default::default()
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.public_message(), "Missing required fields: endDateTimeISO");
    }

    #[test]
    fn create_request_keeps_optional_fields() {
        let mut request = booking("Consult", "2024-06-01T10:00:00Z", "2024-06-01T10:30:00Z");
        request.description = Some("Intro call".to_string());
        request.email = Some("client@example.com".to_string());

        let validated = request.validate().unwrap();
        assert_eq!(validated.summary, "Consult");
        assert_eq!(validated.slot, Slot::new(at(10, 0), at(10, 30)).unwrap());
        assert_eq!(validated.description.as_deref(), Some("Intro call"));
        assert_eq!(validated.contact_email.as_deref(), Some("client@example.com"));
    }

    #[test]
    fn summary_and_description_are_kept_as_sent() {
        let mut request = booking(
            "  Consult with Anna ",
            "2024-06-01T10:00:00Z",
            "2024-06-01T10:30:00Z",
        );
        request.description = Some("Line one\n  indented ".to_string());

        let validated = request.validate().unwrap();
        assert_eq!(validated.summary, "  Consult with Anna ");
        assert_eq!(validated.description.as_deref(), Some("Line one\n  indented "));

        let blank = booking("   ", "2024-06-01T10:00:00Z", "2024-06-01T10:30:00Z");
        assert_eq!(
            blank.validate().unwrap_err().public_message(),
            "Missing required fields: summary"
        );
    }

    #[test]
    fn booking_event_uses_fixed_reminders_and_zone() {
        let validated = booking("Consult", "2024-06-01T10:00:00Z", "2024-06-01T10:30:00Z")
            .validate()
            .unwrap();
        let event = booking_event(&validated, chrono_tz::Europe::Zurich);

        assert_eq!(event.time_zone, "Europe/Zurich");
        assert!(!event.use_default_reminders);
        assert_eq!(event.reminder_overrides.len(), 2);
        assert_eq!(event.reminder_overrides[0].method, ReminderMethod::Email);
        assert_eq!(event.reminder_overrides[0].minutes_before, 1440);
        assert_eq!(event.reminder_overrides[1].method, ReminderMethod::Popup);
        assert_eq!(event.reminder_overrides[1].minutes_before, 10);
    }

    #[tokio::test]
    async fn free_window_is_available() {
        let service = MockCalendarService::new().with_event(CALENDAR, "Earlier", at(9, 0), at(10, 0));

        let available = check_availability(&service, CALENDAR, at(10, 0)).await.unwrap();
        assert!(available, "an event ending at the window start does not overlap");

        let (calendar_id, query) = service.queries().pop().unwrap();
        assert_eq!(calendar_id, CALENDAR);
        assert_eq!(query.time_max - query.time_min, Duration::minutes(30));
    }

    #[tokio::test]
    async fn overlapping_event_makes_window_unavailable() {
        let service =
            MockCalendarService::new().with_event(CALENDAR, "Standup", at(10, 15), at(10, 45));

        let available = check_availability(&service, CALENDAR, at(10, 0)).await.unwrap();
        assert!(!available);
    }

    #[tokio::test]
    async fn event_starting_at_window_end_does_not_block() {
        let service =
            MockCalendarService::new().with_event(CALENDAR, "Lunch", at(10, 30), at(11, 30));

        assert!(check_availability(&service, CALENDAR, at(10, 0)).await.unwrap());
    }

    #[tokio::test]
    async fn remote_failure_during_check_is_a_500() {
        let service = MockCalendarService::new().failing_with(Failure::Api);

        let err = check_availability(&service, CALENDAR, at(10, 0)).await.unwrap_err();
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.public_message(), "Failed to check availability.");
    }

    #[tokio::test]
    async fn create_booking_inserts_event_without_attendees() {
        let service = MockCalendarService::new();
        let mut request = booking("Consult", "2024-06-01T10:00:00Z", "2024-06-01T10:30:00Z");
        request.email = Some("client@example.com".to_string());

        let result = create_booking(
            &service,
            CALENDAR,
            request.validate().unwrap(),
            chrono_tz::Europe::Zurich,
        )
        .await
        .unwrap();

        assert!(result.event_id.is_some());
        assert!(result.html_link.is_some());

        let created = service.created();
        assert_eq!(created.len(), 1);
        let (calendar_id, event) = &created[0];
        assert_eq!(calendar_id, CALENDAR);
        assert_eq!(event.summary, "Consult");
        assert_eq!(event.start_time, at(10, 0));
        assert_eq!(event.end_time, at(10, 30));
        let google = crate::service::to_google_event(event);
        assert!(google.attendees.is_none());
    }

    #[tokio::test]
    async fn remote_conflict_becomes_slot_taken() {
        let service = MockCalendarService::new().failing_with(Failure::Conflict);
        let request = booking("Consult", "2024-06-01T10:00:00Z", "2024-06-01T10:30:00Z");

        let err = create_booking(
            &service,
            CALENDAR,
            request.validate().unwrap(),
            chrono_tz::Europe::Zurich,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, BookingError::SlotTaken));
        assert_eq!(err.status_code(), 409);
        assert_eq!(err.public_message(), "This time slot is already booked.");
    }

    #[tokio::test]
    async fn other_remote_failure_on_create_is_generic() {
        let service = MockCalendarService::new().failing_with(Failure::Api);
        let request = booking("Consult", "2024-06-01T10:00:00Z", "2024-06-01T10:30:00Z");

        let err = create_booking(
            &service,
            CALENDAR,
            request.validate().unwrap(),
            chrono_tz::Europe::Zurich,
        )
        .await
        .unwrap_err();

        assert_eq!(err.status_code(), 500);
        assert_eq!(err.public_message(), "Failed to create booking.");
        assert!(err.to_string().contains("create booking"));
    }
}
