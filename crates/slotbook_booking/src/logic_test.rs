#[cfg(test)]
mod tests {
    use crate::logic::{
        available_slots, build_meeting_event, confirmation_email, contact_email, day_bounds,
        format_slot_hour, long_date, meeting_description, parse_display_time, slot_is_free,
        validate_booking, BookingError, BookingPolicy, CreateMeetingRequest, SendEmailRequest,
    };
    use chrono::{NaiveDate, TimeZone, Utc, Weekday};
    use chrono_tz::Tz;
    use slotbook_common::services::BusyInterval;
    use slotbook_config::BookingConfig;

    fn reference_policy() -> BookingPolicy {
        // Fri/Sat blocked, 8-14 and 19-22, UTC
        BookingPolicy::from_config(&BookingConfig::default())
    }

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
    }

    fn friday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 6).unwrap()
    }

    fn busy(start_hour: u32, start_min: u32, end_hour: u32, end_min: u32) -> BusyInterval {
        BusyInterval {
            start: Utc
                .with_ymd_and_hms(2025, 6, 2, start_hour, start_min, 0)
                .unwrap(),
            end: Utc
                .with_ymd_and_hms(2025, 6, 2, end_hour, end_min, 0)
                .unwrap(),
        }
    }

    fn booking_request(date: &str, time: &str) -> CreateMeetingRequest {
        CreateMeetingRequest {
            name: "Ada Client".to_string(),
            email: "ada@example.com".to_string(),
            date: date.to_string(),
            time: time.to_string(),
            message: None,
        }
    }

    // --- Display formatting ---

    #[test]
    fn format_slot_hour_fixed_points() {
        assert_eq!(format_slot_hour(0), "12:00 AM");
        assert_eq!(format_slot_hour(9), "9:00 AM");
        assert_eq!(format_slot_hour(12), "12:00 PM");
        assert_eq!(format_slot_hour(13), "1:00 PM");
        assert_eq!(format_slot_hour(23), "11:00 PM");
    }

    #[test]
    fn long_date_formats_without_leading_zero() {
        assert_eq!(long_date(monday()), "Monday, 2 June 2025");
        assert_eq!(
            long_date(NaiveDate::from_ymd_opt(2025, 12, 25).unwrap()),
            "Thursday, 25 December 2025"
        );
    }

    // --- Display-time parsing ---

    #[test]
    fn parse_display_time_converts_to_24_hour() {
        assert_eq!(parse_display_time("2:00 PM").unwrap(), (14, 0));
        assert_eq!(parse_display_time("12:00 AM").unwrap(), (0, 0));
        assert_eq!(parse_display_time("12:00 PM").unwrap(), (12, 0));
        assert_eq!(parse_display_time("9:30 am").unwrap(), (9, 30));
        assert_eq!(parse_display_time("11:45 pm").unwrap(), (23, 45));
        // the separator whitespace is optional
        assert_eq!(parse_display_time("7:00PM").unwrap(), (19, 0));
    }

    #[test]
    fn parse_display_time_rejects_malformed_input() {
        for input in ["", "2 PM", "2:00", "14:00 PM", "2:0 PM", "2:000 PM", "a:00 PM"] {
            assert!(
                matches!(parse_display_time(input), Err(BookingError::InvalidFormat)),
                "expected InvalidFormat for {:?}",
                input
            );
        }
    }

    // --- Slot computation ---

    #[test]
    fn all_slots_available_when_calendar_is_empty() {
        let slots = available_slots(&reference_policy(), monday(), &[]);
        assert_eq!(
            slots,
            vec![
                "8:00 AM", "9:00 AM", "10:00 AM", "11:00 AM", "12:00 PM", "1:00 PM", "7:00 PM",
                "8:00 PM", "9:00 PM"
            ]
        );
    }

    #[test]
    fn overlapping_event_excludes_its_slot() {
        let slots = available_slots(&reference_policy(), monday(), &[busy(10, 0, 11, 0)]);
        assert!(!slots.contains(&"10:00 AM".to_string()));
        assert_eq!(slots.len(), 8);
    }

    #[test]
    fn event_spanning_two_slots_excludes_both() {
        let slots = available_slots(&reference_policy(), monday(), &[busy(10, 30, 11, 30)]);
        assert!(!slots.contains(&"10:00 AM".to_string()));
        assert!(!slots.contains(&"11:00 AM".to_string()));
        assert_eq!(slots.len(), 7);
    }

    #[test]
    fn touching_intervals_do_not_conflict() {
        // Half-open overlap: an event ending exactly at a slot start leaves
        // that slot free.
        let slots = available_slots(&reference_policy(), monday(), &[busy(9, 0, 10, 0)]);
        assert!(!slots.contains(&"9:00 AM".to_string()));
        assert!(slots.contains(&"10:00 AM".to_string()));
        assert!(slots.contains(&"8:00 AM".to_string()));
    }

    #[test]
    fn slots_are_chronological_morning_then_evening() {
        let policy = reference_policy();
        let slots = available_slots(&policy, monday(), &[]);
        let hours: Vec<u32> = policy.slot_hours().collect();
        assert_eq!(hours, vec![8, 9, 10, 11, 12, 13, 19, 20, 21]);
        assert_eq!(slots.len(), hours.len());
        assert!(hours.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn slot_is_free_uses_strict_half_open_test() {
        let slot_start = Utc.with_ymd_and_hms(2025, 6, 2, 10, 0, 0).unwrap();
        let slot_end = Utc.with_ymd_and_hms(2025, 6, 2, 11, 0, 0).unwrap();
        assert!(slot_is_free(slot_start, slot_end, &[busy(11, 0, 12, 0)]));
        assert!(slot_is_free(slot_start, slot_end, &[busy(9, 0, 10, 0)]));
        assert!(!slot_is_free(slot_start, slot_end, &[busy(10, 59, 12, 0)]));
        assert!(!slot_is_free(slot_start, slot_end, &[busy(9, 0, 10, 1)]));
    }

    #[test]
    fn day_bounds_cover_the_local_day() {
        let (start, end) = day_bounds(monday(), Tz::UTC).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 6, 2, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2025, 6, 3, 0, 0, 0).unwrap());

        // In a zone east of UTC the same civil day starts earlier in UTC.
        let (start, _) = day_bounds(monday(), Tz::Asia__Jerusalem).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 6, 1, 21, 0, 0).unwrap());
    }

    // --- Policy ---

    #[test]
    fn reference_policy_blocks_friday_and_saturday() {
        let policy = reference_policy();
        assert!(policy.is_blocked(Weekday::Fri));
        assert!(policy.is_blocked(Weekday::Sat));
        assert!(!policy.is_blocked(Weekday::Sun));
        assert_eq!(
            policy.blocked_day_message(),
            "Bookings are not available on Friday or Saturday"
        );
    }

    // --- Booking validation ---

    #[test]
    fn missing_fields_are_rejected() {
        let policy = reference_policy();
        for field in ["name", "email", "date", "time"] {
            let mut request = booking_request("2025-06-02", "2:00 PM");
            match field {
                "name" => request.name = "  ".to_string(),
                "email" => request.email = String::new(),
                "date" => request.date = String::new(),
                _ => request.time = String::new(),
            }
            assert!(
                matches!(
                    validate_booking(&policy, &request),
                    Err(BookingError::MissingField)
                ),
                "expected MissingField when {} is empty",
                field
            );
        }
    }

    #[test]
    fn unparseable_date_is_invalid_input() {
        let request = booking_request("02/06/2025", "2:00 PM");
        assert!(matches!(
            validate_booking(&reference_policy(), &request),
            Err(BookingError::InvalidInput)
        ));
    }

    #[test]
    fn blocked_weekday_is_rejected_before_time_parsing() {
        // Even a malformed time loses to the blocked-day check.
        let request = booking_request("2025-06-06", "not a time");
        match validate_booking(&reference_policy(), &request) {
            Err(BookingError::UnavailableDay(message)) => {
                assert_eq!(message, "Bookings are not available on Friday or Saturday");
            }
            other => panic!("expected UnavailableDay, got {:?}", other),
        }
        assert_eq!(friday().format("%A").to_string(), "Friday");
    }

    #[test]
    fn booking_resolves_slot_instants() {
        let booking =
            validate_booking(&reference_policy(), &booking_request("2025-06-02", "2:00 PM"))
                .unwrap();
        assert_eq!(
            booking.start,
            Utc.with_ymd_and_hms(2025, 6, 2, 14, 0, 0).unwrap()
        );
        assert_eq!(
            booking.end,
            Utc.with_ymd_and_hms(2025, 6, 2, 15, 0, 0).unwrap()
        );

        let midnight =
            validate_booking(&reference_policy(), &booking_request("2025-06-02", "12:00 AM"))
                .unwrap();
        assert_eq!(
            midnight.start,
            Utc.with_ymd_and_hms(2025, 6, 2, 0, 0, 0).unwrap()
        );
    }

    // --- Event & email construction ---

    #[test]
    fn meeting_event_carries_attendees_and_reminders() {
        let policy = reference_policy();
        let booking =
            validate_booking(&policy, &booking_request("2025-06-02", "2:00 PM")).unwrap();
        let event = build_meeting_event(&policy, Some("bookings@example.com"), &booking);

        assert_eq!(event.summary, "Discovery Meeting");
        assert_eq!(
            event.attendees,
            vec!["bookings@example.com", "ada@example.com"]
        );
        assert_eq!(event.end - event.start, chrono::Duration::hours(1));
        assert_eq!(event.reminders.len(), 2);
        assert_eq!(event.reminders[0].method, "email");
        assert_eq!(event.reminders[0].minutes, 24 * 60);
        assert_eq!(event.reminders[1].method, "popup");
        assert_eq!(event.reminders[1].minutes, 15);
    }

    #[test]
    fn description_embeds_requester_details() {
        let policy = reference_policy();
        let mut request = booking_request("2025-06-02", "2:00 PM");
        request.message = Some("Looking forward to it".to_string());
        let booking = validate_booking(&policy, &request).unwrap();
        let description = meeting_description(&policy.meeting_summary, &booking);

        assert!(description.starts_with("Discovery Meeting\n"));
        assert!(description.contains("- Name: Ada Client"));
        assert!(description.contains("- Email: ada@example.com"));
        assert!(description.contains("- Date: Monday, 2 June 2025"));
        assert!(description.contains("- Time: 2:00 PM"));
        assert!(description.contains("- Duration: 1 hour"));
        assert!(description.ends_with("Client Message:\nLooking forward to it"));
    }

    #[test]
    fn description_omits_message_block_when_absent() {
        let policy = reference_policy();
        let booking =
            validate_booking(&policy, &booking_request("2025-06-02", "2:00 PM")).unwrap();
        let description = meeting_description(&policy.meeting_summary, &booking);
        assert!(!description.contains("Client Message:"));
        assert!(description.ends_with("- Duration: 1 hour"));
    }

    #[test]
    fn confirmation_email_includes_link_when_available() {
        let policy = reference_policy();
        let booking =
            validate_booking(&policy, &booking_request("2025-06-02", "2:00 PM")).unwrap();

        let email = confirmation_email(
            &booking,
            Some("https://calendar.google.com/event?eid=abc"),
            "Bookings",
        );
        assert_eq!(email.to, "ada@example.com");
        assert_eq!(email.subject, "Meeting Confirmed - Consultation Scheduled");
        assert!(email.body.contains("Hi Ada Client,"));
        assert!(email.body.contains("- Date: Monday, 2 June 2025"));
        assert!(email.body.contains("- Time: 2:00 PM"));
        assert!(email
            .body
            .contains("Calendar Link: https://calendar.google.com/event?eid=abc"));
        assert!(email.body.ends_with("Best regards,\nBookings"));

        let without_link = confirmation_email(&booking, None, "Bookings");
        assert!(!without_link.body.contains("Calendar Link:"));
    }

    #[test]
    fn contact_email_is_reply_addressed_to_the_visitor() {
        let request = SendEmailRequest {
            name: "Ada Client".to_string(),
            email: "ada@example.com".to_string(),
            subject: "Question about services".to_string(),
            message: "Do you do weekends?".to_string(),
        };
        let email = contact_email("bookings@example.com", &request);
        assert_eq!(email.to, "bookings@example.com");
        assert_eq!(email.reply_to.as_deref(), Some("ada@example.com"));
        assert_eq!(email.subject, "Question about services");
        assert!(email.body.starts_with("Do you do weekends?"));
        assert!(email.body.contains("Ada Client <ada@example.com>"));
    }
}
