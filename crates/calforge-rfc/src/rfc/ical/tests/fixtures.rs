//! Calendar fixtures shared by the document and round-trip tests.

/// One event with the smallest set of fields that generates.
pub const MINIMAL_CALENDAR_JSON: &str = r#"{
    "events": [{
        "id": "foo",
        "start": "2020-08-13T00:00:00-05:00",
        "stamp": "2020-08-13T00:00:00-05:00",
        "summary": "Example Event"
    }]
}"#;

pub const MINIMAL_CALENDAR_ICS: &str = "\
BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:-//sebbo.net//ical-generator//EN\r\n\
BEGIN:VEVENT\r\n\
UID:foo\r\n\
SEQUENCE:0\r\n\
DTSTAMP:20200813T050000Z\r\n\
DTSTART:20200813T050000Z\r\n\
SUMMARY:Example Event\r\n\
END:VEVENT\r\n\
END:VCALENDAR";

/// Calendar-level settings plus an event using most entity features.
pub const FULL_CALENDAR_JSON: &str = r##"{
    "prodId": {"company": "example.com", "product": "planner", "language": "de"},
    "method": "REQUEST",
    "name": "Team Calendar",
    "description": "Everything the team does; more or less",
    "timezone": "Europe/Berlin",
    "source": "https://example.com/team.ics",
    "url": "https://example.com/team",
    "scale": "gregorian",
    "ttl": 86400,
    "x": [{"key": "X-CALENDAR-COLOR", "value": "#ff0000"}],
    "events": [
        {
            "id": "planning-q3",
            "sequence": 3,
            "stamp": "2021-06-01T08:00:00Z",
            "start": "2021-07-01T10:00:00+02:00",
            "end": "2021-07-01T11:30:00+02:00",
            "created": "2021-05-01T08:00:00Z",
            "lastModified": "2021-05-20T08:00:00Z",
            "timezone": "Europe/Berlin",
            "summary": "Quarterly planning, Q3",
            "repeating": {
                "freq": "MONTHLY",
                "count": 3,
                "interval": 1,
                "byDay": ["TH"],
                "bySetPos": 1,
                "exclude": ["2021-08-05T10:00:00+02:00"]
            },
            "location": {
                "title": "Main Office",
                "address": "Hauptstraße 1, 10115 Berlin",
                "radius": 75.5,
                "geo": {"lat": 52.53, "lon": 13.38}
            },
            "description": {"plain": "Agenda:\n1. Review\n2. Goals", "html": "<ol><li>Review</li><li>Goals</li></ol>"},
            "organizer": {"name": "Olga Organizer", "email": "olga@example.com", "sentBy": "assistant@example.com"},
            "attendees": [
                {"name": "Anna", "email": "anna@example.com", "rsvp": true, "status": "ACCEPTED", "type": "INDIVIDUAL"},
                {"name": "Ben", "email": "ben@example.com", "role": "OPT-PARTICIPANT", "delegatedTo": "cara@example.com"},
                {"name": "Cara", "email": "cara@example.com", "delegatedFrom": "ben@example.com"},
                {"name": "Room 4.12", "email": "room412@example.com", "mailto": "rooms@example.com", "type": "ROOM",
                 "x": {"X-CAPACITY": "12"}}
            ],
            "alarms": [
                {"type": "display", "trigger": -900, "description": "Planning starts soon"},
                {"type": "audio", "trigger": 300, "repeat": {"times": 2, "interval": 60}},
                {"type": "email", "trigger": "2021-07-01T07:00:00Z", "summary": "Planning today",
                 "description": "Bring your numbers", "relatesTo": "START"}
            ],
            "categories": [{"name": "Planning"}, {"name": "Management, internal"}],
            "attachments": ["https://example.com/agenda.pdf"],
            "url": "https://example.com/events/planning-q3",
            "status": "CONFIRMED",
            "busystatus": "BUSY",
            "priority": 5,
            "class": "CONFIDENTIAL",
            "transparency": "OPAQUE",
            "x": {"X-MEETING-ROOM": "4.12", "X-AGENDA-VERSION": "2"}
        },
        {
            "id": "company-holiday",
            "stamp": "2021-06-01T08:00:00Z",
            "start": "2021-10-03",
            "end": "2021-10-04",
            "allDay": true,
            "summary": "Day of German Unity",
            "repeating": {"freq": "YEARLY", "exclude": ["2022-10-03"]},
            "busystatus": "OOF",
            "transparency": "TRANSPARENT"
        },
        {
            "id": "floating-lunch",
            "stamp": "2021-06-01T08:00:00Z",
            "start": "2021-07-02T12:00:00",
            "end": "2021-07-02T13:00:00",
            "floating": true,
            "summary": "Lunch",
            "repeating": "FREQ=WEEKLY;BYDAY=FR;UNTIL=20211231T120000",
            "location": "Canteen"
        }
    ]
}"##;

/// An event whose recurrence comes from an external `RRULE` block.
pub const RAW_RULE_CALENDAR_JSON: &str = r#"{
    "events": [{
        "id": "raw",
        "stamp": "2021-01-01T00:00:00Z",
        "start": "2021-01-04T09:00:00Z",
        "summary": "Standup",
        "repeating": "DTSTART:20210104T090000Z\nRRULE:FREQ=DAILY;BYDAY=MO,TU,WE,TH,FR\nEXDATE:20210105T090000Z"
    }]
}"#;
