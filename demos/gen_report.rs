//! Generate a report for a scripted clicker and a jittered human

use quiz_sentinel::{session_to_report, EventKind, InteractionEvent, QuizSession};

const START: i64 = 1_700_000_000_000;

fn session(id: &str, events: Vec<InteractionEvent>) -> String {
    let session = QuizSession {
        session_id: id.to_string(),
        score: 10,
        total_questions: 10,
        started_at_ms: START,
        submitted_at_ms: Some(START + 45_000),
        events,
    };
    serde_json::to_string(&session).unwrap_or_default()
}

fn main() {
    let bot: Vec<InteractionEvent> = (0..40)
        .map(|i| InteractionEvent::click(START + i * 250))
        .collect();

    let pattern = [
        (EventKind::Move, 100),
        (EventKind::Hover, 300),
        (EventKind::Click, 400),
        (EventKind::Move, 800),
        (EventKind::Scroll, 1_200),
        (EventKind::Click, 1_500),
        (EventKind::Hover, 2_500),
        (EventKind::Move, 3_000),
        (EventKind::Click, 4_100),
        (EventKind::Scroll, 4_600),
    ];
    let human: Vec<InteractionEvent> = (0..4)
        .flat_map(|cell| {
            pattern.iter().map(move |(kind, offset)| {
                InteractionEvent::new(*kind, START + cell * 5_000 + offset + cell * 37)
            })
        })
        .collect();

    for (id, events) in [("scripted", bot), ("natural", human)] {
        match session_to_report(session(id, events)) {
            Ok(report) => println!("{report}"),
            Err(e) => eprintln!("Error: {e:?}"),
        }
    }
}
