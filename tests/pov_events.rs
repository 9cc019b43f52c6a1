use poker_round::config::TimeBank;
use poker_round::round::{pov_seat, Audience, Event, Round, RoundPov, SeatState};

fn strings(events: Vec<Event>) -> Vec<String> {
    events.iter().map(ToString::to_string).collect()
}

#[test]
fn seat_numbers_rotate_to_the_observer() {
    assert_eq!(pov_seat(3, 2, 1), 3);
    assert_eq!(pov_seat(3, 2, 2), 1);
    assert_eq!(pov_seat(3, 2, 3), 2);
    for pov in 1..=9 {
        assert_eq!(pov_seat(9, pov, pov), 1);
    }
}

#[test]
fn waiting_table_rotates_for_each_observer() {
    let r = Round::new(10, 1, &[100, 200, 300]).unwrap();
    assert_eq!(r.pov(2).unwrap().to_string(), "10-20 3 | d200 / d300 / d100 $!");
    assert_eq!(r.pov(3).unwrap().to_string(), "10-20 2 | d300 / d100 / d200 $!");
    assert!(r.pov(0).is_err());
    assert!(r.pov(4).is_err());
}

#[test_log::test]
fn hole_cards_only_reach_their_owner() {
    let mut r = Round::new(10, 1, &[100, 200, 300]).unwrap();
    let ev = r.act("deal AhAc2h2c3h3c4h5h6h7h8h").unwrap();
    assert_eq!(r.pov(1).unwrap().to_string(), "10-20 1 | @100 AhAc / i190 sb-0-0-10 / i280 bb-0-0-20 $!");
    assert_eq!(r.pov(2).unwrap().to_string(), "10-20 3 | i190 2h2c sb-0-0-10 / i280 bb-0-0-20 / @100 $!");

    assert_eq!(
        strings(ev.pov(2)),
        ["c 3 @", "c 1 i", "c 2 i", "a 1 sb-0-0-10", "s 1 10", "a 2 bb-0-0-20", "s 2 20", "h 1 2h2c"]
    );
    for seat in 1..=3 {
        let hands: Vec<Event> = ev.pov(seat).into_iter().filter(|e| matches!(e, Event::Hand { .. })).collect();
        assert_eq!(hands.len(), 1, "seat {seat}");
    }
    let private = ev.entries().iter().filter(|(a, _)| matches!(a, Audience::Only(_))).count();
    assert_eq!(private, 3);
    assert_eq!(ev.log().len(), ev.len());
}

#[test]
fn pov_snapshot_reveals_only_dealt_streets() {
    let mut r = Round::new(10, 1, &[100, 200, 300]).unwrap();
    for a in ["deal AhAc2h2c3h3c4h5h6h7h8h", "call 20", "call 10", "check", "phase"] {
        r.act(a).unwrap();
    }
    assert_eq!(r.pov(1).unwrap().to_string(), "10-20 1 | i80 AhAc / i180 / @280 $ 60-123 !4h5h6h");
    for a in ["check", "check", "check", "phase"] {
        r.act(a).unwrap();
    }
    let view: RoundPov = r.pov(3).unwrap();
    assert_eq!(view.middle.len(), 4);
    assert_eq!(view.seats[0].hand.map(|h| h.to_string()).as_deref(), Some("3h3c"));
    assert!(view.seats[1..].iter().all(|s| s.hand.is_none()));
    assert_eq!(view.to_string().parse::<RoundPov>().unwrap(), view);
}

#[test]
fn showdown_hands_are_public() {
    let r: Round = "10-20 1 | s80 AhAc / s180 2h2c / f280 3h3c $ 60-12 !r4d5s9hTcJd".parse().unwrap();
    let view = r.pov(3).unwrap();
    assert_eq!(view.to_string(), "10-20 2 | f280 3h3c / s80 AhAc / s180 2h2c $ 60-12 !4d5s9hTcJd");
    assert!(view.seats.iter().any(|s| s.state == SeatState::Showdown));
}

#[test]
fn time_to_act_grows_with_each_street() {
    let mut r = Round::new(10, 1, &[100, 200, 300]).unwrap();
    let ev = r.act("deal AhAc2h2c3h3c4h5h6h7h8h").unwrap();
    assert_eq!(ev.time_left(), Some(13_000));
    r.act("call 20").unwrap();
    r.act("call 10").unwrap();
    let ev = r.act("check").unwrap();
    assert_eq!(ev.time_left(), None);

    let ev = r.act("phase").unwrap();
    assert_eq!(ev.time_left(), Some(15_000));
    for _ in 0..3 {
        r.act("check").unwrap();
    }
    let ev = r.act("phase").unwrap();
    assert_eq!(ev.time_left(), Some(16_000));
    for _ in 0..3 {
        r.act("check").unwrap();
    }
    let ev = r.act("phase").unwrap();
    assert_eq!(ev.time_left(), Some(17_000));

    let slow = TimeBank { base_ms: 30_000, ..TimeBank::default() };
    assert_eq!(ev.time_left_with(&slow), Some(34_000));
}

#[test]
fn all_in_runout_hands_no_clock() {
    let mut r: Round = "85-170 2 | i3960 AdTd raise-680-170-170 / @170 4hKh call-0-850 $!p6dTc4c9c7d".parse().unwrap();
    r.act("raise 170-0").unwrap();
    let ev = r.act("phase").unwrap();
    assert_eq!(ev.time_left(), None);
    assert_eq!(strings(ev.pov(2)).iter().filter(|e| e.starts_with("h ")).count(), 1);
    assert!(strings(ev.pov(2)).contains(&"h 2 AdTd".to_string()));
}

#[test]
fn fold_to_a_second_all_in_still_deals_the_river() {
    let mut r: Round = "10-20 1 | a0 AhAc / @100 2h2c / i100 3h3c $ 0-23side 90-123 !t4d5d6s7c9h".parse().unwrap();
    r.act("raise 0-100").unwrap();
    r.act("fold").unwrap();
    let ev = r.act("phase").unwrap();
    assert_eq!(
        strings(ev.log()),
        ["p 2 100", "a 1", "a 2", "a 3", "r 9h", "h 1 AhAc", "h 2 2h2c", "c 1 s", "c 2 s"]
    );
    assert_eq!(strings(ev.pov(1)), ["p 2 100", "a 1", "a 2", "a 3", "r 9h", "h 2 2h2c", "c 1 s", "c 2 s"]);
    assert_eq!(r.to_string(), "10-20 1 | s0 AhAc / s0 2h2c / f100 3h3c $ 100-2side 90-12 !t4d5d6s7c9h");
}

#[test]
fn events_decode_from_their_text() {
    for s in ["c 1 @", "a 2 sb-0-0-10", "s 1 40", "f 4h5h6h", "t 7h", "r 8h", "h 2 2h2c", "p 3 20", "v 1 20", "C", "S 1 20", "o 2"] {
        let e: Event = s.parse().unwrap();
        assert_eq!(e.to_string(), s);
    }
    assert!("c 1".parse::<Event>().is_err());
    assert!("z 1 2".parse::<Event>().is_err());
}
