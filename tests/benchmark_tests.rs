//! Performance benchmarks for the protocol and session hot paths

use client::rendering::FpsCounter;
use client::session::Session;
use shared::{decode, encode, ClientMessage, MoveDirection, Role, ServerMessage};
use std::time::{Duration, Instant};

const PLAYING_FRAME: &str = concat!(
    r#"{"type":"game_state","seq":1,"state":{"state":"playing","gameTime":95,"#,
    r#""score1":3,"score2":1,"paddle1":{"x":50,"y":150,"width":10,"height":100},"#,
    r#""paddle2":{"x":940,"y":200,"width":10,"height":100},"#,
    r#""balls":[{"x":500,"y":300,"radius":10},{"x":120,"y":80,"radius":10},{"x":700,"y":350,"radius":10}]},"#,
    r#""config":{"fieldWidth":1000,"fieldHeight":600,"paddleWidth":10,"paddleHeight":100,"ballRadius":10}}"#
);

/// Benchmarks frame decoding, the per-message cost on the inbound path
#[test]
fn benchmark_frame_decoding() {
    let iterations = 50_000;
    let start = Instant::now();

    for _ in 0..iterations {
        let message = decode(PLAYING_FRAME).unwrap();
        assert!(matches!(message, ServerMessage::GameState { .. }));
    }

    let duration = start.elapsed();
    println!(
        "Frame decoding: {} iterations in {:?} ({:.2} µs/iter)",
        iterations,
        duration,
        duration.as_micros() as f64 / iterations as f64
    );

    // A 50 Hz broadcast leaves ample headroom; 50k decodes should be fast.
    assert!(duration.as_millis() < 5000);
}

/// Benchmarks move-frame encoding, the per-keypress cost on the outbound path
#[test]
fn benchmark_move_encoding() {
    let iterations = 100_000;
    let start = Instant::now();

    for i in 0..iterations {
        let frame = encode(&ClientMessage::Move {
            direction: MoveDirection::ArrowUp,
            role: Role::Player1,
            send_time: i,
        })
        .unwrap();
        assert!(!frame.is_empty());
    }

    let duration = start.elapsed();
    println!(
        "Move encoding: {} iterations in {:?} ({:.2} µs/iter)",
        iterations,
        duration,
        duration.as_micros() as f64 / iterations as f64
    );

    assert!(duration.as_millis() < 5000);
}

/// Benchmarks snapshot application through the session write path
#[test]
fn benchmark_session_apply() {
    let template = match decode(PLAYING_FRAME).unwrap() {
        ServerMessage::GameState { state, config, .. } => (state, config),
        other => panic!("wrong variant: {:?}", other),
    };

    let mut session = Session::new("bench");
    let iterations = 100_000u64;
    let start = Instant::now();

    for seq in 1..=iterations {
        let message = ServerMessage::GameState {
            seq,
            state: template.0.clone(),
            config: template.1,
        };
        session.apply(message, seq);
    }

    let duration = start.elapsed();
    println!(
        "Session apply: {} iterations in {:?} ({:.2} µs/iter)",
        iterations,
        duration,
        duration.as_micros() as f64 / iterations as f64
    );

    assert_eq!(session.ignored_frames(), 0);
    assert!(duration.as_millis() < 5000);
}

/// Benchmarks the frame-rate counter at a simulated high refresh rate
#[test]
fn benchmark_fps_counter() {
    let t0 = Instant::now();
    let mut counter = FpsCounter::new(t0);
    let iterations = 1_000_000u64;
    let start = Instant::now();

    for i in 0..iterations {
        counter.tick(t0 + Duration::from_micros(i * 100));
    }

    let duration = start.elapsed();
    println!(
        "FPS counter: {} ticks in {:?} ({:.2} ns/iter)",
        iterations,
        duration,
        duration.as_nanos() as f64 / iterations as f64
    );

    assert!(duration.as_millis() < 2000);
}
