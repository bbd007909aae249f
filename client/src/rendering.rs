//! Snapshot-to-surface projection at display cadence
//!
//! The projector pulls whatever snapshot the session currently holds on
//! every render tick. It never interpolates or extrapolates between
//! snapshots; sparse updates mean a stale picture, not invented motion.

use crate::session::Session;
use macroquad::prelude::*;
use shared::{Ball, GameConfig, RemoteState, SessionPhase};
use std::time::{Duration, Instant};

/// Counts render ticks against wall-clock windows. Whenever at least one
/// second has elapsed, the window's tick count becomes the displayed FPS
/// and the count restarts.
pub struct FpsCounter {
    window_start: Instant,
    frames: u32,
    fps: u32,
}

impl FpsCounter {
    pub fn new(now: Instant) -> Self {
        Self {
            window_start: now,
            frames: 0,
            fps: 0,
        }
    }

    /// Records one rendered frame and returns the FPS value to display.
    pub fn tick(&mut self, now: Instant) -> u32 {
        self.frames += 1;
        if now.duration_since(self.window_start) >= Duration::from_millis(1000) {
            self.fps = self.frames;
            self.frames = 0;
            self.window_start = now;
        }
        self.fps
    }
}

/// Elapsed game time as `M:SS` with zero-padded seconds.
pub fn format_game_clock(total_seconds: u64) -> String {
    format!("{}:{:02}", total_seconds / 60, total_seconds % 60)
}

/// Circle geometry for every ball in a snapshot, in draw order.
pub fn circle_geometry(balls: &[Ball]) -> Vec<(f32, f32, f32)> {
    balls
        .iter()
        .map(|ball| (ball.x as f32, ball.y as f32, ball.radius as f32))
        .collect()
}

pub struct Projector {
    surface_width: i32,
    surface_height: i32,
    fps: FpsCounter,
}

impl Projector {
    pub fn new(width: i32, height: i32, now: Instant) -> Self {
        Self {
            surface_width: width,
            surface_height: height,
            fps: FpsCounter::new(now),
        }
    }

    pub fn surface(&self) -> (i32, i32) {
        (self.surface_width, self.surface_height)
    }

    /// Redraws the whole surface from the session's current state.
    /// `now_ms` is the wall clock used for the starting countdown.
    pub fn draw_frame(&mut self, session: &Session, now: Instant, now_ms: u64) {
        let fps = self.fps.tick(now);

        // A newly received config must be in effect before this frame's
        // geometry is drawn.
        if self.apply_surface(session.config()) {
            request_new_screen_size(self.surface_width as f32, self.surface_height as f32);
        }

        clear_background(BLACK);

        match session.phase() {
            SessionPhase::Playing => self.draw_match(session.snapshot()),
            SessionPhase::Waiting => self.draw_lobby("Waiting for an opponent...", None),
            SessionPhase::Starting => {
                let countdown = session.countdown_seconds(now_ms).map(|s| s.to_string());
                self.draw_lobby("Match starting", countdown.as_deref());
            }
            SessionPhase::Finished => {
                let result = session.result_text();
                self.draw_lobby(result.as_deref().unwrap_or("Match over"), None);
            }
        }

        self.draw_hud(session, fps);
    }

    /// Adopts the session's field dimensions. Returns whether the surface
    /// size changed; absent config keeps the prior dimensions.
    fn apply_surface(&mut self, config: Option<&GameConfig>) -> bool {
        let Some(config) = config else {
            return false;
        };
        if config.field_width == self.surface_width && config.field_height == self.surface_height {
            return false;
        }
        self.surface_width = config.field_width;
        self.surface_height = config.field_height;
        true
    }

    fn draw_match(&self, snapshot: Option<&RemoteState>) {
        let Some(snapshot) = snapshot else {
            return;
        };

        self.draw_centered(&format_game_clock(snapshot.game_time), 40.0, 32.0);
        self.draw_centered(
            &format!("{} - {}", snapshot.score1, snapshot.score2),
            76.0,
            28.0,
        );

        for paddle in [&snapshot.paddle1, &snapshot.paddle2] {
            draw_rectangle(
                paddle.x as f32,
                paddle.y as f32,
                paddle.width as f32,
                paddle.height as f32,
                WHITE,
            );
        }

        for (x, y, radius) in circle_geometry(&snapshot.balls) {
            draw_circle(x, y, radius, WHITE);
        }
    }

    fn draw_lobby(&self, headline: &str, countdown: Option<&str>) {
        let mid = self.surface_height as f32 / 2.0;
        self.draw_centered(headline, mid - 20.0, 30.0);
        if let Some(countdown) = countdown {
            self.draw_centered(countdown, mid + 44.0, 64.0);
        }
    }

    fn draw_centered(&self, text: &str, y: f32, font_size: f32) {
        let dims = measure_text(text, None, font_size as u16, 1.0);
        let x = (self.surface_width as f32 - dims.width) / 2.0;
        draw_text(text, x, y, font_size, WHITE);
    }

    fn draw_hud(&self, session: &Session, fps: u32) {
        let base_y = self.surface_height as f32;
        draw_text(session.status().label(), 10.0, base_y - 52.0, 16.0, GRAY);

        let who = match session.identity() {
            Some(identity) => format!("{} ({})", identity.display_name, identity.role),
            None => "unassigned".to_string(),
        };
        draw_text(&who, 10.0, base_y - 36.0, 16.0, GRAY);
        draw_text(&session.rtt_display(), 10.0, base_y - 20.0, 16.0, GRAY);
        draw_text(&format!("{} fps", fps), 10.0, base_y - 4.0, 16.0, GRAY);
    }
}
