//! raylib window, input polling and drawing.
use raylib::prelude::*;
use tracing::info;

use crate::config::{GameConfig, ViewMode};
use crate::game::{Frame, Game, InputState};
use crate::math::{Segment, Vec2};
use crate::render::projector::{Viewport, WallSlice};
use crate::render::top_down::TopDownFrame;

const CEIL_TOP: Color = Color::new(10, 12, 18, 255);
const CEIL_MID: Color = Color::new(20, 24, 32, 255);
const FLOOR_FAR: Color = Color::new(26, 28, 30, 255);
const FLOOR_NEAR: Color = Color::new(56, 58, 62, 255);
const WALL_BASE: Color = Color::new(235, 235, 235, 255);
const EDGE: Color = Color::new(60, 230, 255, 255);
const RAY: Color = Color::new(255, 255, 255, 90);

#[inline]
fn scale_color(c: Color, k: f64) -> Color {
    let s = k.clamp(0.0, 1.0) as f32;
    let mul = |v: u8| -> u8 { (v as f32 * s).min(255.0) as u8 };
    Color::new(mul(c.r), mul(c.g), mul(c.b), 255)
}

/// Maps world space onto the window. The overhead view centres the map.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub offset: Vec2,
}

impl Camera {
    pub fn centred(game: &Game, viewport: Viewport) -> Self {
        let s = game.map.cell_size();
        let map_w = game.map.width() as f64 * s;
        let map_h = game.map.height() as f64 * s;
        Self {
            offset: Vec2::new((viewport.width - map_w) * 0.5, (viewport.height - map_h) * 0.5),
        }
    }

    #[inline]
    fn to_screen(&self, p: Vec2) -> Vector2 {
        Vector2::new((p.x + self.offset.x) as f32, (p.y + self.offset.y) as f32)
    }

    #[inline]
    fn to_world(&self, v: Vector2) -> Vec2 {
        Vec2::new(v.x as f64 - self.offset.x, v.y as f64 - self.offset.y)
    }
}

pub fn poll_input(rl: &RaylibHandle, camera: &Camera) -> InputState {
    InputState {
        forward: rl.is_key_down(KeyboardKey::KEY_W),
        backward: rl.is_key_down(KeyboardKey::KEY_S),
        strafe_left: rl.is_key_down(KeyboardKey::KEY_A),
        strafe_right: rl.is_key_down(KeyboardKey::KEY_D),
        run: rl.is_key_down(KeyboardKey::KEY_LEFT_SHIFT) || rl.is_key_down(KeyboardKey::KEY_RIGHT_SHIFT),
        toggle_view: rl.is_key_pressed(KeyboardKey::KEY_M),
        pointer: camera.to_world(rl.get_mouse_position()),
    }
}

fn draw_segment(d: &mut impl RaylibDraw, camera: &Camera, s: &Segment, color: Color) {
    d.draw_line_v(camera.to_screen(s.start), camera.to_screen(s.end), color);
}

fn draw_top_down(d: &mut impl RaylibDraw, frame: &TopDownFrame, camera: &Camera) {
    for ray in &frame.rays {
        draw_segment(d, camera, ray, RAY);
    }
    for edge in &frame.edges {
        draw_segment(d, camera, edge, EDGE);
    }
    d.draw_circle_v(camera.to_screen(frame.player), 4.0, Color::YELLOW);
    draw_segment(d, camera, &frame.facing, Color::RED);
}

fn draw_first_person(d: &mut impl RaylibDraw, slices: &[WallSlice], viewport: Viewport) {
    let w = viewport.width as i32;
    let h = viewport.height as i32;
    let hh = h / 2;
    d.draw_rectangle_gradient_v(0, 0, w, hh, CEIL_TOP, CEIL_MID);
    d.draw_rectangle_gradient_v(0, hh, w, h - hh, FLOOR_FAR, FLOOR_NEAR);

    for slice in slices.iter().filter(|s| s.hit) {
        let top = slice.top.clamp(0.0, viewport.height);
        let bottom = slice.bottom.clamp(0.0, viewport.height);
        let x0 = slice.screen_x.floor() as i32;
        let x1 = (slice.screen_x + slice.width).ceil() as i32;
        d.draw_rectangle(
            x0,
            top as i32,
            (x1 - x0).max(1),
            (bottom - top).ceil() as i32,
            scale_color(WALL_BASE, slice.shade),
        );
    }
}

pub fn draw_frame(d: &mut impl RaylibDraw, frame: &Frame, camera: &Camera, viewport: Viewport) {
    match frame {
        Frame::TopDown(f) => draw_top_down(d, f, camera),
        Frame::FirstPerson(slices) => draw_first_person(d, slices, viewport),
    }
}

/// Opens the window and runs until it is closed.
pub fn run(config: &GameConfig, mut game: Game) {
    let win = &config.window;
    let (mut rl, thread) = raylib::init()
        .size(win.width as i32, win.height as i32)
        .title(&win.title)
        .build();
    rl.set_target_fps(win.target_fps);

    let viewport = Viewport::new(win.width as f64, win.height as f64);
    let camera = Camera::centred(&game, viewport);
    info!(width = win.width, height = win.height, mode = game.view_mode.label(), "window open");

    while !rl.window_should_close() {
        let input = poll_input(&rl, &camera);
        game.tick(&input);
        let frame = game.frame(viewport);

        // read everything from `rl` before begin_drawing borrows it
        let fps_now = rl.get_fps();
        let running = game.player.running;
        let mode = game.view_mode;

        let mut d = rl.begin_drawing(&thread);
        d.clear_background(Color::BLACK);
        draw_frame(&mut d, &frame, &camera, viewport);

        d.draw_text(&format!("FPS: {}", fps_now), 10, 10, 20, Color::WHITE);
        d.draw_text(
            match mode {
                ViewMode::TopDown => "TOP-DOWN [M]",
                ViewMode::FirstPerson => "FIRST-PERSON [M]",
            },
            10,
            40,
            20,
            Color::WHITE,
        );
        if running {
            d.draw_text("RUN", 10, 70, 20, Color::RED);
        }
    }
    info!("window closed");
}
