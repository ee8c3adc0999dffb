/// Terminal viewer for the Platonic solids
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use polyview_core::{
    Action, Frame, Outcome, Preset, ProjectionConfig, ProjectionMode, Scene, SolidKind, Viewport,
};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod renderer;

pub use renderer::AsciiRenderer;

/// Rows kept free below the drawing for status text
const STATUS_ROWS: u16 = 2;

/// Window height the projection scales are tuned for
const WINDOW_HEIGHT: f64 = 700.0;

/// Extra zoom so the solids stay legible at character resolution
const TERMINAL_ZOOM: f64 = 1.5;

/// Rescale projection constants from window pixels to the given cell height.
pub fn fit_to_rows(config: &ProjectionConfig, rows: u32) -> ProjectionConfig {
    config.zoomed(rows as f64 / WINDOW_HEIGHT * TERMINAL_ZOOM)
}

/// Map a key to the action it triggers and the message shown for it.
pub fn key_binding(code: KeyCode) -> Option<(Action, String)> {
    let preset = |p: Preset| Some((Action::Apply(p.transform()), format!("Applied: {}", p.label())));
    let solid = |kind: SolidKind| Some((Action::SwitchSolid(kind), format!("Switched to {kind}")));
    let projection = |mode: ProjectionMode| {
        Some((
            Action::SwitchProjection(mode),
            format!("Switched to {mode} projection"),
        ))
    };

    let code = match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    };
    match code {
        KeyCode::Esc | KeyCode::Char('q') => Some((Action::Quit, "Bye".to_string())),
        KeyCode::Char(c @ '1'..='5') => {
            SolidKind::from_index(c as usize - '0' as usize).and_then(solid)
        }
        KeyCode::Char('p') => projection(ProjectionMode::Perspective),
        KeyCode::Char('a') => projection(ProjectionMode::Axonometric),
        KeyCode::Char('r') => Some((Action::Reset, "Reset".to_string())),
        KeyCode::Char('f') => preset(Preset::ScaleUp),
        KeyCode::Char('g') => preset(Preset::ScaleDown),
        KeyCode::Char('h') => preset(Preset::RotateCenterX),
        KeyCode::Char('j') => preset(Preset::RotateCenterY),
        KeyCode::Char('k') => preset(Preset::RotateCenterZ),
        KeyCode::Char('l') => preset(Preset::ArbitraryAxis),
        KeyCode::Char('z') => preset(Preset::ReflectXY),
        KeyCode::Char('x') => preset(Preset::Composite),
        KeyCode::Char('c') => preset(Preset::Shear),
        KeyCode::Char('v') => preset(Preset::LineRotation),
        KeyCode::Char('b') => preset(Preset::Spiral),
        _ => None,
    }
}

/// Main application struct for the terminal viewer
pub struct TerminalApp {
    scene: Scene,
    renderer: AsciiRenderer,
    running: bool,
    message: String,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(scene: Scene) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        let draw_height = height.saturating_sub(STATUS_ROWS);

        Ok(Self {
            scene,
            renderer: AsciiRenderer::new(width as usize, draw_height as usize),
            running: true,
            message: "Press 1-5 to switch solids, Q to quit".to_string(),
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.running {
            let frame_start = Instant::now();

            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }

            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            }) => {
                if let Some((action, message)) = key_binding(code) {
                    self.dispatch(&action, message);
                }
            }
            Event::Resize(width, height) => {
                self.renderer
                    .resize(width as usize, height.saturating_sub(STATUS_ROWS) as usize);
            }
            _ => {}
        }
    }

    fn dispatch(&mut self, action: &Action, message: String) {
        match self.scene.handle(action) {
            Ok(Outcome::Quit) => self.running = false,
            Ok(Outcome::Continue) => self.message = message,
            Err(e) => self.message = format!("Error: {e}"),
        }
    }

    fn render(&mut self) -> io::Result<()> {
        let viewport = Viewport::new(self.renderer.width() as u32, self.renderer.height() as u32);
        let config = fit_to_rows(self.scene.config(), viewport.height);
        let frame = Frame::project(self.scene.polyhedron(), self.scene.mode(), &config, viewport);

        self.renderer.clear();
        self.renderer.render_frame(&frame);

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;
        self.renderer.draw(&mut stdout)?;

        // Status lines
        let status_row = self.renderer.height() as u16;
        queue!(
            stdout,
            cursor::MoveTo(0, status_row),
            terminal::Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::White),
            Print(format!(
                "{} | Projection: {} | FPS: {:.1}",
                self.scene.summary(),
                self.scene.mode().name().to_uppercase(),
                self.fps
            )),
            cursor::MoveTo(0, status_row + 1),
            terminal::Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::Cyan),
            Print(&self.message),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polyview_core::TransformKind;

    #[test]
    fn test_number_keys_switch_solids() {
        let (action, message) = key_binding(KeyCode::Char('2')).unwrap();
        assert_eq!(action, Action::SwitchSolid(SolidKind::Hexahedron));
        assert_eq!(message, "Switched to Hexahedron (Cube)");
        assert!(key_binding(KeyCode::Char('6')).is_none());
        assert!(key_binding(KeyCode::Char('0')).is_none());
        assert_eq!(
            key_binding(KeyCode::Char('Q')).map(|b| b.0),
            Some(Action::Quit)
        );
    }

    #[test]
    fn test_letter_keys() {
        assert_eq!(key_binding(KeyCode::Esc).map(|b| b.0), Some(Action::Quit));
        assert_eq!(
            key_binding(KeyCode::Char('p')).map(|b| b.0),
            Some(Action::SwitchProjection(ProjectionMode::Perspective))
        );
        assert_eq!(
            key_binding(KeyCode::Char('z')).map(|b| b.0),
            Some(Action::Apply(TransformKind::Reflect(polyview_core::Plane::XY)))
        );
        let (_, message) = key_binding(KeyCode::Char('b')).unwrap();
        assert_eq!(message, "Applied: Spiral transformation");
    }

    #[test]
    fn test_fit_to_rows() {
        let config = ProjectionConfig::default();
        let fitted = fit_to_rows(&config, 700);
        assert_eq!(fitted.axonometric_scale, 150.0);
        assert_eq!(fitted.eye_distance, config.eye_distance);
        assert!(fit_to_rows(&config, 22).perspective_scale < 11.0);
    }

    #[test]
    fn test_every_preset_has_a_key() {
        let bound: Vec<Action> = "fghjklzxcvb"
            .chars()
            .filter_map(|c| key_binding(KeyCode::Char(c)).map(|b| b.0))
            .collect();
        for preset in Preset::ALL {
            assert!(bound.contains(&Action::Apply(preset.transform())), "{preset:?}");
        }
    }
}
