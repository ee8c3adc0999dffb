/// ASCII rasterizer for projected polyhedron frames
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use polyview_core::{Frame, ScreenPoint};
use std::io::Write;

/// Fill characters, cycled by face index
const FACE_FILL: &[char] = &['.', ':', '-', '=', '+', '*', '~', 'o', 'x', '%', '&', '$'];

/// Face colours, cycled by face index
const FACE_COLORS: &[Color] = &[
    Color::Red,
    Color::Green,
    Color::Blue,
    Color::Yellow,
    Color::Magenta,
    Color::Cyan,
    Color::DarkYellow,
    Color::DarkGreen,
    Color::DarkBlue,
    Color::DarkRed,
    Color::DarkMagenta,
    Color::DarkCyan,
];

const EDGE_CHAR: char = '#';
const EDGE_COLOR: Color = Color::White;
const VERTEX_CHAR: char = '@';
const VERTEX_COLOR: Color = Color::Yellow;

/// Character-cell render target. Faces are painted in order, then edges,
/// then vertices; later marks overwrite earlier ones.
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    char_buffer: Vec<char>,
    color_buffer: Vec<Color>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            char_buffer: vec![' '; size],
            color_buffer: vec![Color::Reset; size],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self::new(width, height);
    }

    pub fn clear(&mut self) {
        self.char_buffer.fill(' ');
        self.color_buffer.fill(Color::Reset);
    }

    /// Character at a cell, if inside the buffer.
    pub fn cell(&self, x: usize, y: usize) -> Option<char> {
        (x < self.width && y < self.height).then(|| self.char_buffer[y * self.width + x])
    }

    pub fn render_frame(&mut self, frame: &Frame) {
        for face in &frame.faces {
            let fill = FACE_FILL[face.index % FACE_FILL.len()];
            let color = FACE_COLORS[face.index % FACE_COLORS.len()];
            self.fill_polygon(&face.points, fill, color);
        }
        for &(start, end) in &frame.edges {
            self.draw_line(start, end, EDGE_CHAR, EDGE_COLOR);
        }
        for &vertex in &frame.vertices {
            self.plot(vertex.0, vertex.1, VERTEX_CHAR, VERTEX_COLOR);
        }
    }

    /// Fill a convex polygon by fanning it into triangles from the first point.
    fn fill_polygon(&mut self, points: &[ScreenPoint], character: char, color: Color) {
        if points.len() < 3 {
            return;
        }
        let anchor = points[0];
        for pair in points[1..].windows(2) {
            self.rasterize_triangle([anchor, pair[0], pair[1]], character, color);
        }
    }

    fn rasterize_triangle(&mut self, coords: [ScreenPoint; 3], character: char, color: Color) {
        let [v0, v1, v2] = coords;
        if self.width == 0 || self.height == 0 {
            return;
        }

        // Bounding box
        let min_x = v0.0.min(v1.0).min(v2.0).floor().max(0.0) as usize;
        let max_x = v0.0.max(v1.0).max(v2.0).ceil().min(self.width as f64 - 1.0);
        let min_y = v0.1.min(v1.1).min(v2.1).floor().max(0.0) as usize;
        let max_y = v0.1.max(v1.1).max(v2.1).ceil().min(self.height as f64 - 1.0);
        if max_x < 0.0 || max_y < 0.0 {
            return;
        }
        let (max_x, max_y) = (max_x as usize, max_y as usize);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = (x as f64 + 0.5, y as f64 + 0.5);
                if let Some((w0, w1, w2)) = barycentric(v0, v1, v2, p) {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        self.set(x, y, character, color);
                    }
                }
            }
        }
    }

    /// DDA line between two screen points, clipped to the buffer first.
    fn draw_line(&mut self, start: ScreenPoint, end: ScreenPoint, character: char, color: Color) {
        let Some((start, end)) = clip_line(start, end, self.width as f64, self.height as f64) else {
            return;
        };
        let (dx, dy) = (end.0 - start.0, end.1 - start.1);
        let steps = dx.abs().max(dy.abs()).ceil();
        if !steps.is_finite() {
            return;
        }
        let steps = steps as usize;
        if steps == 0 {
            self.plot(start.0, start.1, character, color);
            return;
        }
        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            self.plot(start.0 + dx * t, start.1 + dy * t, character, color);
        }
    }

    fn plot(&mut self, x: f64, y: f64, character: char, color: Color) {
        let (x, y) = (x.floor(), y.floor());
        if !(x.is_finite() && y.is_finite()) || x < 0.0 || y < 0.0 {
            return;
        }
        self.set(x as usize, y as usize, character, color);
    }

    fn set(&mut self, x: usize, y: usize, character: char, color: Color) {
        if x < self.width && y < self.height {
            let idx = y * self.width + x;
            self.char_buffer[idx] = character;
            self.color_buffer[idx] = color;
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            for x in 0..self.width {
                let idx = y * self.width + x;
                writer.queue(SetForegroundColor(self.color_buffer[idx]))?;
                writer.queue(Print(self.char_buffer[idx]))?;
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Liang-Barsky clip against the buffer grown by half a cell on each side
fn clip_line(
    start: ScreenPoint,
    end: ScreenPoint,
    width: f64,
    height: f64,
) -> Option<(ScreenPoint, ScreenPoint)> {
    let (x0, y0) = start;
    let (dx, dy) = (end.0 - x0, end.1 - y0);
    let (min, max_x, max_y) = (-0.5, width + 0.5, height + 0.5);

    let mut t0: f64 = 0.0;
    let mut t1: f64 = 1.0;
    for (p, q) in [(-dx, x0 - min), (dx, max_x - x0), (-dy, y0 - min), (dy, max_y - y0)] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }
    Some(((x0 + t0 * dx, y0 + t0 * dy), (x0 + t1 * dx, y0 + t1 * dy)))
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: ScreenPoint,
    v1: ScreenPoint,
    v2: ScreenPoint,
    p: ScreenPoint,
) -> Option<(f64, f64, f64)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-9 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
