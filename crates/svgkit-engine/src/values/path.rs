//! Path data (`d`) and point lists (`points`).
//!
//! Relative commands are made absolute, `H`/`V` become line segments and
//! the smooth curve forms are expanded, so consumers only ever see the
//! normalized [`PathCommand`] stream.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{parse_number_list, parse_number_prefix, skip_separators, try_push};
use crate::geometry::{arc_to_cubics, Point};

/// Normalized path command, absolute coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PathCommand {
    /// Start a new subpath.
    MoveTo(f32, f32),
    LineTo(f32, f32),
    /// Cubic Bézier: control 1, control 2, end.
    CubicTo(f32, f32, f32, f32, f32, f32),
    /// Quadratic Bézier: control, end.
    QuadTo(f32, f32, f32, f32),
    /// Elliptical arc from the current point to `(x, y)`.
    ArcTo {
        start_x: f32,
        start_y: f32,
        rx: f32,
        ry: f32,
        /// Degrees.
        rotation: f32,
        large_arc: bool,
        sweep: bool,
        x: f32,
        y: f32,
    },
    Close,
}

/// Convert a command stream to one without arcs, replacing each arc with
/// cubic segments.
pub fn flatten_arcs(commands: &[PathCommand]) -> Vec<PathCommand> {
    let mut out = Vec::with_capacity(commands.len());
    for cmd in commands {
        match *cmd {
            PathCommand::ArcTo {
                start_x,
                start_y,
                rx,
                ry,
                rotation,
                large_arc,
                sweep,
                x,
                y,
            } => {
                let cubics = arc_to_cubics(
                    Point::new(start_x, start_y),
                    rx,
                    ry,
                    rotation,
                    large_arc,
                    sweep,
                    Point::new(x, y),
                );
                out.extend(cubics.iter().map(|c| {
                    PathCommand::CubicTo(c.ctrl1.x, c.ctrl1.y, c.ctrl2.x, c.ctrl2.y, c.to.x, c.to.y)
                }));
            }
            other => out.push(other),
        }
    }
    out
}

/// Parse a `d` attribute. Never fails; parsing stops at the first command
/// whose arguments are malformed and returns what was read so far.
pub fn parse_path_data(d: &str) -> Vec<PathCommand> {
    let mut parser = PathParser::new(d);
    parser.run();
    debug!("path data: {} commands", parser.commands.len());
    parser.commands
}

struct PathParser<'a> {
    rest: &'a str,
    commands: Vec<PathCommand>,
    current: Point,
    subpath_start: Point,
    /// Last control point of the previous curve.
    last_control: Point,
    /// Command letter of the previous segment, after implicit repeats.
    previous: Option<char>,
}

impl<'a> PathParser<'a> {
    fn new(d: &'a str) -> Self {
        Self {
            rest: d,
            commands: Vec::new(),
            current: Point::default(),
            subpath_start: Point::default(),
            last_control: Point::default(),
            previous: None,
        }
    }

    fn run(&mut self) {
        loop {
            self.rest = skip_separators(self.rest);
            let Some(c) = self.rest.chars().next() else {
                break;
            };

            let cmd = if c.is_ascii_alphabetic() {
                self.rest = &self.rest[1..];
                if !is_command(c) {
                    continue;
                }
                c
            } else {
                match self.previous {
                    // Extra coordinate pairs after a moveto are linetos.
                    Some('M') => 'L',
                    Some('m') => 'l',
                    Some(p) if p != 'Z' && p != 'z' => p,
                    _ => {
                        let skip = c.len_utf8();
                        self.rest = &self.rest[skip..];
                        continue;
                    }
                }
            };

            if !self.execute(cmd) {
                break;
            }
        }
    }

    fn number(&mut self) -> Option<f32> {
        let (value, tail) = parse_number_prefix(skip_separators(self.rest))?;
        self.rest = tail;
        Some(value)
    }

    /// Arc flags are single characters, so `a1 1 0 00 5 5` reads both flags.
    fn flag(&mut self) -> Option<bool> {
        let rest = skip_separators(self.rest);
        let value = match rest.as_bytes().first()? {
            b'0' => false,
            b'1' => true,
            _ => return None,
        };
        self.rest = &rest[1..];
        Some(value)
    }

    fn point(&mut self, relative: bool) -> Option<Point> {
        let x = self.number()?;
        let y = self.number()?;
        Some(if relative {
            Point::new(self.current.x + x, self.current.y + y)
        } else {
            Point::new(x, y)
        })
    }

    fn emit(&mut self, command: PathCommand) -> bool {
        try_push(&mut self.commands, command)
    }

    /// Run one command. Returns false when parsing must stop.
    fn execute(&mut self, cmd: char) -> bool {
        let relative = cmd.is_ascii_lowercase();
        let ok = match cmd.to_ascii_uppercase() {
            'Z' => {
                self.current = self.subpath_start;
                self.last_control = self.current;
                Some(self.emit(PathCommand::Close))
            }
            'M' => self.point(relative).map(|p| {
                self.current = p;
                self.subpath_start = p;
                self.last_control = p;
                self.emit(PathCommand::MoveTo(p.x, p.y))
            }),
            'L' => self.point(relative).map(|p| self.line_to(p)),
            'H' => self.number().map(|x| {
                let x = if relative { self.current.x + x } else { x };
                self.line_to(Point::new(x, self.current.y))
            }),
            'V' => self.number().map(|y| {
                let y = if relative { self.current.y + y } else { y };
                self.line_to(Point::new(self.current.x, y))
            }),
            'C' => self.cubic(relative, None),
            'S' => {
                let reflected = self.reflected_control(&['C', 'c', 'S', 's']);
                self.cubic(relative, Some(reflected))
            }
            'Q' => self.quad(relative, None),
            'T' => {
                let reflected = self.reflected_control(&['Q', 'q', 'T', 't']);
                self.quad(relative, Some(reflected))
            }
            'A' => self.arc(relative),
            _ => Some(true),
        };

        match ok {
            Some(keep_going) => {
                self.previous = Some(cmd);
                keep_going
            }
            None => {
                debug!("path data: malformed arguments for '{}'", cmd);
                false
            }
        }
    }

    fn line_to(&mut self, p: Point) -> bool {
        self.current = p;
        self.last_control = p;
        self.emit(PathCommand::LineTo(p.x, p.y))
    }

    /// The previous control point reflected about the current point when
    /// the previous command is one of `after`, otherwise the current point.
    fn reflected_control(&self, after: &[char]) -> Point {
        match self.previous {
            Some(p) if after.contains(&p) => self.last_control.reflect_about(self.current),
            _ => self.current,
        }
    }

    /// `C` when `first` is `None`, `S` with the reflected first control.
    fn cubic(&mut self, relative: bool, first: Option<Point>) -> Option<bool> {
        let c1 = match first {
            Some(c) => c,
            None => self.point(relative)?,
        };
        let c2 = self.point(relative)?;
        let end = self.point(relative)?;
        self.current = end;
        self.last_control = c2;
        Some(self.emit(PathCommand::CubicTo(c1.x, c1.y, c2.x, c2.y, end.x, end.y)))
    }

    /// `Q` when `control` is `None`, `T` with the reflected control.
    fn quad(&mut self, relative: bool, control: Option<Point>) -> Option<bool> {
        let c = match control {
            Some(c) => c,
            None => self.point(relative)?,
        };
        let end = self.point(relative)?;
        self.current = end;
        self.last_control = c;
        Some(self.emit(PathCommand::QuadTo(c.x, c.y, end.x, end.y)))
    }

    fn arc(&mut self, relative: bool) -> Option<bool> {
        let rx = self.number()?;
        let ry = self.number()?;
        let rotation = self.number()?;
        let large_arc = self.flag()?;
        let sweep = self.flag()?;
        let end = self.point(relative)?;
        let start = self.current;
        self.current = end;
        self.last_control = end;
        Some(self.emit(PathCommand::ArcTo {
            start_x: start.x,
            start_y: start.y,
            rx,
            ry,
            rotation,
            large_arc,
            sweep,
            x: end.x,
            y: end.y,
        }))
    }
}

fn is_command(c: char) -> bool {
    matches!(
        c.to_ascii_uppercase(),
        'M' | 'L' | 'H' | 'V' | 'C' | 'S' | 'Q' | 'T' | 'A' | 'Z'
    )
}

/// Parse a `points` attribute into coordinate pairs. A trailing odd
/// coordinate is dropped.
pub fn parse_points(s: &str) -> Vec<Point> {
    let numbers = parse_number_list(s);
    let mut points = Vec::new();
    for pair in numbers.chunks_exact(2) {
        if !try_push(&mut points, Point::new(pair[0], pair[1])) {
            break;
        }
    }
    points
}
