use crate::gpu::GPU;

/// Line endpoints farther out than this on either axis are pulled in along
/// the line before stepping.
const REACH: i64 = 1 << 15;

/// Liang-Barsky clip of a segment to the square of side `2 * REACH` around
/// the origin. Segments already inside are returned untouched.
fn clip_to_reach(
  x0: i64,
  y0: i64,
  x1: i64,
  y1: i64,
) -> Option<(i64, i64, i64, i64)> {
  let inside = |v: i64| v >= -REACH && v <= REACH;
  if inside(x0) && inside(y0) && inside(x1) && inside(y1) {
    return Some((x0, y0, x1, y1));
  }

  let lim = REACH as f64;
  let (fx, fy) = (x0 as f64, y0 as f64);
  let (dx, dy) = ((x1 - x0) as f64, (y1 - y0) as f64);
  let mut t0 = 0.0f64;
  let mut t1 = 1.0f64;
  let edges = [
    (-dx, fx + lim),
    (dx, lim - fx),
    (-dy, fy + lim),
    (dy, lim - fy),
  ];
  for &(p, q) in edges.iter() {
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

  let at = |t: f64| {
    ((fx + t * dx).round() as i64, (fy + t * dy).round() as i64)
  };
  let (ax, ay) = at(t0);
  let (bx, by) = at(t1);
  Some((ax, ay, bx, by))
}

impl GPU {
  /// Bresenham line from (x0, y0) to (x1, y1), both endpoints included.
  pub fn draw_line(
    &mut self,
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
    color: u16,
  ) {
    let (mut x0, mut y0, x1, y1) = match clip_to_reach(
      i64::from(x0),
      i64::from(y0),
      i64::from(x1),
      i64::from(y1),
    ) {
      Some(seg) => seg,
      None => return,
    };

    let dx = (x1 - x0).abs();
    let dy = (y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx - dy;

    loop {
      self.plot(x0, y0, color);
      if x0 == x1 && y0 == y1 {
        break;
      }
      let e2 = 2 * err;
      if e2 > -dy {
        err -= dy;
        x0 += sx;
      }
      if e2 < dx {
        err += dx;
        y0 += sy;
      }
    }
  }

  /// Rectangle with its top-left corner at (x, y). Outlines touch only the
  /// border rows and columns.
  pub fn draw_rect(
    &mut self,
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    color: u16,
    fill: bool,
  ) {
    if width <= 0 || height <= 0 {
      return;
    }
    let (left, top) = (i64::from(x), i64::from(y));
    let right = left + i64::from(width) - 1;
    let bottom = top + i64::from(height) - 1;

    if fill {
      let last = bottom.min(self.height as i64 - 1);
      for py in top.max(0)..=last {
        self.span(left, right, py, color);
      }
    } else {
      self.span(left, right, top, color);
      self.span(left, right, bottom, color);
      self.column(left, top, bottom, color);
      self.column(right, top, bottom, color);
    }
  }

  /// Midpoint circle centred on (cx, cy).
  pub fn draw_circle(
    &mut self,
    cx: i32,
    cy: i32,
    radius: i32,
    color: u16,
    fill: bool,
  ) {
    let (cx, cy) = (i64::from(cx), i64::from(cy));
    let mut x = i64::from(radius);
    let mut y = 0i64;
    let mut err = 0i64;

    while x >= y {
      if fill {
        self.span(cx - x, cx + x, cy + y, color);
        self.span(cx - x, cx + x, cy - y, color);
        self.span(cx - y, cx + y, cy + x, color);
        self.span(cx - y, cx + y, cy - x, color);
      } else {
        self.plot(cx + x, cy + y, color);
        self.plot(cx + y, cy + x, color);
        self.plot(cx - y, cy + x, color);
        self.plot(cx - x, cy + y, color);
        self.plot(cx - x, cy - y, color);
        self.plot(cx - y, cy - x, color);
        self.plot(cx + y, cy - x, color);
        self.plot(cx + x, cy - y, color);
      }

      if err <= 0 {
        y += 1;
        err += 2 * y + 1;
      }
      if err > 0 {
        x -= 1;
        err -= 2 * x + 1;
      }
    }
  }

  fn plot(&mut self, x: i64, y: i64, color: u16) {
    let w = self.width as i64;
    let h = self.height as i64;
    if x >= 0 && y >= 0 && x < w && y < h {
      self.set_pixel(x as i32, y as i32, color);
    }
  }

  /// Horizontal run from x0 to x1 inclusive, clipped to the screen.
  fn span(&mut self, x0: i64, x1: i64, y: i64, color: u16) {
    let last = x1.min(self.width as i64 - 1);
    for x in x0.max(0)..=last {
      self.plot(x, y, color);
    }
  }

  /// Vertical run from y0 to y1 inclusive, clipped to the screen.
  fn column(&mut self, x: i64, y0: i64, y1: i64, color: u16) {
    let last = y1.min(self.height as i64 - 1);
    for y in y0.max(0)..=last {
      self.plot(x, y, color);
    }
  }
}
