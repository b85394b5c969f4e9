/// Greedy vertical placement of end-of-line value labels.
///
/// Each label wants to sit at its data value; if that position is closer
/// than `min_sep` to an already placed label it tries `y + k*sep`, then
/// `y - k*sep`, for k = 1, 2, ... until a free slot is found.
#[derive(Debug, Clone)]
pub struct LabelPlacer {
    min_sep: f64,
    used: Vec<f64>,
}

impl LabelPlacer {
    pub fn new(min_sep: f64) -> Self {
        Self {
            min_sep: min_sep.abs(),
            used: Vec::new(),
        }
    }

    pub fn for_span(y_min: f64, y_max: f64, fraction: f64) -> Self {
        let span = (y_max - y_min).abs();
        let span = if span > 0.0 { span } else { 1.0 };
        Self::new(span * fraction)
    }

    pub fn place(&mut self, y: f64) -> f64 {
        if self.min_sep == 0.0 || !y.is_finite() || self.is_free(y) {
            self.used.push(y);
            return y;
        }
        let mut k = 1.0;
        loop {
            let up = y + k * self.min_sep;
            if self.is_free(up) {
                self.used.push(up);
                return up;
            }
            let down = y - k * self.min_sep;
            if self.is_free(down) {
                self.used.push(down);
                return down;
            }
            k += 1.0;
        }
    }

    pub fn placed(&self) -> &[f64] {
        &self.used
    }

    fn is_free(&self, y: f64) -> bool {
        // Tolerance keeps exact multiples of the separation usable.
        let tol = self.min_sep * 1e-9;
        self.used.iter().all(|u| (u - y).abs() >= self.min_sep - tol)
    }
}
