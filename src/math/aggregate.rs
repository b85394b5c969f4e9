use crate::error::AggregateError;

#[derive(Debug, Clone, PartialEq)]
pub struct AggregateSeries {
    pub mean: Vec<f64>,
    pub std: Vec<f64>,
    pub n_series: usize,
}

impl AggregateSeries {
    pub fn len(&self) -> usize {
        self.mean.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mean.is_empty()
    }

    pub fn final_point(&self) -> Option<(f64, f64)> {
        Some((*self.mean.last()?, *self.std.last()?))
    }
}

pub fn aggregate<S: AsRef<[f64]>>(series: &[S]) -> Result<AggregateSeries, AggregateError> {
    let first = series.first().ok_or(AggregateError::NoSeries)?;
    let len = first.as_ref().len();
    for (index, s) in series.iter().enumerate() {
        let found = s.as_ref().len();
        if found != len {
            return Err(AggregateError::LengthMismatch {
                index,
                expected: len,
                found,
            });
        }
    }

    let n = series.len() as f64;
    let mut column = Vec::with_capacity(series.len());
    let mut mean = Vec::with_capacity(len);
    let mut std = Vec::with_capacity(len);
    for i in 0..len {
        column.clear();
        column.extend(series.iter().map(|s| s.as_ref()[i]));
        // Summing in sorted order keeps the result independent of run order.
        column.sort_by(f64::total_cmp);
        let m = column.iter().sum::<f64>() / n;
        let var = column.iter().map(|v| (v - m).powi(2)).sum::<f64>() / n;
        mean.push(m);
        std.push(var.sqrt());
    }

    Ok(AggregateSeries {
        mean,
        std,
        n_series: series.len(),
    })
}
