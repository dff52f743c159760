//! Trim request rules
//!
//! Turns a raw `{start?, end?, duration?}` body into a cut window, checking
//! it against the asset's recorded duration. Check order and messages are
//! part of the API contract.

use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::TrimRequest;

const MISSING_BOUNDS: &str = "Start or end parameter is required.";
const NOT_NUMERIC: &str = "Start, end or duration parameters must be numbers.";
const INVALID_TIMES: &str = "Invalid start or end times.";
const INVALID_DURATION: &str = "Invalid duration times.";

/// Numeric trim parameters, all in seconds
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TrimParams {
    pub start: Option<f64>,
    pub end: Option<f64>,
    pub duration: Option<f64>,
}

/// Resolved cut: `length` seconds from `start`, or to the end of the clip
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrimWindow {
    pub start: f64,
    pub length: Option<f64>,
}

impl TrimWindow {
    /// Exclusive end of the window, when bounded
    pub fn end(&self) -> Option<f64> {
        self.length.map(|length| self.start + length)
    }
}

impl TrimParams {
    /// Presence check first, then numeric coercion.
    /// Numbers and numeric strings are accepted; anything else is rejected.
    pub fn from_request(req: &TrimRequest) -> Result<Self> {
        if req.start.is_none() && req.end.is_none() {
            return Err(AppError::Validation(MISSING_BOUNDS.to_string()));
        }

        Ok(Self {
            start: numeric(req.start.as_ref())?,
            end: numeric(req.end.as_ref())?,
            duration: numeric(req.duration.as_ref())?,
        })
    }

    /// Range checks against the currently recorded duration.
    ///
    /// `end >= 0` is only enforced when `start` is also supplied.
    pub fn validate(&self, recorded: f64) -> Result<()> {
        let invalid_times = || AppError::Validation(INVALID_TIMES.to_string());

        if let Some(start) = self.start {
            if start < 0.0 || start > recorded {
                return Err(invalid_times());
            }
        }

        if let Some(end) = self.end {
            if end > recorded {
                return Err(invalid_times());
            }
            if self.start.is_some() && end < 0.0 {
                return Err(invalid_times());
            }
        }

        if let (Some(start), Some(end)) = (self.start, self.end) {
            if end <= start {
                return Err(invalid_times());
            }
        }

        if let Some(duration) = self.duration {
            let overruns = match (self.start, self.end) {
                (Some(start), _) => start + duration > recorded,
                (None, Some(end)) => recorded - duration - end < 0.0,
                (None, None) => false,
            };
            if overruns {
                return Err(AppError::Validation(INVALID_DURATION.to_string()));
            }
        }

        Ok(())
    }

    /// Pick the cut window. Precedence:
    /// start only, start + duration, end only, end + duration, start + end.
    pub fn resolve(&self, recorded: f64) -> TrimWindow {
        match (self.start, self.end, self.duration) {
            (Some(start), None, None) => TrimWindow { start, length: None },
            (Some(start), _, Some(duration)) => TrimWindow {
                start,
                length: Some(duration),
            },
            (None, Some(end), None) => TrimWindow {
                start: 0.0,
                length: Some(end),
            },
            (None, Some(end), Some(duration)) => TrimWindow {
                start: recorded - duration - end,
                length: Some(duration),
            },
            (Some(start), Some(end), None) => TrimWindow {
                start,
                length: Some(end - start),
            },
            // from_request guarantees start or end
            (None, None, _) => TrimWindow {
                start: 0.0,
                length: None,
            },
        }
    }
}

/// Parse, validate and resolve a trim body in one step
pub fn plan_trim(req: &TrimRequest, recorded: f64) -> Result<TrimWindow> {
    let params = TrimParams::from_request(req)?;
    params.validate(recorded)?;
    Ok(params.resolve(recorded))
}

fn numeric(value: Option<&Value>) -> Result<Option<f64>> {
    let Some(value) = value else {
        return Ok(None);
    };

    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    parsed
        .filter(|v| v.is_finite())
        .map(Some)
        .ok_or_else(|| AppError::Validation(NOT_NUMERIC.to_string()))
}
