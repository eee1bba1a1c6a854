//! Parameter domains and parameter nodes.

use std::collections::HashSet;
use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{Value, ValueKind};

/// Closed description of the legal values of one parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Domain {
    /// Ordered set of distinct text tokens.
    Categorical { values: Vec<String> },
    /// Inclusive integer range.
    Integer { min: i64, max: i64 },
    /// Inclusive floating-point range.
    Float { min: f64, max: f64 },
    /// Inclusive integer range sampled on a logarithmic scale.
    LogInteger { min: i64, max: i64 },
    /// Inclusive floating-point range sampled on a logarithmic scale.
    LogFloat { min: f64, max: f64 },
}

/// Domain construction errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    #[error("Categorical domain must contain at least one value")]
    EmptyCategorical,
    #[error("Categorical value '{0}' is listed more than once")]
    DuplicateValue(String),
    #[error("Minimum {min} is larger than maximum {max}")]
    InvertedBounds { min: String, max: String },
    #[error("Bounds of a continuous domain must be finite")]
    NonFiniteBound,
    #[error("Width of the continuous domain [{min}, {max}] is not representable")]
    UnboundedWidth { min: f64, max: f64 },
    #[error("Bounds of a logarithmic domain must be strictly positive, got [{min}, {max}]")]
    NonPositiveLogBound { min: String, max: String },
}

impl Domain {
    /// Create a categorical domain, keeping the given token order.
    pub fn categorical<I, S>(values: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            return Err(DomainError::EmptyCategorical);
        }

        let mut seen = HashSet::with_capacity(values.len());
        for value in &values {
            if !seen.insert(value.as_str()) {
                return Err(DomainError::DuplicateValue(value.clone()));
            }
        }

        Ok(Self::Categorical { values })
    }

    /// Create a linear integer domain.
    pub fn integer(min: i64, max: i64) -> Result<Self, DomainError> {
        check_order(min, max)?;
        Ok(Self::Integer { min, max })
    }

    /// Create a linear continuous domain.
    pub fn float(min: f64, max: f64) -> Result<Self, DomainError> {
        check_finite(min, max)?;
        check_order(min, max)?;
        if !(max - min).is_finite() {
            return Err(DomainError::UnboundedWidth { min, max });
        }
        Ok(Self::Float { min, max })
    }

    /// Create a logarithmic integer domain.
    pub fn log_integer(min: i64, max: i64) -> Result<Self, DomainError> {
        check_order(min, max)?;
        if min <= 0 {
            return Err(DomainError::NonPositiveLogBound {
                min: min.to_string(),
                max: max.to_string(),
            });
        }
        Ok(Self::LogInteger { min, max })
    }

    /// Create a logarithmic continuous domain.
    pub fn log_float(min: f64, max: f64) -> Result<Self, DomainError> {
        check_finite(min, max)?;
        check_order(min, max)?;
        if min <= 0.0 {
            return Err(DomainError::NonPositiveLogBound {
                min: min.to_string(),
                max: max.to_string(),
            });
        }
        Ok(Self::LogFloat { min, max })
    }

    /// Kind of values this domain holds.
    #[inline]
    pub fn kind(&self) -> ValueKind {
        match self {
            Domain::Categorical { .. } => ValueKind::Text,
            Domain::Integer { .. } | Domain::LogInteger { .. } => ValueKind::Integer,
            Domain::Float { .. } | Domain::LogFloat { .. } => ValueKind::Float,
        }
    }

    #[inline]
    pub fn is_categorical(&self) -> bool {
        matches!(self, Domain::Categorical { .. })
    }

    /// Whether samplers should draw on a logarithmic scale.
    #[inline]
    pub fn is_logarithmic(&self) -> bool {
        matches!(self, Domain::LogInteger { .. } | Domain::LogFloat { .. })
    }

    /// Check the value's kind, ignoring bounds.
    #[inline]
    pub fn matches_kind(&self, value: &Value) -> bool {
        value.kind() == self.kind()
    }

    /// Check whether the value is a legal member of this domain.
    pub fn contains(&self, value: &Value) -> bool {
        match (self, value) {
            (Domain::Categorical { values }, Value::Text(token)) => values.contains(token),
            (Domain::Integer { min, max }, Value::Integer(v))
            | (Domain::LogInteger { min, max }, Value::Integer(v)) => min <= v && v <= max,
            (Domain::Float { min, max }, Value::Float(v))
            | (Domain::LogFloat { min, max }, Value::Float(v)) => *min <= *v && *v <= *max,
            _ => false,
        }
    }

    /// Convert a textual token to a value of this domain's kind.
    ///
    /// Bounds are not checked; categorical tokens are taken as-is.
    pub fn coerce(&self, token: &str) -> Option<Value> {
        match self.kind() {
            ValueKind::Text => Some(Value::Text(token.to_string())),
            ValueKind::Integer => token.parse::<i64>().ok().map(Value::Integer),
            ValueKind::Float => token.parse::<f64>().ok().map(Value::Float),
        }
    }

    /// Integer bounds, if this is an integer domain.
    pub fn integer_bounds(&self) -> Option<(i64, i64)> {
        match self {
            Domain::Integer { min, max } | Domain::LogInteger { min, max } => Some((*min, *max)),
            _ => None,
        }
    }

    /// Continuous bounds, if this is a continuous domain.
    pub fn float_bounds(&self) -> Option<(f64, f64)> {
        match self {
            Domain::Float { min, max } | Domain::LogFloat { min, max } => Some((*min, *max)),
            _ => None,
        }
    }

    /// Draw a random member of this domain.
    ///
    /// Logarithmic domains are sampled log-uniformly.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Value {
        match self {
            Domain::Categorical { values } => {
                let idx = rng.gen_range(0..values.len());
                Value::Text(values[idx].clone())
            }
            Domain::Integer { min, max } => Value::Integer(rng.gen_range(*min..=*max)),
            Domain::Float { min, max } => Value::Float(rng.gen_range(*min..=*max)),
            Domain::LogInteger { min, max } => {
                // Sample [min, max + 1) in log space and floor, so every integer gets its share.
                let log_min = (*min as f64).ln();
                let log_max = (max.saturating_add(1) as f64).ln();
                if log_min >= log_max {
                    // Bounds too close together to tell apart in log space.
                    return Value::Integer(rng.gen_range(*min..=*max));
                }
                let sampled = rng.gen_range(log_min..log_max).exp().floor() as i64;
                Value::Integer(sampled.clamp(*min, *max))
            }
            Domain::LogFloat { min, max } => {
                let sampled = rng.gen_range(min.ln()..=max.ln()).exp();
                Value::Float(sampled.clamp(*min, *max))
            }
        }
    }
}

fn check_order<T: PartialOrd + fmt::Display>(min: T, max: T) -> Result<(), DomainError> {
    if min > max {
        return Err(DomainError::InvertedBounds {
            min: min.to_string(),
            max: max.to_string(),
        });
    }
    Ok(())
}

fn check_finite(min: f64, max: f64) -> Result<(), DomainError> {
    if !min.is_finite() || !max.is_finite() {
        return Err(DomainError::NonFiniteBound);
    }
    Ok(())
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Domain::Categorical { values } => write!(f, "{{{}}}", values.join(", ")),
            Domain::Integer { min, max } => write!(f, "[{}, {}] integer", min, max),
            Domain::Float { min, max } => write!(f, "[{}, {}]", min, max),
            Domain::LogInteger { min, max } => write!(f, "[{}, {}] integer log", min, max),
            Domain::LogFloat { min, max } => write!(f, "[{}, {}] log", min, max),
        }
    }
}

/// A tunable parameter: a unique identifier paired with its domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterNode {
    /// Unique identifier.
    pub identifier: String,
    /// Legal values.
    pub domain: Domain,
}

impl ParameterNode {
    pub fn new(identifier: impl Into<String>, domain: Domain) -> Self {
        Self {
            identifier: identifier.into(),
            domain,
        }
    }
}
