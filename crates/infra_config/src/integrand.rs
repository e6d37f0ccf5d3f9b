//! Integrands selectable by name from configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A non-negative integrand with a closed-form antiderivative.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamedIntegrand {
    /// `f(x) = 2x`
    #[default]
    Linear,
    /// `f(x) = x²`
    Square,
    /// `f(x) = x³`
    Cubic,
    /// `f(x) = √x`
    Sqrt,
    /// `f(x) = eˣ`
    Exp,
    /// `f(x) = sin x`
    Sine,
}

impl NamedIntegrand {
    /// Every integrand, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Linear,
        Self::Square,
        Self::Cubic,
        Self::Sqrt,
        Self::Exp,
        Self::Sine,
    ];

    /// Evaluates the integrand.
    pub fn eval(self, x: f64) -> f64 {
        match self {
            Self::Linear => 2.0 * x,
            Self::Square => x * x,
            Self::Cubic => x * x * x,
            Self::Sqrt => x.sqrt(),
            Self::Exp => x.exp(),
            Self::Sine => x.sin(),
        }
    }

    /// Returns the integrand as a closure usable by an integration kernel.
    pub fn as_fn(self) -> impl Fn(f64) -> f64 + Sync + Send + Copy {
        move |x| self.eval(x)
    }

    fn antiderivative(self, x: f64) -> f64 {
        match self {
            Self::Linear => x * x,
            Self::Square => x.powi(3) / 3.0,
            Self::Cubic => x.powi(4) / 4.0,
            Self::Sqrt => 2.0 / 3.0 * x.powf(1.5),
            Self::Exp => x.exp(),
            Self::Sine => -x.cos(),
        }
    }

    /// Exact value of the integral over `[lower, upper]`, when defined.
    pub fn exact_integral(self, lower: f64, upper: f64) -> Option<f64> {
        if self == Self::Sqrt && lower < 0.0 {
            return None;
        }
        Some(self.antiderivative(upper) - self.antiderivative(lower))
    }

    /// Human-readable formula.
    pub fn formula(self) -> &'static str {
        match self {
            Self::Linear => "2x",
            Self::Square => "x^2",
            Self::Cubic => "x^3",
            Self::Sqrt => "sqrt(x)",
            Self::Exp => "exp(x)",
            Self::Sine => "sin(x)",
        }
    }
}

impl fmt::Display for NamedIntegrand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Linear => "linear",
            Self::Square => "square",
            Self::Cubic => "cubic",
            Self::Sqrt => "sqrt",
            Self::Exp => "exp",
            Self::Sine => "sine",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for NamedIntegrand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|i| i.to_string().eq_ignore_ascii_case(s) || i.formula() == s)
            .ok_or_else(|| {
                let names: Vec<String> = Self::ALL.iter().map(ToString::to_string).collect();
                format!("unknown integrand '{}', expected one of {}", s, names.join(", "))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_linear_integral_over_unit_interval() {
        assert_relative_eq!(NamedIntegrand::Linear.exact_integral(1.0, 2.0).unwrap(), 3.0);
        assert_eq!(NamedIntegrand::Linear.eval(1.5), 3.0);
    }

    #[test]
    fn test_exact_integrals() {
        assert_relative_eq!(
            NamedIntegrand::Square.exact_integral(0.0, 3.0).unwrap(),
            9.0,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            NamedIntegrand::Sine.exact_integral(0.0, std::f64::consts::PI).unwrap(),
            2.0,
            epsilon = 1e-12
        );
        assert_eq!(NamedIntegrand::Sqrt.exact_integral(-1.0, 1.0), None);
    }

    #[test]
    fn test_parse_by_name_or_formula() {
        assert_eq!("Linear".parse::<NamedIntegrand>().unwrap(), NamedIntegrand::Linear);
        assert_eq!("x^2".parse::<NamedIntegrand>().unwrap(), NamedIntegrand::Square);
        let err = "tan".parse::<NamedIntegrand>().unwrap_err();
        assert!(err.contains("linear"));
    }

    #[test]
    fn test_closure_matches_eval() {
        let f = NamedIntegrand::Exp.as_fn();
        assert_eq!(f(0.5), NamedIntegrand::Exp.eval(0.5));
    }
}
