use serde::{Deserialize, Serialize};
use std::fmt;

/// One graphable metric sample.
///
/// `warn` and `crit` are always carried (possibly unset) so consumers see a
/// fixed layout. `min`/`max` are only present when boundaries were requested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Perfdata {
    pub name: String,
    pub value: f64,
    pub warn: Option<f64>,
    pub crit: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boundaries: Option<(Option<f64>, Option<f64>)>,
}

impl Perfdata {
    pub fn new<S: Into<String>>(name: S, value: f64, warn: Option<f64>, crit: Option<f64>) -> Self {
        Self {
            name: name.into(),
            value,
            warn,
            crit,
            boundaries: None,
        }
    }

    pub fn with_boundaries(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.boundaries = Some((min, max));
        self
    }

    pub fn min(&self) -> Option<f64> {
        self.boundaries.and_then(|(min, _)| min)
    }

    pub fn max(&self) -> Option<f64> {
        self.boundaries.and_then(|(_, max)| max)
    }
}

/// Nagios style: `name=value;warn;crit;min;max`, trailing empty fields dropped.
impl fmt::Display for Perfdata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let optional = |v: Option<f64>| v.map(|v| v.to_string()).unwrap_or_default();

        let mut fields = vec![
            self.value.to_string(),
            optional(self.warn),
            optional(self.crit),
            optional(self.min()),
            optional(self.max()),
        ];
        while fields.len() > 1 && fields.last().is_some_and(|s| s.is_empty()) {
            fields.pop();
        }

        let name = if self.name.contains(char::is_whitespace) {
            format!("'{}'", self.name)
        } else {
            self.name.clone()
        };
        write!(f, "{}={}", name, fields.join(";"))
    }
}
