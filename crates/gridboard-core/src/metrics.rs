// ABOUTME: Prometheus metric selector builder.
// ABOUTME: Renders `name{label="value", ...}` with declared-label checking and defaults.

/// How a label is matched in a selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Matcher {
    Eq(String),
    Ne(String),
    Regex(String),
    NotRegex(String),
    /// Any of the values, rendered as an alternation regex
    AnyOf(Vec<String>),
    /// Drop the label, including any default
    Unset,
}

impl Matcher {
    pub fn eq(value: impl Into<String>) -> Self {
        Matcher::Eq(value.into())
    }

    pub fn regex(value: impl Into<String>) -> Self {
        Matcher::Regex(value.into())
    }

    pub fn any_of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Matcher::AnyOf(values.into_iter().map(Into::into).collect())
    }

    fn render(&self, label: &str) -> Option<String> {
        let (op, value) = match self {
            Matcher::Eq(v) => ("=", v.clone()),
            Matcher::Ne(v) => ("!=", v.clone()),
            Matcher::Regex(v) => ("=~", v.clone()),
            Matcher::NotRegex(v) => ("!~", v.clone()),
            Matcher::AnyOf(values) => ("=~", values.join("|")),
            Matcher::Unset => return None,
        };
        Some(format!("{label}{op}\"{value}\""))
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MetricError {
    #[error("Invalid label `{label}` for {metric}")]
    UnknownLabel { metric: String, label: String },
}

/// Ordered label matchers. Replacing a label keeps its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Matchers(Vec<(String, Matcher)>);

impl Matchers {
    fn set(&mut self, label: &str, matcher: Matcher) {
        match self.0.iter_mut().find(|(l, _)| l == label) {
            Some(slot) => slot.1 = matcher,
            None => self.0.push((label.to_string(), matcher)),
        }
    }

    fn render(&self) -> String {
        self.0
            .iter()
            .filter_map(|(label, matcher)| matcher.render(label))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A Prometheus metric with an optional declared label set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metric {
    pub name: String,
    pub description: Option<String>,
    pub unit: Option<String>,
    labels: Vec<String>,
    defaults: Matchers,
}

impl Metric {
    /// An empty `labels` list disables label checking.
    pub fn new<I, S>(name: impl Into<String>, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            description: None,
            unit: None,
            labels: labels.into_iter().map(Into::into).collect(),
            defaults: Matchers::default(),
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Matcher applied to every selector unless overridden at the call site
    pub fn with_default(mut self, label: &str, matcher: Matcher) -> Result<Self, MetricError> {
        self.check_label(label)?;
        self.defaults.set(label, matcher);
        Ok(self)
    }

    /// Render `name{matchers}`, call-site matchers overriding defaults
    pub fn select(&self, matchers: &[(&str, Matcher)]) -> Result<String, MetricError> {
        let mut merged = self.defaults.clone();
        for (label, matcher) in matchers {
            self.check_label(label)?;
            merged.set(label, matcher.clone());
        }
        Ok(format!("{}{{{}}}", self.name, merged.render()))
    }

    fn check_label(&self, label: &str) -> Result<(), MetricError> {
        if self.labels.is_empty() || self.labels.iter().any(|l| l == label) {
            Ok(())
        } else {
            Err(MetricError::UnknownLabel {
                metric: self.name.clone(),
                label: label.to_string(),
            })
        }
    }
}

/// Counter metric: selectors are range vectors over `$__rate_interval`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterMetric(Metric);

impl CounterMetric {
    pub fn new<I, S>(name: impl Into<String>, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(Metric::new(name, labels))
    }

    pub fn metric(&self) -> &Metric {
        &self.0
    }

    pub fn with_default(self, label: &str, matcher: Matcher) -> Result<Self, MetricError> {
        self.0.with_default(label, matcher).map(Self)
    }

    pub fn select(&self, matchers: &[(&str, Matcher)]) -> Result<String, MetricError> {
        Ok(self.raw(matchers)? + "[$__rate_interval]")
    }

    /// Plain instant selector without the range
    pub fn raw(&self, matchers: &[(&str, Matcher)]) -> Result<String, MetricError> {
        self.0.select(matchers)
    }
}

/// Histogram metric: `_bucket`, `_count` and `_sum` counters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketMetric {
    pub bucket: CounterMetric,
    pub count: CounterMetric,
    pub sum: CounterMetric,
    pub description: Option<String>,
    pub unit: Option<String>,
}

impl BucketMetric {
    pub fn new(name: &str, labels: &[&str]) -> Self {
        let mut bucket_labels = labels.to_vec();
        if !labels.is_empty() {
            bucket_labels.insert(0, "le");
        }
        Self {
            bucket: CounterMetric::new(format!("{name}_bucket"), bucket_labels),
            count: CounterMetric::new(format!("{name}_count"), labels.iter().copied()),
            sum: CounterMetric::new(format!("{name}_sum"), labels.iter().copied()),
            description: None,
            unit: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Apply the same default to all three series
    pub fn with_default(self, label: &str, matcher: Matcher) -> Result<Self, MetricError> {
        Ok(Self {
            bucket: self.bucket.with_default(label, matcher.clone())?,
            count: self.count.with_default(label, matcher.clone())?,
            sum: self.sum.with_default(label, matcher)?,
            ..self
        })
    }
}
