use crate::interval::TimeInterval;
use serde::{Deserialize, Serialize};

/// Identifies a series: where it was measured, who supplied it, what it
/// measures, its interval and scenario, plus an optional short alias.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TsIdent {
    pub location: String,
    pub source: String,
    pub data_type: String,
    pub interval: String,
    pub scenario: String,
    pub alias: Option<String>,
}

impl TsIdent {
    pub fn new(location: &str, data_type: &str, interval: TimeInterval) -> Self {
        TsIdent {
            location: location.to_string(),
            data_type: data_type.to_string(),
            interval: interval.to_string(),
            ..Default::default()
        }
    }

    pub fn with_source(mut self, source: &str) -> Self {
        self.source = source.to_string();
        self
    }

    pub fn with_scenario(mut self, scenario: &str) -> Self {
        self.scenario = scenario.to_string();
        self
    }

    pub fn with_alias(mut self, alias: &str) -> Self {
        self.alias = Some(alias.to_string());
        self
    }

    /// `location.source.type.interval[.scenario]`
    pub fn identifier(&self) -> String {
        let mut id = format!(
            "{}.{}.{}.{}",
            self.location, self.source, self.data_type, self.interval
        );
        if !self.scenario.is_empty() {
            id.push('.');
            id.push_str(&self.scenario);
        }
        id
    }

    /// The alias when one is set, otherwise the full identifier.
    pub fn name(&self) -> String {
        match &self.alias {
            Some(alias) if !alias.is_empty() => alias.clone(),
            _ => self.identifier(),
        }
    }

    /// Expand a legend template. Supported tokens: `%L` location, `%S`
    /// source, `%T` data type, `%I` interval, `%Z` scenario, `%A` alias,
    /// `%%` a literal percent. Unknown tokens are kept as written.
    pub fn format_legend(&self, template: &str) -> String {
        let mut out = String::with_capacity(template.len());
        let mut chars = template.chars();
        while let Some(c) = chars.next() {
            if c != '%' {
                out.push(c);
                continue;
            }
            match chars.next() {
                Some('L') => out.push_str(&self.location),
                Some('S') => out.push_str(&self.source),
                Some('T') => out.push_str(&self.data_type),
                Some('I') => out.push_str(&self.interval),
                Some('Z') => out.push_str(&self.scenario),
                Some('A') => out.push_str(self.alias.as_deref().unwrap_or("")),
                Some('%') => out.push('%'),
                Some(other) => {
                    out.push('%');
                    out.push(other);
                }
                None => out.push('%'),
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::TsIdent;
    use crate::interval::TimeInterval;

    #[test]
    fn test_identifier_and_name() {
        let ident = TsIdent::new("SHA", "FLOW", TimeInterval::MONTH).with_source("CDEC");
        assert_eq!(ident.identifier(), "SHA.CDEC.FLOW.Month");
        assert_eq!(ident.name(), "SHA.CDEC.FLOW.Month");

        let ident = ident.with_scenario("Hist").with_alias("Shasta");
        assert_eq!(ident.identifier(), "SHA.CDEC.FLOW.Month.Hist");
        assert_eq!(ident.name(), "Shasta");
    }

    #[test]
    fn test_format_legend() {
        let ident = TsIdent::new("ORO", "STORAGE", TimeInterval::MONTH).with_alias("Oroville");
        assert_eq!(ident.format_legend("%A (%L) %T, %I"), "Oroville (ORO) STORAGE, Month");
        assert_eq!(ident.format_legend("100%% %Q"), "100% %Q");
    }
}
