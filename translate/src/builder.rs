// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Assembly of the generated FRR configuration

use std::fmt::Display;
use std::ops::AddAssign;

/// Separator line closing every generated configuration
pub const MARKER: &str = "!";

#[derive(Debug, Default, Clone, PartialEq)]
/// Ordered, append-only sequence of configuration lines.
pub struct ConfigBuilder {
    lines: Vec<String>,
}

/// Lines joined with newlines. The text ends with the last line, without a newline.
impl Display for ConfigBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut lines = self.lines.iter();
        if let Some(first) = lines.next() {
            write!(f, "{first}")?;
        }
        for line in lines {
            write!(f, "\n{line}")?;
        }
        Ok(())
    }
}

impl ConfigBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self { lines: vec![] }
    }
    fn append(&mut self, line: &str) {
        self.lines.push(line.to_owned());
    }
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
    /// Close the configuration with the [`MARKER`] line, so that it is never empty
    pub fn finish(&mut self) {
        self.append(MARKER);
    }
}

/// Make it very easy to add config lines to a [`ConfigBuilder`]
impl AddAssign<Self> for ConfigBuilder {
    fn add_assign(&mut self, mut rhs: Self) {
        self.lines.append(&mut rhs.lines);
    }
}
impl AddAssign<String> for ConfigBuilder {
    fn add_assign(&mut self, rhs: String) {
        self.lines.push(rhs);
    }
}
impl AddAssign<&str> for ConfigBuilder {
    fn add_assign(&mut self, rhs: &str) {
        self.append(rhs);
    }
}
impl<'a> Extend<&'a String> for ConfigBuilder {
    fn extend<T: IntoIterator<Item = &'a String>>(&mut self, iter: T) {
        iter.into_iter().for_each(|line| self.append(line));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let mut cfg = ConfigBuilder::new();
        assert!(cfg.is_empty());
        cfg += "frr defaults datacenter";
        cfg += format!("hostname {}", "GW1");
        cfg += MARKER;
        cfg += MARKER;

        let mut other = ConfigBuilder::new();
        other += "log stdout";
        cfg += other;
        cfg.finish();

        assert_eq!(cfg.len(), 6);
        assert_eq!(
            cfg.to_string(),
            "frr defaults datacenter\nhostname GW1\n!\n!\nlog stdout\n!"
        );
    }

    #[test]
    fn test_empty_builder_finished() {
        let mut cfg = ConfigBuilder::new();
        assert_eq!(cfg.to_string(), "");
        cfg.finish();
        assert_eq!(cfg.lines(), [MARKER]);
        assert_eq!(cfg.to_string(), "!");
    }
}
