use std::fmt;
use std::str::FromStr;

use crate::error::{ConfigError, ConfigResult};
use crate::flag::{Flag, FlagValue};
use crate::header;

/// The set of `#define`s of a keymap, in definition order.
///
/// A name is defined at most once; `#undef` frees it again.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FlagSet {
    flags: Vec<Flag>,
}

impl FlagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a presence-only flag
    pub fn define(&mut self, name: impl Into<String>) -> ConfigResult<()> {
        self.insert(Flag {
            name: name.into(),
            value: None,
        })
    }

    /// Define a flag with replacement text
    pub fn define_value(&mut self, name: impl Into<String>, value: FlagValue) -> ConfigResult<()> {
        self.insert(Flag {
            name: name.into(),
            value: Some(value),
        })
    }

    pub fn insert(&mut self, flag: Flag) -> ConfigResult<()> {
        if self.contains(&flag.name) {
            return Err(ConfigError::DuplicateDefinition { name: flag.name });
        }
        self.flags.push(flag);
        Ok(())
    }

    /// Remove a flag, returns the removed definition if there was one
    pub fn undefine(&mut self, name: &str) -> Option<Flag> {
        let index = self.flags.iter().position(|f| f.name == name)?;
        Some(self.flags.remove(index))
    }

    pub fn get(&self, name: &str) -> Option<&Flag> {
        self.flags.iter().find(|f| f.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Flag> {
        self.flags.iter()
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Parse the contents of a `config.h`
    pub fn from_header(source: &str) -> ConfigResult<Self> {
        header::parse_header(source, "config.h")
    }

    /// Render as `config.h`, one `#define` per line
    pub fn to_header(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for FlagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for flag in &self.flags {
            writeln!(f, "{flag}")?;
        }
        Ok(())
    }
}

impl FromStr for FlagSet {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_header(s)
    }
}

impl<'a> IntoIterator for &'a FlagSet {
    type Item = &'a Flag;
    type IntoIter = std::slice::Iter<'a, Flag>;

    fn into_iter(self) -> Self::IntoIter {
        self.flags.iter()
    }
}
