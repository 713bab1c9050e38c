//! Option schemas and the generic argument-vector engine.
//!
//! Every tool declares its options once, as an ordered slice of
//! [`OptionDescriptor`]s. The same slice drives CLI registration in the
//! `oratool` binary and argument rendering here, so the declared order is
//! the external argument order.
//!
//! # Module Structure
//! - `coerce`: typed parsing of raw option text into [`OptionValue`]s
//! - `loader`: SQL*Loader option set (`key=value` syntax)
//! - `runner`: SQL*Plus option set (short flags, logon, script)

pub mod coerce;
pub mod loader;
pub mod runner;

use crate::{LogonCredential, Result, error::OratoolError};
use std::collections::HashMap;
use std::fmt;

/// How an option is supplied on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    /// Present or absent, takes no value
    Flag,
    /// Must be supplied
    Required,
    /// May be supplied once
    Optional,
    /// Zero or more string values
    ArrayOfString,
}

/// Declared type of an option's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    /// `true` / `false`
    Bool,
    /// Signed integer
    Int,
    /// Free text, passed through verbatim
    Text,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => write!(f, "a boolean"),
            Self::Int => write!(f, "an integer"),
            Self::Text => write!(f, "text"),
        }
    }
}

/// One declared option of a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionDescriptor {
    /// Name registered with the CLI (`--name`)
    pub name: &'static str,
    /// Exact key or flag the external tool expects
    pub external_key: &'static str,
    /// Type of the value
    pub value_type: ValueType,
    /// Arity of the option
    pub kind: OptionKind,
    /// Help text
    pub description: &'static str,
}

impl OptionDescriptor {
    /// Declares an optional valued option.
    pub const fn optional(
        name: &'static str,
        external_key: &'static str,
        value_type: ValueType,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            external_key,
            value_type,
            kind: OptionKind::Optional,
            description,
        }
    }

    /// Declares a valueless flag.
    pub const fn flag(
        name: &'static str,
        external_key: &'static str,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            external_key,
            value_type: ValueType::Bool,
            kind: OptionKind::Flag,
            description,
        }
    }

    /// Declares a required positional text argument.
    pub const fn required(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            external_key: name,
            value_type: ValueType::Text,
            kind: OptionKind::Required,
            description,
        }
    }

    /// Declares a variadic positional text argument.
    pub const fn array(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            external_key: name,
            value_type: ValueType::Text,
            kind: OptionKind::ArrayOfString,
            description,
        }
    }
}

/// A typed option value. `Absent` never renders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OptionValue {
    /// Not supplied
    #[default]
    Absent,
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Text value
    Text(String),
}

impl OptionValue {
    /// Returns true if the value was not supplied.
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Returns the type of a present value.
    pub const fn value_type(&self) -> Option<ValueType> {
        match self {
            Self::Absent => None,
            Self::Bool(_) => Some(ValueType::Bool),
            Self::Int(_) => Some(ValueType::Int),
            Self::Text(_) => Some(ValueType::Text),
        }
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl<T: Into<Self>> From<Option<T>> for OptionValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Absent, Into::into)
    }
}

static ABSENT: OptionValue = OptionValue::Absent;

/// Values keyed by descriptor name. Insertion order is irrelevant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionValues {
    values: HashMap<&'static str, OptionValue>,
}

impl OptionValues {
    /// Creates an empty value set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the value for `name`, `Absent` when unset.
    pub fn get(&self, name: &str) -> &OptionValue {
        self.values.get(name).unwrap_or(&ABSENT)
    }

    /// Number of present values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true when no value is present.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over present values in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &OptionValue)> {
        self.values.iter().map(|(name, value)| (*name, value))
    }

    fn insert(&mut self, name: &'static str, value: OptionValue) {
        if value.is_absent() {
            self.values.remove(name);
        } else {
            self.values.insert(name, value);
        }
    }
}

/// An ordered list of declared options.
#[derive(Debug, Clone, Copy)]
pub struct OptionSchema {
    descriptors: &'static [OptionDescriptor],
}

impl OptionSchema {
    /// Wraps a declared descriptor table.
    pub const fn new(descriptors: &'static [OptionDescriptor]) -> Self {
        Self { descriptors }
    }

    /// Descriptors in declared order.
    pub const fn descriptors(&self) -> &'static [OptionDescriptor] {
        self.descriptors
    }

    /// Looks up a descriptor by CLI name.
    pub fn find(&self, name: &str) -> Option<&'static OptionDescriptor> {
        self.descriptors.iter().find(|d| d.name == name)
    }

    /// Stores `value` under `name` after checking it against the schema.
    ///
    /// # Errors
    /// Returns a configuration error if `name` is not declared or the value
    /// type does not match the declared type.
    pub fn set(
        &self,
        values: &mut OptionValues,
        name: &str,
        value: impl Into<OptionValue>,
    ) -> Result<()> {
        let descriptor = self
            .find(name)
            .ok_or_else(|| OratoolError::configuration(format!("unknown option '{name}'")))?;
        let value = value.into();

        if let Some(actual) = value.value_type()
            && actual != descriptor.value_type
        {
            return Err(OratoolError::configuration(format!(
                "option '{name}' expects {}, got {actual}",
                descriptor.value_type
            )));
        }

        values.insert(descriptor.name, value);
        Ok(())
    }

    /// Coerces raw text to the declared type of `name` and stores it.
    ///
    /// # Errors
    /// Returns a configuration error if `name` is not declared, or a
    /// coercion error if the text cannot be interpreted.
    pub fn set_raw(&self, values: &mut OptionValues, name: &str, raw: &str) -> Result<()> {
        let descriptor = self
            .find(name)
            .ok_or_else(|| OratoolError::configuration(format!("unknown option '{name}'")))?;
        let value = coerce::coerce(descriptor, raw)?;
        values.insert(descriptor.name, value);
        Ok(())
    }

    /// Renders present values in declared order.
    ///
    /// `format` supplies the textual form for one present value; returning
    /// `None` or an empty string contributes nothing.
    pub fn render<F>(&self, values: &OptionValues, format: F) -> Vec<String>
    where
        F: Fn(&OptionDescriptor, &OptionValue) -> Option<String>,
    {
        self.descriptors
            .iter()
            .filter_map(|descriptor| {
                let value = values.get(descriptor.name);
                if value.is_absent() {
                    None
                } else {
                    format(descriptor, value)
                }
            })
            .filter(|piece| !piece.is_empty())
            .collect()
    }
}

/// Assembles the final argument vector: the executable first, then every
/// non-empty rendered piece.
pub fn command_line<I>(executable: &str, pieces: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    std::iter::once(executable.to_string())
        .chain(pieces)
        .filter(|piece| !piece.is_empty())
        .collect()
}

/// A fully-populated external tool invocation.
///
/// Implementors render their own option syntax around a logon string; the
/// provided methods render it with the real or the redacted credential.
pub trait ToolCommand {
    /// Executable path, first element of the argument vector
    fn program(&self) -> &str;

    /// Credential embedded in the invocation
    fn logon(&self) -> &LogonCredential;

    /// Renders the argument vector around an already-rendered logon.
    fn render_with_logon(&self, logon: Option<String>) -> Vec<String>;

    /// Renders the argument vector handed to the process launcher.
    fn render(&self) -> Vec<String> {
        self.render_with_logon(self.logon().render())
    }

    /// Renders the argument vector with the password masked, for logs and
    /// dry runs.
    fn render_redacted(&self) -> Vec<String> {
        self.render_with_logon(self.logon().redacted())
    }
}
