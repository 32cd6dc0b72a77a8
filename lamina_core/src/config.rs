// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The configuration collaborator.
//!
//! Nodes resolve key combinations to named controls, and style or option
//! queries to values, through a [`Config`] owned by the application context.
//! Every lookup is keyed by the node's effective context (its own, or the
//! nearest ancestor's) and, for styles and options, the node's name. A miss
//! is `None`, never an error.

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};

use crate::backend::Color;
use crate::input::KeyCombo;

/// A resolved style or option value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum StyleValue {
    /// A color.
    Color(Color),
    /// An integer (sizes, paddings, counts).
    Int(i64),
    /// A flag.
    Bool(bool),
    /// Free text (titles, font names, paths).
    Text(String),
}

impl StyleValue {
    /// Returns the color, if this is a [`StyleValue::Color`].
    #[must_use]
    pub fn as_color(&self) -> Option<Color> {
        match self {
            Self::Color(c) => Some(*c),
            _ => None,
        }
    }

    /// Returns the integer, if this is a [`StyleValue::Int`].
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the text, if this is a [`StyleValue::Text`].
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Resolves controls, styles and options.
///
/// All methods default to "no mapping".
pub trait Config {
    /// Resolves a key combination to a control name.
    fn control(&self, combo: &KeyCombo, context: Option<&str>) -> Option<String> {
        _ = (combo, context);
        None
    }

    /// Resolves a style query for a node.
    fn style(&self, query: &str, name: Option<&str>, context: Option<&str>) -> Option<StyleValue> {
        _ = (query, name, context);
        None
    }

    /// Resolves an option query for a node.
    fn option(&self, query: &str, name: Option<&str>, context: Option<&str>) -> Option<StyleValue> {
        _ = (query, name, context);
        None
    }
}

/// A [`Config`] that resolves nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoConfig;

impl Config for NoConfig {}

const ANY: &str = "*";

/// A table-backed [`Config`].
///
/// Entries are registered per context and name, with `None` meaning "any".
/// Lookups try the most specific entry first:
/// `(context, name)`, `(context, *)`, `(*, name)`, `(*, *)`.
///
/// ```
/// use lamina_core::{Color, Key, KeyCombo, MapConfig, Modifiers, StyleValue};
/// use lamina_core::Config;
///
/// let config = MapConfig::new()
///     .with_control(None, "ctrl+q", "quit")
///     .with_style(Some("menu"), None, "bg-color", StyleValue::Color(Color::WHITE));
///
/// let combo = KeyCombo::new(Key::Char('q'), Modifiers::CTRL);
/// assert_eq!(config.control(&combo, Some("menu")).as_deref(), Some("quit"));
/// assert_eq!(
///     config.style("bg-color", Some("button"), Some("menu")),
///     Some(StyleValue::Color(Color::WHITE)),
/// );
/// ```
#[derive(Clone, Debug, Default)]
pub struct MapConfig {
    /// `(context, combo text) -> control`.
    controls: BTreeMap<(String, String), String>,
    /// `(context, name, query) -> value`.
    styles: BTreeMap<(String, String, String), StyleValue>,
    /// `(context, name, query) -> value`.
    options: BTreeMap<(String, String, String), StyleValue>,
}

impl MapConfig {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps the canonical combo text (see [`KeyCombo`]) to a control name.
    #[must_use]
    pub fn with_control(mut self, context: Option<&str>, combo: &str, control: &str) -> Self {
        self.controls.insert(
            (context.unwrap_or(ANY).to_string(), combo.to_string()),
            control.to_string(),
        );
        self
    }

    /// Adds a style entry.
    #[must_use]
    pub fn with_style(
        mut self,
        context: Option<&str>,
        name: Option<&str>,
        query: &str,
        value: StyleValue,
    ) -> Self {
        self.styles.insert(table_key(context, name, query), value);
        self
    }

    /// Adds an option entry.
    #[must_use]
    pub fn with_option(
        mut self,
        context: Option<&str>,
        name: Option<&str>,
        query: &str,
        value: StyleValue,
    ) -> Self {
        self.options.insert(table_key(context, name, query), value);
        self
    }
}

fn table_key(context: Option<&str>, name: Option<&str>, query: &str) -> (String, String, String) {
    (
        context.unwrap_or(ANY).to_string(),
        name.unwrap_or(ANY).to_string(),
        query.to_string(),
    )
}

fn lookup(
    table: &BTreeMap<(String, String, String), StyleValue>,
    query: &str,
    name: Option<&str>,
    context: Option<&str>,
) -> Option<StyleValue> {
    let cx = context.unwrap_or(ANY);
    let name = name.unwrap_or(ANY);
    [(cx, name), (cx, ANY), (ANY, name), (ANY, ANY)]
        .into_iter()
        .find_map(|(c, n)| table.get(&table_key(Some(c), Some(n), query)))
        .cloned()
}

impl Config for MapConfig {
    fn control(&self, combo: &KeyCombo, context: Option<&str>) -> Option<String> {
        let text = combo.to_string();
        [context.unwrap_or(ANY), ANY]
            .into_iter()
            .find_map(|c| self.controls.get(&(c.to_string(), text.clone())))
            .cloned()
    }

    fn style(&self, query: &str, name: Option<&str>, context: Option<&str>) -> Option<StyleValue> {
        lookup(&self.styles, query, name, context)
    }

    fn option(&self, query: &str, name: Option<&str>, context: Option<&str>) -> Option<StyleValue> {
        lookup(&self.options, query, name, context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{Key, Modifiers};

    fn table() -> MapConfig {
        MapConfig::new()
            .with_style(None, None, "bg-color", StyleValue::Color(Color::BLACK))
            .with_style(None, Some("button"), "bg-color", StyleValue::Color(Color::WHITE))
            .with_style(Some("menu"), None, "bg-color", StyleValue::Color(Color::rgb(1, 2, 3)))
            .with_style(
                Some("menu"),
                Some("button"),
                "bg-color",
                StyleValue::Color(Color::rgb(9, 9, 9)),
            )
            .with_option(None, Some("window"), "title", StyleValue::Text("demo".into()))
            .with_control(None, "escape", "back")
            .with_control(Some("editor"), "escape", "leave-editor")
    }

    #[test]
    fn style_lookup_prefers_most_specific() {
        let c = table();
        let color = |name, cx| c.style("bg-color", name, cx).and_then(|v| v.as_color());
        assert_eq!(color(Some("button"), Some("menu")), Some(Color::rgb(9, 9, 9)));
        assert_eq!(color(Some("label"), Some("menu")), Some(Color::rgb(1, 2, 3)));
        assert_eq!(color(Some("button"), Some("game")), Some(Color::WHITE));
        assert_eq!(color(None, None), Some(Color::BLACK));
        assert_eq!(c.style("font", Some("button"), None), None);
    }

    #[test]
    fn options_are_a_separate_table() {
        let c = table();
        assert_eq!(
            c.option("title", Some("window"), None)
                .as_ref()
                .and_then(StyleValue::as_text),
            Some("demo")
        );
        assert_eq!(c.style("title", Some("window"), None), None);
    }

    #[test]
    fn control_lookup_falls_back_to_any_context() {
        let c = table();
        let esc = KeyCombo::from(Key::Escape);
        assert_eq!(c.control(&esc, Some("editor")).as_deref(), Some("leave-editor"));
        assert_eq!(c.control(&esc, Some("menu")).as_deref(), Some("back"));
        assert_eq!(c.control(&esc, None).as_deref(), Some("back"));

        let shifted = KeyCombo::new(Key::Escape, Modifiers::SHIFT);
        assert_eq!(c.control(&shifted, None), None, "modifiers are part of the key");
    }

    #[test]
    fn no_config_resolves_nothing() {
        let c = NoConfig;
        assert_eq!(c.control(&KeyCombo::from(Key::Enter), None), None);
        assert_eq!(c.style("bg-color", None, None), None);
    }
}
