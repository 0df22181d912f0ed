//! Types for the documentation corpus
//!
//! A page describes one module or manual chapter. Pages own their members
//! (methods, properties, signals) and optional named method groups. Every
//! optional part of the corpus is an explicit `Option` or a possibly empty
//! `Vec`, so consumers never have to probe for missing fields.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Root used for pages that declare no category
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Separator between segments of a category written as a single string
pub const CATEGORY_SEPARATOR: char = '/';

/// Ordered grouping labels of a page, e.g. `["Libraries", "Core"]`
///
/// Deserializes from either `"Libraries/Core"` or `["Libraries", "Core"]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "RawCategory", into = "Vec<String>")]
pub struct CategoryPath(Vec<String>);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCategory {
    Joined(String),
    Segments(Vec<String>),
}

impl From<RawCategory> for CategoryPath {
    fn from(raw: RawCategory) -> Self {
        match raw {
            RawCategory::Joined(path) => CategoryPath::parse(&path),
            RawCategory::Segments(segments) => CategoryPath::from_segments(segments),
        }
    }
}

impl From<CategoryPath> for Vec<String> {
    fn from(path: CategoryPath) -> Self {
        path.0
    }
}

impl CategoryPath {
    /// Parse a slash separated category string
    pub fn parse(path: &str) -> Self {
        Self::from_segments(path.split(CATEGORY_SEPARATOR).map(str::to_string))
    }

    /// Build a path from segments, dropping blank ones
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments
            .into_iter()
            .map(Into::into)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        if segments.is_empty() {
            Self::default()
        } else {
            Self(segments)
        }
    }

    /// The first segment, used for root priority
    pub fn root(&self) -> &str {
        // Never empty: constructors fall back to `UNCATEGORIZED`
        self.0.first().map_or(UNCATEGORIZED, String::as_str)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

impl Default for CategoryPath {
    fn default() -> Self {
        Self(vec![UNCATEGORIZED.to_string()])
    }
}

impl From<&str> for CategoryPath {
    fn from(path: &str) -> Self {
        Self::parse(path)
    }
}

impl<const N: usize> From<[&str; N]> for CategoryPath {
    fn from(segments: [&str; N]) -> Self {
        Self::from_segments(segments)
    }
}

impl fmt::Display for CategoryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "{CATEGORY_SEPARATOR}")?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}

/// Illustrative snippets attached to a member: one string or a list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawExamples", into = "Vec<String>")]
pub struct Examples(Vec<String>);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawExamples {
    One(String),
    Many(Vec<String>),
}

impl From<RawExamples> for Examples {
    fn from(raw: RawExamples) -> Self {
        match raw {
            RawExamples::One(example) => Self(vec![example]),
            RawExamples::Many(examples) => Self(examples),
        }
    }
}

impl From<Examples> for Vec<String> {
    fn from(examples: Examples) -> Self {
        examples.0
    }
}

impl Examples {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl From<&str> for Examples {
    fn from(example: &str) -> Self {
        Self(vec![example.to_string()])
    }
}

impl From<Vec<String>> for Examples {
    fn from(examples: Vec<String>) -> Self {
        Self(examples)
    }
}

/// Implementation status markers of a member
///
/// At most one marker should be set. When several are present all of them
/// are rendered; see [`Status::is_contradictory`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    /// Free-form "not implemented" marker text
    #[serde(rename = "status", default, skip_serializing_if = "Option::is_none")]
    pub unimplemented: Option<String>,
    /// Version the member was implemented in
    #[serde(alias = "since", default, skip_serializing_if = "Option::is_none")]
    pub implemented: Option<String>,
    /// Version the member was deprecated in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<String>,
}

impl Status {
    /// Badges for every marker that is present, in display order
    pub fn badges(&self) -> Vec<Badge> {
        let mut badges = Vec::new();
        if let Some(text) = &self.unimplemented {
            badges.push(Badge::NotImplemented(text.clone()));
        }
        if let Some(version) = &self.implemented {
            badges.push(Badge::Implemented(version.clone()));
        }
        if let Some(version) = &self.deprecated {
            badges.push(Badge::Deprecated(version.clone()));
        }
        badges
    }

    /// More than one marker claims to be authoritative
    pub fn is_contradictory(&self) -> bool {
        [
            self.unimplemented.is_some(),
            self.implemented.is_some(),
            self.deprecated.is_some(),
        ]
        .into_iter()
        .filter(|set| *set)
        .count()
            > 1
    }
}

/// A rendered status marker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Badge {
    NotImplemented(String),
    Implemented(String),
    Deprecated(String),
}

impl Badge {
    pub fn css_class(&self) -> &'static str {
        match self {
            Badge::NotImplemented(_) => "version-badge not-implemented",
            Badge::Implemented(_) => "version-badge since",
            Badge::Deprecated(_) => "version-badge deprecated",
        }
    }

    pub fn label(&self) -> String {
        match self {
            Badge::NotImplemented(text) => text.clone(),
            Badge::Implemented(_) => "Implemented".to_string(),
            Badge::Deprecated(version) => format!("Deprecated {version}"),
        }
    }
}

/// A callable member of a page or group
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MethodRecord {
    pub name: String,
    /// Return type descriptor
    #[serde(default, alias = "return_type")]
    pub ret: String,
    /// Parameter descriptor, e.g. `(x: float)`
    #[serde(default)]
    pub params: String,
    #[serde(default)]
    pub desc: String,
    /// Technical notes shown in the detail view
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default)]
    pub example: Examples,
    #[serde(flatten)]
    pub status: Status,
}

impl MethodRecord {
    pub fn new(name: impl Into<String>, ret: impl Into<String>, params: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ret: ret.into(),
            params: params.into(),
            ..Self::default()
        }
    }

    pub fn with_desc(mut self, desc: impl Into<String>) -> Self {
        self.desc = desc.into();
        self
    }

    pub fn with_example(mut self, example: impl Into<Examples>) -> Self {
        self.example = example.into();
        self
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }
}

/// A typed value exposed by a page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyRecord {
    pub name: String,
    #[serde(rename = "type", default)]
    pub ty: String,
    #[serde(default)]
    pub default: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub example: Examples,
    #[serde(flatten)]
    pub status: Status,
}

impl PropertyRecord {
    pub fn new(name: impl Into<String>, ty: impl Into<String>, default: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            default: default.into(),
            ..Self::default()
        }
    }

    pub fn with_desc(mut self, desc: impl Into<String>) -> Self {
        self.desc = desc.into();
        self
    }
}

/// An event emitted by a page's module
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignalRecord {
    pub name: String,
    #[serde(default)]
    pub params: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub example: Examples,
    #[serde(flatten)]
    pub status: Status,
}

impl SignalRecord {
    pub fn new(name: impl Into<String>, params: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: params.into(),
            ..Self::default()
        }
    }

    pub fn with_desc(mut self, desc: impl Into<String>) -> Self {
        self.desc = desc.into();
        self
    }
}

/// A named constant listed on a page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstantRecord {
    pub name: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub desc: String,
}

/// A titled subset of a page's methods
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupRecord {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub methods: Vec<MethodRecord>,
}

impl GroupRecord {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_method(mut self, method: MethodRecord) -> Self {
        self.methods.push(method);
        self
    }
}

/// One documentation page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    pub title: String,
    #[serde(default)]
    pub category: CategoryPath,
    /// Explicit rank inside its category; absent sorts last
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
    /// Title of the page this one extends
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inherits: Option<String>,
    /// Rich text (HTML) body
    #[serde(default)]
    pub description: String,
    /// Page level code example
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    #[serde(default)]
    pub methods: Vec<MethodRecord>,
    #[serde(default)]
    pub properties: Vec<PropertyRecord>,
    #[serde(default)]
    pub signals: Vec<SignalRecord>,
    #[serde(default)]
    pub groups: Vec<GroupRecord>,
    #[serde(default)]
    pub constants: Vec<ConstantRecord>,
}

impl PageRecord {
    pub fn new(title: impl Into<String>, category: impl Into<CategoryPath>) -> Self {
        Self {
            title: title.into(),
            category: category.into(),
            ..Self::default()
        }
    }

    pub fn with_order(mut self, order: u32) -> Self {
        self.order = Some(order);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_method(mut self, method: MethodRecord) -> Self {
        self.methods.push(method);
        self
    }

    pub fn with_property(mut self, property: PropertyRecord) -> Self {
        self.properties.push(property);
        self
    }

    pub fn with_signal(mut self, signal: SignalRecord) -> Self {
        self.signals.push(signal);
        self
    }

    pub fn with_group(mut self, group: GroupRecord) -> Self {
        self.groups.push(group);
        self
    }

    /// Flat methods followed by the methods of every group
    pub fn all_methods(&self) -> impl Iterator<Item = &MethodRecord> {
        self.methods
            .iter()
            .chain(self.groups.iter().flat_map(|g| g.methods.iter()))
    }

    /// Every member of the page: methods (flat and grouped), properties, signals
    pub fn members(&self) -> impl Iterator<Item = Member<'_>> {
        self.all_methods()
            .map(Member::Method)
            .chain(self.properties.iter().map(Member::Property))
            .chain(self.signals.iter().map(Member::Signal))
    }
}

/// Borrowed view over any member record
#[derive(Debug, Clone, Copy)]
pub enum Member<'a> {
    Method(&'a MethodRecord),
    Property(&'a PropertyRecord),
    Signal(&'a SignalRecord),
}

impl<'a> Member<'a> {
    pub fn name(&self) -> &'a str {
        match self {
            Member::Method(m) => &m.name,
            Member::Property(p) => &p.name,
            Member::Signal(s) => &s.name,
        }
    }

    pub fn desc(&self) -> &'a str {
        match self {
            Member::Method(m) => &m.desc,
            Member::Property(p) => &p.desc,
            Member::Signal(s) => &s.desc,
        }
    }
}
