// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Piimark and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Annotation set of a record, keyed by the literal passage substring it marks.
///
/// Insertion order is display order and survives load/edit/export.
pub type Annotations = IndexMap<String, Annotation>;

/// One unit of annotatable text: a passage, a question derived from it, and marked spans.
///
/// Top-level fields this crate does not know about are kept in `extra` and written back after the
/// known fields on export. `id` is opaque: any JSON value, `null` included, is written back as
/// read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default, deserialize_with = "present_value", skip_serializing_if = "Option::is_none")]
    id: Option<Value>,
    context: String,
    question: String,
    piis: Annotations,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl Record {
    pub fn new(context: impl Into<String>, question: impl Into<String>) -> Self {
        Self {
            id: None,
            context: context.into(),
            question: question.into(),
            piis: Annotations::new(),
            extra: Map::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<Value>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_annotation(
        mut self,
        key: impl Into<String>,
        pii_type: PiiType,
        relevance: Relevance,
    ) -> Self {
        self.piis.insert(key.into(), Annotation::new(pii_type, relevance));
        self
    }

    pub fn id(&self) -> Option<&Value> {
        self.id.as_ref()
    }

    /// Display form of the id: strings bare, anything else as compact JSON.
    pub fn id_label(&self) -> Option<String> {
        self.id.as_ref().map(|id| match id {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        })
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn set_context(&mut self, context: impl Into<String>) {
        self.context = context.into();
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn set_question(&mut self, question: impl Into<String>) {
        self.question = question.into();
    }

    pub fn piis(&self) -> &Annotations {
        &self.piis
    }

    pub fn piis_mut(&mut self) -> &mut Annotations {
        &mut self.piis
    }

    pub fn set_piis(&mut self, piis: Annotations) {
        self.piis = piis;
    }

    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }
}

// A present key always yields `Some`, so `"id": null` is kept apart from a missing id.
fn present_value<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Classification attached to one marked span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Annotation {
    #[serde(rename = "type")]
    pii_type: PiiType,
    relevance: Relevance,
}

impl Annotation {
    pub fn new(pii_type: PiiType, relevance: Relevance) -> Self {
        Self { pii_type, relevance }
    }

    pub fn pii_type(&self) -> PiiType {
        self.pii_type
    }

    pub fn relevance(&self) -> Relevance {
        self.relevance
    }

    pub fn set_pii_type(&mut self, pii_type: PiiType) {
        self.pii_type = pii_type;
    }

    pub fn set_relevance(&mut self, relevance: Relevance) {
        self.relevance = relevance;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PiiType {
    #[serde(rename = "age")]
    Age,
    #[serde(rename = "contact")]
    Contact,
    #[serde(rename = "education")]
    Education,
    #[serde(rename = "family")]
    Family,
    #[serde(rename = "finance")]
    Finance,
    #[serde(rename = "health")]
    Health,
    #[serde(rename = "location")]
    Location,
    #[serde(rename = "name")]
    Name,
    #[serde(rename = "nationality")]
    Nationality,
    #[serde(rename = "occupation")]
    Occupation,
    #[serde(rename = "public organization")]
    PublicOrganization,
    #[serde(rename = "sexual orientation")]
    SexualOrientation,
}

impl PiiType {
    /// All types in selector order.
    pub const ALL: [PiiType; 12] = [
        Self::Age,
        Self::Contact,
        Self::Education,
        Self::Family,
        Self::Finance,
        Self::Health,
        Self::Location,
        Self::Name,
        Self::Nationality,
        Self::Occupation,
        Self::PublicOrganization,
        Self::SexualOrientation,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Age => "age",
            Self::Contact => "contact",
            Self::Education => "education",
            Self::Family => "family",
            Self::Finance => "finance",
            Self::Health => "health",
            Self::Location => "location",
            Self::Name => "name",
            Self::Nationality => "nationality",
            Self::Occupation => "occupation",
            Self::PublicOrganization => "public organization",
            Self::SexualOrientation => "sexual orientation",
        }
    }

    fn position(self) -> usize {
        Self::ALL.iter().position(|candidate| *candidate == self).unwrap_or(0)
    }

    /// Next type in selector order, wrapping around.
    pub fn next(self) -> Self {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    /// Previous type in selector order, wrapping around.
    pub fn prev(self) -> Self {
        let len = Self::ALL.len();
        Self::ALL[(self.position() + len - 1) % len]
    }
}

impl Default for PiiType {
    fn default() -> Self {
        Self::Age
    }
}

impl fmt::Display for PiiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PiiType {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|candidate| candidate.as_str() == s)
            .ok_or_else(|| ParseLabelError::new("pii type", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relevance {
    High,
    Low,
}

impl Relevance {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Low => "low",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            Self::High => Self::Low,
            Self::Low => Self::High,
        }
    }
}

impl Default for Relevance {
    fn default() -> Self {
        Self::High
    }
}

impl fmt::Display for Relevance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Relevance {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "high" => Ok(Self::High),
            "low" => Ok(Self::Low),
            _ => Err(ParseLabelError::new("relevance", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLabelError {
    kind: &'static str,
    value: String,
}

impl ParseLabelError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self { kind, value: value.to_owned() }
    }
}

impl fmt::Display for ParseLabelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {}: {:?}", self.kind, self.value)
    }
}

impl std::error::Error for ParseLabelError {}
