//! XBRL instance document parsing.
//!
//! An instance document is a flat list of facts next to the `context` elements those facts
//! point at through `contextRef`. This module streams the document once with a
//! namespace-aware reader and keeps two things:
//!
//! - every element in the us-gaap taxonomy namespace, as a [`Fact`]
//! - every `xbrli:context`, as a [`Context`]
//!
//! Facts are then joined to their contexts by id. Cover-page and entity-information elements
//! (`dei:*`, company extensions, linkbase references) are skipped because their namespaces
//! are not us-gaap.
//!
//! # Example
//!
//! ```
//! use edgarfacts::parsing::xbrl::extract_facts;
//!
//! let xml = br#"<xbrli:xbrl xmlns:xbrli="http://www.xbrl.org/2003/instance"
//!                           xmlns:us-gaap="http://fasb.org/us-gaap/2023">
//!   <xbrli:context id="c-1">
//!     <xbrli:entity><xbrli:identifier scheme="http://www.sec.gov/CIK">0000320193</xbrli:identifier></xbrli:entity>
//!     <xbrli:period><xbrli:instant>2023-09-30</xbrli:instant></xbrli:period>
//!   </xbrli:context>
//!   <us-gaap:Assets contextRef="c-1" unitRef="usd" decimals="-6">352583000000</us-gaap:Assets>
//! </xbrli:xbrl>"#;
//!
//! let facts = extract_facts(xml)?;
//! assert_eq!(facts[0].tag, "Assets");
//! assert_eq!(facts[0].context[0].period_instant.as_deref(), Some("2023-09-30"));
//! # Ok::<(), edgarfacts::EdgarError>(())
//! ```

use crate::{EdgarError, Result};
use quick_xml::NsReader;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// Namespace of the XBRL 2.1 instance vocabulary (`context`, `entity`, `period`, ...).
pub const XBRL_INSTANCE_NAMESPACE: &str = "http://www.xbrl.org/2003/instance";

/// Namespace of XBRL dimensional instance elements (`explicitMember`).
pub const XBRL_DIMENSIONS_NAMESPACE: &str = "http://xbrl.org/2006/xbrldi";

/// Every us-gaap taxonomy release lives directly under this prefix, e.g.
/// `http://fasb.org/us-gaap/2023`.
pub const US_GAAP_NAMESPACE_PREFIX: &str = "http://fasb.org/us-gaap/";

/// Rendering used for attributes and texts missing from the source document.
pub const NOT_AVAILABLE: &str = "N/A";

/// Returns true if `uri` names a us-gaap taxonomy release.
///
/// The URI must be the declared prefix followed by one version segment. Namespaces that
/// merely contain the text `us-gaap` (extension or supplemental taxonomies) do not match.
pub fn is_us_gaap_namespace(uri: &str) -> bool {
    uri.strip_prefix(US_GAAP_NAMESPACE_PREFIX)
        .map(|version| version.trim_end_matches('/'))
        .is_some_and(|version| !version.is_empty() && !version.contains('/'))
}

/// One reported value extracted from an instance document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fact {
    /// Local element name, e.g. `NetIncomeLoss`.
    pub tag: String,
    pub context_reference: Option<String>,
    pub element_id: Option<String>,
    /// Raw text before the first child element. Numeric facts keep their literal.
    pub value: Option<String>,
    pub unit_reference: Option<String>,
    pub decimals: Option<String>,
    /// All contexts sharing `context_reference`, in document order.
    pub context: Vec<Context>,
}

/// Reporting scope of one or more facts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    pub id: String,
    pub entity_identifier: Option<String>,
    pub segments: Vec<Segment>,
    pub period_start_date: Option<String>,
    pub period_end_date: Option<String>,
    pub period_instant: Option<String>,
}

/// A dimensional qualifier: `dimension` is the axis QName, `member` the member QName.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub dimension: Option<String>,
    pub member: Option<String>,
}

fn or_na(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or(NOT_AVAILABLE)
}

impl Fact {
    pub fn context_reference_or_na(&self) -> &str {
        or_na(&self.context_reference)
    }

    pub fn element_id_or_na(&self) -> &str {
        or_na(&self.element_id)
    }

    pub fn unit_reference_or_na(&self) -> &str {
        or_na(&self.unit_reference)
    }

    pub fn decimals_or_na(&self) -> &str {
        or_na(&self.decimals)
    }
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let context = if self.context.is_empty() {
            "None".to_string()
        } else {
            let ids: Vec<_> = self.context.iter().map(|c| c.id.as_str()).collect();
            format!("Context(id='{}')", ids.join(", "))
        };
        write!(
            f,
            "Fact(tag='{}', context_ref='{}', id='{}', value='{}', unit_ref='{}', decimals={}, context={})",
            self.tag,
            self.context_reference_or_na(),
            self.element_id_or_na(),
            self.value.as_deref().unwrap_or(""),
            self.unit_reference_or_na(),
            self.decimals_or_na(),
            context
        )
    }
}

impl Context {
    fn new(id: String) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    pub fn entity_identifier_or_na(&self) -> &str {
        or_na(&self.entity_identifier)
    }

    pub fn is_instant(&self) -> bool {
        self.period_instant.is_some()
    }

    pub fn is_duration(&self) -> bool {
        self.period_start_date.is_some() || self.period_end_date.is_some()
    }

    /// True when the context carries at least one dimensional qualifier.
    pub fn is_dimensional(&self) -> bool {
        !self.segments.is_empty()
    }
}

/// Tag names present in a list of facts.
pub fn unique_tags(facts: &[Fact]) -> BTreeSet<String> {
    facts.iter().map(|fact| fact.tag.clone()).collect()
}

/// Parses an instance document and returns its us-gaap facts with contexts attached.
///
/// # Errors
///
/// Returns `EdgarError::XmlError` for malformed XML. No facts are returned in that case.
pub fn extract_facts(xml: &[u8]) -> Result<Vec<Fact>> {
    Ok(XbrlDocument::parse(xml)?.into_facts())
}

/// A parsed instance document: facts in document order plus every context.
///
/// Facts held here have no contexts attached yet; use [`XbrlDocument::resolve_context`] for
/// a single reference or [`XbrlDocument::into_facts`] to join them all.
#[derive(Debug, Clone, Default)]
pub struct XbrlDocument {
    facts: Vec<Fact>,
    contexts: Vec<Context>,
}

impl XbrlDocument {
    /// Parses raw instance document bytes.
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let mut reader = NsReader::from_reader(xml);
        let mut builder = DocumentBuilder::default();
        let mut buf = Vec::new();

        loop {
            let (ns, event) = reader.read_resolved_event_into(&mut buf)?;
            let space = Space::of(&ns);

            match event {
                Event::Start(ref start) => builder.open(space, start)?,
                Event::Empty(ref start) => {
                    builder.open(space, start)?;
                    builder.close()?;
                }
                Event::End(_) => builder.close()?,
                Event::Text(ref text) => builder.text(&text.unescape()?)?,
                Event::CData(cdata) => {
                    let bytes = cdata.into_inner();
                    let text = std::str::from_utf8(&bytes)
                        .map_err(|e| EdgarError::XmlError(format!("Invalid UTF-8 in CDATA: {e}")))?;
                    builder.text(text)?;
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        builder.finish()
    }

    /// Facts in document order, without contexts.
    pub fn facts(&self) -> &[Fact] {
        &self.facts
    }

    /// Every context element in document order.
    pub fn contexts(&self) -> &[Context] {
        &self.contexts
    }

    /// Returns every context whose `id` equals `reference`.
    ///
    /// Instance documents may repeat a context id; all matches are returned in document order.
    /// An unknown reference yields an empty list.
    pub fn resolve_context(&self, reference: &str) -> Vec<Context> {
        self.contexts
            .iter()
            .filter(|context| context.id == reference)
            .cloned()
            .collect()
    }

    /// Attaches the matching contexts to every fact and returns the facts.
    pub fn into_facts(self) -> Vec<Fact> {
        let Self { mut facts, contexts } = self;

        let mut by_id: HashMap<&str, Vec<&Context>> = HashMap::new();
        for context in &contexts {
            by_id.entry(context.id.as_str()).or_default().push(context);
        }

        for fact in &mut facts {
            fact.context = fact
                .context_reference
                .as_deref()
                .and_then(|reference| by_id.get(reference))
                .map(|matches| matches.iter().map(|&c| c.clone()).collect())
                .unwrap_or_default();
        }

        facts
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Space {
    Instance,
    Dimensions,
    UsGaap,
    Other,
}

impl Space {
    fn of(ns: &ResolveResult<'_>) -> Self {
        match ns {
            ResolveResult::Bound(Namespace(uri)) => match std::str::from_utf8(uri) {
                Ok(XBRL_INSTANCE_NAMESPACE) => Space::Instance,
                Ok(XBRL_DIMENSIONS_NAMESPACE) => Space::Dimensions,
                Ok(uri) if is_us_gaap_namespace(uri) => Space::UsGaap,
                _ => Space::Other,
            },
            _ => Space::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PeriodField {
    StartDate,
    EndDate,
    Instant,
}

/// What an open element means to the builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Open {
    Context,
    Entity,
    Identifier,
    Period,
    PeriodField(PeriodField),
    Member,
    /// `leading_text` turns false once the fact's first child element opens.
    Fact { index: usize, leading_text: bool },
    Other,
}

#[derive(Default)]
struct DocumentBuilder {
    stack: Vec<Open>,
    root_seen: bool,
    context: Option<Context>,
    facts: Vec<Fact>,
    contexts: Vec<Context>,
}

impl DocumentBuilder {
    fn open(&mut self, space: Space, start: &BytesStart<'_>) -> Result<()> {
        if self.stack.is_empty() {
            if self.root_seen {
                return Err(EdgarError::XmlError(
                    "junk after document element".to_string(),
                ));
            }
            self.root_seen = true;
        }

        if let Some(Open::Fact { leading_text, .. }) = self.stack.last_mut() {
            *leading_text = false;
        }

        let local = local_name(start)?;
        let parent = self.stack.last().copied();

        let open = match (space, local.as_str()) {
            (Space::Instance, "context") if self.context.is_none() => {
                let id = attribute(start, "id")?.unwrap_or_default();
                self.context = Some(Context::new(id));
                Open::Context
            }
            (Space::Instance, "entity") if parent == Some(Open::Context) => Open::Entity,
            (Space::Instance, "identifier") if parent == Some(Open::Entity) => Open::Identifier,
            (Space::Instance, "period") if parent == Some(Open::Context) => Open::Period,
            (Space::Instance, field) if parent == Some(Open::Period) => match field {
                "startDate" => Open::PeriodField(PeriodField::StartDate),
                "endDate" => Open::PeriodField(PeriodField::EndDate),
                "instant" => Open::PeriodField(PeriodField::Instant),
                _ => Open::Other,
            },
            (Space::Dimensions, "explicitMember") if self.context.is_some() => {
                let dimension = attribute(start, "dimension")?;
                if let Some(context) = self.context.as_mut() {
                    context.segments.push(Segment {
                        dimension,
                        member: None,
                    });
                }
                Open::Member
            }
            (Space::UsGaap, _) => {
                self.facts.push(Fact {
                    tag: local.clone(),
                    context_reference: attribute(start, "contextRef")?,
                    element_id: attribute(start, "id")?,
                    value: None,
                    unit_reference: attribute(start, "unitRef")?,
                    decimals: attribute(start, "decimals")?,
                    context: Vec::new(),
                });
                Open::Fact {
                    index: self.facts.len() - 1,
                    leading_text: true,
                }
            }
            _ => Open::Other,
        };

        self.stack.push(open);
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        let closed = self
            .stack
            .pop()
            .ok_or_else(|| EdgarError::XmlError("unmatched end tag".to_string()))?;

        if closed == Open::Context {
            if let Some(context) = self.context.take() {
                self.contexts.push(context);
            }
        }
        Ok(())
    }

    fn text(&mut self, text: &str) -> Result<()> {
        let slot = match self.stack.last().copied() {
            None => {
                if text.trim().is_empty() {
                    return Ok(());
                }
                return Err(EdgarError::XmlError(
                    "text outside of the document element".to_string(),
                ));
            }
            Some(Open::Fact {
                index,
                leading_text: true,
            }) => self.facts.get_mut(index).map(|fact| &mut fact.value),
            Some(Open::Identifier) => self.context.as_mut().map(|c| &mut c.entity_identifier),
            Some(Open::PeriodField(field)) => self.context.as_mut().map(|c| match field {
                PeriodField::StartDate => &mut c.period_start_date,
                PeriodField::EndDate => &mut c.period_end_date,
                PeriodField::Instant => &mut c.period_instant,
            }),
            Some(Open::Member) => self
                .context
                .as_mut()
                .and_then(|c| c.segments.last_mut())
                .map(|segment| &mut segment.member),
            Some(_) => None,
        };

        if let Some(slot) = slot {
            slot.get_or_insert_with(String::new).push_str(text);
        }
        Ok(())
    }

    fn finish(self) -> Result<XbrlDocument> {
        if !self.stack.is_empty() {
            return Err(EdgarError::XmlError(
                "unexpected end of document: unclosed element".to_string(),
            ));
        }
        if !self.root_seen {
            return Err(EdgarError::XmlError("no document element found".to_string()));
        }

        Ok(XbrlDocument {
            facts: self.facts,
            contexts: self.contexts,
        })
    }
}

fn local_name(start: &BytesStart<'_>) -> Result<String> {
    std::str::from_utf8(start.local_name().as_ref())
        .map(str::to_string)
        .map_err(|e| EdgarError::XmlError(format!("Invalid UTF-8 in element name: {e}")))
}

fn attribute(start: &BytesStart<'_>, name: &str) -> Result<Option<String>> {
    match start.try_get_attribute(name)? {
        Some(attr) => Ok(Some(attr.unescape_value()?.into_owned())),
        None => Ok(None),
    }
}
