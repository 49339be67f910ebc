//! Static declarations of API calls.
//!
//! A `CallDescriptor` describes one remote operation: its HTTP method, the
//! path template, how arguments bind to the template and the query string,
//! and the metadata tags that travel with every request the call produces.
//! Descriptors are validated when they are built, so a client whose
//! declarations disagree with their templates fails at start-up instead of
//! on the first call.

use std::collections::{HashMap, HashSet};
use std::fmt::{self, Display, Formatter};
use std::hash::Hash;
use std::sync::Arc;

use regex::Regex;

use crate::error::{self, CallError};
use crate::http::Method;
use crate::invocation::Arguments;
use crate::Result;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TagKind {
    /// The request must carry `Authorization: Bearer <value>`.
    AccessToken,
    /// Media type sent in the `Accept` header.
    Accept,
    /// Human readable name of the operation, used in logs.
    Label,
}

impl Display for TagKind {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            TagKind::AccessToken => write!(f, "access-token"),
            TagKind::Accept => write!(f, "accept"),
            TagKind::Label => write!(f, "label"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Tag {
    kind: TagKind,
    value: String,
}

impl Tag {
    pub fn new<V: Into<String>>(kind: TagKind, value: V) -> Self {
        Tag {
            kind,
            value: value.into(),
        }
    }

    pub fn access_token<V: Into<String>>(token: V) -> Self {
        Tag::new(TagKind::AccessToken, token)
    }

    pub fn accept<V: Into<String>>(media_type: V) -> Self {
        Tag::new(TagKind::Accept, media_type)
    }

    pub fn label<V: Into<String>>(label: V) -> Self {
        Tag::new(TagKind::Label, label)
    }

    pub fn kind(&self) -> TagKind {
        self.kind
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Ordered set of tags attached to a call. Requests hold it behind an `Arc`
/// pointing at the descriptor's own copy.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Metadata(Vec<Tag>);

impl Metadata {
    pub fn new() -> Self {
        Metadata(Vec::new())
    }

    /// Adds a tag. An identical (kind, value) pair is only kept once.
    pub fn insert(&mut self, tag: Tag) {
        if !self.0.contains(&tag) {
            self.0.push(tag);
        }
    }

    /// First tag of the given kind in declaration order.
    pub fn get(&self, kind: TagKind) -> Option<&Tag> {
        self.0.iter().find(|tag| tag.kind == kind)
    }

    pub fn contains(&self, kind: TagKind) -> bool {
        self.get(kind).is_some()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tag> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParamLocation {
    Path,
    Query,
}

/// Binds a template placeholder or a query parameter to an argument slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParamBinding {
    name: String,
    slot: usize,
    location: ParamLocation,
}

impl ParamBinding {
    pub fn path<N: Into<String>>(name: N, slot: usize) -> Self {
        ParamBinding {
            name: name.into(),
            slot,
            location: ParamLocation::Path,
        }
    }

    pub fn query<N: Into<String>>(name: N, slot: usize) -> Self {
        ParamBinding {
            name: name.into(),
            slot,
            location: ParamLocation::Query,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn slot(&self) -> usize {
        self.slot
    }

    pub fn location(&self) -> ParamLocation {
        self.location
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Placeholder(String),
}

lazy_static! {
    static ref PLACEHOLDER: Regex = Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").unwrap();
}

fn parse_template(template: &str) -> Result<Vec<Segment>> {
    if !template.starts_with('/') {
        return Err(error::configuration(format!(
            "path template {} must start with /",
            template
        )));
    }
    // Query strings come from query bindings only.
    if template.contains('?') || template.contains('#') {
        return Err(error::configuration(format!(
            "path template {} must not contain a query or fragment",
            template
        )));
    }
    let mut segments = Vec::new();
    let mut last = 0;
    for placeholder in PLACEHOLDER.find_iter(template) {
        if placeholder.start() > last {
            segments.push(literal(&template[last..placeholder.start()], template)?);
        }
        let name = &placeholder.as_str()[1..placeholder.as_str().len() - 1];
        segments.push(Segment::Placeholder(name.to_string()));
        last = placeholder.end();
    }
    if last < template.len() {
        segments.push(literal(&template[last..], template)?);
    }
    Ok(segments)
}

fn literal(text: &str, template: &str) -> Result<Segment> {
    // Anything left with braces after extracting placeholders is malformed.
    if text.contains('{') || text.contains('}') {
        return Err(error::configuration(format!(
            "unbalanced or invalid placeholder in path template {}",
            template
        )));
    }
    Ok(Segment::Literal(text.to_string()))
}

#[derive(Debug)]
pub struct CallDescriptor {
    method: Method,
    template: String,
    segments: Vec<Segment>,
    bindings: Vec<ParamBinding>,
    metadata: Arc<Metadata>,
}

impl CallDescriptor {
    pub fn declare<P: Into<String>>(method: Method, template: P) -> Declaration {
        Declaration {
            method,
            template: template.into(),
            bindings: Vec::new(),
            metadata: Metadata::new(),
        }
    }

    pub fn get<P: Into<String>>(template: P) -> Declaration {
        CallDescriptor::declare(Method::GET, template)
    }

    pub fn post<P: Into<String>>(template: P) -> Declaration {
        CallDescriptor::declare(Method::POST, template)
    }

    pub fn put<P: Into<String>>(template: P) -> Declaration {
        CallDescriptor::declare(Method::PUT, template)
    }

    pub fn patch<P: Into<String>>(template: P) -> Declaration {
        CallDescriptor::declare(Method::PATCH, template)
    }

    pub fn delete<P: Into<String>>(template: P) -> Declaration {
        CallDescriptor::declare(Method::DELETE, template)
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn bindings(&self) -> &[ParamBinding] {
        &self.bindings
    }

    pub fn metadata(&self) -> &Arc<Metadata> {
        &self.metadata
    }

    /// Binding for a placeholder or query parameter name.
    pub fn binding(&self, name: &str, location: ParamLocation) -> Option<&ParamBinding> {
        self.bindings
            .iter()
            .find(|binding| binding.location == location && binding.name == name)
    }

    /// Number of argument slots the call accepts.
    pub fn arity(&self) -> usize {
        self.bindings
            .iter()
            .map(|binding| binding.slot + 1)
            .max()
            .unwrap_or(0)
    }

    /// Checks the supplied arguments against the bindings before anything is
    /// built. Path slots are required, query slots are optional. Arguments
    /// past the last declared slot mean the caller disagrees with the
    /// declaration and are reported as a configuration error.
    pub fn check_arguments(&self, args: &Arguments) -> Result<()> {
        if args.len() > self.arity() {
            return Err(error::configuration(format!(
                "{} {} takes {} argument(s), {} given",
                self.method,
                self.template,
                self.arity(),
                args.len()
            )));
        }
        for binding in &self.bindings {
            if binding.location == ParamLocation::Path && args.get(binding.slot).is_none() {
                return Err(CallError::MissingArgument(format!(
                    "{} (slot {}) for {} {}",
                    binding.name, binding.slot, self.method, self.template
                ))
                .into());
            }
        }
        Ok(())
    }
}

/// Under-construction `CallDescriptor`. Validated by `build`.
pub struct Declaration {
    method: Method,
    template: String,
    bindings: Vec<ParamBinding>,
    metadata: Metadata,
}

impl Declaration {
    pub fn path_param<N: Into<String>>(mut self, name: N, slot: usize) -> Self {
        self.bindings.push(ParamBinding::path(name, slot));
        self
    }

    pub fn query_param<N: Into<String>>(mut self, name: N, slot: usize) -> Self {
        self.bindings.push(ParamBinding::query(name, slot));
        self
    }

    pub fn tag(mut self, tag: Tag) -> Self {
        self.metadata.insert(tag);
        self
    }

    pub fn build(self) -> Result<CallDescriptor> {
        let segments = parse_template(&self.template)?;
        let placeholders = segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Placeholder(name) => Some(name.as_str()),
                Segment::Literal(_) => None,
            })
            .collect::<Vec<&str>>();

        let mut seen = HashSet::new();
        for binding in &self.bindings {
            if !seen.insert((binding.location, binding.name.as_str())) {
                return Err(error::configuration(format!(
                    "parameter {} bound twice in {}",
                    binding.name, self.template
                )));
            }
            if binding.location == ParamLocation::Path
                && !placeholders.contains(&binding.name.as_str())
            {
                return Err(error::configuration(format!(
                    "path parameter {} has no placeholder in {}",
                    binding.name, self.template
                )));
            }
        }
        for placeholder in &placeholders {
            let bound = self.bindings.iter().any(|binding| {
                binding.location == ParamLocation::Path && binding.name == *placeholder
            });
            if !bound {
                return Err(error::configuration(format!(
                    "placeholder {{{}}} in {} has no parameter binding",
                    placeholder, self.template
                )));
            }
        }

        Ok(CallDescriptor {
            method: self.method,
            template: self.template,
            segments,
            bindings: self.bindings,
            metadata: Arc::new(self.metadata),
        })
    }
}

/// Operation id to descriptor table. Built once from declarations and only
/// read afterwards, so it can be shared across threads without locking.
#[derive(Debug)]
pub struct Registry<K> {
    calls: HashMap<K, CallDescriptor>,
}

impl<K: Eq + Hash + fmt::Debug> Registry<K> {
    pub fn new<I>(declarations: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, Declaration)>,
    {
        let mut calls = HashMap::new();
        for (id, declaration) in declarations {
            if calls.contains_key(&id) {
                return Err(error::configuration(format!(
                    "operation {:?} declared twice",
                    id
                )));
            }
            let descriptor = declaration.build()?;
            calls.insert(id, descriptor);
        }
        Ok(Registry { calls })
    }

    pub fn get(&self, id: &K) -> Result<&CallDescriptor> {
        self.calls
            .get(id)
            .ok_or_else(|| error::configuration(format!("operation {:?} is not declared", id)))
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }
}
