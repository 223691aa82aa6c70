//! Overload resolution.
//!
//! An operation declares one or more [`Shape`]s. A call is resolved by
//! trying each shape in declaration order and taking the first one the
//! arguments fully satisfy. There is no scoring and no fallback: if nothing
//! matches, the call fails with [`ResolveError::NoMatchingOverload`].
//!
//! Keyword options go through [`resolve_option`], which matches the whole
//! option value against each [`OptionForm`] in turn and then binds it onto
//! one of the member's shapes. A list form binds every element separately,
//! so one option can stand for several calls of the same method.

use std::collections::BTreeMap;

use apphost_types::{explain, matches, Field, Mismatch, TypeDesc, Value};
use thiserror::Error;
use tracing::debug;

use crate::format::{format, Format};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolveError {
    #[error("no matching overload for '{operation}'")]
    NoMatchingOverload { operation: String },
}

/// One declared parameter of a shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    /// Name callers use.
    pub name: &'static str,
    /// Argument name in the emitted call.
    pub target: String,
    pub desc: TypeDesc,
    pub default: Option<Value>,
    pub format: Format,
    /// Can only be supplied by name.
    pub keyword_only: bool,
}

impl Param {
    pub fn new(name: &'static str, desc: TypeDesc, format: Format) -> Self {
        Self {
            name,
            target: camel_case(name),
            desc,
            default: None,
            format,
            keyword_only: false,
        }
    }

    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn keyword(mut self) -> Self {
        self.keyword_only = true;
        self
    }

    /// Use a different argument name in the emitted call.
    pub fn renamed(mut self, target: &str) -> Self {
        self.target = target.to_string();
        self
    }

    fn fallback(&self) -> Value {
        self.default.clone().unwrap_or(Value::Null)
    }
}

/// Ordered parameter list for one calling convention.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Shape {
    pub params: Vec<Param>,
}

impl Shape {
    pub fn new(params: impl IntoIterator<Item = Param>) -> Self {
        Self {
            params: params.into_iter().collect(),
        }
    }

    /// Render bound values as `target: literal` pairs.
    pub fn render(&self, values: &[Value]) -> String {
        self.params
            .iter()
            .zip(values)
            .map(|(param, value)| {
                format!(
                    "{}: {}",
                    param.target,
                    format(value, param.format, param.default.as_ref())
                )
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Parameter descriptors as a record, for keyword-style calls.
    pub fn as_record(&self) -> TypeDesc {
        TypeDesc::record(self.params.iter().map(|p| Field {
            name: p.name.to_string(),
            desc: p.desc.clone(),
            required: p.default.is_none(),
        }))
    }
}

/// Positional and named arguments of a call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    positional: Vec<Value>,
    named: BTreeMap<String, Value>,
}

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    pub fn kwarg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.named.insert(name.into(), value.into());
        self
    }

    pub fn positional(&self) -> &[Value] {
        &self.positional
    }

    pub fn named(&self) -> &BTreeMap<String, Value> {
        &self.named
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.named.is_empty()
    }

    pub fn prepend(&mut self, value: impl Into<Value>) {
        self.positional.insert(0, value.into());
    }

    /// Remove and return every named argument for which `keep` is false.
    pub fn split_off_named(&mut self, keep: impl Fn(&str) -> bool) -> BTreeMap<String, Value> {
        let (kept, rest): (BTreeMap<_, _>, BTreeMap<_, _>) = std::mem::take(&mut self.named)
            .into_iter()
            .partition(|(k, _)| keep(k.as_str()));
        self.named = kept;
        rest
    }
}

/// Outcome of a successful resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    /// Index of the winning shape.
    pub index: usize,
    /// One value per parameter of the winning shape, defaults filled in.
    pub values: Vec<Value>,
}

#[derive(Debug, Error)]
enum Rejection {
    #[error("expected at most {max} positional arguments, got {got}")]
    TooManyPositional { max: usize, got: usize },
    #[error("'{0}' is keyword-only")]
    KeywordOnly(&'static str),
    #[error("no parameter named '{0}'")]
    UnknownKeyword(String),
    #[error("'{0}' given both positionally and by name")]
    Duplicate(String),
    #[error("missing required argument '{0}'")]
    Missing(&'static str),
    #[error("argument '{name}' {mismatch}")]
    Mismatch { name: &'static str, mismatch: Mismatch },
}

/// Pick the first shape `args` satisfies.
pub fn resolve(operation: &str, args: &Args, shapes: &[Shape]) -> Result<Resolved, ResolveError> {
    for (index, shape) in shapes.iter().enumerate() {
        match bind(args, shape) {
            Ok(values) => {
                debug!(operation, index, "overload selected");
                return Ok(Resolved { index, values });
            }
            Err(reason) => debug!(operation, index, %reason, "overload rejected"),
        }
    }
    debug!(operation, shapes = shapes.len(), "no overload matched");
    Err(ResolveError::NoMatchingOverload {
        operation: operation.to_string(),
    })
}

fn bind(args: &Args, shape: &Shape) -> Result<Vec<Value>, Rejection> {
    let params = &shape.params;
    if args.positional.len() > params.len() {
        return Err(Rejection::TooManyPositional {
            max: params.len(),
            got: args.positional.len(),
        });
    }

    let mut slots: Vec<Option<Value>> = vec![None; params.len()];
    for (slot, (param, value)) in slots.iter_mut().zip(params.iter().zip(&args.positional)) {
        if param.keyword_only {
            return Err(Rejection::KeywordOnly(param.name));
        }
        *slot = Some(value.clone());
    }

    for (name, value) in &args.named {
        let position = params
            .iter()
            .position(|p| p.name == name.as_str())
            .ok_or_else(|| Rejection::UnknownKeyword(name.clone()))?;
        if slots[position].is_some() {
            return Err(Rejection::Duplicate(name.clone()));
        }
        slots[position] = Some(value.clone());
    }

    params
        .iter()
        .zip(slots)
        .map(|(param, slot)| {
            let value = match slot {
                Some(value) => value,
                None => param.default.clone().ok_or(Rejection::Missing(param.name))?,
            };
            if !matches(&value, &param.desc) {
                let mismatch = explain(&value, &param.desc).unwrap_or_else(|| Mismatch {
                    path: "$".to_string(),
                    expected: param.desc.to_string(),
                    actual: value.kind().to_string(),
                });
                return Err(Rejection::Mismatch {
                    name: param.name,
                    mismatch,
                });
            }
            Ok(value)
        })
        .collect()
}

/// How an option value is bound onto a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    /// `true` switches the option on; the call takes no arguments.
    Flag,
    /// The value is the shape's first argument.
    Scalar,
    /// A tuple spread over the first `n` parameters.
    Spread(usize),
    /// A record bound to parameters by name.
    Fields,
    /// A list whose elements each bind through one of the element forms.
    Each,
}

/// One accepted shape of an option value.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionForm {
    pub binding: Binding,
    /// Index of the member shape the value binds onto.
    pub overload: usize,
    /// Descriptor the whole option value must match.
    pub accepts: TypeDesc,
    /// Forms tried for each element of an [`Binding::Each`] value.
    pub elements: Vec<OptionForm>,
}

impl OptionForm {
    pub fn new(binding: Binding, overload: usize, shape: &Shape) -> Self {
        let accepts = match binding {
            Binding::Flag => TypeDesc::flag(),
            Binding::Scalar => shape
                .params
                .first()
                .map(|p| p.desc.clone())
                .unwrap_or(TypeDesc::Literal(Vec::new())),
            Binding::Spread(n) => {
                TypeDesc::tuple(shape.params.iter().take(n).map(|p| p.desc.clone()))
            }
            Binding::Fields => shape.as_record(),
            Binding::Each => {
                return Self::each(vec![Self::new(Binding::Scalar, overload, shape)]);
            }
        };
        Self {
            binding,
            overload,
            accepts,
            elements: Vec::new(),
        }
    }

    /// A list form whose elements match any of `elements`.
    pub fn each(elements: Vec<OptionForm>) -> Self {
        let element = TypeDesc::union(elements.iter().map(|f| f.accepts.clone()));
        Self {
            binding: Binding::Each,
            overload: 0,
            accepts: TypeDesc::seq(element),
            elements,
        }
    }
}

/// A resolved option: which form matched and the values for its shape.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundOption {
    pub form: usize,
    pub binding: Binding,
    pub overload: usize,
    pub values: Vec<Value>,
    /// One binding per list element, for [`Binding::Each`].
    pub elements: Vec<BoundOption>,
}

impl BoundOption {
    /// The calls this option emits, in order.
    pub fn calls(&self) -> Vec<&BoundOption> {
        match self.binding {
            Binding::Each => self.elements.iter().collect(),
            _ => vec![self],
        }
    }
}

/// Match an option value against `forms` and bind it onto `shapes`.
pub fn resolve_option(
    option: &str,
    value: &Value,
    forms: &[OptionForm],
    shapes: &[Shape],
) -> Result<BoundOption, ResolveError> {
    let no_match = || ResolveError::NoMatchingOverload {
        operation: option.to_string(),
    };

    let Some((form_index, form)) = forms
        .iter()
        .enumerate()
        .find(|(_, form)| matches(value, &form.accepts))
    else {
        for form in forms {
            if let Some(mismatch) = explain(value, &form.accepts) {
                debug!(option, binding = ?form.binding, %mismatch, "option form rejected");
            }
        }
        return Err(no_match());
    };

    let mut elements = Vec::new();
    let values = match (form.binding, value) {
        (Binding::Flag, _) => Vec::new(),
        (Binding::Each, Value::List(items)) => {
            for item in items {
                elements.push(resolve_option(option, item, &form.elements, shapes)?);
            }
            Vec::new()
        }
        (Binding::Each, _) => return Err(no_match()),
        (binding, _) => {
            let shape = shapes.get(form.overload).ok_or_else(no_match)?;
            bind_option(binding, value, shape)
        }
    };

    debug!(option, form = form_index, "option form selected");
    Ok(BoundOption {
        form: form_index,
        binding: form.binding,
        overload: form.overload,
        values,
        elements,
    })
}

fn bind_option(binding: Binding, value: &Value, shape: &Shape) -> Vec<Value> {
    shape
        .params
        .iter()
        .enumerate()
        .map(|(i, param)| match (binding, value) {
            (Binding::Scalar, _) if i == 0 => value.clone(),
            (Binding::Spread(n), Value::Tuple(items)) if i < n => {
                items.get(i).cloned().unwrap_or_else(|| param.fallback())
            }
            (Binding::Fields, _) => value
                .get(param.name)
                .cloned()
                .unwrap_or_else(|| param.fallback()),
            _ => param.fallback(),
        })
        .collect()
}

/// `is_read_only` becomes `isReadOnly`.
pub fn camel_case(snake: &str) -> String {
    let mut out = String::with_capacity(snake.len());
    let mut upper = false;
    for c in snake.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}
